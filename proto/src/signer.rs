// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signer application commands and payloads
//!
//! Request payloads are described after the opcode byte, response payloads
//! after the response code byte.

use byteorder::{ByteOrder, LittleEndian};
use encdec::{Decode, DecodeOwned, Encode};
use strum::{Display, EnumIter};

use crate::{
    generation::{AppCommand, Generation, Opcode},
    helpers::{check_len, read_status},
    ProtoError, Status,
};

/// Signer application commands
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter)]
pub enum SignerCmd {
    /// Fetch the device public key
    GetPublicKey,
    /// Declare the size of a message to be loaded
    SetSize,
    /// Load a chunk of message data
    SignData,
    /// Fetch the signature over a completely loaded message
    GetSignature,
    /// Fetch application name and version
    GetNameVersion,
    /// Fetch the unique device identifier
    GetUdi,
}

impl AppCommand for SignerCmd {
    const GET_NAME_VERSION: Self = SignerCmd::GetNameVersion;

    fn table(gen: &Generation) -> &'static [Opcode<Self>] {
        gen.signer
    }
}

/// Declare message size request
///
/// ## Encoding
/// ```text
/// | SIZE (u32 LE) | PADDING... |
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SetSizeReq {
    pub size: u32,
}

impl Encode for SetSizeReq {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 4)?;
        LittleEndian::write_u32(&mut buff[..4], self.size);
        Ok(4)
    }
}

impl DecodeOwned for SetSizeReq {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, 4)?;
        let size = LittleEndian::read_u32(&buff[..4]);
        Ok((Self { size }, 4))
    }
}

/// Message data chunk request
///
/// Carries up to the frame payload less the opcode byte, the final chunk is
/// zero padded by the sender and trimmed by the device.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SignDataReq<'a> {
    pub data: &'a [u8],
}

impl<'a> Encode for SignDataReq<'a> {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(self.data.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, self.data.len())?;
        buff[..self.data.len()].copy_from_slice(self.data);
        Ok(self.data.len())
    }
}

impl<'a> Decode<'a> for SignDataReq<'a> {
    type Output = Self;
    type Error = ProtoError;

    fn decode(buff: &'a [u8]) -> Result<(Self::Output, usize), Self::Error> {
        Ok((Self { data: buff }, buff.len()))
    }
}

/// Status-only response (set size, sign data)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StatusResp {
    pub status: Status,
}

impl Encode for StatusResp {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 1)?;
        buff[0] = self.status as u8;
        Ok(1)
    }
}

impl DecodeOwned for StatusResp {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let status = read_status(buff)?;
        Ok((Self { status }, 1))
    }
}

/// Public key response
///
/// ## Encoding
/// ```text
/// | STATUS | PUBLIC_KEY (32) |
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PublicKeyResp {
    pub public_key: [u8; 32],
}

impl Encode for PublicKeyResp {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1 + 32)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 1 + 32)?;
        buff[0] = Status::Ok as u8;
        buff[1..][..32].copy_from_slice(&self.public_key);
        Ok(1 + 32)
    }
}

impl DecodeOwned for PublicKeyResp {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if read_status(buff)? != Status::Ok {
            return Err(ProtoError::InvalidEncoding);
        }
        check_len(buff, 1 + 32)?;

        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&buff[1..][..32]);

        Ok((Self { public_key }, 1 + 32))
    }
}

/// Signature response
///
/// ## Encoding
/// ```text
/// | STATUS | SIGNATURE (64) |
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SignatureResp {
    pub signature: [u8; 64],
}

impl Encode for SignatureResp {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1 + 64)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 1 + 64)?;
        buff[0] = Status::Ok as u8;
        buff[1..][..64].copy_from_slice(&self.signature);
        Ok(1 + 64)
    }
}

impl DecodeOwned for SignatureResp {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if read_status(buff)? != Status::Ok {
            return Err(ProtoError::InvalidEncoding);
        }
        check_len(buff, 1 + 64)?;

        let mut signature = [0u8; 64];
        signature.copy_from_slice(&buff[1..][..64]);

        Ok((Self { signature }, 1 + 64))
    }
}

/// Unique device identifier response
///
/// ## Encoding
/// ```text
/// | STATUS | UDI (8) |
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct UdiResp {
    pub udi: [u8; 8],
}

impl Encode for UdiResp {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1 + 8)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 1 + 8)?;
        buff[0] = Status::Ok as u8;
        buff[1..][..8].copy_from_slice(&self.udi);
        Ok(1 + 8)
    }
}

impl DecodeOwned for UdiResp {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if read_status(buff)? != Status::Ok {
            return Err(ProtoError::InvalidEncoding);
        }
        check_len(buff, 1 + 8)?;

        let mut udi = [0u8; 8];
        udi.copy_from_slice(&buff[1..][..8]);

        Ok((Self { udi }, 1 + 8))
    }
}

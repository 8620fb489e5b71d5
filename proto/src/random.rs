// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Random application commands and payloads

use encdec::{Decode, DecodeOwned, Encode};
use strum::{Display, EnumIter};

use crate::{
    generation::{AppCommand, Generation, Opcode},
    helpers::{check_len, read_status},
    ProtoError, Status,
};

/// Random application commands
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter)]
pub enum RandomCmd {
    /// Fetch application name and version
    GetNameVersion,
    /// Fetch random bytes
    GetRandom,
}

impl AppCommand for RandomCmd {
    const GET_NAME_VERSION: Self = RandomCmd::GetNameVersion;

    fn table(gen: &Generation) -> &'static [Opcode<Self>] {
        gen.random
    }
}

/// Random bytes request
///
/// ## Encoding
/// ```text
/// | COUNT | PADDING... |
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RandomReq {
    /// Number of bytes requested
    pub len: u8,
}

impl Encode for RandomReq {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 1)?;
        buff[0] = self.len;
        Ok(1)
    }
}

impl DecodeOwned for RandomReq {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, 1)?;
        Ok((Self { len: buff[0] }, 1))
    }
}

/// Random bytes response
///
/// ## Encoding
/// ```text
/// | STATUS | RANDOM... |
/// ```
///
/// The reply frame is padded to its length class, so decoding returns the
/// whole remaining body, callers trim to the requested count.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RandomResp<'a> {
    pub data: &'a [u8],
}

impl<'a> Encode for RandomResp<'a> {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1 + self.data.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 1 + self.data.len())?;
        buff[0] = Status::Ok as u8;
        buff[1..][..self.data.len()].copy_from_slice(self.data);
        Ok(1 + self.data.len())
    }
}

impl<'a> Decode<'a> for RandomResp<'a> {
    type Output = Self;
    type Error = ProtoError;

    fn decode(buff: &'a [u8]) -> Result<(Self::Output, usize), Self::Error> {
        if read_status(buff)? != Status::Ok {
            return Err(ProtoError::InvalidEncoding);
        }
        Ok((Self { data: &buff[1..] }, buff.len()))
    }
}

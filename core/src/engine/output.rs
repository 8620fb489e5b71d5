// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;
use heapless::Vec;
use static_assertions::const_assert_eq;

use tkey_proto::{
    prelude::{PublicKeyResp, RandomResp, SignatureResp, StatusResp, UdiResp, FRAME_MAX},
    NameVersion, ProtoError, Status,
};

/// Largest random reply across generations (frame payload less response code and status)
pub const RANDOM_MAX: usize = 512 - 2;

// Header byte, response code and status
const_assert_eq!(RANDOM_MAX, FRAME_MAX - 3);

/// [`App`][super::App] outputs, encoded as the body of reply frames
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    /// Status-only `OK` reply
    Status,

    /// Device public key
    PublicKey([u8; 32]),

    /// Signature over the last loaded message
    Signature([u8; 64]),

    /// Application name and version
    NameVersion(NameVersion),

    /// Unique device identifier
    Udi([u8; 8]),

    /// Random bytes
    Random(Vec<u8, RANDOM_MAX>),
}

impl Encode for Output {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        match self {
            Output::Status => StatusResp { status: Status::Ok }.encode_len(),
            Output::PublicKey(public_key) => PublicKeyResp {
                public_key: *public_key,
            }
            .encode_len(),
            Output::Signature(signature) => SignatureResp {
                signature: *signature,
            }
            .encode_len(),
            Output::NameVersion(nv) => nv.encode_len(),
            Output::Udi(udi) => UdiResp { udi: *udi }.encode_len(),
            Output::Random(data) => RandomResp { data: data.as_slice() }.encode_len(),
        }
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        match self {
            Output::Status => StatusResp { status: Status::Ok }.encode(buff),
            Output::PublicKey(public_key) => PublicKeyResp {
                public_key: *public_key,
            }
            .encode(buff),
            Output::Signature(signature) => SignatureResp {
                signature: *signature,
            }
            .encode(buff),
            Output::NameVersion(nv) => nv.encode(buff),
            Output::Udi(udi) => UdiResp { udi: *udi }.encode(buff),
            Output::Random(data) => RandomResp { data: data.as_slice() }.encode(buff),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn output_layout() {
        let mut buff = [0xffu8; 127];

        assert_eq!(Output::Status.encode(&mut buff), Ok(1));
        assert_eq!(buff[0], 0x00);

        let n = Output::PublicKey([0x5a; 32]).encode(&mut buff).unwrap();
        assert_eq!(n, 33);
        assert_eq!(buff[0], 0x00);
        assert_eq!(&buff[1..33], &[0x5a; 32]);

        let n = Output::NameVersion(NameVersion::new(*b"tk1 ", *b"rand", 1))
            .encode(&mut buff)
            .unwrap();
        assert_eq!(&buff[..n], b"tk1 rand\x01\x00\x00\x00");

        let data = Vec::from_slice(&[1, 2, 3]).unwrap();
        let o = Output::Random(data);
        assert_eq!(o.encode_len(), Ok(4));
        assert_eq!(o.encode(&mut buff), Ok(4));
        assert_eq!(&buff[..4], &[0x00, 1, 2, 3]);
    }
}

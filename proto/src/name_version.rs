// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application name and version payload, shared by all applications

use byteorder::{ByteOrder, LittleEndian};
use encdec::{DecodeOwned, Encode};

use crate::{helpers::check_len, ProtoError};

/// Name and version response
///
/// ## Encoding
/// ```text
/// | NAME0 (4) | NAME1 (4) | VERSION (u32 LE) |
/// ```
///
/// Devices reply with an all-zero body when the request frame was not of the
/// minimal length class, this decodes to [NameVersion::EMPTY].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NameVersion {
    pub name0: [u8; 4],
    pub name1: [u8; 4],
    pub version: u32,
}

impl NameVersion {
    /// All-zero name / version
    pub const EMPTY: NameVersion = NameVersion {
        name0: [0u8; 4],
        name1: [0u8; 4],
        version: 0,
    };

    pub const fn new(name0: [u8; 4], name1: [u8; 4], version: u32) -> Self {
        Self {
            name0,
            name1,
            version,
        }
    }
}

impl core::fmt::Display for NameVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in self.name0.iter().chain(self.name1.iter()) {
            write!(f, "{}", *b as char)?;
        }
        write!(f, " v{}", self.version)
    }
}

impl Encode for NameVersion {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(12)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        check_len(buff, 12)?;
        buff[..4].copy_from_slice(&self.name0);
        buff[4..8].copy_from_slice(&self.name1);
        LittleEndian::write_u32(&mut buff[8..12], self.version);
        Ok(12)
    }
}

impl DecodeOwned for NameVersion {
    type Output = Self;
    type Error = ProtoError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, 12)?;

        let mut name0 = [0u8; 4];
        name0.copy_from_slice(&buff[..4]);
        let mut name1 = [0u8; 4];
        name1.copy_from_slice(&buff[4..8]);
        let version = LittleEndian::read_u32(&buff[8..12]);

        Ok((
            Self {
                name0,
                name1,
                version,
            },
            12,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_version_layout() {
        let nv = NameVersion::new(*b"tk1 ", *b"sign", 1);

        let mut buff = [0xffu8; 31];
        assert_eq!(nv.encode(&mut buff), Ok(12));
        assert_eq!(&buff[..12], b"tk1 sign\x01\x00\x00\x00");

        let (d, _) = NameVersion::decode_owned(&buff).unwrap();
        assert_eq!(d, nv);

        let (d, _) = NameVersion::decode_owned(&[0u8; 31]).unwrap();
        assert_eq!(d, NameVersion::EMPTY);
    }
}

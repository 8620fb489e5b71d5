// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Frame header codec
//!
//! Every frame on the link starts with a single header byte, followed by the
//! number of payload bytes selected by the header's length class.
//!
//! ## Encoding
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +---+---+---+---+---+---+---+---+
//! | 0 |   ID  | ENDPOINT  | S | LEN   |
//! +---+---+---+---+---+---+---+---+
//! ```
//!
//! - bit 7: protocol version, must be zero
//! - bits 6..5: frame id, echoed in the reply
//! - bits 4..3: destination [Endpoint]
//! - bit 2: status, must be zero in commands, `NOK` flag in replies
//! - bits 1..0: [LengthClass], resolved to a byte count via a [LengthTable]

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter};

use crate::ProtoError;

const VERSION_MASK: u8 = 0b1000_0000;
const ID_MASK: u8 = 0b0110_0000;
const ENDPOINT_MASK: u8 = 0b0001_1000;
const STATUS_MASK: u8 = 0b0000_0100;
const CLASS_MASK: u8 = 0b0000_0011;

/// Frame destination endpoint
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum Endpoint {
    /// Hardware in the internal FPGA
    HwInternalFpga = 0x00,
    /// Hardware in the application FPGA
    HwApplicationFpga = 0x01,
    /// Device firmware
    Firmware = 0x02,
    /// Running application
    Software = 0x03,
}

/// Frame / reply status
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    Bad = 0x01,
}

/// 2-bit frame length class
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum LengthClass {
    Len1 = 0x00,
    Len4 = 0x01,
    Len32 = 0x02,
    /// Largest class, size depends on the protocol generation
    LenMax = 0x03,
}

/// Mapping of [LengthClass] to payload byte counts
///
/// Entries set to `None` are not configured, headers selecting them are rejected.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LengthTable([Option<usize>; 4]);

impl LengthTable {
    /// Earliest generation, 64 byte maximum frames
    pub const LEN_64: LengthTable = LengthTable::new([1, 4, 32, 64]);

    /// 128 byte maximum frames
    pub const LEN_128: LengthTable = LengthTable::new([1, 4, 32, 128]);

    /// 512 byte maximum frames
    pub const LEN_512: LengthTable = LengthTable::new([1, 4, 32, 512]);

    /// Create a fully populated length table
    pub const fn new(lengths: [usize; 4]) -> Self {
        Self([
            Some(lengths[0]),
            Some(lengths[1]),
            Some(lengths[2]),
            Some(lengths[3]),
        ])
    }

    /// Create a length table with unconfigured classes
    pub const fn partial(lengths: [Option<usize>; 4]) -> Self {
        Self(lengths)
    }

    /// Resolve a length class to a byte count
    pub const fn bytes(&self, class: LengthClass) -> Option<usize> {
        self.0[class as usize]
    }

    /// Find the class with exactly `n` bytes
    pub fn class_of(&self, n: usize) -> Option<LengthClass> {
        self.0
            .iter()
            .position(|v| *v == Some(n))
            .and_then(|i| LengthClass::try_from(i as u8).ok())
    }

    /// Find the smallest class able to carry `n` bytes
    pub fn fit(&self, n: usize) -> Option<LengthClass> {
        let mut best: Option<(LengthClass, usize)> = None;

        for (i, v) in self.0.iter().enumerate() {
            let len = match v {
                Some(len) if *len >= n => *len,
                _ => continue,
            };

            if best.map(|(_, b)| len < b).unwrap_or(true) {
                if let Ok(c) = LengthClass::try_from(i as u8) {
                    best = Some((c, len));
                }
            }
        }

        best.map(|(c, _)| c)
    }

    /// Largest configured payload size
    pub fn max(&self) -> usize {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Decoded frame header
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FrameHeader {
    /// Frame id (2 bits)
    pub id: u8,
    /// Destination endpoint
    pub endpoint: Endpoint,
    /// Status flag
    pub status: Status,
    /// Length class
    pub class: LengthClass,
    /// Payload byte count resolved from the length table
    pub len: usize,
}

impl FrameHeader {
    /// Encode this header to a byte
    pub fn encode(&self) -> u8 {
        encode_header(self.id, self.endpoint, self.status, self.class)
    }
}

/// Pack header fields into a header byte
///
/// `id` is truncated to its 2-bit width.
pub const fn encode_header(id: u8, endpoint: Endpoint, status: Status, class: LengthClass) -> u8 {
    ((id & 0x03) << 5) | ((endpoint as u8) << 3) | ((status as u8) << 2) | class as u8
}

/// Decode a command header byte
///
/// Fails if the version bit or the (command-direction) status bit is set, or
/// if the length class has no entry in `table`.
pub fn decode_header(b: u8, table: &LengthTable) -> Result<FrameHeader, ProtoError> {
    if b & STATUS_MASK != 0 {
        return Err(ProtoError::InvalidHeader);
    }

    decode_reply_header(b, table)
}

/// Decode a reply header byte, where bit 2 carries the reply status
pub fn decode_reply_header(b: u8, table: &LengthTable) -> Result<FrameHeader, ProtoError> {
    if b & VERSION_MASK != 0 {
        return Err(ProtoError::InvalidHeader);
    }

    let id = (b & ID_MASK) >> 5;

    // Masked 2-bit fields always map to a variant
    let endpoint = Endpoint::try_from((b & ENDPOINT_MASK) >> 3)
        .map_err(|_| ProtoError::InvalidHeader)?;
    let status = match b & STATUS_MASK {
        0 => Status::Ok,
        _ => Status::Bad,
    };
    let class = LengthClass::try_from(b & CLASS_MASK).map_err(|_| ProtoError::InvalidHeader)?;

    let len = table.bytes(class).ok_or(ProtoError::InvalidHeader)?;

    Ok(FrameHeader {
        id,
        endpoint,
        status,
        class,
        len,
    })
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn header_round_trip() {
        for table in [LengthTable::LEN_64, LengthTable::LEN_128, LengthTable::LEN_512] {
            for id in 0..4 {
                for endpoint in Endpoint::iter() {
                    for class in LengthClass::iter() {
                        let b = encode_header(id, endpoint, Status::Ok, class);
                        let h = decode_header(b, &table).expect("decode failed");

                        assert_eq!(h.id, id);
                        assert_eq!(h.endpoint, endpoint);
                        assert_eq!(h.status, Status::Ok);
                        assert_eq!(h.class, class);
                        assert_eq!(Some(h.len), table.bytes(class));
                        assert_eq!(h.encode(), b);

                        // Reply decoding additionally recovers NOK status
                        let b = encode_header(id, endpoint, Status::Bad, class);
                        let h = decode_reply_header(b, &table).expect("decode failed");
                        assert_eq!(h.status, Status::Bad);
                        assert_eq!(h.encode(), b);
                    }
                }
            }
        }
    }

    #[test]
    fn header_rejection() {
        let table = LengthTable::LEN_128;

        for b in 0..=u8::MAX {
            let r = decode_header(b, &table);

            if b & 0x80 != 0 || b & 0x04 != 0 {
                assert_eq!(r, Err(ProtoError::InvalidHeader), "accepted 0x{b:02x}");
            } else {
                assert!(r.is_ok(), "rejected 0x{b:02x}");
            }
        }
    }

    #[test]
    fn header_bit_positions() {
        let b = encode_header(2, Endpoint::Software, Status::Ok, LengthClass::Len32);
        assert_eq!(b, 0b0101_1010);

        let b = encode_header(3, Endpoint::Firmware, Status::Bad, LengthClass::Len1);
        assert_eq!(b, 0b0111_0100);

        // id is truncated to 2 bits
        let b = encode_header(7, Endpoint::HwInternalFpga, Status::Ok, LengthClass::Len1);
        assert_eq!(b, 0b0110_0000);
    }

    #[test]
    fn unconfigured_class() {
        let table = LengthTable::partial([Some(1), Some(4), Some(32), None]);

        let b = encode_header(0, Endpoint::Software, Status::Ok, LengthClass::LenMax);
        assert_eq!(decode_header(b, &table), Err(ProtoError::InvalidHeader));

        let b = encode_header(0, Endpoint::Software, Status::Ok, LengthClass::Len32);
        assert!(decode_header(b, &table).is_ok());
    }

    #[test]
    fn table_lookup() {
        let t = LengthTable::LEN_512;

        assert_eq!(t.max(), 512);
        assert_eq!(t.class_of(32), Some(LengthClass::Len32));
        assert_eq!(t.class_of(33), None);

        assert_eq!(t.fit(0), Some(LengthClass::Len1));
        assert_eq!(t.fit(2), Some(LengthClass::Len4));
        assert_eq!(t.fit(13), Some(LengthClass::Len32));
        assert_eq!(t.fit(66), Some(LengthClass::LenMax));
        assert_eq!(t.fit(513), None);
    }
}

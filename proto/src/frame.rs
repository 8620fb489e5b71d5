// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Whole-frame encoding helpers
//!
//! A frame is a header byte followed by exactly the number of payload bytes
//! selected by the header length class. Application payloads start with an
//! opcode (commands) or response code (replies), followed by the encoded
//! body and zero padding.

use encdec::Encode;

use crate::{
    header::{decode_reply_header, encode_header, FrameHeader, LengthClass, LengthTable},
    Endpoint, ProtoError, Status,
};

/// Maximum frame size across all generations (header + payload)
pub const FRAME_MAX: usize = 1 + 512;

/// Empty frame body
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Empty;

impl Encode for Empty {
    type Error = ProtoError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

/// Encode a frame with the provided header fields, leading code byte, and body
///
/// Returns the total frame length (header + class payload length).
#[allow(clippy::too_many_arguments)]
pub fn encode_frame<B: Encode<Error = ProtoError>>(
    buff: &mut [u8],
    table: &LengthTable,
    id: u8,
    endpoint: Endpoint,
    status: Status,
    class: LengthClass,
    code: u8,
    body: &B,
) -> Result<usize, ProtoError> {
    let len = table.bytes(class).ok_or(ProtoError::InvalidHeader)?;

    // Code byte plus body must fit the class payload
    let body_len = body.encode_len()?;
    if 1 + body_len > len || buff.len() < 1 + len {
        return Err(ProtoError::InvalidLength);
    }

    let frame = &mut buff[..1 + len];
    frame.fill(0);

    frame[0] = encode_header(id, endpoint, status, class);
    frame[1] = code;
    body.encode(&mut frame[2..])?;

    Ok(1 + len)
}

/// Decoded reply frame
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Reply<'a> {
    /// Reply header
    pub header: FrameHeader,
    /// Response code
    pub code: u8,
    /// Body following the response code (including padding)
    pub body: &'a [u8],
}

/// Decode a complete reply frame
pub fn decode_reply<'a>(buff: &'a [u8], table: &LengthTable) -> Result<Reply<'a>, ProtoError> {
    if buff.is_empty() {
        return Err(ProtoError::InvalidLength);
    }

    let header = decode_reply_header(buff[0], table)?;
    if buff.len() < 1 + header.len {
        return Err(ProtoError::InvalidLength);
    }

    let payload = &buff[1..][..header.len];

    Ok(Reply {
        header,
        code: payload[0],
        body: &payload[1..],
    })
}

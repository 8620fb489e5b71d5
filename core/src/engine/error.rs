// Copyright (c) 2022-2023 The MobileCoin Foundation

use tkey_proto::ProtoError;

/// [Dispatcher][super::Dispatcher] and application errors
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Header failed to decode, frame dropped without reply
    #[cfg_attr(feature = "thiserror", error("malformed frame header"))]
    MalformedHeader = 0x00,

    /// Frame not addressed to the application
    #[cfg_attr(feature = "thiserror", error("frame addressed to another endpoint"))]
    WrongEndpoint = 0x01,

    /// Frame length does not match the command
    #[cfg_attr(feature = "thiserror", error("invalid frame length for command"))]
    InvalidLength = 0x02,

    /// Declared message size exceeds the message buffer
    #[cfg_attr(feature = "thiserror", error("declared size exceeds maximum"))]
    SizeExceeded = 0x03,

    /// Message data without an armed load
    #[cfg_attr(feature = "thiserror", error("no message load in progress"))]
    NotLoading = 0x04,

    /// Signature requested before a completed load
    #[cfg_attr(feature = "thiserror", error("no signature available"))]
    NoSignature = 0x05,

    /// Random byte count outside the supported range
    #[cfg_attr(feature = "thiserror", error("random byte count out of range"))]
    InvalidRandomLength = 0x06,

    /// Opcode not recognised by the application
    #[cfg_attr(feature = "thiserror", error("unknown command"))]
    UnknownCommand = 0x07,

    /// Reply encoding failed
    #[cfg_attr(feature = "thiserror", error("reply encoding failed"))]
    EncodingFailed = 0x08,
}

impl Error {
    /// Check whether this error is answered with a `BAD` status reply
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::InvalidLength
                | Error::SizeExceeded
                | Error::NotLoading
                | Error::NoSignature
                | Error::InvalidRandomLength
        )
    }
}

impl From<ProtoError> for Error {
    fn from(e: ProtoError) -> Self {
        match e {
            ProtoError::InvalidHeader => Error::MalformedHeader,
            ProtoError::InvalidLength => Error::InvalidLength,
            ProtoError::UnknownCommand => Error::UnknownCommand,
            ProtoError::InvalidEncoding => Error::EncodingFailed,
        }
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Frame protocol errors
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display)]
pub enum ProtoError {
    /// Header byte failed version, reserved-bit, or length class checks
    InvalidHeader,

    /// Buffer too short or frame length does not match the command
    InvalidLength,

    /// Field value could not be decoded
    InvalidEncoding,

    /// Opcode not present in the active command table
    UnknownCommand,
}

impl From<encdec::Error> for ProtoError {
    fn from(e: encdec::Error) -> Self {
        match e {
            encdec::Error::Length => ProtoError::InvalidLength,
            _ => ProtoError::InvalidEncoding,
        }
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

use crate::{ProtoError, Status};

/// Check a buffer holds at least `n` bytes
pub(crate) fn check_len(buff: &[u8], n: usize) -> Result<(), ProtoError> {
    if buff.len() < n {
        return Err(ProtoError::InvalidLength);
    }
    Ok(())
}

/// Read the leading status byte of a response body
pub(crate) fn read_status(buff: &[u8]) -> Result<Status, ProtoError> {
    check_len(buff, 1)?;
    Status::try_from(buff[0]).map_err(|_| ProtoError::InvalidEncoding)
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

use tkey_proto::{ProtoError, Status};
use tokio::time::error::Elapsed;

/// TKey host API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport I/O error
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Simulated device exited
    #[error("Device link closed")]
    Closed,

    /// Request timeout
    #[error("Timeout waiting for device response")]
    RequestTimeout,

    /// Timeout waiting for touch confirmation
    #[error("Timeout waiting for user confirmation")]
    UserTimeout,

    /// Device rejected the request
    #[error("Device returned status {0}")]
    Status(Status),

    /// Device did not recognise the command
    #[error("Unknown command")]
    UnknownCommand,

    /// Command not available in the active protocol generation
    #[error("Command unsupported by protocol generation {0}")]
    Unsupported(&'static str),

    /// Unexpected response frame
    #[error("Unexpected response")]
    UnexpectedResponse,

    /// Frame encoding or decoding failed
    #[error("Protocol error: {0}")]
    Proto(ProtoError),

    /// Message size outside supported bounds
    #[error("Invalid message size {0} (max: {1})")]
    MessageSize(usize, usize),

    /// Invalid key in response
    #[error("Invalid key object")]
    InvalidKey,

    /// Signature failed verification against the device key
    #[error("Signature verification failed")]
    InvalidSignature,
}

impl From<ProtoError> for Error {
    fn from(e: ProtoError) -> Self {
        Error::Proto(e)
    }
}

impl From<Elapsed> for Error {
    fn from(_: Elapsed) -> Self {
        Error::RequestTimeout
    }
}

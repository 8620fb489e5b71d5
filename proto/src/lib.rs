// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Frame protocol and application command definitions for TKey applications
//!
//! This crate provides the framing used on the device link along with the
//! command sets of the device applications. It is shared by the device
//! engine (see `tkey-core`) and host tooling.
//!
//! Frames consist of a single [header][header] byte followed by a payload
//! whose length is selected by the header length class. The mapping of
//! length classes to byte counts, as well as opcode numbering, differ
//! between device generations and are captured by a [Generation].
//!
//! All multi-byte fields are little-endian.

#![no_std]

pub mod frame;
pub mod generation;
pub mod header;
pub mod name_version;
pub mod prelude;
pub mod random;
pub mod signer;

mod error;
pub use error::ProtoError;

mod helpers;

pub use generation::{AppCommand, Generation, Opcode};
pub use header::{
    decode_header, decode_reply_header, encode_header, Endpoint, FrameHeader, LengthClass,
    LengthTable, Status,
};
pub use name_version::NameVersion;

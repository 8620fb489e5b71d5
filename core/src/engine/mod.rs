// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Dispatcher] runs device applications over a blocking byte link.
//!
//! Each inbound frame is decoded, checked for endpoint and length, resolved
//! to an application command via the active [Generation] and handed to an
//! [App], with exactly one reply frame emitted per accepted command.
//! See [proto][crate::proto] for frame and payload encodings.

use tkey_proto::{AppCommand, FrameHeader, Generation, NameVersion};

mod error;
pub use error::Error;

mod rng;
pub use rng::{EntropySource, Rng, RngHash, RESEED_INTERVAL, ROUND_BYTES};

mod session;
pub use session::{Append, Session, SessionState};

mod output;
pub use output::{Output, RANDOM_MAX};

mod signer;
pub use signer::{Signer, MAX_MESSAGE_SIZE};

mod random;
pub use random::RandomApp;

mod dispatch;
pub use dispatch::Dispatcher;

/// [`Driver`] trait provides platform support for applications
pub trait Driver {
    /// Fetch the compound device identifier, the device-unique secret
    fn cdi(&self) -> [u8; 32];

    /// Fetch the unique device identifier (public)
    fn udi(&self) -> [u8; 8];

    /// Block until the user confirms physical presence
    fn wait_for_confirmation(&mut self);
}

impl<T: Driver> Driver for &mut T {
    fn cdi(&self) -> [u8; 32] {
        T::cdi(self)
    }

    fn udi(&self) -> [u8; 8] {
        T::udi(self)
    }

    fn wait_for_confirmation(&mut self) {
        T::wait_for_confirmation(self)
    }
}

/// Blocking byte link to the host
pub trait ByteIo {
    /// Read a byte, blocking until available
    fn read_byte(&mut self) -> u8;

    /// Write a byte, blocking until the link is ready
    fn write_byte(&mut self, b: u8);

    /// Fill `buff` from the link
    fn read(&mut self, buff: &mut [u8]) {
        for b in buff {
            *b = self.read_byte();
        }
    }

    /// Write all of `buff` to the link
    fn write(&mut self, buff: &[u8]) {
        for b in buff {
            self.write_byte(*b);
        }
    }
}

impl<T: ByteIo> ByteIo for &mut T {
    fn read_byte(&mut self) -> u8 {
        T::read_byte(self)
    }

    fn write_byte(&mut self, b: u8) {
        T::write_byte(self, b)
    }

    fn read(&mut self, buff: &mut [u8]) {
        T::read(self, buff)
    }

    fn write(&mut self, buff: &[u8]) {
        T::write(self, buff)
    }
}

/// Decoded application request
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Request<'a> {
    /// Active protocol generation
    pub gen: &'a Generation,
    /// Inbound frame header
    pub header: FrameHeader,
    /// Payload following the opcode byte (including padding)
    pub body: &'a [u8],
}

/// Device application, driven by the [Dispatcher]
pub trait App {
    /// Application command set
    type Cmd: AppCommand;

    /// Application name and version
    fn name_version(&self) -> NameVersion;

    /// Handle a resolved command
    ///
    /// Precondition failures (see [Error::is_precondition]) must leave the
    /// application state unchanged.
    fn update(&mut self, cmd: Self::Cmd, req: &Request) -> Result<Output, Error>;
}

/// Resolve the name / version reply for a request
///
/// Only a minimal (one byte) request frame returns the populated name and
/// version, any other length class returns [NameVersion::EMPTY].
pub(crate) fn name_version_for(req: &Request, nv: NameVersion) -> NameVersion {
    match req.header.class {
        tkey_proto::LengthClass::Len1 => nv,
        _ => NameVersion::EMPTY,
    }
}

// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Streamed message load state
//!
//! Messages larger than a frame are declared up front then appended in
//! chunks. `declared`, `remaining` and `cursor` move together and are only
//! re-armed by [Session::declare], the signature is valid only once a load
//! has been fully consumed and signed.

use strum::Display;
use zeroize::Zeroize;

use super::Error;

/// Observable session state
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum SessionState {
    /// No load armed, no signature available
    Idle,
    /// Load in progress
    Loading {
        /// Bytes outstanding
        remaining: usize,
    },
    /// Signature available for the last completed load
    Signed,
}

/// Result of appending a message chunk
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Append {
    /// More data expected
    Pending {
        /// Bytes outstanding
        remaining: usize,
    },
    /// Declared size consumed, message ready to sign
    Complete,
}

/// Message accumulation and signature state for an `N` byte message buffer
pub struct Session<const N: usize> {
    message: [u8; N],
    declared: usize,
    remaining: usize,
    cursor: usize,

    /// Size of the message covered by `signature`
    signed: usize,
    signature: [u8; 64],
    signature_valid: bool,
}

impl<const N: usize> Default for Session<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Session<N> {
    /// Create an idle session
    pub const fn new() -> Self {
        Self {
            message: [0u8; N],
            declared: 0,
            remaining: 0,
            cursor: 0,
            signed: 0,
            signature: [0u8; 64],
            signature_valid: false,
        }
    }

    /// Maximum message size
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Fetch the current session state
    pub fn state(&self) -> SessionState {
        match (self.declared, self.signature_valid) {
            (0, true) => SessionState::Signed,
            (0, false) => SessionState::Idle,
            _ => SessionState::Loading {
                remaining: self.remaining,
            },
        }
    }

    /// Arm a new load of `size` bytes
    ///
    /// Clears any prior signature. Fails without modifying state where `size`
    /// exceeds the buffer. A zero size clears the signature and leaves the
    /// session idle.
    pub fn declare(&mut self, size: usize) -> Result<(), Error> {
        if size > N {
            return Err(Error::SizeExceeded);
        }

        self.declared = size;
        self.remaining = size;
        self.cursor = 0;
        self.signature_valid = false;

        Ok(())
    }

    /// Append a chunk to the armed load
    ///
    /// Consumes at most the outstanding byte count, trailing chunk bytes
    /// (frame padding) are discarded.
    pub fn append(&mut self, chunk: &[u8]) -> Result<Append, Error> {
        if self.declared == 0 {
            return Err(Error::NotLoading);
        }

        let n = chunk.len().min(self.remaining);

        self.message[self.cursor..][..n].copy_from_slice(&chunk[..n]);
        self.cursor += n;
        self.remaining -= n;

        match self.remaining {
            0 => Ok(Append::Complete),
            remaining => Ok(Append::Pending { remaining }),
        }
    }

    /// Fetch the declared message once completely loaded
    pub fn message(&self) -> Option<&[u8]> {
        match self.declared != 0 && self.remaining == 0 {
            true => Some(&self.message[..self.declared]),
            false => None,
        }
    }

    /// Store the signature over a completely loaded message, ending the load
    pub fn complete(&mut self, signature: [u8; 64]) -> Result<(), Error> {
        if self.message().is_none() {
            return Err(Error::NotLoading);
        }

        self.signature = signature;
        self.signature_valid = true;
        self.signed = self.declared;

        // Disarm so stray chunks cannot extend a signed message
        self.declared = 0;

        Ok(())
    }

    /// Fetch the last signature, if valid
    pub fn signature(&self) -> Option<&[u8; 64]> {
        match self.signature_valid {
            true => Some(&self.signature),
            false => None,
        }
    }

    /// Size of the message covered by the current signature
    pub fn signed_len(&self) -> Option<usize> {
        self.signature_valid.then_some(self.signed)
    }
}

impl<const N: usize> Drop for Session<N> {
    fn drop(&mut self) {
        self.message.zeroize();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_in_chunks() {
        let mut s = Session::<16>::new();
        assert_eq!(s.state(), SessionState::Idle);

        s.declare(10).unwrap();
        assert_eq!(s.state(), SessionState::Loading { remaining: 10 });
        assert!(s.message().is_none());

        assert_eq!(s.append(&[1, 2, 3, 4]), Ok(Append::Pending { remaining: 6 }));
        assert_eq!(s.append(&[5, 6, 7, 8]), Ok(Append::Pending { remaining: 2 }));

        // Padding past the declared size is dropped
        assert_eq!(s.append(&[9, 10, 0, 0]), Ok(Append::Complete));
        assert_eq!(s.message(), Some(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10][..]));

        s.complete([0xaa; 64]).unwrap();
        assert_eq!(s.state(), SessionState::Signed);
        assert_eq!(s.signature(), Some(&[0xaa; 64]));
        assert_eq!(s.signed_len(), Some(10));

        // Load disarmed after signing
        assert_eq!(s.append(&[1]), Err(Error::NotLoading));
        assert_eq!(s.signature(), Some(&[0xaa; 64]));
    }

    #[test]
    fn append_without_declare() {
        let mut s = Session::<16>::new();

        assert_eq!(s.append(&[1, 2, 3]), Err(Error::NotLoading));
        assert_eq!(s.complete([0u8; 64]), Err(Error::NotLoading));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn declare_bounds() {
        let mut s = Session::<16>::new();

        s.declare(1).unwrap();
        s.append(&[0x55]).unwrap();
        s.complete([0x11; 64]).unwrap();

        // Oversize declaration leaves the signed state untouched
        assert_eq!(s.declare(17), Err(Error::SizeExceeded));
        assert_eq!(s.state(), SessionState::Signed);
        assert_eq!(s.signature(), Some(&[0x11; 64]));

        // Maximum is inclusive
        s.declare(16).unwrap();
        assert_eq!(s.state(), SessionState::Loading { remaining: 16 });
        assert_eq!(s.signature(), None);
    }

    #[test]
    fn declare_zero() {
        let mut s = Session::<16>::new();

        s.declare(2).unwrap();
        s.append(&[1, 2]).unwrap();
        s.complete([0x22; 64]).unwrap();

        // Zero size clears the signature without arming a load
        s.declare(0).unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.signature(), None);
        assert_eq!(s.append(&[1]), Err(Error::NotLoading));
    }

    #[test]
    fn redeclare_mid_load() {
        let mut s = Session::<16>::new();

        s.declare(8).unwrap();
        s.append(&[0xff; 4]).unwrap();

        // Restart resets the cursor
        s.declare(2).unwrap();
        assert_eq!(s.append(&[1, 2]), Ok(Append::Complete));
        assert_eq!(s.message(), Some(&[1, 2][..]));
    }
}

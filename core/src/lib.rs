// Copyright (c) 2022-2023 The MobileCoin Foundation

//! TKey device application core
//!
//! This provides the hardware-independent logic of the device applications:
//! a [Dispatcher][engine::Dispatcher] running the command loop over a
//! blocking byte link, the [Signer][engine::Signer] and
//! [RandomApp][engine::RandomApp] applications, and the forward-secure
//! [Rng][engine::Rng] backing device randomness.
//!
//! Platform access (link, entropy, touch sensor, device identifiers) is
//! injected via the [Driver][engine::Driver], [ByteIo][engine::ByteIo] and
//! [EntropySource][engine::EntropySource] traits, see [platform] for
//! implementations over memory-mapped registers.
//!
//! See [tkey_proto] for frame and payload encodings.
//!
//! ## Operations
//!
//! All applications answer `GetNameVersion`, returning the application name
//! and version when issued with a minimal (one byte) frame.
//!
//! ### Signing a message
//!
//! Messages larger than a single frame are streamed to the signer:
//!
//! 1. Issue `SetSize` with the message length, this arms a new load and
//!    clears any prior signature
//! 2. Issue `SignData` frames carrying consecutive message chunks until the
//!    declared length is consumed, the final chunk blocks on user touch
//!    confirmation before the message is signed
//! 3. Issue `GetSignature` to fetch the ed25519 signature (repeatable)
//!
//! `GetPublicKey` returns the device public key derived from the CDI.
//!
//! ### Fetching random bytes
//!
//! `GetRandom` returns up to a frame worth of output from the [Rng][engine::Rng].

#![cfg_attr(not(feature = "std"), no_std)]

pub use tkey_proto::{self as proto};

pub mod engine;

pub mod helpers;

pub mod platform;

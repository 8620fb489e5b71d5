// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signer application
//!
//! Holds an ed25519 key pair derived from the device CDI and signs
//! messages streamed via `SetSize` / `SignData` once the user has
//! confirmed physical presence.

use encdec::{Decode, DecodeOwned};
use zeroize::Zeroize;

use tkey_proto::prelude::{NameVersion, SetSizeReq, SignDataReq, SignerCmd};

use super::{name_version_for, Append, App, Driver, Error, Output, Request, Session, SessionState};
use crate::helpers::{ed25519_public_key, ed25519_sign};

/// Default maximum message size
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// Signer application instance, signing messages of up to `N` bytes
pub struct Signer<DRV: Driver, const N: usize = MAX_MESSAGE_SIZE> {
    drv: DRV,
    seed: [u8; 32],
    public_key: [u8; 32],
    session: Session<N>,
}

impl<DRV: Driver, const N: usize> Signer<DRV, N> {
    /// Application name and version
    pub const NAME_VERSION: NameVersion = NameVersion::new(*b"tk1 ", *b"sign", 1);

    /// Create a signer, deriving the key pair from the driver CDI
    pub fn new(drv: DRV) -> Self {
        let seed = drv.cdi();
        let public_key = ed25519_public_key(&seed);

        #[cfg(feature = "log")]
        log::debug!("signer init, max message {} bytes", N);

        Self {
            drv,
            seed,
            public_key,
            session: Session::new(),
        }
    }

    /// Fetch the device public key
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Fetch the load / signature state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Fetch the underlying session
    pub fn session(&self) -> &Session<N> {
        &self.session
    }

    /// Fetch the platform driver
    pub fn driver(&self) -> &DRV {
        &self.drv
    }

    /// Append a message chunk, signing on completion
    #[cfg_attr(feature = "noinline", inline(never))]
    fn sign_data(&mut self, data: &[u8]) -> Result<Output, Error> {
        match self.session.append(data)? {
            Append::Pending { .. } => {
                #[cfg(feature = "log")]
                log::trace!("chunk loaded ({})", self.session.state());
            }
            Append::Complete => {
                #[cfg(feature = "log")]
                log::debug!("message loaded, awaiting confirmation");

                self.drv.wait_for_confirmation();

                let message = self.session.message().ok_or(Error::NotLoading)?;
                let signature = ed25519_sign(&self.seed, message);

                self.session.complete(signature)?;

                #[cfg(feature = "log")]
                log::debug!("message signed");
            }
        }

        Ok(Output::Status)
    }
}

impl<DRV: Driver, const N: usize> App for Signer<DRV, N> {
    type Cmd = SignerCmd;

    fn name_version(&self) -> NameVersion {
        Self::NAME_VERSION
    }

    fn update(&mut self, cmd: SignerCmd, req: &Request) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("signer cmd: {} ({:?})", cmd, self.session.state());

        match cmd {
            SignerCmd::GetPublicKey => Ok(Output::PublicKey(self.public_key)),

            SignerCmd::SetSize => {
                let (r, _) = SetSizeReq::decode_owned(req.body)?;

                // u32 sizes may not fit usize on narrow targets
                let size = usize::try_from(r.size).map_err(|_| Error::SizeExceeded)?;
                self.session.declare(size)?;

                Ok(Output::Status)
            }

            SignerCmd::SignData => {
                let (r, _) = SignDataReq::decode(req.body)?;
                self.sign_data(r.data)
            }

            SignerCmd::GetSignature => self
                .session
                .signature()
                .map(|s| Output::Signature(*s))
                .ok_or(Error::NoSignature),

            SignerCmd::GetNameVersion => Ok(Output::NameVersion(name_version_for(
                req,
                Self::NAME_VERSION,
            ))),

            SignerCmd::GetUdi => Ok(Output::Udi(self.drv.udi())),
        }
    }
}

impl<DRV: Driver, const N: usize> Drop for Signer<DRV, N> {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

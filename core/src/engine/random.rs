// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::DecodeOwned;
use heapless::Vec;
use blake2::Blake2s256;

use tkey_proto::prelude::{NameVersion, RandomCmd, RandomReq};

use super::{name_version_for, App, EntropySource, Error, Output, Request, Rng, RngHash};

/// Random bytes application, serving output from the device [Rng]
pub struct RandomApp<E: EntropySource, H: RngHash = Blake2s256> {
    rng: Rng<E, H>,
}

impl<E: EntropySource, H: RngHash> RandomApp<E, H> {
    /// Application name and version
    pub const NAME_VERSION: NameVersion = NameVersion::new(*b"tk1 ", *b"rand", 1);

    /// Create a random application, seeding the generator from the CDI
    pub fn new(cdi: &[u8; 32], entropy: E) -> Self {
        Self {
            rng: Rng::new(cdi, entropy),
        }
    }

    /// Fetch the underlying generator
    pub fn rng(&self) -> &Rng<E, H> {
        &self.rng
    }
}

impl<E: EntropySource, H: RngHash> App for RandomApp<E, H> {
    type Cmd = RandomCmd;

    fn name_version(&self) -> NameVersion {
        Self::NAME_VERSION
    }

    fn update(&mut self, cmd: RandomCmd, req: &Request) -> Result<Output, Error> {
        match cmd {
            RandomCmd::GetNameVersion => Ok(Output::NameVersion(name_version_for(
                req,
                Self::NAME_VERSION,
            ))),

            RandomCmd::GetRandom => {
                let (r, _) = RandomReq::decode_owned(req.body)?;
                let n = r.len as usize;

                // Bounded by the reply payload, checked before the generator is touched
                if n < 1 || n > req.gen.random_max() {
                    #[cfg(feature = "log")]
                    log::warn!("invalid random length {}", n);

                    return Err(Error::InvalidRandomLength);
                }

                let mut data = Vec::new();
                data.resize(n, 0).map_err(|_| Error::InvalidRandomLength)?;

                self.rng.generate(&mut data)?;

                #[cfg(feature = "log")]
                log::debug!("generated {} random bytes", n);

                Ok(Output::Random(data))
            }
        }
    }
}

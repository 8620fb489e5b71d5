// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Forward-secure hash-chained random number generator
//!
//! The generator state is 16 words: the first 8 carry the hash chain (the
//! previous digest) and the last 8 form an entropy pool refreshed from the
//! hardware source every [RESEED_INTERVAL] rounds. Each round hashes the
//! full state and emits a [ROUND_BYTES] prefix of the digest.
//!
//! Only the hash chain is carried between rounds, so recovering the current
//! digest does not reveal earlier outputs, and bounding the interval between
//! reseeds bounds how much output could be reconstructed from a later
//! compromise of the entropy pool.

use core::marker::PhantomData;

use blake2::Blake2s256;
use byteorder::{ByteOrder, LittleEndian};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha512_256};
use zeroize::Zeroize;

use super::Error;

/// Rounds between entropy pool refreshes
pub const RESEED_INTERVAL: u32 = 1000;

/// Output bytes per generation round
pub const ROUND_BYTES: usize = 16;

/// Hardware entropy source
pub trait EntropySource {
    /// Fetch an entropy word, blocking until available
    fn entropy_word(&mut self) -> u32;
}

impl<T: EntropySource> EntropySource for &mut T {
    fn entropy_word(&mut self) -> u32 {
        T::entropy_word(self)
    }
}

/// Fixed 32-byte digest primitive used by the [Rng]
pub trait RngHash {
    /// Hash the provided input
    fn hash(input: &[u8]) -> [u8; 32];
}

impl RngHash for Blake2s256 {
    fn hash(input: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(Blake2s256::digest(input).as_ref());
        out
    }
}

impl RngHash for Sha512_256 {
    fn hash(input: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(Sha512_256::digest(input).as_ref());
        out
    }
}

impl RngHash for Sha256 {
    fn hash(input: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(Sha256::digest(input).as_ref());
        out
    }
}

/// Hash-chained counter RNG with periodic hardware reseed
///
/// Construction seeds the generator, so an uninitialised instance cannot be
/// used to generate.
pub struct Rng<E: EntropySource, H: RngHash = Blake2s256> {
    state: [u32; 16],
    digest: [u8; 32],
    counter: u32,
    entropy: E,
    _hash: PhantomData<H>,
}

impl<E: EntropySource, H: RngHash> Rng<E, H> {
    /// Seed a new generator from the device identifier and entropy source
    ///
    /// The hash-chain half of the state is loaded from the CDI, the entropy
    /// pool from 8 fresh samples.
    pub fn new(cdi: &[u8; 32], mut entropy: E) -> Self {
        let mut state = [0u32; 16];

        LittleEndian::read_u32_into(cdi, &mut state[..8]);
        for w in &mut state[8..] {
            *w = entropy.entropy_word();
        }

        #[cfg(feature = "log")]
        log::debug!("rng seeded");

        Self {
            state,
            digest: [0u8; 32],
            counter: 0,
            entropy,
            _hash: PhantomData,
        }
    }

    /// Fill `out` with pseudorandom bytes
    ///
    /// Fails without touching generator state if `out` is empty.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn generate(&mut self, out: &mut [u8]) -> Result<(), Error> {
        if out.is_empty() {
            return Err(Error::InvalidRandomLength);
        }

        let mut block = [0u8; 64];

        for chunk in out.chunks_mut(ROUND_BYTES) {
            LittleEndian::write_u32_into(&self.state, &mut block);
            self.digest = H::hash(&block);

            // Final round may discard excess digest bytes
            chunk.copy_from_slice(&self.digest[..chunk.len()]);

            self.update();
        }

        block.zeroize();

        Ok(())
    }

    /// Fetch the reseed counter
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Carry the digest into the hash chain, inject drift, and reseed when due
    fn update(&mut self) {
        LittleEndian::read_u32_into(&self.digest, &mut self.state[..8]);

        self.counter += 1;
        self.state[15] = self.state[15].wrapping_add(self.counter);

        if self.counter == RESEED_INTERVAL {
            for w in &mut self.state[8..] {
                *w = self.entropy.entropy_word();
            }
            self.counter = 0;

            #[cfg(feature = "log")]
            log::trace!("rng reseeded");
        }
    }
}

impl<E: EntropySource, H: RngHash> Drop for Rng<E, H> {
    fn drop(&mut self) {
        self.state.zeroize();
        self.digest.zeroize();
    }
}

impl<E: EntropySource, H: RngHash> RngCore for Rng<E, H> {
    fn next_u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        self.fill_bytes(&mut b);
        u32::from_le_bytes(b)
    }

    fn next_u64(&mut self) -> u64 {
        let mut b = [0u8; 8];
        self.fill_bytes(&mut b);
        u64::from_le_bytes(b)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        // Empty requests have nothing to fill
        let _ = self.generate(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<E: EntropySource, H: RngHash> CryptoRng for Rng<E, H> {}

#[cfg(test)]
mod test {
    use super::*;

    /// Counting entropy source, each instance yields `base, base+1, ...`
    pub struct Counter(u32);

    impl EntropySource for Counter {
        fn entropy_word(&mut self) -> u32 {
            let v = self.0;
            self.0 = self.0.wrapping_add(1);
            v
        }
    }

    const CDI: [u8; 32] = [0x11; 32];

    #[test]
    fn deterministic_given_seed() {
        let mut a = Rng::<_, Sha512_256>::new(&CDI, Counter(7));
        let mut b = Rng::<_, Sha512_256>::new(&CDI, Counter(7));

        for n in [1, 15, 16, 17, 100, 126, 255] {
            let (mut x, mut y) = ([0u8; 255], [0u8; 255]);
            a.generate(&mut x[..n]).unwrap();
            b.generate(&mut y[..n]).unwrap();
            assert_eq!(&x[..n], &y[..n]);
        }

        // Differing CDI diverges immediately
        let mut c = Rng::<_, Sha512_256>::new(&[0x22; 32], Counter(7));
        let mut d = Rng::<_, Sha512_256>::new(&CDI, Counter(7));
        let (mut x, mut y) = ([0u8; 16], [0u8; 16]);
        c.generate(&mut x).unwrap();
        d.generate(&mut y).unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn empty_request_rejected() {
        let mut r = Rng::<_, Sha512_256>::new(&CDI, Counter(0));

        assert_eq!(r.generate(&mut []), Err(Error::InvalidRandomLength));
        assert_eq!(r.counter(), 0);
    }

    #[test]
    fn rounds_per_request() {
        let mut r = Rng::<_, Sha512_256>::new(&CDI, Counter(0));

        let mut b = [0u8; 33];
        r.generate(&mut b).unwrap();

        // 33 bytes takes three 16 byte rounds
        assert_eq!(r.counter(), 3);
    }

    #[test]
    fn default_hash_is_blake2s() {
        let mut r: Rng<_> = Rng::new(&CDI, Counter(0));

        let mut block = [0u8; 64];
        block[..32].copy_from_slice(&CDI);
        for i in 0..8u32 {
            LittleEndian::write_u32(&mut block[32 + i as usize * 4..], i);
        }
        let expected = Blake2s256::digest(block);

        let mut out = [0u8; 32];
        r.generate(&mut out).unwrap();
        assert_eq!(out[..16], expected[..16]);

        // Second round hashes the chained digest
        assert_ne!(out[16..], expected[16..]);
    }

    #[test]
    fn output_is_digest_prefix() {
        let mut r = Rng::<_, Sha256>::new(&CDI, Counter(100));

        let mut block = [0u8; 64];
        block[..32].copy_from_slice(&CDI);
        for i in 0..8u32 {
            LittleEndian::write_u32(&mut block[32 + i as usize * 4..], 100 + i);
        }
        let expected = Sha256::hash(&block);

        let mut out = [0u8; 16];
        r.generate(&mut out).unwrap();
        assert_eq!(out, expected[..16]);

        // Hash chain half now carries the digest, drift added to the last word
        let mut words = [0u32; 8];
        LittleEndian::read_u32_into(&expected, &mut words);
        assert_eq!(r.state[..8], words);
        assert_eq!(r.state[15], 107 + 1);
    }

    #[test]
    fn reseed_boundary() {
        let round = |r: &mut Rng<Counter, Sha512_256>| {
            let mut b = [0u8; ROUND_BYTES];
            r.generate(&mut b).unwrap();
            b
        };

        // Identical initial pools, differing reseed material
        let mut a = Rng::<_, Sha512_256>::new(&CDI, Counter(0));
        let mut b = Rng::<_, Sha512_256>::new(&CDI, Counter(0));
        b.entropy = Counter(0xdead_0000);

        // Outputs agree for the first R rounds
        for i in 0..RESEED_INTERVAL {
            assert_eq!(round(&mut a), round(&mut b), "diverged at round {i}");
        }

        // The reseed occurred on completing round R
        assert_eq!(a.counter(), 0);
        assert_ne!(a.state[8..], b.state[8..]);

        // and is visible from round R + 1
        assert_ne!(round(&mut a), round(&mut b));
    }

    #[test]
    fn drift_wraps() {
        let mut r = Rng::<_, Sha512_256>::new(&CDI, Counter(u32::MAX - 7));

        // Last pool word starts at u32::MAX and wraps on first update
        assert_eq!(r.state[15], u32::MAX);

        let mut b = [0u8; 16];
        r.generate(&mut b).unwrap();
        assert_eq!(r.state[15], 0);
    }
}

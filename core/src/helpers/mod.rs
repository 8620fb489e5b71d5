// Copyright (c) 2022-2023 The MobileCoin Foundation

use byteorder::{ByteOrder, LittleEndian};
use ed25519_dalek::{Signer, SigningKey};

/// Derive the ed25519 public key for a secret seed
pub fn ed25519_public_key(seed: &[u8; 32]) -> [u8; 32] {
    SigningKey::from_bytes(seed).verifying_key().to_bytes()
}

/// Sign a message with the ed25519 key derived from a secret seed
pub fn ed25519_sign(seed: &[u8; 32], message: &[u8]) -> [u8; 64] {
    // SigningKey zeroizes its copy of the seed on drop
    let keys = SigningKey::from_bytes(seed);
    keys.sign(message).to_bytes()
}

/// Output size check for [words_to_bytes], evaluated per instantiation
struct WordBytes<const N: usize, const M: usize>;

impl<const N: usize, const M: usize> WordBytes<N, M> {
    const FITS: () = assert!(M >= N * 4, "output too small for words");
}

/// Pack little-endian register words into bytes, zero padding any excess
///
/// Instantiating with `M < 4 * N` fails to compile.
pub fn words_to_bytes<const N: usize, const M: usize>(words: &[u32; N]) -> [u8; M] {
    let () = WordBytes::<N, M>::FITS;

    let mut b = [0u8; M];
    LittleEndian::write_u32_into(words, &mut b[..N * 4]);
    b
}

#[cfg(test)]
mod test {
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    use super::*;

    #[test]
    fn sign_verifies() {
        let seed = [0x42; 32];
        let msg = b"touch to sign";

        let public_key = ed25519_public_key(&seed);
        let signature = ed25519_sign(&seed, msg);

        let v = VerifyingKey::from_bytes(&public_key).unwrap();
        v.verify(msg, &Signature::from_bytes(&signature)).unwrap();

        // Deterministic signatures
        assert_eq!(signature, ed25519_sign(&seed, msg));
    }

    #[test]
    fn word_packing() {
        let b: [u8; 8] = words_to_bytes(&[0x0403_0201, 0x0807_0605]);
        assert_eq!(b, [1, 2, 3, 4, 5, 6, 7, 8]);

        let b: [u8; 6] = words_to_bytes(&[0x0403_0201]);
        assert_eq!(b, [1, 2, 3, 4, 0, 0]);
    }
}

//! Anonymous sealed boxes to a counselor's public key
//!
//! X25519 + XSalsa20-Poly1305 with an ephemeral sender key: anyone can seal,
//! only the counselor can open, and opening authenticates nothing about the
//! sender. Output is a single base64 string.

use matchlock_core::MatchlockError;

use crate::codec::{b64_decode, b64_encode};
use crate::keys::{OcKeypair, OcPublicKey};

/// Seal `plaintext` to the counselor's public key.
pub fn seal(pk: &OcPublicKey, plaintext: &[u8]) -> Result<String, MatchlockError> {
    let sealed = pk
        .0
        .seal(&mut rand::thread_rng(), plaintext)
        .map_err(|_| MatchlockError::AsymmetricDecrypt)?;
    Ok(b64_encode(&sealed))
}

/// Open a sealed box with the counselor's keypair.
pub fn seal_open(keypair: &OcKeypair, sealed_b64: &str) -> Result<Vec<u8>, MatchlockError> {
    let sealed = b64_decode(sealed_b64).map_err(|_| MatchlockError::AsymmetricDecrypt)?;
    keypair
        .secret
        .0
        .unseal(&sealed)
        .map_err(|_| MatchlockError::AsymmetricDecrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let kp = OcKeypair::generate();
        let sealed = seal(&kp.public, b"share json").unwrap();
        assert_eq!(seal_open(&kp, &sealed).unwrap(), b"share json");
    }

    #[test]
    fn test_wrong_keypair_cannot_open() {
        let kp_a = OcKeypair::generate();
        let kp_b = OcKeypair::generate();
        let sealed = seal(&kp_a.public, b"for A only").unwrap();
        assert_eq!(
            seal_open(&kp_b, &sealed),
            Err(MatchlockError::AsymmetricDecrypt)
        );
    }

    #[test]
    fn test_sealing_is_randomized() {
        let kp = OcKeypair::generate();
        let a = seal(&kp.public, b"msg").unwrap();
        let b = seal(&kp.public, b"msg").unwrap();
        assert_ne!(a, b, "ephemeral sender keys must differ");
    }

    #[test]
    fn test_garbage_fails_to_open() {
        let kp = OcKeypair::generate();
        assert_eq!(
            seal_open(&kp, "not-base64!!"),
            Err(MatchlockError::AsymmetricDecrypt)
        );
        let garbage = crate::codec::b64_encode(&[0xabu8; 64]);
        assert_eq!(
            seal_open(&kp, &garbage),
            Err(MatchlockError::AsymmetricDecrypt)
        );
    }
}

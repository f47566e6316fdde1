//! XChaCha20-Poly1305 with role-and-index additional data
//!
//! Every symmetric ciphertext in the protocol binds an AD of the form
//! `<role> ∥ matchingIndex`, so a ciphertext moved across roles or across
//! perpetrator buckets fails authentication instead of decrypting into the
//! wrong context. Output is framed `b64(ct ∥ tag) ∥ "$" ∥ b64(nonce)`.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use matchlock_core::MatchlockError;

use crate::codec::{frame, unframe};
use crate::{KEY_SIZE, NONCE_SIZE};

// Role labels bound into every AD; each is concatenated with the matching
// index so ciphertexts cannot cross roles or perpetrator buckets.
pub(crate) const AD_RECORD_KEY: &str = "record key";
pub(crate) const AD_USER_EDIT: &str = "user edit";
pub(crate) const AD_RECORD: &str = "record";

/// The AD for one role under one matching index.
pub(crate) fn ad(role: &str, matching_index: &str) -> String {
    format!("{role}{matching_index}")
}

fn cipher_for(key: &[u8]) -> Result<XChaCha20Poly1305, MatchlockError> {
    if key.len() != KEY_SIZE {
        return Err(MatchlockError::ImproperKeyLength(key.len()));
    }
    Ok(XChaCha20Poly1305::new(Key::from_slice(key)))
}

/// Encrypt `plaintext` under `key`, authenticating `ad`. Fresh random nonce
/// per call.
pub fn aead_encrypt(key: &[u8], ad: &str, plaintext: &[u8]) -> Result<String, MatchlockError> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: ad.as_bytes(),
            },
        )
        .map_err(|_| MatchlockError::SymmetricDecrypt)?;

    Ok(frame(&ciphertext, &nonce_bytes))
}

/// Decrypt a framed ciphertext, verifying `ad`. Authentication failure is
/// `SymmetricDecrypt`; inside the pairing loop the caller reads that as
/// "wrong partner".
pub fn aead_decrypt(key: &[u8], ad: &str, framed: &str) -> Result<Vec<u8>, MatchlockError> {
    let cipher = cipher_for(key)?;
    let (ciphertext, nonce_bytes) = unframe(framed)?;
    let nonce = XNonce::from_slice(&nonce_bytes);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext.as_ref(),
                aad: ad.as_bytes(),
            },
        )
        .map_err(|_| MatchlockError::SymmetricDecrypt)
}

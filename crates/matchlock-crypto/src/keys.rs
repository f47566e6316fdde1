//! Key material: per-submission record keys, the reconstructed escrow key,
//! and counselor keypairs
//!
//! Secret-holding types zeroize on drop and redact their Debug output.

use std::collections::HashMap;

use rand::RngCore;
use zeroize::Zeroize;

use matchlock_core::MatchlockError;

use crate::KEY_SIZE;

/// The per-submission AEAD key protecting one record body. Zeroized on drop.
#[derive(Clone)]
pub struct RecordKey {
    bytes: [u8; KEY_SIZE],
}

impl RecordKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for RecordKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit record key.
pub fn generate_record_key() -> RecordKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    RecordKey::from_bytes(bytes)
}

/// The escrow key k derived from a randId (encrypt side) or reconstructed
/// from two shares (decrypt side). Zeroized on drop.
#[derive(Clone)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A counselor's public encryption key.
#[derive(Clone)]
pub struct OcPublicKey(pub(crate) crypto_box::PublicKey);

impl std::fmt::Debug for OcPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OcPublicKey").field(self.0.as_bytes()).finish()
    }
}

impl OcPublicKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(crypto_box::PublicKey::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        self.0.as_bytes()
    }
}

/// A counselor's secret decryption key. The inner key zeroizes on drop.
#[derive(Clone)]
pub struct OcSecretKey(pub(crate) crypto_box::SecretKey);

impl OcSecretKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(crypto_box::SecretKey::from(bytes))
    }

    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.0.to_bytes()
    }
}

impl std::fmt::Debug for OcSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcSecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A counselor keypair: the public half goes into the key dictionary handed
/// to the encryptor, the secret half stays with the counselor.
#[derive(Debug, Clone)]
pub struct OcKeypair {
    pub public: OcPublicKey,
    pub secret: OcSecretKey,
}

impl OcKeypair {
    pub fn generate() -> Self {
        let secret = crypto_box::SecretKey::generate(&mut rand::thread_rng());
        let public = secret.public_key();
        Self {
            public: OcPublicKey(public),
            secret: OcSecretKey(secret),
        }
    }
}

/// The counselor key dictionary handed to the encryptor.
pub type OcKeyMap = HashMap<String, OcPublicKey>;

/// Recover a `RecordKey` from an AEAD plaintext.
///
/// Record keys travel base64-encoded inside AEAD plaintexts, so the unwrap
/// is utf-8 → base64 → exactly 32 raw bytes.
pub(crate) fn record_key_from_b64(plaintext: &[u8]) -> Result<RecordKey, MatchlockError> {
    let text = std::str::from_utf8(plaintext)
        .map_err(|_| MatchlockError::Serialization("record key is not utf-8".into()))?;
    let mut raw = crate::codec::b64_decode(text)?;
    if raw.len() != KEY_SIZE {
        let got = raw.len();
        raw.zeroize();
        return Err(MatchlockError::ImproperKeyLength(got));
    }
    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&raw);
    raw.zeroize();
    Ok(RecordKey::from_bytes(bytes))
}

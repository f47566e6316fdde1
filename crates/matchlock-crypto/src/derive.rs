//! Per-perpetrator derivation: randId → (slope, escrow key, matching index)
//!
//! The matching index is hashed from *both* the slope seed and the key, so a
//! leak of either component reveals nothing about the index, and the index
//! reveals nothing about them.

use crypto_bigint::U512;

use matchlock_core::MatchlockError;

use crate::codec::{b64_encode, bytes_to_int};
use crate::kdf::{derive_subkey, generic_hash};
use crate::keys::DerivedKey;
use crate::RAND_ID_SIZE;

const SUBKEY_SLOPE: u64 = 1;
const SUBKEY_KEY: u64 = 2;
const SUBKEY_INDEX: u64 = 3;

const CTX_SLOPE: &str = "slope derivation";
const CTX_KEY: &str = "key derivation";
const CTX_INDEX: &str = "matching index derivation";

/// Everything one randId determines.
#[derive(Debug)]
pub struct Derived {
    /// Slope a of the sharing line, already a canonical residue (< 2^256)
    pub slope: U512,
    /// Intercept k, the escrow key
    pub key: DerivedKey,
    /// Bucket key π, base64
    pub matching_index: String,
}

/// Derive (a, k, π) from a 32-byte randId.
pub fn derive(rand_id: &[u8]) -> Result<Derived, MatchlockError> {
    let rand_id: &[u8; RAND_ID_SIZE] = rand_id.try_into().map_err(|_| {
        MatchlockError::KeyDerivation(format!(
            "rand id is {} bytes, want {RAND_ID_SIZE}",
            rand_id.len()
        ))
    })?;

    let a = derive_subkey(SUBKEY_SLOPE, CTX_SLOPE, rand_id);
    let k = derive_subkey(SUBKEY_KEY, CTX_KEY, rand_id);

    let ak = generic_hash(&[b64_encode(&a).as_bytes(), b64_encode(&k).as_bytes()]);
    let matching_index = b64_encode(&derive_subkey(SUBKEY_INDEX, CTX_INDEX, &ak));

    Ok(Derived {
        slope: bytes_to_int(&a),
        key: DerivedKey::from_bytes(k),
        matching_index,
    })
}

//! Deterministic subkey derivation and generic hashing, both BLAKE2b
//!
//! `derive_subkey` is the classic derive-from-key construction: a keyed
//! BLAKE2b of the empty message, with the subkey id in the salt and the
//! domain context in the personalization field. Distinct ids or contexts
//! yield independent subkeys from one master.

use blake2b_simd::Params;

use crate::KEY_SIZE;

// BLAKE2b salt and personalization are 16 bytes each; the context string
// contributes its first 8 bytes, zero padded.
const SALT_LEN: usize = 16;
const PERSONAL_LEN: usize = 16;
const CONTEXT_LEN: usize = 8;

/// Derive a 32-byte subkey from `master`, separated by `subkey_id` and
/// `context`.
pub fn derive_subkey(subkey_id: u64, context: &str, master: &[u8; KEY_SIZE]) -> [u8; KEY_SIZE] {
    let mut salt = [0u8; SALT_LEN];
    salt[..8].copy_from_slice(&subkey_id.to_le_bytes());

    let mut personal = [0u8; PERSONAL_LEN];
    let ctx = context.as_bytes();
    let n = ctx.len().min(CONTEXT_LEN);
    personal[..n].copy_from_slice(&ctx[..n]);

    let hash = Params::new()
        .hash_length(KEY_SIZE)
        .key(master)
        .salt(&salt)
        .personal(&personal)
        .hash(&[]);

    let mut out = [0u8; KEY_SIZE];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Unkeyed BLAKE2b-256 over the concatenation of `parts`.
pub fn generic_hash(parts: &[&[u8]]) -> [u8; KEY_SIZE] {
    let mut state = Params::new().hash_length(KEY_SIZE).to_state();
    for part in parts {
        state.update(part);
    }
    let hash = state.finalize();

    let mut out = [0u8; KEY_SIZE];
    out.copy_from_slice(hash.as_bytes());
    out
}

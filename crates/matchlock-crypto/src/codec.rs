//! Byte, integer and string codecs shared across the engine
//!
//! Conventions fixed by the wire format:
//! - 256-bit keys ↔ integers are little-endian (low byte first);
//! - share coordinates travel as decimal strings inside the sealed JSON;
//! - base64 is URL-safe without padding on every boundary;
//! - symmetric ciphertexts are framed `b64(ct) ∥ "$" ∥ b64(nonce)`; `$`
//!   never occurs in the URL-safe alphabet.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use crypto_bigint::{Encoding, NonZero, U512};

use matchlock_core::MatchlockError;

use crate::{KEY_SIZE, NONCE_SIZE};

const FRAME_SEPARATOR: char = '$';

/// Interpret 32 little-endian bytes as an integer: Σ b[i] · 2^(8i).
pub fn bytes_to_int(b: &[u8; KEY_SIZE]) -> U512 {
    let mut wide = [0u8; 64];
    wide[..KEY_SIZE].copy_from_slice(b);
    U512::from_le_slice(&wide)
}

/// Inverse of `bytes_to_int`, producing exactly 32 bytes.
///
/// Bits at position 256 and above are truncated; the only values callers
/// round-trip are 256-bit hash outputs, which never set them.
pub fn int_to_bytes(v: &U512) -> [u8; KEY_SIZE] {
    let wide = v.to_le_bytes();
    let mut out = [0u8; KEY_SIZE];
    out.copy_from_slice(&wide[..KEY_SIZE]);
    out
}

/// Interpret a 32-byte hash as a big-endian integer (the hex-string reading
/// of a hash digest).
pub fn hash_to_int(b: &[u8; KEY_SIZE]) -> U512 {
    let mut wide = [0u8; 64];
    wide[64 - KEY_SIZE..].copy_from_slice(b);
    U512::from_be_slice(&wide)
}

/// Decimal rendering of a field element for the share JSON.
pub fn to_decimal(v: &U512) -> String {
    if *v == U512::ZERO {
        return "0".to_string();
    }
    let ten = NonZero::new(U512::from_u64(10)).unwrap();
    let mut digits = Vec::new();
    let mut cur = *v;
    while cur != U512::ZERO {
        let (q, r) = cur.div_rem(&ten);
        digits.push(b'0' + r.as_words()[0] as u8);
        cur = q;
    }
    digits.reverse();
    String::from_utf8(digits).expect("digits are ascii")
}

/// Parse a decimal string back into a field element.
pub fn from_decimal(s: &str) -> Result<U512, MatchlockError> {
    if s.is_empty() || s.len() > 78 {
        // 78 digits covers every value below 2^257; anything longer cannot
        // be a canonical residue.
        return Err(MatchlockError::Serialization(format!(
            "bad decimal length {}",
            s.len()
        )));
    }
    let ten = U512::from_u64(10);
    let mut acc = U512::ZERO;
    for c in s.bytes() {
        if !c.is_ascii_digit() {
            return Err(MatchlockError::Serialization(
                "non-digit in decimal string".into(),
            ));
        }
        acc = acc
            .wrapping_mul(&ten)
            .wrapping_add(&U512::from_u64((c - b'0') as u64));
    }
    Ok(acc)
}

pub fn b64_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

pub fn b64_decode(s: &str) -> Result<Vec<u8>, MatchlockError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| MatchlockError::Serialization(format!("base64 decode: {e}")))
}

/// Frame a symmetric ciphertext with its nonce.
pub fn frame(ciphertext: &[u8], nonce: &[u8; NONCE_SIZE]) -> String {
    format!(
        "{}{FRAME_SEPARATOR}{}",
        b64_encode(ciphertext),
        b64_encode(nonce)
    )
}

/// Split a framed ciphertext back into (ciphertext, nonce).
pub fn unframe(framed: &str) -> Result<(Vec<u8>, [u8; NONCE_SIZE]), MatchlockError> {
    let (ct_part, nonce_part) = framed.split_once(FRAME_SEPARATOR).ok_or_else(|| {
        MatchlockError::Serialization("ciphertext frame missing separator".into())
    })?;
    let ciphertext = b64_decode(ct_part)?;
    let nonce_bytes = b64_decode(nonce_part)?;
    let nonce: [u8; NONCE_SIZE] = nonce_bytes.try_into().map_err(|v: Vec<u8>| {
        MatchlockError::Serialization(format!("nonce is {} bytes, want {NONCE_SIZE}", v.len()))
    })?;
    Ok((ciphertext, nonce))
}

//! matchlock-crypto: the matching-escrow protocol engine
//!
//! A submission is encrypted so that a reviewing counselor can open it only
//! once a second submission names the same perpetrator. The scheme is a
//! 2-of-n secret sharing over GF(2^256 + 297) layered under symmetric and
//! asymmetric encryption:
//!
//! ```text
//! randId (32 B, from an external OPRF)
//!   ├── slope a     = derive_subkey(1, "slope derivation")
//!   ├── key k       = derive_subkey(2, "key derivation")
//!   └── index π     = b64(derive_subkey(3, "matching index derivation",
//!                                        H(b64(a) ∥ b64(k))))
//! submission
//!   ├── share (x, y): x = H(userId), y = a·x + k mod p
//!   ├── recordKey (256-bit random)
//!   ├── eRecord    = AEAD(recordKey, record JSON,    AD = "record" ∥ π)
//!   ├── eRecordKey = AEAD(k,         b64(recordKey), AD = "record key" ∥ π)
//!   ├── eUser      = AEAD(passKey,   b64(recordKey), AD = "user edit" ∥ π)
//!   └── eOC        = sealed box to each counselor over {x, y, eRecordKey}
//! ```
//!
//! Two shares with the same π reconstruct k by two-point interpolation, and k
//! unwraps every record key in the bucket. AEAD authentication against the
//! π-bound AD is the only match oracle the decryptor needs.
//!
//! Batch operations never fail as a whole: per-entry trouble is collected
//! into `Malformed` entries alongside the successes.

pub mod aead;
pub mod bucket;
pub mod codec;
pub mod decrypt;
pub mod derive;
pub mod edit;
pub mod encrypt;
pub mod field;
pub mod kdf;
pub mod keys;
pub mod sealed;
pub mod share;

pub use decrypt::decrypt;
pub use derive::{derive, Derived};
pub use edit::{decrypt_user_record, update_user_record};
pub use encrypt::encrypt;
pub use keys::{generate_record_key, DerivedKey, OcKeyMap, OcKeypair, OcPublicKey, RecordKey};

/// Size of every symmetric key in the protocol (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of the pseudorandom perpetrator identifier handed in by the OPRF
pub const RAND_ID_SIZE: usize = 32;

//! matchlock-core: shared data model for the matchlock matching-escrow core
//!
//! Holds the wire types persisted server-side (`EncryptedData` and the nested
//! `EncryptedMap`), the plaintext `Record`, batch outcome types, and the
//! closed error taxonomy. No cryptography lives here; see matchlock-crypto.

pub mod error;
pub mod types;

pub use error::{MatchlockError, MatchlockResult};
pub use types::{
    merge_encrypted_maps, DecryptOutcome, DecryptedRecord, EncryptOutcome, EncryptedData,
    EncryptedMap, Malformed, Record, BATCH_ID_ALL, BATCH_ID_ENCRYPTION,
};

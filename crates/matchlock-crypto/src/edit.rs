//! User-held edit path: the submitter decrypts and rewrites their own record
//! without help from any counselor or partner submission
//!
//! The passphrase-wrapped record key (`eUser`) is independent of the escrow
//! key, so the edit path works before a match exists. Rewriting touches only
//! `eRecord`; the share, `eUser` and the sealed boxes stay as issued.

use tracing::warn;
use zeroize::Zeroize;

use matchlock_core::{
    DecryptOutcome, DecryptedRecord, EncryptedData, Malformed, MatchlockError, Record,
    BATCH_ID_ALL,
};

use crate::aead::{ad, aead_decrypt, aead_encrypt, AD_RECORD, AD_USER_EDIT};
use crate::keys::{record_key_from_b64, RecordKey};

/// Decrypt every per-counselor copy of a user's own submission.
///
/// Copies are attempted independently; they normally all yield the same
/// record, and duplicate emission is by contract.
pub fn decrypt_user_record(user_pass: &[u8], entries: &[EncryptedData]) -> DecryptOutcome {
    let mut outcome = DecryptOutcome::default();
    for entry in entries {
        match open_own_record(user_pass, entry) {
            Ok(record) => outcome.records.push(DecryptedRecord {
                id: entry.id.clone(),
                record,
            }),
            Err(error) => {
                warn!(id = %entry.id, %error, "user copy failed to open");
                outcome.malformed.push(Malformed::new(entry.id.clone(), error));
            }
        }
    }
    outcome
}

/// Re-encrypt `new_record` in place over every copy of the user's
/// submission. Only `e_record` is rewritten, with a fresh nonce; malformed
/// copies are reported and skipped.
pub fn update_user_record(
    user_pass: &[u8],
    entries: &mut [EncryptedData],
    new_record: &Record,
) -> Vec<Malformed> {
    if !new_record.is_complete() {
        return vec![Malformed::new(BATCH_ID_ALL, MatchlockError::MissingFields)];
    }
    let record_json = match serde_json::to_vec(new_record) {
        Ok(json) => json,
        Err(e) => {
            return vec![Malformed::new(
                BATCH_ID_ALL,
                MatchlockError::Serialization(e.to_string()),
            )]
        }
    };

    let mut malformed = Vec::new();
    for entry in entries.iter_mut() {
        if let Err(error) = rewrap(user_pass, entry, &record_json) {
            warn!(id = %entry.id, %error, "user copy not rewritten");
            malformed.push(Malformed::new(entry.id.clone(), error));
        }
    }
    malformed
}

fn unwrap_record_key(user_pass: &[u8], entry: &EncryptedData) -> Result<RecordKey, MatchlockError> {
    let mut key_b64 = aead_decrypt(
        user_pass,
        &ad(AD_USER_EDIT, &entry.matching_index),
        &entry.e_user,
    )?;
    let record_key = record_key_from_b64(&key_b64);
    key_b64.zeroize();
    record_key
}

fn open_own_record(user_pass: &[u8], entry: &EncryptedData) -> Result<Record, MatchlockError> {
    let record_key = unwrap_record_key(user_pass, entry)?;
    let plain = aead_decrypt(
        record_key.as_bytes(),
        &ad(AD_RECORD, &entry.matching_index),
        &entry.e_record,
    )?;
    serde_json::from_slice(&plain).map_err(|e| MatchlockError::Serialization(e.to_string()))
}

fn rewrap(
    user_pass: &[u8],
    entry: &mut EncryptedData,
    record_json: &[u8],
) -> Result<(), MatchlockError> {
    let record_key = unwrap_record_key(user_pass, entry)?;
    entry.e_record = aead_encrypt(
        record_key.as_bytes(),
        &ad(AD_RECORD, &entry.matching_index),
        record_json,
    )?;
    Ok(())
}

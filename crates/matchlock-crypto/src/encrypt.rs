//! Submission builder: one record, one or more alleged perpetrators
//!
//! Each randId is processed independently (a failure on one never aborts
//! the others) and contributes one share, three layered ciphertexts and a
//! per-counselor sealed fan-out to the encrypted map.

use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroize;

use matchlock_core::{
    EncryptOutcome, EncryptedData, EncryptedMap, Malformed, MatchlockError, Record, BATCH_ID_ALL,
    BATCH_ID_ENCRYPTION,
};

use crate::aead::{ad, aead_encrypt, AD_RECORD, AD_RECORD_KEY, AD_USER_EDIT};
use crate::codec::{b64_encode, bytes_to_int, hash_to_int};
use crate::derive::derive;
use crate::field::{line_eval, SharePoint};
use crate::kdf::generic_hash;
use crate::keys::{generate_record_key, OcKeyMap};
use crate::sealed::seal;
use crate::share::SealedShare;

/// Encrypt `record` once per randId, fanning each submission out to every
/// counselor in `oc_keys`.
///
/// Pre-condition failures (`NoOcKeys`, `MissingFields`) reject the whole
/// call with a single `"All"` malformed entry and no partial output;
/// per-randId failures are tagged `"encryption"`.
pub fn encrypt(
    rand_ids: &[Vec<u8>],
    record: &Record,
    oc_keys: &OcKeyMap,
    user_pass: &[u8],
) -> EncryptOutcome {
    let mut outcome = EncryptOutcome::default();

    if oc_keys.is_empty() {
        warn!("rejecting submission: no counselor keys");
        outcome
            .malformed
            .push(Malformed::new(BATCH_ID_ALL, MatchlockError::NoOcKeys));
        return outcome;
    }
    if !record.is_complete() {
        warn!("rejecting submission: missing record fields");
        outcome
            .malformed
            .push(Malformed::new(BATCH_ID_ALL, MatchlockError::MissingFields));
        return outcome;
    }

    for rand_id in rand_ids {
        match encrypt_one(rand_id, record, oc_keys, user_pass, &mut outcome.encrypted) {
            Ok(index) => debug!(index = %index, "submission encrypted"),
            Err(error) => {
                warn!(%error, "submission skipped");
                outcome
                    .malformed
                    .push(Malformed::new(BATCH_ID_ENCRYPTION, error));
            }
        }
    }
    outcome
}

fn encrypt_one(
    rand_id: &[u8],
    record: &Record,
    oc_keys: &OcKeyMap,
    user_pass: &[u8],
    map: &mut EncryptedMap,
) -> Result<String, MatchlockError> {
    let derived = derive(rand_id)?;
    let index = derived.matching_index;

    // Share point: x hashes the submitter, y evaluates the line at x.
    let x = hash_to_int(&generic_hash(&[record.user_id.as_bytes()]));
    let k_int = bytes_to_int(derived.key.as_bytes());
    let y = line_eval(&derived.slope, &x, &k_int);

    let record_key = generate_record_key();
    let mut record_key_b64 = b64_encode(record_key.as_bytes());

    let e_record_key = aead_encrypt(
        derived.key.as_bytes(),
        &ad(AD_RECORD_KEY, &index),
        record_key_b64.as_bytes(),
    );
    let e_user = aead_encrypt(
        user_pass,
        &ad(AD_USER_EDIT, &index),
        record_key_b64.as_bytes(),
    );
    record_key_b64.zeroize();
    let (e_record_key, e_user) = (e_record_key?, e_user?);

    let record_json =
        serde_json::to_vec(record).map_err(|e| MatchlockError::Serialization(e.to_string()))?;
    let e_record = aead_encrypt(record_key.as_bytes(), &ad(AD_RECORD, &index), &record_json)?;

    let share = SealedShare::new(&SharePoint { x, y }, e_record_key);
    let share_json = share.to_json()?;

    // One id across the whole per-counselor fan-out; seal everything before
    // touching the map so a failure leaves no partial bucket behind.
    let record_id = Uuid::new_v4().to_string();
    let mut fan_out = Vec::with_capacity(oc_keys.len());
    for (oc_id, pk) in oc_keys {
        let e_oc = seal(pk, &share_json)?;
        fan_out.push((
            oc_id.clone(),
            EncryptedData {
                id: record_id.clone(),
                matching_index: index.clone(),
                e_oc,
                e_user: e_user.clone(),
                e_record: e_record.clone(),
            },
        ));
    }

    let bucket = map.entry(index.clone()).or_default();
    for (oc_id, entry) in fan_out {
        bucket.entry(oc_id).or_default().push(entry);
    }
    Ok(index)
}

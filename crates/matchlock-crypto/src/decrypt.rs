//! Counselor-side decryption: open shares, pair them, reconstruct the escrow
//! key, unwrap the records
//!
//! Two shares on the same line determine its intercept k, and AEAD
//! authentication against the index-bound AD is the oracle for "these two
//! really belong together". The loop below tries partners until the oracle
//! agrees, so any two well-formed shares with the same matching index always
//! reconstruct, and spurious or corrupt shares surface as malformed without
//! blocking the rest.

use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use matchlock_core::{
    DecryptOutcome, DecryptedRecord, EncryptedData, Malformed, MatchlockError, Record,
};

use crate::aead::{ad, aead_decrypt, AD_RECORD, AD_RECORD_KEY};
use crate::bucket::screen_matches;
use crate::codec::int_to_bytes;
use crate::field::{derive_slope, intercept, SharePoint};
use crate::keys::{record_key_from_b64, OcKeypair};
use crate::sealed::seal_open;
use crate::share::SealedShare;
use crate::KEY_SIZE;

/// One entry whose sealed box has been opened.
struct OpenShare<'a> {
    entry: &'a EncryptedData,
    point: SharePoint,
    e_record_key: String,
}

/// Decrypt one counselor's view of a batch of entries (possibly mixing
/// matching indices).
///
/// Never fails as a whole: every per-entry failure lands in
/// `outcome.malformed` under that entry's id.
pub fn decrypt(entries: &[EncryptedData], keypair: &OcKeypair) -> DecryptOutcome {
    let mut outcome = DecryptOutcome::default();

    let (kept, mut screened) = screen_matches(entries);
    outcome.malformed.append(&mut screened);
    if kept.is_empty() {
        return outcome;
    }

    let mut pending: Vec<OpenShare> = Vec::new();
    for entry in kept {
        match open_share(entry, keypair) {
            Ok(share) => pending.push(share),
            Err(error) => {
                warn!(id = %entry.id, %error, "sealed share could not be opened");
                outcome.malformed.push(Malformed::new(entry.id.clone(), error));
            }
        }
    }
    if pending.len() < 2 {
        return outcome;
    }

    pair_and_reconstruct(pending, &mut outcome);
    outcome
}

fn open_share<'a>(
    entry: &'a EncryptedData,
    keypair: &OcKeypair,
) -> Result<OpenShare<'a>, MatchlockError> {
    let payload = seal_open(keypair, &entry.e_oc)?;
    // A payload that opens but does not parse as a share is equally useless
    // to the pairing loop.
    let share =
        SealedShare::from_json(&payload).map_err(|_| MatchlockError::AsymmetricDecrypt)?;
    let point = share.point().map_err(|_| MatchlockError::AsymmetricDecrypt)?;
    Ok(OpenShare {
        entry,
        point,
        e_record_key: share.e_record_key,
    })
}

/// The pair-and-reconstruct loop.
///
/// `pending` holds shares not yet decrypted; `decrypted` holds shares whose
/// line membership is proven. Each share is tried as the pivot exactly once:
/// first against proven partners (only the pivot's record key needs to
/// authenticate), then against the remaining pending shares (both sides
/// must authenticate). A pivot no partner vouches for is malformed.
fn pair_and_reconstruct(mut pending: Vec<OpenShare<'_>>, outcome: &mut DecryptOutcome) {
    let mut decrypted: Vec<OpenShare> = Vec::new();

    'outer: while let Some(s1) = pending.pop() {
        let mut vouched = None;
        for s2 in &decrypted {
            let Some(k) = candidate_key(&s1, s2) else {
                continue;
            };
            if let Some(result) = try_open_record(&s1, &k) {
                vouched = Some(result);
                break;
            }
        }
        if let Some(result) = vouched {
            emit(outcome, &s1, result);
            decrypted.push(s1);
            continue 'outer;
        }

        for i in 0..pending.len() {
            let Some(k) = candidate_key(&s1, &pending[i]) else {
                continue;
            };
            let Some(r1) = try_open_record(&s1, &k) else {
                continue;
            };
            let Some(r2) = try_open_record(&pending[i], &k) else {
                continue;
            };
            let s2 = pending.remove(i);
            debug!(id1 = %s1.entry.id, id2 = %s2.entry.id, "escrow key reconstructed");
            emit(outcome, &s1, r1);
            emit(outcome, &s2, r2);
            decrypted.push(s1);
            decrypted.push(s2);
            continue 'outer;
        }

        warn!(id = %s1.entry.id, "no partner reconstructed the escrow key");
        outcome.malformed.push(Malformed::new(
            s1.entry.id.clone(),
            MatchlockError::SymmetricDecrypt,
        ));
    }
}

/// Intercept of the line through both share points, as AEAD key bytes.
/// `None` when the points share an x-coordinate (no line).
fn candidate_key(s1: &OpenShare, s2: &OpenShare) -> Option<Zeroizing<[u8; KEY_SIZE]>> {
    let slope = derive_slope(&s1.point, &s2.point).ok()?;
    Some(Zeroizing::new(int_to_bytes(&intercept(&s1.point, &slope))))
}

/// Attempt to unwrap and open one share's record under a candidate key.
///
/// `None` means the key failed AEAD authentication on the wrapped record
/// key: a wrong partner, worth retrying elsewhere. `Some(Err)` means the
/// partner was right but the entry itself is broken; that verdict is final.
fn try_open_record(s: &OpenShare, k: &[u8; KEY_SIZE]) -> Option<Result<Record, MatchlockError>> {
    let index = &s.entry.matching_index;
    let mut key_b64 = match aead_decrypt(k, &ad(AD_RECORD_KEY, index), &s.e_record_key) {
        Ok(plain) => plain,
        Err(MatchlockError::SymmetricDecrypt) => return None,
        Err(error) => return Some(Err(error)),
    };

    let record_key = record_key_from_b64(&key_b64);
    key_b64.zeroize();
    let record_key = match record_key {
        Ok(key) => key,
        Err(error) => return Some(Err(error)),
    };

    let plain = match aead_decrypt(
        record_key.as_bytes(),
        &ad(AD_RECORD, index),
        &s.entry.e_record,
    ) {
        Ok(plain) => plain,
        Err(error) => return Some(Err(error)),
    };
    Some(serde_json::from_slice(&plain).map_err(|e| MatchlockError::Serialization(e.to_string())))
}

fn emit(outcome: &mut DecryptOutcome, s: &OpenShare, result: Result<Record, MatchlockError>) {
    match result {
        Ok(record) => outcome.records.push(DecryptedRecord {
            id: s.entry.id.clone(),
            record,
        }),
        Err(error) => {
            warn!(id = %s.entry.id, %error, "matched entry failed to open");
            outcome
                .malformed
                .push(Malformed::new(s.entry.id.clone(), error));
        }
    }
}

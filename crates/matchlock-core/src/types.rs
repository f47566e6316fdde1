use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MatchlockError;

/// Pseudo-id tagging failures not attributable to a single entry.
pub const BATCH_ID_ALL: &str = "All";

/// Pseudo-id tagging per-randId failures inside the encryptor.
pub const BATCH_ID_ENCRYPTION: &str = "encryption";

/// Plaintext report naming a perpetrator and the submitting user.
///
/// Both fields must be non-empty for the encryptor to accept the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier of the alleged perpetrator
    #[serde(rename = "perpId")]
    pub perp_id: String,
    /// Identifier of the submitting user
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl Record {
    pub fn new(perp_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            perp_id: perp_id.into(),
            user_id: user_id.into(),
        }
    }

    /// True when both identifiers are present.
    pub fn is_complete(&self) -> bool {
        !self.perp_id.is_empty() && !self.user_id.is_empty()
    }
}

/// One (submission, counselor) ciphertext bundle, the unit persisted
/// server-side.
///
/// `e_record` is the only field rewritten after creation (by the user edit
/// path); everything else is immutable once the encryptor emits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    /// UUID shared by all per-counselor copies of one submission
    pub id: String,
    /// Opaque base64 bucket key; equal for all submissions naming the same
    /// perpetrator
    #[serde(rename = "matchingIndex")]
    pub matching_index: String,
    /// Sealed box (to the counselor's public key) over the share JSON
    #[serde(rename = "eOC")]
    pub e_oc: String,
    /// Record key encrypted under the user passphrase (edit path)
    #[serde(rename = "eUser")]
    pub e_user: String,
    /// Record body encrypted under the record key
    #[serde(rename = "eRecord")]
    pub e_record: String,
}

/// matching index → counselor id → entries submitted under that pair.
pub type EncryptedMap = HashMap<String, HashMap<String, Vec<EncryptedData>>>;

/// Append every entry of `src` into `dst`, preserving bucket structure.
///
/// This is the server-side merge of independently encrypted submissions;
/// insertion order inside a bucket carries no meaning.
pub fn merge_encrypted_maps(dst: &mut EncryptedMap, src: EncryptedMap) {
    for (index, per_oc) in src {
        let bucket = dst.entry(index).or_default();
        for (oc_id, mut entries) in per_oc {
            bucket.entry(oc_id).or_default().append(&mut entries);
        }
    }
}

/// A submission (or pseudo-id like `"All"`) that failed processing, with the
/// failure kind attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformed {
    pub id: String,
    pub error: MatchlockError,
}

impl Malformed {
    pub fn new(id: impl Into<String>, error: MatchlockError) -> Self {
        Self {
            id: id.into(),
            error,
        }
    }
}

/// A successfully decrypted record, tagged with the id of the entry it came
/// from so callers can compare results as multisets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedRecord {
    pub id: String,
    pub record: Record,
}

/// Result of one encrypt call: the bucketed ciphertexts plus whatever failed.
#[derive(Debug, Clone, Default)]
pub struct EncryptOutcome {
    pub encrypted: EncryptedMap,
    pub malformed: Vec<Malformed>,
}

/// Result of a decrypt pass over a batch of entries.
#[derive(Debug, Clone, Default)]
pub struct DecryptOutcome {
    pub records: Vec<DecryptedRecord>,
    pub malformed: Vec<Malformed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, index: &str) -> EncryptedData {
        EncryptedData {
            id: id.into(),
            matching_index: index.into(),
            e_oc: "eoc".into(),
            e_user: "euser".into(),
            e_record: "erecord".into(),
        }
    }

    #[test]
    fn test_record_completeness() {
        assert!(Record::new("p", "u").is_complete());
        assert!(!Record::new("", "u").is_complete());
        assert!(!Record::new("p", "").is_complete());
    }

    #[test]
    fn test_record_wire_names() {
        let json = serde_json::to_string(&Record::new("p1", "u1")).unwrap();
        assert!(json.contains("\"perpId\""));
        assert!(json.contains("\"userId\""));

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Record::new("p1", "u1"));
    }

    #[test]
    fn test_encrypted_data_wire_names() {
        let json = serde_json::to_string(&entry("id-1", "pi")).unwrap();
        for field in ["\"matchingIndex\"", "\"eOC\"", "\"eUser\"", "\"eRecord\""] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }

    #[test]
    fn test_merge_appends_within_buckets() {
        let mut dst = EncryptedMap::new();
        dst.entry("pi1".into())
            .or_default()
            .entry("oc1".into())
            .or_default()
            .push(entry("a", "pi1"));

        let mut src = EncryptedMap::new();
        src.entry("pi1".into())
            .or_default()
            .entry("oc1".into())
            .or_default()
            .push(entry("b", "pi1"));
        src.entry("pi2".into())
            .or_default()
            .entry("oc2".into())
            .or_default()
            .push(entry("c", "pi2"));

        merge_encrypted_maps(&mut dst, src);

        assert_eq!(dst["pi1"]["oc1"].len(), 2);
        assert_eq!(dst["pi2"]["oc2"].len(), 1);
    }
}

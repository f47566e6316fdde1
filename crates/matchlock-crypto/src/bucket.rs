//! Matching-index bucketing
//!
//! The server pairs submissions by their opaque matching index without
//! learning anything else; an index that appears only once cannot be matched
//! yet and is reported, not decrypted.

use std::collections::HashMap;

use tracing::debug;

use matchlock_core::{EncryptedData, Malformed, MatchlockError, BATCH_ID_ALL};

/// Group entries by matching index.
pub fn bucket_by_index(entries: &[EncryptedData]) -> HashMap<&str, Vec<&EncryptedData>> {
    let mut buckets: HashMap<&str, Vec<&EncryptedData>> = HashMap::new();
    for entry in entries {
        buckets
            .entry(entry.matching_index.as_str())
            .or_default()
            .push(entry);
    }
    buckets
}

/// Pre-screen a decryption batch.
///
/// Returns the entries that have at least one index partner, plus malformed
/// reports: `NotEnoughMatches` when the input holds fewer than two entries,
/// `MatchingIndexSingleton` per entry whose index is unique in the batch.
pub fn screen_matches(entries: &[EncryptedData]) -> (Vec<&EncryptedData>, Vec<Malformed>) {
    if entries.len() < 2 {
        let id = entries
            .first()
            .map(|e| e.id.clone())
            .unwrap_or_else(|| BATCH_ID_ALL.to_string());
        return (
            Vec::new(),
            vec![Malformed::new(id, MatchlockError::NotEnoughMatches)],
        );
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.matching_index.as_str()).or_default() += 1;
    }

    let mut kept = Vec::new();
    let mut malformed = Vec::new();
    for entry in entries {
        if counts[entry.matching_index.as_str()] < 2 {
            debug!(id = %entry.id, "matching index is a singleton");
            malformed.push(Malformed::new(
                entry.id.clone(),
                MatchlockError::MatchingIndexSingleton,
            ));
        } else {
            kept.push(entry);
        }
    }
    (kept, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, index: &str) -> EncryptedData {
        EncryptedData {
            id: id.into(),
            matching_index: index.into(),
            e_oc: String::new(),
            e_user: String::new(),
            e_record: String::new(),
        }
    }

    #[test]
    fn test_bucketing_groups_by_index() {
        let entries = vec![entry("a", "pi1"), entry("b", "pi2"), entry("c", "pi1")];
        let buckets = bucket_by_index(&entries);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets["pi1"].len(), 2);
        assert_eq!(buckets["pi2"].len(), 1);
    }

    #[test]
    fn test_empty_input_is_not_enough() {
        let (kept, malformed) = screen_matches(&[]);
        assert!(kept.is_empty());
        assert_eq!(
            malformed,
            vec![Malformed::new(BATCH_ID_ALL, MatchlockError::NotEnoughMatches)]
        );
    }

    #[test]
    fn test_single_entry_is_not_enough() {
        let entries = vec![entry("only", "pi1")];
        let (kept, malformed) = screen_matches(&entries);
        assert!(kept.is_empty());
        assert_eq!(
            malformed,
            vec![Malformed::new("only", MatchlockError::NotEnoughMatches)]
        );
    }

    #[test]
    fn test_singletons_flagged_pairs_kept() {
        let entries = vec![
            entry("a", "pi1"),
            entry("lone", "pi2"),
            entry("b", "pi1"),
        ];
        let (kept, malformed) = screen_matches(&entries);
        assert_eq!(
            kept.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(
            malformed,
            vec![Malformed::new(
                "lone",
                MatchlockError::MatchingIndexSingleton
            )]
        );
    }

    #[test]
    fn test_all_singletons_keeps_nothing() {
        let entries = vec![entry("a", "pi1"), entry("b", "pi2")];
        let (kept, malformed) = screen_matches(&entries);
        assert!(kept.is_empty());
        assert_eq!(malformed.len(), 2);
        assert!(malformed
            .iter()
            .all(|m| m.error == MatchlockError::MatchingIndexSingleton));
    }
}

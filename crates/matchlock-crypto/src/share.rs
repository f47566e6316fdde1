//! The share payload sealed to each counselor
//!
//! Wire form (inside the sealed box):
//! `{"x": "<decimal>", "y": "<decimal>", "eRecordKey": "<framed AEAD>"}`.
//! Shares are ephemeral: they exist in memory during encrypt/decrypt and are
//! never persisted outside the sealed box.

use serde::{Deserialize, Serialize};

use matchlock_core::MatchlockError;

use crate::codec::{from_decimal, to_decimal};
use crate::field::SharePoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedShare {
    /// x-coordinate, decimal
    pub x: String,
    /// y-coordinate, decimal
    pub y: String,
    /// Record key wrapped under the escrow key k
    #[serde(rename = "eRecordKey")]
    pub e_record_key: String,
}

impl SealedShare {
    pub fn new(point: &SharePoint, e_record_key: impl Into<String>) -> Self {
        Self {
            x: to_decimal(&point.x),
            y: to_decimal(&point.y),
            e_record_key: e_record_key.into(),
        }
    }

    pub fn point(&self) -> Result<SharePoint, MatchlockError> {
        Ok(SharePoint {
            x: from_decimal(&self.x)?,
            y: from_decimal(&self.y)?,
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>, MatchlockError> {
        serde_json::to_vec(self).map_err(|e| MatchlockError::Serialization(e.to_string()))
    }

    pub fn from_json(data: &[u8]) -> Result<Self, MatchlockError> {
        serde_json::from_slice(data).map_err(|e| MatchlockError::Serialization(e.to_string()))
    }
}

use thiserror::Error;

pub type MatchlockResult<T> = Result<T, MatchlockError>;

/// Failure kinds surfaced by the escrow engine.
///
/// None of these cross the public surface as `Err`: batch operations collect
/// them into `Malformed` entries so that one bad submission never blocks the
/// rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchlockError {
    #[error("no options counselor keys provided")]
    NoOcKeys,

    #[error("record is missing perpetrator or submitter id")]
    MissingFields,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("fewer than two submissions to match")]
    NotEnoughMatches,

    #[error("matching index appears only once in the batch")]
    MatchingIndexSingleton,

    #[error("sealed box could not be opened")]
    AsymmetricDecrypt,

    #[error("authenticated decryption failed")]
    SymmetricDecrypt,

    #[error("expected a 32-byte key, got {0} bytes")]
    ImproperKeyLength(usize),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

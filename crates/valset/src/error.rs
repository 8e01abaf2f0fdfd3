use alloy_primitives::B256;
use thiserror::Error;

/// Convenience result alias
pub type ValsetResult<T> = std::result::Result<T, ValsetError>;

#[derive(Debug, Error)]
/// Error raised while deriving a validator set
pub enum ValsetError {
    /// A call to the chain failed. Derivation never returns a partial set.
    #[error(transparent)]
    Chain(#[from] anyhow::Error),
    /// The header committed on-chain differs from the one derived locally
    #[error("header hash mismatch at epoch {epoch}: committed {committed}, derived {derived}")]
    HeaderHashMismatch {
        epoch: u64,
        committed: B256,
        derived: B256,
    },
    #[error("voting power overflow for operator {0}")]
    VotingPowerOverflow(alloy_primitives::Address),
    #[error("{list} list of {len} entries exceeds its limit of {limit}")]
    ListTooLong {
        list: &'static str,
        len: usize,
        limit: usize,
    },
    #[error("header field {field} = {value} does not fit its on-chain type")]
    HeaderFieldOverflow { field: &'static str, value: u64 },
    #[error("invalid network config: {0}")]
    InvalidConfig(String),
    #[error("could not parse network config: {0}")]
    Json(#[from] serde_json::Error),
}

use alloy_primitives::{Address, U256};
use relay_bls::BLSError;
use relay_valset::KeyTag;
use thiserror::Error;

/// Convenience result alias
pub type AggregatorResult<T> = std::result::Result<T, AggregatorError>;

/// Raised when inputs are malformed or cannot be processed. An input that is well
/// formed but fails a check is reported as a [`Verdict`] instead.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("signature is over a different message hash")]
    MessageHashMismatch,
    #[error("message hash must be 32 bytes, got {0}")]
    InvalidMessageHashLength(usize),
    #[error("validators are not sorted by operator")]
    UnsortedValidators,
    #[error("active validator {operator} has no key with tag {tag}")]
    KeyNotFound { operator: Address, tag: KeyTag },
    #[error("signer key is not registered in the validator set")]
    UnknownSigner,
    #[error("validator {0} signed more than once")]
    DuplicateSigner(Address),
    #[error("key tag {0} is not a BLS-BN254 tag")]
    UnsupportedKeyTag(KeyTag),
    #[error("unsupported verification type {0}")]
    UnsupportedVerificationType(u32),
    #[error("proof is for key tag {actual}, expected {expected}")]
    KeyTagMismatch { expected: KeyTag, actual: KeyTag },
    #[error("malformed proof of {0} bytes")]
    InvalidProofLength(usize),
    #[error("non-signer index {index} is out of range for {len} validators")]
    NonSignerIndexOutOfRange { index: u16, len: usize },
    #[error("non-signer indices are not strictly ascending at position {0}")]
    NonSignersNotAscending(usize),
    #[error("{0} validators cannot be indexed by the proof")]
    TooManyValidators(usize),
    #[error("voting power overflow")]
    VotingPowerOverflow,
    #[error("zk verification requires a prover")]
    MissingProver,
    #[error("prover failed: {0}")]
    Prover(anyhow::Error),
    #[error("BLS Error: {0}")]
    Bls(#[from] BLSError),
}

/// Outcome of verifying a well-formed proof
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// The check a proof failed
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("proof commits to a different validator set")]
    ValidatorSetHashMismatch,
    #[error("validator {index} differs from the validator set")]
    ValidatorMismatch { index: usize },
    #[error("signers hold {signers} voting power, quorum is {threshold}")]
    QuorumNotReached { signers: U256, threshold: U256 },
    #[error("pairing check failed")]
    PairingFailed,
    #[error("prover rejected the proof")]
    ProofRejected,
}

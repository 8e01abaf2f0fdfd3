//! # Quorum Signature Aggregation
//!
//! Turns the BLS-BN254 signatures of a validator set's members into a single proof
//! that the settlement contracts accept, and verifies such proofs off-chain.
//!
//! Two verification modes exist. [`SimpleAggregator`] ships the aggregate signature
//! together with the full validator list and lets the contract check the pairing.
//! [`ZkAggregator`] hands the same inputs to an external [`Prover`] and ships a
//! succinct proof instead. Both sit behind the [`Aggregator`] trait and are picked
//! once per network by [`new_aggregator`].
//!
//! ```rust,ignore
//! use relay_aggregator::{new_aggregator, VerificationType};
//!
//! let aggregator = new_aggregator(VerificationType::BlsBn254Simple, None)?;
//! let proof = aggregator.aggregate(&valset, key_tag, &message_hash, &signatures)?;
//! assert!(aggregator.verify(&valset, key_tag, &proof)?.is_valid());
//! ```

/// ABI word helpers
pub mod abi;

mod error;
pub use error::{AggregatorError, AggregatorResult, Rejection, Verdict};

/// Extra data keys
pub mod extra_data;

/// Simple-mode proof layout
pub mod proof;

mod simple;
pub use simple::SimpleAggregator;

mod validators;
pub use validators::{
    encode_validators, process_validators, process_validators_with_key, validators_hash,
    CanonicalValidator,
};

mod zk;
pub use zk::{public_input, ProveInput, Prover, ZkAggregator, ZkValidator};

use relay_valset::{AggregationProof, ExtraData, KeyTag, Signature, ValidatorSet};

use std::fmt;
use std::sync::Arc;

/// How the settlement contracts check a quorum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerificationType {
    BlsBn254Zk,
    BlsBn254Simple,
}

impl VerificationType {
    pub fn as_u32(self) -> u32 {
        match self {
            VerificationType::BlsBn254Zk => 0,
            VerificationType::BlsBn254Simple => 1,
        }
    }
}

impl TryFrom<u32> for VerificationType {
    type Error = AggregatorError;

    fn try_from(value: u32) -> AggregatorResult<Self> {
        match value {
            0 => Ok(VerificationType::BlsBn254Zk),
            1 => Ok(VerificationType::BlsBn254Simple),
            other => Err(AggregatorError::UnsupportedVerificationType(other)),
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationType::BlsBn254Zk => write!(f, "bls-bn254-zk"),
            VerificationType::BlsBn254Simple => write!(f, "bls-bn254-simple"),
        }
    }
}

/// Produces and checks quorum proofs for one verification mode.
pub trait Aggregator: Send + Sync {
    fn verification_type(&self) -> VerificationType;

    /// Aggregates `signatures` over `message_hash` into a proof for `valset`.
    fn aggregate(
        &self,
        valset: &ValidatorSet,
        key_tag: KeyTag,
        message_hash: &[u8],
        signatures: &[Signature],
    ) -> AggregatorResult<AggregationProof>;

    /// Checks `proof` against `valset`. Malformed input is an error, a well-formed
    /// proof that fails a check yields [`Verdict::Rejected`].
    fn verify(
        &self,
        valset: &ValidatorSet,
        key_tag: KeyTag,
        proof: &AggregationProof,
    ) -> AggregatorResult<Verdict>;

    /// Key/value pairs the contracts need next to the header, ascending by key
    fn generate_extra_data(
        &self,
        valset: &ValidatorSet,
        key_tags: &[KeyTag],
    ) -> AggregatorResult<Vec<ExtraData>>;
}

/// Builds the aggregator for a verification mode. The ZK mode needs a prover.
pub fn new_aggregator(
    verification_type: VerificationType,
    prover: Option<Arc<dyn Prover>>,
) -> AggregatorResult<Box<dyn Aggregator>> {
    match verification_type {
        VerificationType::BlsBn254Simple => Ok(Box::new(SimpleAggregator::new())),
        VerificationType::BlsBn254Zk => {
            let prover = prover.ok_or(AggregatorError::MissingProver)?;
            Ok(Box::new(ZkAggregator::new(prover)))
        }
    }
}

pub(crate) fn check_message_hash(message_hash: &[u8]) -> AggregatorResult<()> {
    if message_hash.len() != 32 {
        return Err(AggregatorError::InvalidMessageHashLength(message_hash.len()));
    }
    Ok(())
}

/// Every signature must be over `message_hash` and made with a `key_tag` key
pub(crate) fn check_signatures(
    key_tag: KeyTag,
    message_hash: &[u8],
    signatures: &[Signature],
) -> AggregatorResult<()> {
    if let Some(signature) = signatures.iter().find(|s| s.key_tag != key_tag) {
        return Err(AggregatorError::KeyTagMismatch {
            expected: key_tag,
            actual: signature.key_tag,
        });
    }
    if signatures
        .iter()
        .any(|signature| &signature.message_hash[..] != message_hash)
    {
        return Err(AggregatorError::MessageHashMismatch);
    }
    Ok(())
}

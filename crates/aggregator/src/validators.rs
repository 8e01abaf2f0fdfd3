use crate::abi::WORD_LENGTH;
use crate::error::{AggregatorError, AggregatorResult};

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use relay_bls::{compress_g1, decompress_g1, G1Affine};
use relay_valset::{KeyTag, Validator};

/// An active validator as the verifier contract sees it: its canonically
/// compressed G1 key and its voting power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalValidator {
    pub operator: Address,
    pub key: G1Affine,
    pub compressed_key: B256,
    pub voting_power: U256,
}

impl CanonicalValidator {
    /// `abi.encode(bytes32 key, uint256 votingPower)`
    pub fn abi_encode(&self) -> Vec<u8> {
        (self.compressed_key, self.voting_power).abi_encode()
    }
}

fn canonicalize(validator: &Validator, payload: &[u8]) -> AggregatorResult<CanonicalValidator> {
    let key = decompress_g1(payload)?;
    Ok(CanonicalValidator {
        operator: validator.operator,
        key,
        compressed_key: B256::from(compress_g1(&key)),
        voting_power: validator.voting_power,
    })
}

/// Builds the canonical validator list for `key_tag`: every active validator's
/// key, recompressed, ascending by compressed key.
///
/// Fails with [`AggregatorError::KeyNotFound`] when an active validator has no key
/// for the tag.
pub fn process_validators(
    validators: &[Validator],
    key_tag: KeyTag,
) -> AggregatorResult<Vec<CanonicalValidator>> {
    let mut canonical = validators
        .iter()
        .filter(|v| v.is_active)
        .map(|v| {
            let key = v.find_key_by_tag(key_tag).ok_or(AggregatorError::KeyNotFound {
                operator: v.operator,
                tag: key_tag,
            })?;
            canonicalize(v, &key.payload)
        })
        .collect::<AggregatorResult<Vec<_>>>()?;
    canonical.sort_by(|a, b| a.compressed_key.cmp(&b.compressed_key));
    Ok(canonical)
}

/// Like [`process_validators`], but leaves out active validators without a key for
/// the tag.
pub fn process_validators_with_key(
    validators: &[Validator],
    key_tag: KeyTag,
) -> AggregatorResult<Vec<CanonicalValidator>> {
    let mut canonical = validators
        .iter()
        .filter(|v| v.is_active)
        .filter_map(|v| v.find_key_by_tag(key_tag).map(|key| canonicalize(v, &key.payload)))
        .collect::<AggregatorResult<Vec<_>>>()?;
    canonical.sort_by(|a, b| a.compressed_key.cmp(&b.compressed_key));
    Ok(canonical)
}

/// `uint256 length ‖ (key, votingPower)*`, the validators section of a proof
pub fn encode_validators(validators: &[CanonicalValidator]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD_LENGTH + validators.len() * 2 * WORD_LENGTH);
    out.extend_from_slice(&U256::from(validators.len()).to_be_bytes::<WORD_LENGTH>());
    for validator in validators {
        out.extend_from_slice(&validator.abi_encode());
    }
    out
}

/// Keccak accumulator committing to the canonical list
pub fn validators_hash(validators: &[CanonicalValidator]) -> B256 {
    keccak256(encode_validators(validators))
}

/// Sums voting power, failing on overflow
pub(crate) fn total_voting_power<'a>(
    validators: impl IntoIterator<Item = &'a CanonicalValidator>,
) -> AggregatorResult<U256> {
    validators.into_iter().try_fold(U256::ZERO, |acc, v| {
        acc.checked_add(v.voting_power)
            .ok_or(AggregatorError::VotingPowerOverflow)
    })
}

//! Byte layout of a simple-mode quorum proof:
//!
//! | Offset     | Size | Field                                               |
//! |------------|------|-----------------------------------------------------|
//! | 0          | 64   | aggregate signature, G1 `X ‖ Y`                     |
//! | 64         | 128  | signers' aggregate key, G2 `X1 ‖ X0 ‖ Y1 ‖ Y0`      |
//! | 192        | 32   | number of validators `N`                            |
//! | 224        | 64·N | `(compressed key, voting power)`, ascending by key  |
//! | 224 + 64N  | 2·M  | non-signer indices, big-endian `u16`, ascending     |

use crate::abi::{read_b256, read_u256, word_at, WORD_LENGTH};
use crate::error::{AggregatorError, AggregatorResult};
use crate::validators::{encode_validators, CanonicalValidator};

use alloy_primitives::{keccak256, B256, U256};
use relay_bls::encoding::{g2_from_bytes, g2_to_bytes, G1_LENGTH, G2_LENGTH};
use relay_bls::{G2Affine, Signature};

pub const VALIDATORS_OFFSET: usize = G1_LENGTH + G2_LENGTH;
pub const MIN_PROOF_LENGTH: usize = VALIDATORS_OFFSET + WORD_LENGTH;
pub const VALIDATOR_LENGTH: usize = 2 * WORD_LENGTH;
pub const NON_SIGNER_LENGTH: usize = 2;

/// A `(compressed key, voting power)` entry as carried in a proof
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatorEntry {
    pub compressed_key: B256,
    pub voting_power: U256,
}

impl From<&CanonicalValidator> for ValidatorEntry {
    fn from(validator: &CanonicalValidator) -> Self {
        ValidatorEntry {
            compressed_key: validator.compressed_key,
            voting_power: validator.voting_power,
        }
    }
}

/// A decoded simple-mode proof
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleProof {
    pub signature: Signature,
    pub signers_key: G2Affine,
    pub validators: Vec<ValidatorEntry>,
    /// keccak256 over the raw `N ‖ entries` section
    pub validators_hash: B256,
    pub non_signers: Vec<u16>,
}

/// Encodes a proof from its parts. Non-signer indices are written as given.
pub fn encode_proof(
    signature: &Signature,
    signers_key: &G2Affine,
    validators: &[CanonicalValidator],
    non_signers: &[u16],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        MIN_PROOF_LENGTH + validators.len() * VALIDATOR_LENGTH + non_signers.len() * NON_SIGNER_LENGTH,
    );
    out.extend_from_slice(&signature.to_bytes());
    out.extend_from_slice(&g2_to_bytes(signers_key));
    out.extend_from_slice(&encode_validators(validators));
    for index in non_signers {
        out.extend_from_slice(&index.to_be_bytes());
    }
    out
}

/// Decodes the proof layout. Point validity is checked, ordering and range of the
/// non-signer indices are left to the verifier.
pub fn decode_proof(bytes: &[u8]) -> AggregatorResult<SimpleProof> {
    let invalid_length = || AggregatorError::InvalidProofLength(bytes.len());
    if bytes.len() < MIN_PROOF_LENGTH {
        return Err(invalid_length());
    }

    let signature = Signature::from_bytes(&bytes[..G1_LENGTH])?;
    let signers_key = g2_from_bytes(&bytes[G1_LENGTH..VALIDATORS_OFFSET])?;

    let count = read_u256(&bytes[VALIDATORS_OFFSET..MIN_PROOF_LENGTH]);
    let max_count = (bytes.len() - MIN_PROOF_LENGTH) / VALIDATOR_LENGTH;
    if count > U256::from(max_count) {
        return Err(invalid_length());
    }
    let count = usize::try_from(count).map_err(|_| invalid_length())?;

    let validators_end = MIN_PROOF_LENGTH + count * VALIDATOR_LENGTH;
    let trailer = &bytes[validators_end..];
    if trailer.len() % NON_SIGNER_LENGTH != 0 {
        return Err(invalid_length());
    }

    let section = &bytes[MIN_PROOF_LENGTH..validators_end];
    let validators = (0..count)
        .map(|i| ValidatorEntry {
            compressed_key: read_b256(word_at(section, 2 * i)),
            voting_power: read_u256(word_at(section, 2 * i + 1)),
        })
        .collect();
    let non_signers = trailer
        .chunks_exact(NON_SIGNER_LENGTH)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect();

    Ok(SimpleProof {
        signature,
        signers_key,
        validators,
        validators_hash: keccak256(&bytes[VALIDATORS_OFFSET..validators_end]),
        non_signers,
    })
}

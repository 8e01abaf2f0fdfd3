use crate::abi::WORD_LENGTH;
use crate::error::{AggregatorError, AggregatorResult, Rejection, Verdict};
use crate::extra_data::{
    global_key, sorted, tagged_key, TOTAL_ACTIVE_VALIDATORS_HASH, VALIDATOR_SET_HASH_MIMC_HASH,
};
use crate::{check_message_hash, check_signatures, Aggregator, VerificationType};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use ark_ec::{AffineRepr, CurveGroup};
use alloy_sol_types::SolValue;
use ark_ff::PrimeField;
use relay_bls::{
    compress_g1, decompress_g1,
    encoding::fq_to_u256,
    hash_to_curve::{try_and_increment::HASH_TO_G1, HashToCurve},
    Fr, G1Affine, G1Projective, G2Affine, G2Projective, PublicKey, Signature as BlsSignature,
};
use relay_valset::{AggregationProof, ExtraData, KeyTag, Signature, ValidatorSet};
use tracing::{debug, instrument, warn};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An active validator as committed to by the circuit, in operator order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZkValidator {
    pub operator: Address,
    pub key: G1Affine,
    pub voting_power: U256,
}

/// Witness handed to the prover
#[derive(Clone, Debug)]
pub struct ProveInput {
    pub validators: Vec<ZkValidator>,
    /// `signers[i]` is set when `validators[i]` signed
    pub signers: Vec<bool>,
    pub message_point: G1Affine,
    pub signature: G1Affine,
    /// Sum of the signers' G2 keys
    pub signers_key: G2Affine,
}

/// An external proving system for the quorum circuit.
pub trait Prover: Send + Sync {
    fn prove(&self, input: &ProveInput) -> anyhow::Result<Vec<u8>>;

    /// Checks `proof` against the single public input of the circuit
    fn verify(&self, validators_count: usize, public_input: Fr, proof: &[u8]) -> anyhow::Result<bool>;

    /// The circuit-friendly commitment to the validator list
    fn validator_set_commitment(&self, validators: &[ZkValidator]) -> anyhow::Result<B256>;
}

/// Aggregates signatures into a succinct proof produced by a [`Prover`]. The proof
/// bytes are the prover's output followed by the signers' voting power as one
/// 32-byte word.
#[derive(Clone)]
pub struct ZkAggregator {
    prover: Arc<dyn Prover>,
}

impl fmt::Debug for ZkAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkAggregator").finish_non_exhaustive()
    }
}

impl ZkAggregator {
    pub fn new(prover: Arc<dyn Prover>) -> Self {
        ZkAggregator { prover }
    }

    /// Active validators holding `key_tag`, in the set's operator order
    pub fn validators(valset: &ValidatorSet, key_tag: KeyTag) -> AggregatorResult<Vec<ZkValidator>> {
        valset
            .active_validators()
            .map(|v| {
                let key = v.find_key_by_tag(key_tag).ok_or(AggregatorError::KeyNotFound {
                    operator: v.operator,
                    tag: key_tag,
                })?;
                Ok(ZkValidator {
                    operator: v.operator,
                    key: decompress_g1(&key.payload)?,
                    voting_power: v.voting_power,
                })
            })
            .collect()
    }

    fn commitment(&self, validators: &[ZkValidator]) -> AggregatorResult<B256> {
        self.prover
            .validator_set_commitment(validators)
            .map_err(AggregatorError::Prover)
    }
}

/// `keccak256(commitment ‖ signersVotingPower ‖ H(m).X ‖ H(m).Y) mod r`
pub fn public_input(commitment: B256, signers_power: U256, message_point: &G1Affine) -> Fr {
    let preimage = (
        commitment,
        signers_power,
        fq_to_u256(&message_point.x),
        fq_to_u256(&message_point.y),
    )
        .abi_encode();
    Fr::from_be_bytes_mod_order(keccak256(preimage).as_slice())
}

impl Aggregator for ZkAggregator {
    fn verification_type(&self) -> VerificationType {
        VerificationType::BlsBn254Zk
    }

    #[instrument(skip_all, fields(epoch = valset.epoch, key_tag = %key_tag, signatures = signatures.len()))]
    fn aggregate(
        &self,
        valset: &ValidatorSet,
        key_tag: KeyTag,
        message_hash: &[u8],
        signatures: &[Signature],
    ) -> AggregatorResult<AggregationProof> {
        if !key_tag.is_bls_bn254() {
            return Err(AggregatorError::UnsupportedKeyTag(key_tag));
        }
        check_message_hash(message_hash)?;
        check_signatures(key_tag, message_hash, signatures)?;
        if !valset.is_sorted_by_operator() {
            return Err(AggregatorError::UnsortedValidators);
        }

        let validators = Self::validators(valset, key_tag)?;
        let positions = validators
            .iter()
            .enumerate()
            .map(|(i, v)| (compress_g1(&v.key), i))
            .collect::<HashMap<_, _>>();

        let mut signers = vec![false; validators.len()];
        let mut signers_power = U256::ZERO;
        let mut aggregate_signature = G1Projective::default();
        let mut signers_key = G2Projective::default();
        for signature in signatures {
            let public_key = PublicKey::from_raw(&signature.public_key)?;
            let compressed = compress_g1(&public_key.g1());
            let index = match positions.get(&compressed) {
                Some(index) => *index,
                None if valset.find_validator_by_key(key_tag, &compressed).is_some() => {
                    debug!("skipping inactive signer");
                    continue;
                }
                None => return Err(AggregatorError::UnknownSigner),
            };
            if signers[index] {
                return Err(AggregatorError::DuplicateSigner(validators[index].operator));
            }
            signers[index] = true;

            signers_power = signers_power
                .checked_add(validators[index].voting_power)
                .ok_or(AggregatorError::VotingPowerOverflow)?;
            aggregate_signature += BlsSignature::from_bytes(&signature.signature)?.as_ref();
            signers_key += public_key.g2().into_group();
        }

        let input = ProveInput {
            validators,
            signers,
            message_point: HASH_TO_G1.hash(message_hash)?,
            signature: aggregate_signature.into_affine(),
            signers_key: signers_key.into_affine(),
        };
        let mut proof = self.prover.prove(&input).map_err(AggregatorError::Prover)?;
        proof.extend_from_slice(&signers_power.to_be_bytes::<WORD_LENGTH>());
        debug!(%signers_power, proof_len = proof.len(), "proved quorum");

        Ok(AggregationProof {
            message_hash: Bytes::copy_from_slice(message_hash),
            key_tag,
            epoch: valset.epoch,
            proof: proof.into(),
        })
    }

    #[instrument(skip_all, fields(epoch = valset.epoch, key_tag = %key_tag))]
    fn verify(
        &self,
        valset: &ValidatorSet,
        key_tag: KeyTag,
        proof: &AggregationProof,
    ) -> AggregatorResult<Verdict> {
        if !key_tag.is_bls_bn254() {
            return Err(AggregatorError::UnsupportedKeyTag(key_tag));
        }
        if proof.key_tag != key_tag {
            return Err(AggregatorError::KeyTagMismatch {
                expected: key_tag,
                actual: proof.key_tag,
            });
        }
        check_message_hash(&proof.message_hash)?;
        if proof.proof.len() < WORD_LENGTH {
            return Err(AggregatorError::InvalidProofLength(proof.proof.len()));
        }

        let (zk_proof, power_word) = proof.proof.split_at(proof.proof.len() - WORD_LENGTH);
        let signers_power = U256::from_be_slice(power_word);
        if signers_power < valset.quorum_threshold {
            let rejection = Rejection::QuorumNotReached {
                signers: signers_power,
                threshold: valset.quorum_threshold,
            };
            warn!(%rejection, "rejected proof");
            return Ok(Verdict::Rejected(rejection));
        }

        let validators = Self::validators(valset, key_tag)?;
        let commitment = self.commitment(&validators)?;
        let message_point = HASH_TO_G1.hash(&proof.message_hash)?;
        let input = public_input(commitment, signers_power, &message_point);

        let accepted = self
            .prover
            .verify(validators.len(), input, zk_proof)
            .map_err(AggregatorError::Prover)?;
        if accepted {
            Ok(Verdict::Valid)
        } else {
            warn!(rejection = %Rejection::ProofRejected, "rejected proof");
            Ok(Verdict::Rejected(Rejection::ProofRejected))
        }
    }

    fn generate_extra_data(
        &self,
        valset: &ValidatorSet,
        key_tags: &[KeyTag],
    ) -> AggregatorResult<Vec<ExtraData>> {
        let verification_type = self.verification_type();
        let mut entries = vec![ExtraData {
            key: global_key(verification_type, *TOTAL_ACTIVE_VALIDATORS_HASH),
            value: B256::from(U256::from(valset.total_active_validators())),
        }];
        for &key_tag in key_tags.iter().filter(|tag| tag.is_bls_bn254()) {
            let validators = Self::validators(valset, key_tag)?;
            entries.push(ExtraData {
                key: tagged_key(verification_type, key_tag, *VALIDATOR_SET_HASH_MIMC_HASH),
                value: self.commitment(&validators)?,
            });
        }
        Ok(sorted(entries))
    }
}

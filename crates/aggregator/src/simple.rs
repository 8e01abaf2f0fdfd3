use crate::error::{AggregatorError, AggregatorResult, Rejection, Verdict};
use crate::extra_data::{sorted, tagged_key, AGG_PUBLIC_KEY_G1_HASH, VALIDATOR_SET_HASH_KECCAK256_HASH};
use crate::proof::{decode_proof, encode_proof, ValidatorEntry};
use crate::validators::{
    process_validators, process_validators_with_key, total_voting_power, validators_hash,
};
use crate::{check_message_hash, check_signatures, Aggregator, VerificationType};

use alloy_primitives::{Bytes, B256, U256};
use ark_ec::{AffineRepr, CurveGroup};
use relay_bls::{
    compress_g1, hash_to_curve::try_and_increment::HASH_TO_G1, BLSError, G1Projective,
    G2Projective, PublicKey, Signature as BlsSignature,
};
use relay_valset::{AggregationProof, ExtraData, KeyTag, Signature, ValidatorSet};
use tracing::{debug, instrument, warn};

use std::collections::HashMap;

/// Aggregates BLS-BN254 signatures into the proof checked directly by the
/// settlement contracts. Holds no state and may be shared between threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleAggregator;

impl SimpleAggregator {
    pub fn new() -> Self {
        SimpleAggregator
    }
}

fn require_bls_tag(key_tag: KeyTag) -> AggregatorResult<()> {
    if key_tag.is_bls_bn254() {
        Ok(())
    } else {
        Err(AggregatorError::UnsupportedKeyTag(key_tag))
    }
}

impl Aggregator for SimpleAggregator {
    fn verification_type(&self) -> VerificationType {
        VerificationType::BlsBn254Simple
    }

    #[instrument(skip_all, fields(epoch = valset.epoch, key_tag = %key_tag, signatures = signatures.len()))]
    fn aggregate(
        &self,
        valset: &ValidatorSet,
        key_tag: KeyTag,
        message_hash: &[u8],
        signatures: &[Signature],
    ) -> AggregatorResult<AggregationProof> {
        require_bls_tag(key_tag)?;
        check_message_hash(message_hash)?;
        check_signatures(key_tag, message_hash, signatures)?;
        if !valset.is_sorted_by_operator() {
            return Err(AggregatorError::UnsortedValidators);
        }

        let validators = process_validators(&valset.validators, key_tag)?;
        if validators.len() > usize::from(u16::MAX) + 1 {
            return Err(AggregatorError::TooManyValidators(validators.len()));
        }

        let positions = validators
            .iter()
            .enumerate()
            .map(|(i, v)| (v.compressed_key, i))
            .collect::<HashMap<_, _>>();

        let mut signed = vec![false; validators.len()];
        let mut aggregate_signature = G1Projective::default();
        let mut aggregate_key = G2Projective::default();
        for signature in signatures {
            let public_key = PublicKey::from_raw(&signature.public_key)?;
            let compressed = compress_g1(&public_key.g1());
            let index = match positions.get(&B256::from(compressed)) {
                Some(index) => *index,
                None => match valset.find_validator_by_key(key_tag, &compressed) {
                    Some(validator) => {
                        debug!(operator = %validator.operator, "skipping inactive signer");
                        continue;
                    }
                    None => return Err(AggregatorError::UnknownSigner),
                },
            };
            if signed[index] {
                return Err(AggregatorError::DuplicateSigner(validators[index].operator));
            }
            signed[index] = true;

            aggregate_signature += BlsSignature::from_bytes(&signature.signature)?.as_ref();
            aggregate_key += public_key.g2().into_group();
        }

        let non_signers = signed
            .iter()
            .enumerate()
            .filter(|(_, signed)| !**signed)
            .map(|(index, _)| index as u16)
            .collect::<Vec<_>>();
        debug!(
            validators = validators.len(),
            signers = validators.len() - non_signers.len(),
            non_signers = non_signers.len(),
            "aggregated signatures"
        );

        let proof = encode_proof(
            &BlsSignature::from(aggregate_signature),
            &aggregate_key.into_affine(),
            &validators,
            &non_signers,
        );
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
        require_bls_tag(key_tag)?;
        if proof.key_tag != key_tag {
            return Err(AggregatorError::KeyTagMismatch {
                expected: key_tag,
                actual: proof.key_tag,
            });
        }
        check_message_hash(&proof.message_hash)?;

        let decoded = decode_proof(&proof.proof)?;
        let validators = process_validators(&valset.validators, key_tag)?;

        if validators_hash(&validators) != decoded.validators_hash {
            return Ok(reject(Rejection::ValidatorSetHashMismatch));
        }

        let mut non_signers_power = U256::ZERO;
        let mut non_signers_key = G1Projective::default();
        let mut previous: Option<u16> = None;
        for (position, &index) in decoded.non_signers.iter().enumerate() {
            let validator = validators.get(usize::from(index)).ok_or(
                AggregatorError::NonSignerIndexOutOfRange {
                    index,
                    len: validators.len(),
                },
            )?;
            if previous.map_or(false, |previous| index <= previous) {
                return Err(AggregatorError::NonSignersNotAscending(position));
            }
            previous = Some(index);

            non_signers_power = non_signers_power
                .checked_add(validator.voting_power)
                .ok_or(AggregatorError::VotingPowerOverflow)?;
            non_signers_key += validator.key.into_group();
        }

        if decoded.validators.len() != validators.len() {
            return Ok(reject(Rejection::ValidatorMismatch {
                index: decoded.validators.len().min(validators.len()),
            }));
        }
        if let Some(index) = validators
            .iter()
            .zip(&decoded.validators)
            .position(|(expected, parsed)| ValidatorEntry::from(expected) != *parsed)
        {
            return Ok(reject(Rejection::ValidatorMismatch { index }));
        }

        let total = total_voting_power(&validators)?;
        let signers_power = total.saturating_sub(non_signers_power);
        if signers_power < valset.quorum_threshold {
            return Ok(reject(Rejection::QuorumNotReached {
                signers: signers_power,
                threshold: valset.quorum_threshold,
            }));
        }

        let aggregated_key = validators
            .iter()
            .map(|v| v.key.into_group())
            .sum::<G1Projective>();
        let signers_key_g1 = (aggregated_key - non_signers_key).into_affine();

        match decoded.signature.verify_hash(
            &proof.message_hash,
            &signers_key_g1,
            &decoded.signers_key,
            &HASH_TO_G1,
        ) {
            Ok(()) => {
                debug!(signers_power = %signers_power, "proof verified");
                Ok(Verdict::Valid)
            }
            Err(BLSError::VerificationFailed) => Ok(reject(Rejection::PairingFailed)),
            Err(err) => Err(err.into()),
        }
    }

    fn generate_extra_data(
        &self,
        valset: &ValidatorSet,
        key_tags: &[KeyTag],
    ) -> AggregatorResult<Vec<ExtraData>> {
        let verification_type = self.verification_type();
        let mut entries = Vec::new();
        for &key_tag in key_tags.iter().filter(|tag| tag.is_bls_bn254()) {
            let validators = process_validators_with_key(&valset.validators, key_tag)?;
            let aggregated_key = validators
                .iter()
                .map(|v| v.key.into_group())
                .sum::<G1Projective>()
                .into_affine();

            entries.push(ExtraData {
                key: tagged_key(verification_type, key_tag, *VALIDATOR_SET_HASH_KECCAK256_HASH),
                value: validators_hash(&validators),
            });
            entries.push(ExtraData {
                key: tagged_key(verification_type, key_tag, *AGG_PUBLIC_KEY_G1_HASH),
                value: B256::from(compress_g1(&aggregated_key)),
            });
        }
        Ok(sorted(entries))
    }
}

fn reject(rejection: Rejection) -> Verdict {
    warn!(%rejection, "rejected proof");
    Verdict::Rejected(rejection)
}

#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, B256, U256};
use relay_bls::{
    hash_to_curve::try_and_increment::HASH_TO_G1,
    test_helpers::{keygen_mul, rng},
    PrivateKey,
};
use relay_valset::{
    quorum_threshold, KeyTag, Signature, Status, Validator, ValidatorKey, ValidatorSet,
    VALSET_VERSION,
};

pub const KEY_TAG: KeyTag = KeyTag(15);
pub const EPOCH: u64 = 42;

pub fn message_hash(byte: u8) -> [u8; 32] {
    [byte; 32]
}

/// A validator set of `powers.len()` active validators, sorted by operator, and
/// their secret keys in the same order
pub fn generate_valset(powers: &[u64]) -> (ValidatorSet, Vec<PrivateKey>) {
    let keys = keygen_mul(&mut rng(), powers.len());
    let validators = keys
        .iter()
        .zip(powers)
        .enumerate()
        .map(|(i, (sk, power))| Validator {
            operator: Address::with_last_byte(i as u8 + 1),
            voting_power: U256::from(*power),
            is_active: true,
            keys: vec![ValidatorKey {
                tag: KEY_TAG,
                payload: Bytes::from(sk.to_public().on_chain().to_vec()),
            }],
            vaults: vec![],
        })
        .collect::<Vec<_>>();
    let total = validators
        .iter()
        .fold(U256::ZERO, |acc, v| acc + v.voting_power);

    let valset = ValidatorSet {
        version: VALSET_VERSION,
        required_key_tag: KEY_TAG,
        epoch: EPOCH,
        capture_timestamp: 1_700_000_000,
        quorum_threshold: quorum_threshold(total),
        validators,
        previous_header_hash: B256::ZERO,
        status: Status::HeaderPending,
    };
    (valset, keys)
}

/// The signature a validator gossips for `message_hash`
pub fn sign(sk: &PrivateKey, message_hash: &[u8]) -> Signature {
    let signature = sk.sign(message_hash, &HASH_TO_G1).unwrap();
    Signature {
        message_hash: Bytes::copy_from_slice(message_hash),
        key_tag: KEY_TAG,
        epoch: EPOCH,
        signature: Bytes::from(signature.to_bytes().to_vec()),
        public_key: Bytes::from(sk.to_public().to_raw()),
    }
}

/// Signatures of every key whose index is not in `absent`
pub fn sign_except(keys: &[PrivateKey], message_hash: &[u8], absent: &[usize]) -> Vec<Signature> {
    keys.iter()
        .enumerate()
        .filter(|(i, _)| !absent.contains(i))
        .map(|(_, sk)| sign(sk, message_hash))
        .collect()
}

//! Keys of the auxiliary values committed alongside a validator set header.
//!
//! A global key is `keccak256(abi.encode(uint32 verificationType, bytes32 name))`,
//! a per-tag key is
//! `keccak256(abi.encode(uint32 verificationType, bytes32 keccak256("keyTag."), uint8 keyTag, bytes32 name))`.

use crate::VerificationType;

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::{sol_data, SolType, SolValue};
use once_cell::sync::Lazy;
use relay_valset::{ExtraData, KeyTag};

pub static KEY_TAG_PREFIX_HASH: Lazy<B256> = Lazy::new(|| keccak256("keyTag."));

pub static VALIDATOR_SET_HASH_KECCAK256_HASH: Lazy<B256> =
    Lazy::new(|| keccak256("validatorSetHashKeccak256"));

pub static AGG_PUBLIC_KEY_G1_HASH: Lazy<B256> = Lazy::new(|| keccak256("aggPublicKeyG1"));

pub static TOTAL_ACTIVE_VALIDATORS_HASH: Lazy<B256> =
    Lazy::new(|| keccak256("totalActiveValidators"));

pub static VALIDATOR_SET_HASH_MIMC_HASH: Lazy<B256> =
    Lazy::new(|| keccak256("validatorSetHashMimc"));

pub fn global_key(verification_type: VerificationType, name_hash: B256) -> B256 {
    keccak256((verification_type.as_u32(), name_hash).abi_encode())
}

pub fn tagged_key(verification_type: VerificationType, key_tag: KeyTag, name_hash: B256) -> B256 {
    keccak256(<(
        sol_data::Uint<32>,
        sol_data::FixedBytes<32>,
        sol_data::Uint<8>,
        sol_data::FixedBytes<32>,
    ) as SolType>::abi_encode(&(
        verification_type.as_u32(),
        *KEY_TAG_PREFIX_HASH,
        key_tag.0,
        name_hash,
    )))
}

/// Orders entries ascending by key, as the settlement contract expects
pub(crate) fn sorted(mut entries: Vec<ExtraData>) -> Vec<ExtraData> {
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    entries
}

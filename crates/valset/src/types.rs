use crate::error::{ValsetError, ValsetResult};
use crate::header::ValidatorSetHeader;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Version of the validator set header format
pub const VALSET_VERSION: u8 = 1;

/// Family of a key, stored in the upper nibble of its tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    BlsBn254,
    EcdsaSecp256k1,
}

impl KeyType {
    pub fn from_u8(value: u8) -> Option<KeyType> {
        match value {
            0 => Some(KeyType::BlsBn254),
            1 => Some(KeyType::EcdsaSecp256k1),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            KeyType::BlsBn254 => 0,
            KeyType::EcdsaSecp256k1 => 1,
        }
    }
}

/// Identifies a key slot: the upper nibble is the [`KeyType`], the lower nibble the
/// instance id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyTag(pub u8);

impl KeyTag {
    pub fn new(key_type: KeyType, id: u8) -> KeyTag {
        KeyTag((key_type.as_u8() << 4) | (id & 0x0f))
    }

    /// `None` when the upper nibble names no known key type
    pub fn key_type(self) -> Option<KeyType> {
        KeyType::from_u8(self.0 >> 4)
    }

    pub fn id(self) -> u8 {
        self.0 & 0x0f
    }

    pub fn is_bls_bn254(self) -> bool {
        self.key_type() == Some(KeyType::BlsBn254)
    }
}

impl fmt::Display for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key registered by an operator. For BLS-BN254 tags the payload is the 32-byte
/// compressed G1 point.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorKey {
    pub tag: KeyTag,
    pub payload: Bytes,
}

/// Voting power an operator holds through a single vault
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub chain_id: u64,
    pub vault: Address,
    pub voting_power: U256,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    pub operator: Address,
    /// Sum over all vaults, clamped to the network maximum once active
    pub voting_power: U256,
    pub is_active: bool,
    pub keys: Vec<ValidatorKey>,
    /// Ascending by vault address
    pub vaults: Vec<Vault>,
}

impl Validator {
    pub fn find_key_by_tag(&self, tag: KeyTag) -> Option<&ValidatorKey> {
        self.keys.iter().find(|key| key.tag == tag)
    }
}

/// Commitment status of an epoch's header on the settlement chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The header for this epoch is on-chain and matches the derived one
    HeaderCommitted,
    /// Not committed yet, and no later epoch has been committed either
    HeaderPending,
    /// A later epoch was committed first, this one will never be
    HeaderMissed,
}

/// The canonical validator set of an epoch.
///
/// Validators are ordered by ascending operator address. Two sets derived for the
/// same epoch from the same chain state are identical.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSet {
    pub version: u8,
    pub required_key_tag: KeyTag,
    pub epoch: u64,
    pub capture_timestamp: u64,
    pub quorum_threshold: U256,
    pub validators: Vec<Validator>,
    pub previous_header_hash: B256,
    pub status: Status,
}

impl ValidatorSet {
    pub fn active_validators(&self) -> impl Iterator<Item = &Validator> {
        self.validators.iter().filter(|v| v.is_active)
    }

    /// Fails with [`ValsetError::VotingPowerOverflow`] naming the validator whose
    /// power no longer fits
    pub fn total_active_voting_power(&self) -> ValsetResult<U256> {
        self.active_validators().try_fold(U256::ZERO, |acc, v| {
            acc.checked_add(v.voting_power)
                .ok_or(ValsetError::VotingPowerOverflow(v.operator))
        })
    }

    pub fn total_active_validators(&self) -> usize {
        self.active_validators().count()
    }

    /// Finds the validator owning the key with this tag and payload
    pub fn find_validator_by_key(&self, tag: KeyTag, payload: &[u8]) -> Option<&Validator> {
        self.validators.iter().find(|v| {
            v.find_key_by_tag(tag)
                .map(|key| &key.payload[..] == payload)
                .unwrap_or(false)
        })
    }

    /// Whether operators are strictly ascending
    pub fn is_sorted_by_operator(&self) -> bool {
        self.validators
            .windows(2)
            .all(|pair| pair[0].operator < pair[1].operator)
    }

    pub fn header(&self) -> ValsetResult<ValidatorSetHeader> {
        ValidatorSetHeader::from_validator_set(self)
    }

    pub fn header_hash(&self) -> ValsetResult<B256> {
        Ok(self.header()?.hash())
    }
}

/// `floor(2 * total / 3) + 1`, computed without overflowing 256 bits
pub fn quorum_threshold(total_voting_power: U256) -> U256 {
    let three = U256::from(3u8);
    let two = U256::from(2u8);
    let (q, r) = (total_voting_power / three, total_voting_power % three);
    q * two + (r * two) / three + U256::from(1u8)
}

/// A validator's signature over a message hash, as gossiped between nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub message_hash: Bytes,
    pub key_tag: KeyTag,
    pub epoch: u64,
    pub signature: Bytes,
    /// Raw form of the signer's key; for BLS-BN254 the 192-byte `G1 ‖ G2` encoding
    pub public_key: Bytes,
}

/// The aggregated quorum proof handed to the settlement contracts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationProof {
    pub message_hash: Bytes,
    pub key_tag: KeyTag,
    pub epoch: u64,
    pub proof: Bytes,
}

/// A 32-byte key/value pair committed next to the header
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtraData {
    pub key: B256,
    pub value: B256,
}

//! SSZ `hash_tree_root` of the validator list.
//!
//! Only the root is computed. The settlement contracts recompute it from the same
//! layout:
//!
//! ```text
//! Key       { tag: uint8, payloadHash: bytes32 }
//! Vault     { chainId: uint64, vault: address, votingPower: uint256 }
//! Validator { operator: address, votingPower: uint256, isActive: bool,
//!             keys: List[Key, 128], vaults: List[Vault, 1024] }
//! Validators = List[Validator, 1048576]
//! ```

use crate::error::{ValsetError, ValsetResult};
use crate::types::{Validator, ValidatorKey, Vault};

use alloy_primitives::{keccak256, Address, B256, U256};
use ssz_types::VariableList;
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;
use typenum::{Unsigned, U1024, U1048576, U128};

#[derive(Debug, Clone, TreeHash)]
struct SszKey {
    tag: u8,
    payload_hash: B256,
}

#[derive(Debug, Clone, TreeHash)]
struct SszVault {
    chain_id: u64,
    vault: Address,
    voting_power: U256,
}

#[derive(Debug, Clone, TreeHash)]
struct SszValidator {
    operator: Address,
    voting_power: U256,
    is_active: bool,
    keys: VariableList<SszKey, U128>,
    vaults: VariableList<SszVault, U1024>,
}

fn bounded<T, N: Unsigned>(list: &'static str, items: Vec<T>) -> ValsetResult<VariableList<T, N>> {
    let len = items.len();
    VariableList::new(items).map_err(|_| ValsetError::ListTooLong {
        list,
        len,
        limit: N::to_usize(),
    })
}

impl From<&ValidatorKey> for SszKey {
    fn from(key: &ValidatorKey) -> Self {
        SszKey {
            tag: key.tag.0,
            payload_hash: keccak256(&key.payload),
        }
    }
}

impl From<&Vault> for SszVault {
    fn from(vault: &Vault) -> Self {
        SszVault {
            chain_id: vault.chain_id,
            vault: vault.vault,
            voting_power: vault.voting_power,
        }
    }
}

impl TryFrom<&Validator> for SszValidator {
    type Error = ValsetError;

    fn try_from(validator: &Validator) -> ValsetResult<Self> {
        Ok(SszValidator {
            operator: validator.operator,
            voting_power: validator.voting_power,
            is_active: validator.is_active,
            keys: bounded("keys", validator.keys.iter().map(SszKey::from).collect())?,
            vaults: bounded("vaults", validator.vaults.iter().map(SszVault::from).collect())?,
        })
    }
}

/// `hash_tree_root(List[Validator, 1048576])`
pub fn validators_root(validators: &[Validator]) -> ValsetResult<B256> {
    let list = validators
        .iter()
        .map(SszValidator::try_from)
        .collect::<ValsetResult<Vec<_>>>()?;
    let list: VariableList<SszValidator, U1048576> = bounded("validators", list)?;
    Ok(list.tree_hash_root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyTag;
    use alloy_primitives::Bytes;
    use sha2::{Digest, Sha256};

    fn sha256_pair(left: &[u8], right: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }

    fn validator() -> Validator {
        Validator {
            operator: Address::repeat_byte(0xaa),
            voting_power: U256::from(1000u64),
            is_active: true,
            keys: vec![ValidatorKey {
                tag: KeyTag(15),
                payload: Bytes::from(vec![7u8; 32]),
            }],
            vaults: vec![Vault {
                chain_id: 1,
                vault: Address::repeat_byte(0xbb),
                voting_power: U256::from(1000u64),
            }],
        }
    }

    #[test]
    fn empty_list_is_zero_subtree_with_length() {
        let mut zero = [0u8; 32];
        for _ in 0..20 {
            zero = sha256_pair(&zero, &zero);
        }
        let expected = sha256_pair(&zero, &[0u8; 32]);
        assert_eq!(validators_root(&[]).unwrap(), B256::from(expected));
    }

    #[test]
    fn key_is_a_two_field_container() {
        let key = ValidatorKey {
            tag: KeyTag(15),
            payload: Bytes::from(vec![7u8; 32]),
        };
        let mut tag_chunk = [0u8; 32];
        tag_chunk[0] = 15;
        let expected = sha256_pair(&tag_chunk, keccak256(&key.payload).as_slice());
        assert_eq!(SszKey::from(&key).tree_hash_root(), B256::from(expected));
    }

    #[test]
    fn address_and_uints_are_left_aligned() {
        let vault = Vault {
            chain_id: 0x0102,
            vault: Address::repeat_byte(0xbb),
            voting_power: U256::from(3u8),
        };
        let mut chain_id = [0u8; 32];
        chain_id[..2].copy_from_slice(&[0x02, 0x01]);
        let mut address = [0u8; 32];
        address[..20].copy_from_slice(vault.vault.as_slice());
        let mut power = [0u8; 32];
        power[0] = 3;

        // three fields padded to four leaves
        let expected = sha256_pair(
            &sha256_pair(&chain_id, &address),
            &sha256_pair(&power, &[0u8; 32]),
        );
        assert_eq!(SszVault::from(&vault).tree_hash_root(), B256::from(expected));
    }

    #[test]
    fn root_commits_to_every_field() {
        let validator = validator();
        let root = validators_root(&[validator.clone()]).unwrap();
        assert_eq!(root, validators_root(&[validator.clone()]).unwrap());

        let mut inactive = validator.clone();
        inactive.is_active = false;
        assert_ne!(root, validators_root(&[inactive]).unwrap());

        let mut other_key = validator.clone();
        other_key.keys[0].payload = Bytes::from(vec![8u8; 32]);
        assert_ne!(root, validators_root(&[other_key]).unwrap());

        let mut other_chain = validator.clone();
        other_chain.vaults[0].chain_id = 2;
        assert_ne!(root, validators_root(&[other_chain]).unwrap());

        assert_ne!(root, validators_root(&[validator.clone(), validator]).unwrap());
    }

    #[test]
    fn list_limits_are_enforced() {
        let mut validator = validator();
        validator.keys = vec![validator.keys[0].clone(); 129];
        assert!(matches!(
            validators_root(&[validator]),
            Err(ValsetError::ListTooLong {
                list: "keys",
                len: 129,
                limit: 128
            })
        ));
    }
}

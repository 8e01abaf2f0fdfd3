use crate::error::{ValsetError, ValsetResult};
use crate::types::KeyTag;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use std::fmt;

/// A contract address qualified by the chain it lives on
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainAddress {
    pub chain_id: u64,
    pub address: Address,
}

impl fmt::Display for CrossChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.address, self.chain_id)
    }
}

/// Network-wide parameters read from the driver contract for an epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub voting_power_providers: Vec<CrossChainAddress>,
    pub keys_provider: CrossChainAddress,
    #[serde(default)]
    pub settlements: Vec<CrossChainAddress>,
    /// 0 selects the ZK verifier, 1 the simple one
    pub verification_type: u32,
    /// 0 disables the cap
    pub max_voting_power: U256,
    pub min_inclusion_voting_power: U256,
    /// 0 disables the limit
    pub max_validators_count: U256,
    #[serde(default)]
    pub required_key_tags: Vec<KeyTag>,
    #[serde(default)]
    pub num_aggregators: u64,
    #[serde(default)]
    pub num_committers: u64,
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> ValsetResult<NetworkConfig> {
        let config: NetworkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ValsetResult<()> {
        if self.voting_power_providers.is_empty() {
            return Err(ValsetError::InvalidConfig(
                "at least one voting power provider is required".to_owned(),
            ));
        }
        Ok(())
    }
}

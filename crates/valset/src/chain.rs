//! Interfaces to the on-chain collaborators the deriver reads from. Implementations
//! live with the RPC layer. Every call is a blocking read of finalized state.

use crate::config::CrossChainAddress;
use crate::types::{KeyTag, ValidatorKey};

use alloy_primitives::{Address, B256, U256};

/// Voting power an operator holds in one vault of a provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultVotingPower {
    pub vault: Address,
    pub voting_power: U256,
}

/// Voting powers reported by a provider for one operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorVotingPower {
    pub operator: Address,
    pub vaults: Vec<VaultVotingPower>,
}

/// Keys registered by one operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorWithKeys {
    pub operator: Address,
    pub keys: Vec<ValidatorKey>,
}

/// Read access to the driver, provider, key registry and settlement contracts.
pub trait EvmClient {
    /// Capture timestamp of `epoch`
    fn get_epoch_start(&self, epoch: u64) -> anyhow::Result<u64>;

    fn get_voting_powers(
        &self,
        provider: &CrossChainAddress,
        timestamp: u64,
    ) -> anyhow::Result<Vec<OperatorVotingPower>>;

    fn get_keys(
        &self,
        provider: &CrossChainAddress,
        timestamp: u64,
    ) -> anyhow::Result<Vec<OperatorWithKeys>>;

    fn get_required_key_tag(&self, timestamp: u64) -> anyhow::Result<KeyTag>;

    fn is_header_committed_at(&self, epoch: u64) -> anyhow::Result<bool>;

    fn get_header_hash_at(&self, epoch: u64) -> anyhow::Result<B256>;

    fn get_previous_header_hash_at(&self, epoch: u64) -> anyhow::Result<B256>;

    fn get_last_committed_header_epoch(&self) -> anyhow::Result<u64>;

    fn get_latest_header_hash(&self) -> anyhow::Result<B256>;
}

impl<T: EvmClient + ?Sized> EvmClient for &T {
    fn get_epoch_start(&self, epoch: u64) -> anyhow::Result<u64> {
        (**self).get_epoch_start(epoch)
    }

    fn get_voting_powers(
        &self,
        provider: &CrossChainAddress,
        timestamp: u64,
    ) -> anyhow::Result<Vec<OperatorVotingPower>> {
        (**self).get_voting_powers(provider, timestamp)
    }

    fn get_keys(
        &self,
        provider: &CrossChainAddress,
        timestamp: u64,
    ) -> anyhow::Result<Vec<OperatorWithKeys>> {
        (**self).get_keys(provider, timestamp)
    }

    fn get_required_key_tag(&self, timestamp: u64) -> anyhow::Result<KeyTag> {
        (**self).get_required_key_tag(timestamp)
    }

    fn is_header_committed_at(&self, epoch: u64) -> anyhow::Result<bool> {
        (**self).is_header_committed_at(epoch)
    }

    fn get_header_hash_at(&self, epoch: u64) -> anyhow::Result<B256> {
        (**self).get_header_hash_at(epoch)
    }

    fn get_previous_header_hash_at(&self, epoch: u64) -> anyhow::Result<B256> {
        (**self).get_previous_header_hash_at(epoch)
    }

    fn get_last_committed_header_epoch(&self) -> anyhow::Result<u64> {
        (**self).get_last_committed_header_epoch()
    }

    fn get_latest_header_hash(&self) -> anyhow::Result<B256> {
        (**self).get_latest_header_hash()
    }
}

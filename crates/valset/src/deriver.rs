use crate::chain::EvmClient;
use crate::config::NetworkConfig;
use crate::error::{ValsetError, ValsetResult};
use crate::types::{quorum_threshold, Status, Validator, ValidatorSet, Vault, VALSET_VERSION};

use alloy_primitives::{Address, B256, U256};
use anyhow::Context;
use tracing::{debug, instrument};

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Builds canonical validator sets from chain state.
#[derive(Clone, Debug)]
pub struct Deriver<C> {
    client: C,
}

impl<C: EvmClient> Deriver<C> {
    pub fn new(client: C) -> Self {
        Deriver { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Derives the validator set of `epoch` and classifies its commitment status.
    ///
    /// Fails without returning a partial set if any chain call fails, and with
    /// [`ValsetError::HeaderHashMismatch`] if the header committed for `epoch` is not
    /// the one derived here.
    #[instrument(skip(self, config))]
    pub fn get_validator_set(&self, epoch: u64, config: &NetworkConfig) -> ValsetResult<ValidatorSet> {
        config.validate()?;

        let timestamp = self
            .client
            .get_epoch_start(epoch)
            .with_context(|| format!("failed to get start of epoch {}", epoch))?;
        let required_key_tag = self
            .client
            .get_required_key_tag(timestamp)
            .context("failed to get required key tag")?;

        let mut validators = self.collect_validators(config, timestamp)?;
        let total = select_active(&mut validators, config)?;
        validators.sort_by(|a, b| a.operator.cmp(&b.operator));

        let mut valset = ValidatorSet {
            version: VALSET_VERSION,
            required_key_tag,
            epoch,
            capture_timestamp: timestamp,
            quorum_threshold: quorum_threshold(total),
            validators,
            previous_header_hash: B256::ZERO,
            status: Status::HeaderPending,
        };
        debug!(
            validators = valset.validators.len(),
            active = valset.total_active_validators(),
            %total,
            quorum = %valset.quorum_threshold,
            "selected validators"
        );

        self.classify(&mut valset)?;
        Ok(valset)
    }

    /// Merges voting powers across providers and attaches registered keys.
    fn collect_validators(
        &self,
        config: &NetworkConfig,
        timestamp: u64,
    ) -> ValsetResult<Vec<Validator>> {
        // operator -> (vault, chain id) -> voting power
        let mut powers: BTreeMap<Address, BTreeMap<(Address, u64), U256>> = BTreeMap::new();
        for provider in &config.voting_power_providers {
            let reported = self
                .client
                .get_voting_powers(provider, timestamp)
                .with_context(|| format!("failed to get voting powers from {}", provider))?;
            for operator in reported {
                let vaults = powers.entry(operator.operator).or_default();
                for vault in operator.vaults {
                    let entry = vaults
                        .entry((vault.vault, provider.chain_id))
                        .or_insert(U256::ZERO);
                    *entry = entry
                        .checked_add(vault.voting_power)
                        .ok_or(ValsetError::VotingPowerOverflow(operator.operator))?;
                }
            }
        }

        let mut keys = BTreeMap::new();
        let registered = self
            .client
            .get_keys(&config.keys_provider, timestamp)
            .with_context(|| format!("failed to get keys from {}", config.keys_provider))?;
        for operator in registered {
            let mut operator_keys = operator.keys;
            operator_keys.sort_by_key(|key| key.tag);
            keys.insert(operator.operator, operator_keys);
        }

        powers
            .into_iter()
            .map(|(operator, vaults)| {
                let vaults = vaults
                    .into_iter()
                    .map(|((vault, chain_id), voting_power)| Vault {
                        chain_id,
                        vault,
                        voting_power,
                    })
                    .collect::<Vec<_>>();
                let voting_power = vaults
                    .iter()
                    .try_fold(U256::ZERO, |acc, v| acc.checked_add(v.voting_power))
                    .ok_or(ValsetError::VotingPowerOverflow(operator))?;
                Ok(Validator {
                    operator,
                    voting_power,
                    is_active: false,
                    keys: keys.remove(&operator).unwrap_or_default(),
                    vaults,
                })
            })
            .collect()
    }

    fn classify(&self, valset: &mut ValidatorSet) -> ValsetResult<()> {
        let epoch = valset.epoch;
        let committed = self
            .client
            .is_header_committed_at(epoch)
            .context("failed to check header commitment")?;

        if committed {
            let committed_hash = self
                .client
                .get_header_hash_at(epoch)
                .context("failed to get committed header hash")?;
            let derived_hash = valset.header_hash()?;
            if committed_hash != derived_hash {
                return Err(ValsetError::HeaderHashMismatch {
                    epoch,
                    committed: committed_hash,
                    derived: derived_hash,
                });
            }
            valset.previous_header_hash = self
                .client
                .get_previous_header_hash_at(epoch)
                .context("failed to get previous header hash")?;
            valset.status = Status::HeaderCommitted;
            return Ok(());
        }

        let last_committed = self
            .client
            .get_last_committed_header_epoch()
            .context("failed to get last committed epoch")?;
        if last_committed > epoch {
            valset.previous_header_hash = B256::ZERO;
            valset.status = Status::HeaderMissed;
        } else {
            valset.previous_header_hash = self
                .client
                .get_latest_header_hash()
                .context("failed to get latest header hash")?;
            valset.status = Status::HeaderPending;
        }
        debug!(status = ?valset.status, "classified epoch");
        Ok(())
    }
}

/// Orders by voting power descending, ties by operator ascending.
fn by_power(a: &Validator, b: &Validator) -> Ordering {
    match b.voting_power.cmp(&a.voting_power) {
        Ordering::Equal => a.operator.cmp(&b.operator),
        ordering => ordering,
    }
}

/// Marks the admitted validators active and returns their total voting power.
///
/// Walks validators from the most powerful down. A validator without keys is
/// skipped. The walk stops at the first one below the inclusion minimum or once
/// the maximum count is admitted. Admitted voting power is clamped to the cap.
pub fn select_active(validators: &mut [Validator], config: &NetworkConfig) -> ValsetResult<U256> {
    validators.sort_by(by_power);

    let mut total = U256::ZERO;
    let mut admitted = U256::ZERO;
    for validator in validators.iter_mut() {
        if validator.voting_power < config.min_inclusion_voting_power {
            break;
        }
        if validator.keys.is_empty() {
            continue;
        }

        validator.is_active = true;
        if !config.max_voting_power.is_zero() && validator.voting_power > config.max_voting_power {
            validator.voting_power = config.max_voting_power;
        }
        total = total
            .checked_add(validator.voting_power)
            .ok_or(ValsetError::VotingPowerOverflow(validator.operator))?;

        admitted += U256::from(1u8);
        if !config.max_validators_count.is_zero() && admitted >= config.max_validators_count {
            break;
        }
    }
    Ok(total)
}

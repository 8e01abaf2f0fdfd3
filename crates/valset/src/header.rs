use crate::error::{ValsetError, ValsetResult};
use crate::ssz::validators_root;
use crate::types::ValidatorSet;

use alloy_primitives::{aliases::U48, keccak256, B256};
use alloy_sol_types::{sol, SolValue};

sol! {
    /// The header the settlement contracts store for every committed epoch.
    #[derive(Debug, PartialEq, Eq)]
    struct ValidatorSetHeader {
        uint8 version;
        uint8 requiredKeyTag;
        uint48 epoch;
        uint48 captureTimestamp;
        uint256 quorumThreshold;
        uint256 totalVotingPower;
        bytes32 validatorsSszMRoot;
    }
}

fn uint48(field: &'static str, value: u64) -> ValsetResult<U48> {
    U48::try_from(value).map_err(|_| ValsetError::HeaderFieldOverflow { field, value })
}

impl ValidatorSetHeader {
    pub fn from_validator_set(valset: &ValidatorSet) -> ValsetResult<Self> {
        Ok(ValidatorSetHeader {
            version: valset.version,
            requiredKeyTag: valset.required_key_tag.0,
            epoch: uint48("epoch", valset.epoch)?,
            captureTimestamp: uint48("captureTimestamp", valset.capture_timestamp)?,
            quorumThreshold: valset.quorum_threshold,
            totalVotingPower: valset.total_active_voting_power()?,
            validatorsSszMRoot: validators_root(&valset.validators)?,
        })
    }

    /// `keccak256(abi.encode(header))`
    pub fn hash(&self) -> B256 {
        keccak256(self.abi_encode())
    }
}

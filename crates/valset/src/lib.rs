//! # Validator Set Derivation
//!
//! Derives the canonical validator set of an epoch from on-chain voting powers and
//! keys, computes its quorum threshold and header hash, and classifies whether
//! the epoch's header has been committed to the settlement chain.
//!
//! Chain access goes through the [`EvmClient`] trait; this crate makes no RPC calls
//! itself.

/// Collaborator interfaces
pub mod chain;
pub use chain::{EvmClient, OperatorVotingPower, OperatorWithKeys, VaultVotingPower};

/// Network configuration
pub mod config;
pub use config::{CrossChainAddress, NetworkConfig};

mod deriver;
pub use deriver::{select_active, Deriver};

mod error;
pub use error::{ValsetError, ValsetResult};

/// Validator set header and its hash
pub mod header;
pub use header::ValidatorSetHeader;

/// SSZ merkleization of the validator list
pub mod ssz;

mod types;
pub use types::{
    quorum_threshold, AggregationProof, ExtraData, KeyTag, KeyType, Signature, Status, Validator,
    ValidatorKey, ValidatorSet, Vault, VALSET_VERSION,
};

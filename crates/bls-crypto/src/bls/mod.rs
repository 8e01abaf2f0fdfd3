/// Implements BLS multi-signatures as verified by the BN254 settlement contracts.
/// Without proofs of possession, aggregate keys are protected against rogue-key
/// attacks by the randomized pairing check in [`Signature::verify_hash`].
mod secret;
pub use secret::PrivateKey;

mod public;
pub use public::{PublicKey, RAW_PUBLIC_KEY_LENGTH};

mod signature;
pub use signature::{verification_alpha, Signature};

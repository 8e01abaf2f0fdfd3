//! # BLS Cryptography over BN254
//!
//! This crate implements the BLS signature primitives consumed by the on-chain
//! BN254 verifier: signatures and one public key representation live in G1, the
//! second public key representation lives in G2.
//!
//! Every byte layout produced here (uncompressed points, compressed G1 keys, the
//! hash-to-G1 mapping and the randomized pairing check) matches what an EVM
//! contract computes with the `ecAdd`/`ecMul`/`ecPairing` precompiles.

/// BLS signing
pub(crate) mod bls;
pub use bls::{verification_alpha, PrivateKey, PublicKey, Signature, RAW_PUBLIC_KEY_LENGTH};

/// Canonical 32-byte compression of G1 points
pub mod compression;
pub use compression::{compress_g1, decompress_g1, COMPRESSED_G1_LENGTH};

/// EVM word encodings of field elements and curve points
pub mod encoding;

/// Hashing to curve utilities
pub mod hash_to_curve;
pub use hash_to_curve::HashToCurve;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use ark_bn254::{Fq, Fr, G1Affine, G1Projective, G2Affine, G2Projective};

use thiserror::Error;

/// Convenience result alias
pub type BlsResult<T> = std::result::Result<T, BLSError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Error type
pub enum BLSError {
    /// The pairing equation did not hold
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("could not hash to curve after {0} attempts")]
    HashToCurveError(usize),
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// A 32-byte word was not a canonical field element (it was `>= p`)
    #[error("field element is not reduced modulo the base field")]
    InvalidFieldElement,
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime order subgroup")]
    NotInSubgroup,
    #[error("compressed point does not decompress to a curve point")]
    DecompressionFailed,
}

//! Compression of G1 points into a single 32-byte word.
//!
//! A point `(X, Y)` is packed as `2 * X + flag`, where `flag` is set when `Y` differs
//! from the root the verifier contract derives for `X`, namely
//! `(X^3 + 3)^((p + 1) / 4) mod p`. Decompression recomputes that root and negates
//! it when the flag is set, so both directions agree bit for bit with the contract.
//!
//! `3` is a quadratic non-residue modulo `p`, so no curve point has `X = 0`. The
//! all-zero word is therefore free and is used for the point at infinity.

use crate::encoding::{fq_from_u256, fq_to_u256};
use crate::{BLSError, BlsResult};

use alloy_primitives::U256;
use ark_bn254::{Fq, G1Affine};
use ark_ec::AffineRepr;
use ark_ff::{Field, PrimeField};
use once_cell::sync::Lazy;

/// Length of a compressed G1 point
pub const COMPRESSED_G1_LENGTH: usize = 32;

/// The BN254 base field modulus
pub static FP_MODULUS: Lazy<U256> = Lazy::new(|| U256::from_limbs(Fq::MODULUS.0));

/// `(p + 1) / 4`, the square root exponent for `p ≡ 3 (mod 4)`
static SQRT_EXPONENT: Lazy<U256> = Lazy::new(|| (*FP_MODULUS + U256::from(1u8)) >> 2usize);

/// Returns `(beta, y)` with `beta = x^3 + 3` and `y = beta^((p + 1) / 4)`. `y` is a
/// square root of `beta` only when `beta` is a quadratic residue.
pub fn find_y_from_x(x: &Fq) -> (Fq, Fq) {
    let beta = x.square() * x + Fq::from(3u64);
    let y = beta.pow(SQRT_EXPONENT.as_limbs());
    (beta, y)
}

/// Compresses a G1 point into its canonical 32-byte big-endian form.
pub fn compress_g1(point: &G1Affine) -> [u8; COMPRESSED_G1_LENGTH] {
    if point.is_zero() {
        return [0u8; COMPRESSED_G1_LENGTH];
    }
    let (_, derived_y) = find_y_from_x(&point.x);
    let flag = if point.y == derived_y { 0u8 } else { 1u8 };

    // x < p < 2^254, the doubling cannot overflow
    let compressed = (fq_to_u256(&point.x) << 1usize) + U256::from(flag);
    compressed.to_be_bytes::<COMPRESSED_G1_LENGTH>()
}

/// Inverse of [`compress_g1`]. Fails when the encoded `X` is not reduced or has no
/// corresponding point on the curve.
pub fn decompress_g1(bytes: &[u8]) -> BlsResult<G1Affine> {
    let word: [u8; COMPRESSED_G1_LENGTH] =
        bytes.try_into().map_err(|_| BLSError::InvalidLength {
            expected: COMPRESSED_G1_LENGTH,
            actual: bytes.len(),
        })?;
    let value = U256::from_be_bytes(word);
    if value.is_zero() {
        return Ok(G1Affine::identity());
    }

    let flag = value.bit(0);
    let x = fq_from_u256(value >> 1usize)?;
    let (beta, y) = find_y_from_x(&x);
    if y.square() != beta {
        return Err(BLSError::DecompressionFailed);
    }
    let y = if flag { -y } else { y };

    Ok(G1Affine::new_unchecked(x, y))
}

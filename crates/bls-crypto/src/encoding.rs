use crate::{BLSError, BlsResult};

use alloy_primitives::U256;
use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, PrimeField, Zero};

/// Size of a single EVM word
pub const WORD_LENGTH: usize = 32;

/// Uncompressed G1 point: `X ‖ Y`
pub const G1_LENGTH: usize = 2 * WORD_LENGTH;

/// Uncompressed G2 point: `X.c1 ‖ X.c0 ‖ Y.c1 ‖ Y.c0`
pub const G2_LENGTH: usize = 4 * WORD_LENGTH;

/// Converts a base field element into the 256-bit integer the EVM sees.
pub fn fq_to_u256(element: &Fq) -> U256 {
    U256::from_limbs(element.into_bigint().0)
}

/// Interprets a 256-bit integer as a base field element. Values that are not
/// strictly smaller than the modulus are rejected instead of being reduced.
pub fn fq_from_u256(value: U256) -> BlsResult<Fq> {
    Fq::from_bigint(BigInt::new(value.into_limbs())).ok_or(BLSError::InvalidFieldElement)
}

/// Big-endian 32-byte word of a base field element
pub fn fq_to_word(element: &Fq) -> [u8; WORD_LENGTH] {
    fq_to_u256(element).to_be_bytes::<WORD_LENGTH>()
}

pub fn fq_from_word(word: &[u8]) -> BlsResult<Fq> {
    let word: [u8; WORD_LENGTH] = word.try_into().map_err(|_| BLSError::InvalidLength {
        expected: WORD_LENGTH,
        actual: word.len(),
    })?;
    fq_from_u256(U256::from_be_bytes(word))
}

/// Encodes a G1 point as `X ‖ Y`. The point at infinity is encoded as 64 zero bytes,
/// which is how the `ecAdd`/`ecMul` precompiles represent it.
pub fn g1_to_bytes(point: &G1Affine) -> [u8; G1_LENGTH] {
    let mut out = [0u8; G1_LENGTH];
    if point.is_zero() {
        return out;
    }
    out[..WORD_LENGTH].copy_from_slice(&fq_to_word(&point.x));
    out[WORD_LENGTH..].copy_from_slice(&fq_to_word(&point.y));
    out
}

pub fn g1_from_bytes(bytes: &[u8]) -> BlsResult<G1Affine> {
    if bytes.len() != G1_LENGTH {
        return Err(BLSError::InvalidLength {
            expected: G1_LENGTH,
            actual: bytes.len(),
        });
    }
    let x = fq_from_word(&bytes[..WORD_LENGTH])?;
    let y = fq_from_word(&bytes[WORD_LENGTH..])?;
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }

    // G1 has cofactor 1, so the curve check is also the subgroup check
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(BLSError::NotOnCurve);
    }
    Ok(point)
}

/// Encodes a G2 point with the imaginary component of each coordinate first, which
/// is the ordering the pairing precompile expects.
pub fn g2_to_bytes(point: &G2Affine) -> [u8; G2_LENGTH] {
    let mut out = [0u8; G2_LENGTH];
    if point.is_zero() {
        return out;
    }
    let words = [point.x.c1, point.x.c0, point.y.c1, point.y.c0];
    for (chunk, element) in out.chunks_exact_mut(WORD_LENGTH).zip(words.iter()) {
        chunk.copy_from_slice(&fq_to_word(element));
    }
    out
}

pub fn g2_from_bytes(bytes: &[u8]) -> BlsResult<G2Affine> {
    if bytes.len() != G2_LENGTH {
        return Err(BLSError::InvalidLength {
            expected: G2_LENGTH,
            actual: bytes.len(),
        });
    }
    let x1 = fq_from_word(&bytes[..WORD_LENGTH])?;
    let x0 = fq_from_word(&bytes[WORD_LENGTH..2 * WORD_LENGTH])?;
    let y1 = fq_from_word(&bytes[2 * WORD_LENGTH..3 * WORD_LENGTH])?;
    let y0 = fq_from_word(&bytes[3 * WORD_LENGTH..])?;

    let x = Fq2::new(x0, x1);
    let y = Fq2::new(y0, y1);
    if x.is_zero() && y.is_zero() {
        return Ok(G2Affine::identity());
    }

    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(BLSError::NotOnCurve);
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(BLSError::NotInSubgroup);
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Fr, G1Projective, G2Projective};
    use ark_ec::{CurveGroup, Group};
    use ark_std::UniformRand;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::from_seed([
            0x5d, 0xbe, 0x62, 0x59, 0x8d, 0x31, 0x3d, 0x76, 0x32, 0x37, 0xdb, 0x17, 0xe5, 0xbc,
            0x06, 0x54,
        ])
    }

    #[test]
    fn generator_layout() {
        let bytes = g1_to_bytes(&G1Affine::generator());
        let mut expected = [0u8; G1_LENGTH];
        expected[31] = 1;
        expected[63] = 2;
        assert_eq!(bytes, expected);
        assert_eq!(g1_from_bytes(&bytes).unwrap(), G1Affine::generator());
    }

    #[test]
    fn g2_generator_puts_imaginary_part_first() {
        let generator = G2Affine::generator();
        let bytes = g2_to_bytes(&generator);
        assert_eq!(&bytes[..32], &fq_to_word(&generator.x.c1));
        assert_eq!(&bytes[32..64], &fq_to_word(&generator.x.c0));
        assert_eq!(&bytes[64..96], &fq_to_word(&generator.y.c1));
        assert_eq!(&bytes[96..], &fq_to_word(&generator.y.c0));
        assert_eq!(
            hex::encode(&bytes[..32]),
            "198e9393920d483a7260bfb731fb5d25f1aa493335a9e71297e485b7aef312c2"
        );
    }

    #[test]
    fn points_survive_encoding() {
        let rng = &mut rng();
        for _ in 0..20 {
            let scalar = Fr::rand(rng);
            let g1 = (G1Projective::generator() * scalar).into_affine();
            let g2 = (G2Projective::generator() * scalar).into_affine();
            assert_eq!(g1_from_bytes(&g1_to_bytes(&g1)).unwrap(), g1);
            assert_eq!(g2_from_bytes(&g2_to_bytes(&g2)).unwrap(), g2);
        }
    }

    #[test]
    fn identity_is_all_zeroes() {
        assert_eq!(g1_to_bytes(&G1Affine::identity()), [0u8; G1_LENGTH]);
        assert!(g1_from_bytes(&[0u8; G1_LENGTH]).unwrap().is_zero());
        assert!(g2_from_bytes(&[0u8; G2_LENGTH]).unwrap().is_zero());
    }

    #[test]
    fn rejects_bad_points() {
        let mut bytes = g1_to_bytes(&G1Affine::generator());
        bytes[63] = 3;
        assert_eq!(g1_from_bytes(&bytes), Err(BLSError::NotOnCurve));

        let unreduced = [0xffu8; G1_LENGTH];
        assert_eq!(g1_from_bytes(&unreduced), Err(BLSError::InvalidFieldElement));

        assert_eq!(
            g1_from_bytes(&[0u8; 10]),
            Err(BLSError::InvalidLength {
                expected: G1_LENGTH,
                actual: 10
            })
        );
    }
}

use crate::{BLSError, BlsResult, HashToCurve};

use ark_bn254::{Fr, G1Affine, G1Projective, G2Projective};
use ark_ec::{AffineRepr, Group};
use ark_ff::{BigInteger, PrimeField, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::Rng;

use super::{PublicKey, Signature};

#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct PrivateKey {
    sk: Fr,
}

impl PrivateKey {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> PrivateKey {
        PrivateKey { sk: Fr::rand(rng) }
    }

    pub fn from_sk(sk: &Fr) -> PrivateKey {
        PrivateKey { sk: *sk }
    }

    /// Reads a big-endian scalar. The value must be reduced and non-zero.
    pub fn from_be_bytes(bytes: &[u8]) -> BlsResult<PrivateKey> {
        if bytes.len() != 32 {
            return Err(BLSError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let sk = Fr::from_be_bytes_mod_order(bytes);
        if sk.is_zero() || sk.into_bigint().to_bytes_be() != bytes {
            return Err(BLSError::InvalidFieldElement);
        }
        Ok(PrivateKey { sk })
    }

    pub fn get_sk(&self) -> Fr {
        self.sk
    }

    /// Signs a 32-byte message hash: `sig = H(m) * sk`.
    pub fn sign<H: HashToCurve<Output = G1Affine>>(
        &self,
        message_hash: &[u8],
        hash_to_g1: &H,
    ) -> BlsResult<Signature> {
        let point = hash_to_g1.hash(message_hash)?;
        Ok(Signature::from(point.into_group() * self.sk))
    }

    pub fn to_public(&self) -> PublicKey {
        PublicKey::new(
            G1Projective::generator() * self.sk,
            G2Projective::generator() * self.sk,
        )
    }
}

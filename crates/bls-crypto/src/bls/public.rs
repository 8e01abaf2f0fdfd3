use crate::compression::{compress_g1, COMPRESSED_G1_LENGTH};
use crate::encoding::{g1_from_bytes, g1_to_bytes, g2_from_bytes, g2_to_bytes, G1_LENGTH, G2_LENGTH};
use crate::{BLSError, BlsResult, HashToCurve, PrivateKey, Signature};

use ark_bn254::{G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

/// Length of the raw key form, `G1 ‖ G2`
pub const RAW_PUBLIC_KEY_LENGTH: usize = G1_LENGTH + G2_LENGTH;

/// A BLS public key, held in both groups. The G1 half is what the settlement
/// contracts store and aggregate, the G2 half is what the pairing checks against.
#[derive(Clone, Copy, Eq, Debug)]
pub struct PublicKey {
    g1: G1Projective,
    g2: G2Projective,
}

impl From<&PrivateKey> for PublicKey {
    fn from(sk: &PrivateKey) -> PublicKey {
        sk.to_public()
    }
}

impl PublicKey {
    pub fn new(g1: G1Projective, g2: G2Projective) -> PublicKey {
        PublicKey { g1, g2 }
    }

    pub fn g1(&self) -> G1Affine {
        self.g1.into_affine()
    }

    pub fn g2(&self) -> G2Affine {
        self.g2.into_affine()
    }

    /// Sums the keys component-wise. The empty aggregate is the identity in both groups.
    pub fn aggregate<P: Borrow<PublicKey>>(public_keys: impl IntoIterator<Item = P>) -> PublicKey {
        let mut apk = PublicKey {
            g1: G1Projective::default(),
            g2: G2Projective::default(),
        };
        for pk in public_keys {
            let pk = pk.borrow();
            apk.g1 += pk.g1;
            apk.g2 += pk.g2;
        }
        apk
    }

    /// 192-byte raw form, `G1.X ‖ G1.Y ‖ G2.X1 ‖ G2.X0 ‖ G2.Y1 ‖ G2.Y0`
    pub fn to_raw(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(RAW_PUBLIC_KEY_LENGTH);
        raw.extend_from_slice(&g1_to_bytes(&self.g1()));
        raw.extend_from_slice(&g2_to_bytes(&self.g2()));
        raw
    }

    pub fn from_raw(raw: &[u8]) -> BlsResult<PublicKey> {
        if raw.len() != RAW_PUBLIC_KEY_LENGTH {
            return Err(BLSError::InvalidLength {
                expected: RAW_PUBLIC_KEY_LENGTH,
                actual: raw.len(),
            });
        }
        let g1 = g1_from_bytes(&raw[..G1_LENGTH])?;
        let g2 = g2_from_bytes(&raw[G1_LENGTH..])?;
        Ok(PublicKey::new(g1.into_group(), g2.into_group()))
    }

    /// The form registered on-chain: the compressed G1 half.
    pub fn on_chain(&self) -> [u8; COMPRESSED_G1_LENGTH] {
        compress_g1(&self.g1())
    }

    pub fn verify<H: HashToCurve<Output = G1Affine>>(
        &self,
        message_hash: &[u8],
        signature: &Signature,
        hash_to_g1: &H,
    ) -> BlsResult<()> {
        signature.verify_hash(message_hash, &self.g1(), &self.g2(), hash_to_g1)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.g1 == other.g1 && self.g2 == other.g2
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_raw().hash(state);
    }
}

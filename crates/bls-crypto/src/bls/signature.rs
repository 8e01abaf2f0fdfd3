use crate::encoding::{fq_to_word, g1_from_bytes, g1_to_bytes, G1_LENGTH};
use crate::{BLSError, BlsResult, HashToCurve};

use alloy_primitives::keccak256;
use ark_bn254::{Bn254, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{One, PrimeField};

use std::borrow::Borrow;

/// A BLS signature on G1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature(G1Projective);

impl From<G1Projective> for Signature {
    fn from(sig: G1Projective) -> Signature {
        Signature(sig)
    }
}

impl From<G1Affine> for Signature {
    fn from(sig: G1Affine) -> Signature {
        Signature(sig.into_group())
    }
}

impl AsRef<G1Projective> for Signature {
    fn as_ref(&self) -> &G1Projective {
        &self.0
    }
}

impl Signature {
    /// Sums the provided signatures to produce the aggregate signature.
    pub fn aggregate<S: Borrow<Signature>>(signatures: impl IntoIterator<Item = S>) -> Signature {
        signatures
            .into_iter()
            .map(|s| s.borrow().0)
            .sum::<G1Projective>()
            .into()
    }

    /// Uncompressed `X ‖ Y` encoding
    pub fn to_bytes(&self) -> [u8; G1_LENGTH] {
        g1_to_bytes(&self.0.into_affine())
    }

    pub fn from_bytes(bytes: &[u8]) -> BlsResult<Signature> {
        g1_from_bytes(bytes).map(Signature::from)
    }

    /// Verifies the signature over `message_hash` against a key given in both groups.
    ///
    /// With `alpha` from [`verification_alpha`], the check is
    /// `e(sig + alpha * pk_g1, -G2) * e(H(m) + alpha * G1, pk_g2) == 1`.
    /// `alpha` commits to every input, so a key cannot be chosen as a function of
    /// the others to cancel them out of the aggregate.
    pub fn verify_hash<H: HashToCurve<Output = G1Affine>>(
        &self,
        message_hash: &[u8],
        pk_g1: &G1Affine,
        pk_g2: &G2Affine,
        hash_to_g1: &H,
    ) -> BlsResult<()> {
        let signature = self.0.into_affine();
        let message_point = hash_to_g1.hash(message_hash)?;
        let alpha = verification_alpha(message_hash, pk_g1, pk_g2, &signature);

        let lhs = (self.0 + pk_g1.into_group() * alpha).into_affine();
        let rhs = (message_point.into_group() + G1Projective::from(G1Affine::generator()) * alpha)
            .into_affine();

        let pairing = Bn254::multi_pairing([lhs, rhs], [-G2Affine::generator(), *pk_g2]);
        if pairing.0.is_one() {
            Ok(())
        } else {
            Err(BLSError::VerificationFailed)
        }
    }
}

/// `keccak256(m ‖ pk_g1.X ‖ pk_g1.Y ‖ pk_g2.X0 ‖ pk_g2.X1 ‖ pk_g2.Y0 ‖ pk_g2.Y1 ‖
/// sig.X ‖ sig.Y) mod r`, where `X0`/`X1` are the real and imaginary components.
pub fn verification_alpha(
    message_hash: &[u8],
    pk_g1: &G1Affine,
    pk_g2: &G2Affine,
    signature: &G1Affine,
) -> Fr {
    let mut buf = Vec::with_capacity(message_hash.len() + 8 * 32);
    buf.extend_from_slice(message_hash);
    buf.extend_from_slice(&g1_to_bytes(pk_g1));
    for element in [pk_g2.x.c0, pk_g2.x.c1, pk_g2.y.c0, pk_g2.y.c1] {
        buf.extend_from_slice(&fq_to_word(&element));
    }
    buf.extend_from_slice(&g1_to_bytes(signature));

    Fr::from_be_bytes_mod_order(keccak256(&buf).as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hash_to_curve::try_and_increment::HASH_TO_G1,
        test_helpers::{keygen_mul, rng, sign_all},
        PrivateKey, PublicKey,
    };
    use ark_ec::Group;
    use ark_std::UniformRand;
    use rand::Rng;

    #[test]
    fn test_aggregated_sig() {
        let message = [0x42u8; 32];
        let rng = &mut rng();

        let sk1 = PrivateKey::generate(rng);
        let sk2 = PrivateKey::generate(rng);

        let sig1 = sk1.sign(&message, &HASH_TO_G1).unwrap();
        let sig2 = sk2.sign(&message, &HASH_TO_G1).unwrap();
        let sigs = &[sig1, sig2];

        let apk = PublicKey::aggregate([sk1.to_public(), sk2.to_public()]);
        let asig = Signature::aggregate(sigs);
        apk.verify(&message, &asig, &HASH_TO_G1).unwrap();
        apk.verify(&message, &sigs[0], &HASH_TO_G1).unwrap_err();
        sk1.to_public()
            .verify(&message, &asig, &HASH_TO_G1)
            .unwrap_err();
        let message2 = [0x43u8; 32];
        apk.verify(&message2, &asig, &HASH_TO_G1).unwrap_err();

        let apk2 = PublicKey::aggregate([sk2.to_public(), sk1.to_public()]);
        apk2.verify(&message, &asig, &HASH_TO_G1).unwrap();
    }

    #[test]
    fn test_many_signers() {
        let rng = &mut rng();
        let message: [u8; 32] = rng.gen();
        let keys = keygen_mul(rng, 10);
        let sigs = sign_all(&keys, &message);

        let apk = PublicKey::aggregate(keys.iter().map(PrivateKey::to_public));
        let asig = Signature::aggregate(&sigs);
        apk.verify(&message, &asig, &HASH_TO_G1).unwrap();

        // dropping one signature breaks the aggregate
        let partial = Signature::aggregate(&sigs[1..]);
        assert_eq!(
            apk.verify(&message, &partial, &HASH_TO_G1),
            Err(BLSError::VerificationFailed)
        );
    }

    #[test]
    fn rejects_mismatched_key_halves() {
        // the G1 and G2 halves belong to different secrets
        let rng = &mut rng();
        let message = [1u8; 32];
        let sk = PrivateKey::generate(rng);
        let other = PrivateKey::generate(rng);
        let sig = sk.sign(&message, &HASH_TO_G1).unwrap();

        let pk = sk.to_public();
        let forged = PublicKey::new(pk.g1().into_group(), other.to_public().g2().into_group());
        forged.verify(&message, &sig, &HASH_TO_G1).unwrap_err();
    }

    #[test]
    fn alpha_depends_on_every_input() {
        let rng = &mut rng();
        let message = [9u8; 32];
        let g1 = (G1Projective::generator() * Fr::rand(rng)).into_affine();
        let g2 = G2Affine::generator();
        let sig = (G1Projective::generator() * Fr::rand(rng)).into_affine();

        let alpha = verification_alpha(&message, &g1, &g2, &sig);
        assert_eq!(alpha, verification_alpha(&message, &g1, &g2, &sig));
        assert_ne!(alpha, verification_alpha(&[8u8; 32], &g1, &g2, &sig));
        assert_ne!(alpha, verification_alpha(&message, &sig, &g2, &g1));
        assert_ne!(alpha, verification_alpha(&message, &g1, &(-g2), &sig));
    }

    #[test]
    fn test_signature_serialization() {
        let rng = &mut rng();

        for _ in 0..20 {
            let message: [u8; 32] = rng.gen();
            let sk = PrivateKey::generate(rng);
            let sig = sk.sign(&message, &HASH_TO_G1).unwrap();
            let de = Signature::from_bytes(&sig.to_bytes()).unwrap();
            assert_eq!(sig, de);
        }
    }
}

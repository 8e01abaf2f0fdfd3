use crate::{hash_to_curve::try_and_increment::HASH_TO_G1, PrivateKey, Signature};

use ark_ec::Group;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

// Same RNG for all tests
pub fn rng() -> XorShiftRng {
    XorShiftRng::from_seed([
        0x5d, 0xbe, 0x62, 0x59, 0x8d, 0x31, 0x3d, 0x76, 0x32, 0x37, 0xdb, 0x17, 0xe5, 0xbc, 0x06,
        0x54,
    ])
}

/// generate a keypair
pub fn keygen<R: Rng + ?Sized>(rng: &mut R) -> PrivateKey {
    PrivateKey::generate(rng)
}

/// generate N keypairs
pub fn keygen_mul<R: Rng + ?Sized>(rng: &mut R, num: usize) -> Vec<PrivateKey> {
    (0..num).map(|_| keygen(rng)).collect()
}

/// signs a message hash with every key, in order
pub fn sign_all(secret_keys: &[PrivateKey], message_hash: &[u8]) -> Vec<Signature> {
    secret_keys
        .iter()
        .map(|key| {
            key.sign(message_hash, &HASH_TO_G1)
                .expect("hashing with the default bound does not fail")
        })
        .collect()
}

/// sum the elements in the provided slice
pub fn sum<P: Group>(elements: &[P]) -> P {
    elements.iter().fold(P::zero(), |acc, key| acc + key)
}

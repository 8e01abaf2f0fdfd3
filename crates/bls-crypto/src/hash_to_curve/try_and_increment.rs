use log::trace;

use super::HashToCurve;
use crate::compression::find_y_from_x;
use crate::BLSError;

use ark_bn254::{Fq, G1Affine};
use ark_ff::{Field, One, PrimeField};

const NUM_TRIES: usize = 256;

/// Try-and-Increment hasher onto the BN254 G1 group.
pub static HASH_TO_G1: TryAndIncrement = TryAndIncrement::new(NUM_TRIES);

/// A try-and-increment method for hashing to G1. See page 521 in
/// https://link.springer.com/content/pdf/10.1007/3-540-45682-1_30.pdf.
///
/// Unlike the contract, which loops until it succeeds, the search is bounded. Each
/// attempt succeeds with probability close to 1/2.
#[derive(Clone, Debug)]
pub struct TryAndIncrement {
    max_tries: usize,
}

impl TryAndIncrement {
    /// Instantiates a new Try-and-increment hasher which gives up after
    /// `max_tries` candidates
    pub const fn new(max_tries: usize) -> Self {
        TryAndIncrement { max_tries }
    }
}

impl Default for TryAndIncrement {
    fn default() -> Self {
        Self::new(NUM_TRIES)
    }
}

impl HashToCurve for TryAndIncrement {
    type Output = G1Affine;

    fn hash(&self, message: &[u8]) -> Result<Self::Output, BLSError> {
        self.hash_with_attempt(message).map(|res| res.0)
    }
}

impl TryAndIncrement {
    /// Hash with attempt reduces the input modulo `p` and increments it until it
    /// lands on the curve, returning the point and the number of increments
    pub fn hash_with_attempt(&self, message: &[u8]) -> Result<(G1Affine, usize), BLSError> {
        let mut x = Fq::from_be_bytes_mod_order(message);
        for c in 0..self.max_tries {
            let (beta, y) = find_y_from_x(&x);
            if y.square() == beta {
                trace!(
                    "succeeded hashing \"{}\" to curve in {} tries",
                    hex::encode(message),
                    c
                );
                return Ok((G1Affine::new_unchecked(x, y), c));
            }
            x += Fq::one();
        }
        Err(BLSError::HashToCurveError(self.max_tries))
    }
}

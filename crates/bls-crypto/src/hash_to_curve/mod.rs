/// Implementation of the `MapToGroup` algorithm (Paragraph
/// 3.3) of [this paper](https://link.springer.com/content/pdf/10.1007/3-540-45682-1_30.pdf)
/// in the flavour used by EVM BN254 verifiers.
///
/// The message is read as a big-endian integer and reduced modulo `p` to obtain a
/// candidate `x`. If `x^3 + 3` has a square root, the point is returned. If not,
/// `x` is incremented and the procedure repeats.
///
/// **This algorithm is not constant time**.
///
/// # Examples
///
/// ```rust
/// use relay_bls::hash_to_curve::{HashToCurve, try_and_increment::HASH_TO_G1};
///
/// let message_hash = [7u8; 32];
/// let point = HASH_TO_G1.hash(&message_hash).expect("should not fail");
///
/// // The underlying struct also reports how many increments were needed
/// let (same_point, _attempts) = HASH_TO_G1.hash_with_attempt(&message_hash).unwrap();
/// assert_eq!(point, same_point);
/// ```
pub mod try_and_increment;

use crate::BLSError;

/// Trait for hashing arbitrary data to a group element on an elliptic curve
pub trait HashToCurve {
    /// The type of the curve being used.
    type Output;

    /// Given a message, produces a hash of it which is a curve point.
    fn hash(&self, message: &[u8]) -> Result<Self::Output, BLSError>;
}

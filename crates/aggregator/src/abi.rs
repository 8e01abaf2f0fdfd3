//! Reads the 32-byte big-endian words of the packed proof layout.

use alloy_primitives::{B256, U256};

pub const WORD_LENGTH: usize = 32;

/// Reads the `index`-th word of `bytes`. The caller checks the length.
pub(crate) fn word_at(bytes: &[u8], index: usize) -> &[u8] {
    &bytes[index * WORD_LENGTH..(index + 1) * WORD_LENGTH]
}

pub(crate) fn read_u256(word: &[u8]) -> U256 {
    U256::from_be_slice(word)
}

pub(crate) fn read_b256(word: &[u8]) -> B256 {
    B256::from_slice(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_big_endian() {
        let mut bytes = vec![0u8; 3 * WORD_LENGTH];
        bytes[63] = 15;
        bytes[94..96].copy_from_slice(&[1, 2]);
        assert_eq!(read_u256(word_at(&bytes, 1)), U256::from(15u8));
        assert_eq!(read_u256(word_at(&bytes, 2)), U256::from(0x0102u64));
        assert_eq!(read_b256(word_at(&bytes, 0)), B256::ZERO);
    }
}

//! Splitting byte keys into sub-byte digits and back
//!
//! The trie branches on digits, not bytes. With the default of two parts per
//! byte every digit is a nibble and each node has 16 child slots.

use crate::{Error, Result};

/// Default number of digits per key byte
pub const DEFAULT_PARTS: usize = 2;

/// Converts keys to digit sequences for a fixed number of parts per byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NibbleCodec {
    parts: usize,
}

impl NibbleCodec {
    /// Create a codec splitting every byte into `parts` digits
    ///
    /// `parts` must divide 8 evenly.
    pub fn new(parts: usize) -> Result<Self> {
        match parts {
            1 | 2 | 4 | 8 => Ok(NibbleCodec { parts }),
            _ => Err(Error::InvalidParts(parts)),
        }
    }

    /// Digits per byte
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Bits per digit
    pub fn digit_bits(&self) -> usize {
        8 / self.parts
    }

    /// Number of distinct digits, i.e. child slots per node
    pub fn fanout(&self) -> usize {
        1 << self.digit_bits()
    }

    /// Expand a key into `parts * key.len()` digits, most significant first
    pub fn expand(&self, key: &[u8]) -> Vec<u8> {
        let bits = self.digit_bits() as u32;
        let mut digits = Vec::with_capacity(self.parts * key.len());
        for &byte in key {
            for j in 0..self.parts as u32 {
                digits.push((byte << (bits * j)) >> (8 - bits));
            }
        }
        digits
    }

    /// Reassemble bytes from digits produced by [`NibbleCodec::expand`]
    ///
    /// # Panics
    ///
    /// If `digits.len()` is not a multiple of the parts per byte. Every digit
    /// path the trie collapses ends on a byte boundary, so this only fires
    /// on a broken invariant.
    pub fn collapse(&self, digits: &[u8]) -> Vec<u8> {
        assert!(
            self.is_aligned(digits.len()),
            "collapsing {} digits with {} parts per byte",
            digits.len(),
            self.parts
        );
        let bits = self.digit_bits();
        digits
            .chunks_exact(self.parts)
            .map(|chunk| {
                chunk.iter().enumerate().fold(0u8, |byte, (j, &digit)| {
                    byte | (digit << ((self.parts - j - 1) * bits))
                })
            })
            .collect()
    }

    /// Whether a digit sequence of this length ends on a byte boundary
    pub fn is_aligned(&self, len: usize) -> bool {
        len % self.parts == 0
    }
}

impl Default for NibbleCodec {
    fn default() -> Self {
        NibbleCodec {
            parts: DEFAULT_PARTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expand_nibbles() {
        let codec = NibbleCodec::default();
        assert_eq!(codec.expand(b"ca"), vec![0x6, 0x3, 0x6, 0x1]);
        assert_eq!(codec.expand(&[0xff, 0x00]), vec![0xf, 0xf, 0x0, 0x0]);
        assert!(codec.expand(b"").is_empty());
        assert_eq!(codec.fanout(), 16);
    }

    #[test]
    fn test_expand_bits() {
        let codec = NibbleCodec::new(8).unwrap();
        assert_eq!(codec.expand(&[0b1010_0001]), vec![1, 0, 1, 0, 0, 0, 0, 1]);
        assert_eq!(codec.fanout(), 2);

        let codec = NibbleCodec::new(4).unwrap();
        assert_eq!(codec.expand(&[0b1110_0100]), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_whole_bytes() {
        let codec = NibbleCodec::new(1).unwrap();
        assert_eq!(codec.expand(b"dog"), b"dog".to_vec());
        assert_eq!(codec.fanout(), 256);
    }

    #[test]
    fn test_invalid_parts() {
        assert!(matches!(NibbleCodec::new(3), Err(Error::InvalidParts(3))));
        assert!(NibbleCodec::new(0).is_err());
        assert!(NibbleCodec::new(16).is_err());
    }

    #[test]
    #[should_panic(expected = "collapsing 3 digits")]
    fn test_collapse_misaligned_panics() {
        NibbleCodec::default().collapse(&[1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_collapse_inverts_expand(
            key in proptest::collection::vec(any::<u8>(), 0..64),
            parts in prop::sample::select(vec![1usize, 2, 4, 8]),
        ) {
            let codec = NibbleCodec::new(parts).unwrap();
            let digits = codec.expand(&key);
            prop_assert_eq!(digits.len(), parts * key.len());
            prop_assert!(digits.iter().all(|&d| (d as usize) < codec.fanout()));
            prop_assert_eq!(codec.collapse(&digits), key);
        }
    }
}

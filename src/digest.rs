//! Digest providers used to compute node digests
//!
//! A provider is a zero-sized type naming a deterministic hash primitive. The
//! trie only ever asks it for two things: a one-shot digest, and an
//! incremental accumulator seeded with a node's edge that then absorbs the
//! value digest and every child digest in slot order.

use crate::model::Hash;

/// Incremental digest state
pub trait Accumulator {
    /// Absorb more bytes
    fn update(&mut self, data: &[u8]);

    /// Produce the final digest
    fn finish(self) -> Hash;
}

/// A fixed-width (`Hash::WIDTH`) deterministic hash primitive
pub trait DigestProvider {
    /// Incremental state produced by [`DigestProvider::accumulator`]
    type Accumulator: Accumulator;

    /// Digest a byte sequence in one go
    fn digest(data: &[u8]) -> Hash {
        Self::accumulator(data).finish()
    }

    /// Start an accumulator seeded with `seed`
    fn accumulator(seed: &[u8]) -> Self::Accumulator;
}

/// BLAKE3, the default provider
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3;

impl Accumulator for blake3::Hasher {
    fn update(&mut self, data: &[u8]) {
        blake3::Hasher::update(self, data);
    }

    fn finish(self) -> Hash {
        self.finalize().into()
    }
}

impl DigestProvider for Blake3 {
    type Accumulator = blake3::Hasher;

    fn digest(data: &[u8]) -> Hash {
        blake3::hash(data).into()
    }

    fn accumulator(seed: &[u8]) -> Self::Accumulator {
        let mut hasher = blake3::Hasher::new();
        hasher.update(seed);
        hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_matches_one_shot() {
        let mut acc = Blake3::accumulator(b"hello ");
        acc.update(b"wor");
        acc.update(b"ld");
        assert_eq!(acc.finish(), Blake3::digest(b"hello world"));
    }

    #[test]
    fn test_blake3_matches_hash_digest() {
        assert_eq!(Blake3::digest(b"abc"), Hash::digest(b"abc"));
    }
}

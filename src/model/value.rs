//! The value capability: anything stored in the trie must digest itself

use super::Hash;
use bytes::Bytes;

/// A value that can produce a fixed-width digest of its own content
///
/// The digest must be a pure function of the content: equal values digest
/// equally, whatever tree they live in. The trie folds it into the digest of
/// the node that holds the value.
pub trait Digestible {
    /// Digest of this value's content
    fn digest(&self) -> Hash;
}

impl Digestible for str {
    fn digest(&self) -> Hash {
        Hash::digest(self.as_bytes())
    }
}

impl Digestible for String {
    fn digest(&self) -> Hash {
        self.as_str().digest()
    }
}

impl Digestible for [u8] {
    fn digest(&self) -> Hash {
        Hash::digest(self)
    }
}

impl Digestible for Vec<u8> {
    fn digest(&self) -> Hash {
        self.as_slice().digest()
    }
}

impl Digestible for Bytes {
    fn digest(&self) -> Hash {
        Hash::digest(self)
    }
}

/// Content-addressed references digest their raw bytes like any other value,
/// so no stored hash (`Hash::ZERO` included) collides with the absent-value
/// placeholder.
impl Digestible for Hash {
    fn digest(&self) -> Hash {
        Hash::digest(self.as_bytes())
    }
}

impl<T: Digestible + ?Sized> Digestible for &T {
    fn digest(&self) -> Hash {
        (**self).digest()
    }
}

impl<T: Digestible + ?Sized> Digestible for Box<T> {
    fn digest(&self) -> Hash {
        (**self).digest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_digests_raw_bytes() {
        let owned = String::from("cat");
        assert_eq!(owned.digest(), Hash::digest(b"cat"));
        assert_eq!("cat".digest(), owned.digest());
        assert_eq!(b"cat".to_vec().digest(), owned.digest());
        assert_eq!(Bytes::from_static(b"cat").digest(), owned.digest());
    }

    #[test]
    fn test_hash_value_digests_its_bytes() {
        let h = Hash::digest(b"content");
        assert_eq!(h.digest(), Hash::digest(h.as_bytes()));
        assert_ne!(h.digest(), h);
        assert!(!Hash::ZERO.digest().is_zero());
    }

    #[test]
    fn test_different_content_different_digest() {
        assert_ne!("A".digest(), "B".digest());
    }
}

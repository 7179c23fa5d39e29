//! Merkle radix tree: the owning handle over a root node

use super::{Iter, TrieNode};
use crate::config::TrieConfig;
use crate::digest::{Blake3, DigestProvider};
use crate::model::{Digestible, Hash};
use crate::nibble::NibbleCodec;
use crate::Result;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// A compressed radix tree whose root hash covers every key and value
///
/// Keys are byte strings, split into digits by a [`NibbleCodec`]. Values are
/// anything [`Digestible`]. Node digests are computed with the provider `D`.
///
/// Two trees holding the same key/value pairs have the same shape and the
/// same [`root_hash`](RadixTree::root_hash), whatever order the pairs were
/// inserted or removed in.
pub struct RadixTree<V, D = Blake3> {
    root: Option<Box<TrieNode<V>>>,
    /// Number of `put` calls, updates included
    size: usize,
    /// Number of distinct keys holding a value
    len: usize,
    codec: NibbleCodec,
    provider: PhantomData<fn() -> D>,
}

impl<V: Digestible> RadixTree<V, Blake3> {
    /// Create an empty tree with nibble digits and BLAKE3 digests
    pub fn new() -> Self {
        Self::with_codec(NibbleCodec::default())
    }
}

impl<V: Digestible, D: DigestProvider> RadixTree<V, D> {
    /// Create an empty tree from a config
    pub fn with_config(config: &TrieConfig) -> Result<Self> {
        let codec = config.codec()?;
        debug!(parts = codec.parts(), fanout = codec.fanout(), "configured radix tree");
        Ok(Self::with_codec(codec))
    }

    /// Create an empty tree with the given digit split
    pub fn with_codec(codec: NibbleCodec) -> Self {
        RadixTree {
            root: None,
            size: 0,
            len: 0,
            codec,
            provider: PhantomData,
        }
    }

    /// Insert or replace the value at `key`
    ///
    /// Returns the previous value if the key was already present. Every call
    /// counts towards [`size`](RadixTree::size).
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        let digits = self.codec.expand(key.as_ref());
        let (root, previous) = match self.root.take() {
            Some(root) => root.insert::<D>(&digits, value),
            None => (TrieNode::leaf::<D>(digits, value, self.codec.fanout()), None),
        };
        self.root = Some(root);
        self.size += 1;
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove the value at `key`, returning it if it was present
    ///
    /// Removal does not count towards [`size`](RadixTree::size).
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
        let digits = self.codec.expand(key.as_ref());
        let root = self.root.take()?;
        let (root, removed) = root.remove::<D>(&digits);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }
}

impl<V, D> RadixTree<V, D> {
    /// Get a value by key
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        let digits = self.codec.expand(key.as_ref());
        self.root.as_ref()?.lookup(&digits)
    }

    /// Check whether a key holds a value
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Digest of the whole tree
    ///
    /// An empty tree hashes to [`Hash::ZERO`].
    pub fn root_hash(&self) -> Hash {
        self.root.as_ref().map_or(Hash::ZERO, |root| root.hash())
    }

    /// Digest of all entries whose key starts with `prefix`
    ///
    /// `None` when no stored key has that prefix. The result depends only on
    /// those entries, so it is stable under changes elsewhere in the tree.
    pub fn subtree_hash(&self, prefix: impl AsRef<[u8]>) -> Option<Hash> {
        let digits = self.codec.expand(prefix.as_ref());
        self.root.as_ref()?.covering(&digits).map(TrieNode::hash)
    }

    /// Number of `put` calls made on this tree
    ///
    /// Updates of an existing key count too, so this is a mutation counter
    /// rather than the number of keys; see [`len`](RadixTree::len) for that.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of distinct keys holding a value
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the tree holds no keys
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The digit split used by this tree
    pub fn codec(&self) -> NibbleCodec {
        self.codec
    }

    /// The root node, if any key has been stored
    pub fn root(&self) -> Option<&TrieNode<V>> {
        self.root.as_deref()
    }

    /// Iterate over all entries in ascending key order
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.root.as_deref(), self.codec, None)
    }

    /// Iterate from the first key `>= bound` (or `> bound` when not
    /// `inclusive`) in ascending key order
    pub fn seek(&self, bound: impl AsRef<[u8]>, inclusive: bool) -> Iter<'_, V> {
        let digits = self.codec.expand(bound.as_ref());
        Iter::new(self.root.as_deref(), self.codec, Some((digits, inclusive)))
    }

    /// Indented rendering of every edge and value, for debugging
    pub fn describe(&self) -> String
    where
        V: fmt::Debug,
    {
        let mut buffer = format!("<Radix size:{}>\n", self.size);
        if let Some(root) = &self.root {
            root.describe(2, &mut buffer);
        }
        buffer
    }
}

impl<V: Digestible> Default for RadixTree<V, Blake3> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, D> Clone for RadixTree<V, D> {
    fn clone(&self) -> Self {
        RadixTree {
            root: self.root.clone(),
            size: self.size,
            len: self.len,
            codec: self.codec,
            provider: PhantomData,
        }
    }
}

impl<V, D> fmt::Debug for RadixTree<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadixTree")
            .field("root_hash", &self.root_hash())
            .field("size", &self.size)
            .field("len", &self.len)
            .field("parts", &self.codec.parts())
            .finish()
    }
}

impl<'a, V, D> IntoIterator for &'a RadixTree<V, D> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<[u8]>, V: Digestible, D: DigestProvider> Extend<(K, V)> for RadixTree<V, D> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: AsRef<[u8]>, V: Digestible> FromIterator<(K, V)> for RadixTree<V, Blake3> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

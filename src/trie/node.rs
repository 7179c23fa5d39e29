//! Trie node type and the recursive lookup / insert / remove algorithms

use crate::digest::{Accumulator, DigestProvider};
use crate::model::{Digestible, Hash};
use std::fmt::{self, Write};
use tracing::trace;

/// A node in the merkle radix trie
///
/// Each node owns:
/// - `edge`: the compressed run of digits leading to it from its parent
/// - an optional value, plus the cached digest of that value
/// - the cached digest of its whole subtree
/// - one slot per digit, where slot `i` holds the child whose edge starts with `i`
///
/// The subtree digest is `D(edge ‖ value_hash ‖ child hashes in slot order)`.
#[derive(Clone, Debug)]
pub struct TrieNode<V> {
    edge: Vec<u8>,
    value: Option<V>,
    value_hash: Hash,
    hash: Hash,
    children: Box<[Option<Box<TrieNode<V>>>]>,
}

impl<V> TrieNode<V> {
    fn empty(edge: Vec<u8>, fanout: usize) -> Box<Self> {
        Box::new(TrieNode {
            edge,
            value: None,
            value_hash: Hash::ZERO,
            hash: Hash::ZERO,
            children: std::iter::repeat_with(|| None).take(fanout).collect(),
        })
    }

    /// Digits on the edge from the parent to this node
    pub fn edge(&self) -> &[u8] {
        &self.edge
    }

    /// The value stored at exactly this node's key, if any
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Digest of the stored value, `Hash::ZERO` when there is none
    pub fn value_hash(&self) -> Hash {
        self.value_hash
    }

    /// Digest of this node's whole subtree
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// The child whose edge starts with `digit`
    pub fn child(&self, digit: u8) -> Option<&TrieNode<V>> {
        self.children.get(digit as usize)?.as_deref()
    }

    /// Present children in ascending slot order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &TrieNode<V>> {
        self.children.iter().filter_map(|c| c.as_deref())
    }

    fn set_child(&mut self, child: Box<TrieNode<V>>) {
        let slot = child.edge[0] as usize;
        self.children[slot] = Some(child);
    }

    /// Drop the first `from` digits of the edge
    fn trim_edge(&mut self, from: usize) {
        self.edge.drain(..from);
    }

    /// Find a value by the digits remaining below this node
    pub(crate) fn lookup(&self, digits: &[u8]) -> Option<&V> {
        let common = common_prefix_len(digits, &self.edge);
        if common < self.edge.len() {
            // Diverged, or the key stops inside this edge
            return None;
        }
        if common == digits.len() {
            return self.value.as_ref();
        }
        self.child(digits[common])?.lookup(&digits[common..])
    }

    /// Find the topmost node whose path covers `digits`
    ///
    /// Every key under the returned node starts with `digits`, and every stored
    /// key starting with `digits` is under it.
    pub(crate) fn covering(&self, digits: &[u8]) -> Option<&TrieNode<V>> {
        let common = common_prefix_len(digits, &self.edge);
        if common == digits.len() {
            return Some(self);
        }
        if common < self.edge.len() {
            return None;
        }
        self.child(digits[common])?.covering(&digits[common..])
    }

    pub(crate) fn describe(&self, indent: usize, buffer: &mut String)
    where
        V: fmt::Debug,
    {
        let _ = write!(buffer, "{:indent$}{:?}", "", self.edge, indent = indent);
        if let Some(value) = &self.value {
            let _ = write!(buffer, " => {:?}", value);
        }
        buffer.push('\n');
        for child in self.children() {
            child.describe(indent + 2, buffer);
        }
    }
}

impl<V: Digestible> TrieNode<V> {
    /// Create a hashed node holding `value`
    pub(crate) fn leaf<D: DigestProvider>(edge: Vec<u8>, value: V, fanout: usize) -> Box<Self> {
        let mut node = Self::empty(edge, fanout);
        node.replace_value(Some(value));
        node.rehash::<D>();
        node
    }

    fn replace_value(&mut self, value: Option<V>) -> Option<V> {
        self.value_hash = value.as_ref().map_or(Hash::ZERO, Digestible::digest);
        std::mem::replace(&mut self.value, value)
    }

    /// Recompute the subtree digest from the edge, value digest and child digests
    ///
    /// Children must already be up to date.
    fn rehash<D: DigestProvider>(&mut self) {
        let mut acc = D::accumulator(&self.edge);
        acc.update(self.value_hash.as_bytes());
        for child in self.children.iter().flatten() {
            acc.update(child.hash.as_bytes());
        }
        self.hash = acc.finish();
    }

    /// Insert `value` at `digits` below (and including) this node
    ///
    /// Returns the node that now roots this subtree, which the caller stores
    /// in place of `self`, and the value previously held by the key.
    pub(crate) fn insert<D: DigestProvider>(
        mut self: Box<Self>,
        digits: &[u8],
        value: V,
    ) -> (Box<Self>, Option<V>) {
        let fanout = self.children.len();
        let common = common_prefix_len(digits, &self.edge);

        match (common == digits.len(), common == self.edge.len()) {
            (true, true) => {
                // Same key, update value in place
                let previous = self.replace_value(Some(value));
                self.rehash::<D>();
                (self, previous)
            }
            (true, false) => {
                // The new key is a strict prefix of this edge: it becomes the parent
                trace!(at = common, edge_len = self.edge.len(), "split: prefix key");
                self.trim_edge(common);
                self.rehash::<D>();
                let mut parent = Self::empty(digits.to_vec(), fanout);
                parent.replace_value(Some(value));
                parent.set_child(self);
                parent.rehash::<D>();
                (parent, None)
            }
            (false, true) => {
                let rest = &digits[common..];
                let slot = rest[0] as usize;
                let previous = match self.children[slot].take() {
                    Some(child) => {
                        let (child, previous) = child.insert::<D>(rest, value);
                        self.children[slot] = Some(child);
                        previous
                    }
                    None => {
                        self.children[slot] = Some(Self::leaf::<D>(rest.to_vec(), value, fanout));
                        None
                    }
                };
                self.rehash::<D>();
                (self, previous)
            }
            (false, false) => {
                // Diverged inside both: a valueless branch takes the common part
                trace!(at = common, edge_len = self.edge.len(), "split: branch");
                let mut branch = Self::empty(digits[..common].to_vec(), fanout);
                self.trim_edge(common);
                self.rehash::<D>();
                let leaf = Self::leaf::<D>(digits[common..].to_vec(), value, fanout);
                debug_assert_ne!(self.edge[0], leaf.edge[0]);
                branch.set_child(self);
                branch.set_child(leaf);
                branch.rehash::<D>();
                (branch, None)
            }
        }
    }

    /// Remove the value at `digits` below (and including) this node
    ///
    /// Returns what remains of this subtree and the removed value. Nodes left
    /// without a value collapse: with no children they vanish, with a single
    /// child they merge into it. This keeps the shape a function of the key
    /// set alone.
    pub(crate) fn remove<D: DigestProvider>(
        mut self: Box<Self>,
        digits: &[u8],
    ) -> (Option<Box<Self>>, Option<V>) {
        let common = common_prefix_len(digits, &self.edge);
        if common < self.edge.len() {
            return (Some(self), None);
        }

        let removed = if common == digits.len() {
            self.replace_value(None)
        } else {
            let slot = digits[common] as usize;
            match self.children[slot].take() {
                Some(child) => {
                    let (child, removed) = child.remove::<D>(&digits[common..]);
                    self.children[slot] = child;
                    removed
                }
                None => None,
            }
        };

        if removed.is_none() {
            return (Some(self), None);
        }
        (self.normalize::<D>(), removed)
    }

    fn normalize<D: DigestProvider>(mut self: Box<Self>) -> Option<Box<Self>> {
        if self.value.is_none() {
            match self.children.iter().flatten().count() {
                0 => {
                    trace!(edge_len = self.edge.len(), "remove: drop empty node");
                    return None;
                }
                1 => {
                    let mut child = self.children.iter_mut().find_map(Option::take)?;
                    trace!(
                        edge_len = self.edge.len(),
                        child_edge_len = child.edge.len(),
                        "remove: merge into only child"
                    );
                    let mut edge = std::mem::take(&mut self.edge);
                    edge.extend_from_slice(&child.edge);
                    child.edge = edge;
                    child.rehash::<D>();
                    return Some(child);
                }
                _ => {}
            }
        }
        self.rehash::<D>();
        Some(self)
    }
}

/// Find the length of the common prefix between two digit slices
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

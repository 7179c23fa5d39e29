//! Ordered traversal and seeking
//!
//! Digits are most-significant first and a node's value comes before its
//! children, so a depth-first walk in slot order visits keys in ascending byte
//! order. Seeking prunes every subtree whose path already sorts before the
//! bound, which makes the tree usable as a skip-to-key source.

use super::TrieNode;
use crate::nibble::NibbleCodec;
use std::cmp::Ordering;

struct Frame<'a, V> {
    node: &'a TrieNode<V>,
    /// Digits from the root up to and including `node`'s edge
    path: Vec<u8>,
}

/// Iterator over `(key, &value)` pairs in ascending key order
pub struct Iter<'a, V> {
    stack: Vec<Frame<'a, V>>,
    codec: NibbleCodec,
    /// Lower bound in digits and whether it is inclusive
    bound: Option<(Vec<u8>, bool)>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(
        root: Option<&'a TrieNode<V>>,
        codec: NibbleCodec,
        bound: Option<(Vec<u8>, bool)>,
    ) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            codec,
            bound,
        };
        if let Some(root) = root {
            iter.push(root, root.edge().to_vec());
        }
        iter
    }

    fn push(&mut self, node: &'a TrieNode<V>, path: Vec<u8>) {
        if !self.sorts_before_bound(&path) {
            self.stack.push(Frame { node, path });
        }
    }

    /// Whether every key under `path` is below the bound
    fn sorts_before_bound(&self, path: &[u8]) -> bool {
        match &self.bound {
            Some((bound, _)) => {
                let m = path.len().min(bound.len());
                path[..m] < bound[..m]
            }
            None => false,
        }
    }

    fn admits(&self, path: &[u8]) -> bool {
        match &self.bound {
            Some((bound, inclusive)) => match path.cmp(bound) {
                Ordering::Greater => true,
                Ordering::Equal => *inclusive,
                Ordering::Less => false,
            },
            None => true,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Frame { node, path }) = self.stack.pop() {
            for child in node.children().rev() {
                let mut child_path = path.clone();
                child_path.extend_from_slice(child.edge());
                self.push(child, child_path);
            }
            if let Some(value) = node.value() {
                if self.admits(&path) {
                    return Some((self.codec.collapse(&path), value));
                }
            }
        }
        None
    }
}

//! Diff operations between two trees
//!
//! Equal root hashes mean equal contents, so identical trees are recognised
//! without looking at a single key. Otherwise both trees are walked together
//! and every pair of nodes with the same edge and the same hash is skipped
//! whole. Only where the shapes part ways are the remaining entries listed
//! and merged by key.

use crate::model::Hash;
use crate::nibble::NibbleCodec;
use crate::trie::{RadixTree, TrieNode};
use crate::{Error, Result};
use std::cmp::Ordering;
use tracing::debug;

/// Type of change in a diff
///
/// Hashes are value digests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffEntry {
    /// Key was added
    Added { key: Vec<u8>, new_hash: Hash },
    /// Key was removed
    Removed { key: Vec<u8>, old_hash: Hash },
    /// Key was modified
    Modified {
        key: Vec<u8>,
        old_hash: Hash,
        new_hash: Hash,
    },
}

impl DiffEntry {
    pub fn key(&self) -> &[u8] {
        match self {
            DiffEntry::Added { key, .. } => key,
            DiffEntry::Removed { key, .. } => key,
            DiffEntry::Modified { key, .. } => key,
        }
    }
}

/// A diff between two trees, ordered by key
#[derive(Clone, Debug, Default)]
pub struct Diff {
    pub entries: Vec<DiffEntry>,
}

impl Diff {
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        Diff { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn added_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Added { .. }))
            .count()
    }

    pub fn removed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Removed { .. }))
            .count()
    }

    pub fn modified_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Modified { .. }))
            .count()
    }
}

/// Compute the changes that turn `old` into `new`
///
/// Both trees must split keys into the same digits.
pub fn diff_trees<V, D>(old: &RadixTree<V, D>, new: &RadixTree<V, D>) -> Result<Diff> {
    let (left, right) = (old.codec().parts(), new.codec().parts());
    if left != right {
        return Err(Error::IncompatibleParts { left, right });
    }

    if old.root_hash() == new.root_hash() {
        return Ok(Diff::default());
    }

    let mut walk = Walk {
        codec: old.codec(),
        entries: Vec::new(),
        pruned: 0,
    };
    walk.nodes(old.root(), new.root(), &[]);
    debug!(
        changes = walk.entries.len(),
        pruned = walk.pruned,
        "diffed trees"
    );
    Ok(Diff::new(walk.entries))
}

struct Walk {
    codec: NibbleCodec,
    entries: Vec<DiffEntry>,
    /// Subtrees skipped because their hashes matched
    pruned: usize,
}

impl Walk {
    /// Compare two subtrees hanging at the same position `base`
    fn nodes<V>(&mut self, old: Option<&TrieNode<V>>, new: Option<&TrieNode<V>>, base: &[u8]) {
        match (old, new) {
            (None, None) => {}
            (Some(old), None) => {
                for (key, old_hash) in self.entries_under(old, base) {
                    self.entries.push(DiffEntry::Removed { key, old_hash });
                }
            }
            (None, Some(new)) => {
                for (key, new_hash) in self.entries_under(new, base) {
                    self.entries.push(DiffEntry::Added { key, new_hash });
                }
            }
            (Some(old), Some(new)) if old.edge() == new.edge() => {
                if old.hash() == new.hash() {
                    self.pruned += 1;
                    return;
                }
                let mut path = base.to_vec();
                path.extend_from_slice(old.edge());
                self.values(old, new, &path);
                for digit in 0..self.codec.fanout() {
                    let digit = digit as u8;
                    self.nodes(old.child(digit), new.child(digit), &path);
                }
            }
            (Some(old), Some(new)) => {
                let old_entries = self.entries_under(old, base);
                let new_entries = self.entries_under(new, base);
                self.merge(old_entries, new_entries);
            }
        }
    }

    fn values<V>(&mut self, old: &TrieNode<V>, new: &TrieNode<V>, path: &[u8]) {
        let (old_hash, new_hash) = (old.value_hash(), new.value_hash());
        match (old.value().is_some(), new.value().is_some()) {
            (true, true) if old_hash != new_hash => {
                self.entries.push(DiffEntry::Modified {
                    key: self.codec.collapse(path),
                    old_hash,
                    new_hash,
                });
            }
            (true, false) => self.entries.push(DiffEntry::Removed {
                key: self.codec.collapse(path),
                old_hash,
            }),
            (false, true) => self.entries.push(DiffEntry::Added {
                key: self.codec.collapse(path),
                new_hash,
            }),
            _ => {}
        }
    }

    /// Merge two key-sorted entry lists
    fn merge(&mut self, old: Vec<(Vec<u8>, Hash)>, new: Vec<(Vec<u8>, Hash)>) {
        let mut old = old.into_iter().peekable();
        let mut new = new.into_iter().peekable();
        loop {
            let order = match (old.peek(), new.peek()) {
                (None, None) => break,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some((a, _)), Some((b, _))) => a.cmp(b),
            };
            match order {
                Ordering::Less => {
                    if let Some((key, old_hash)) = old.next() {
                        self.entries.push(DiffEntry::Removed { key, old_hash });
                    }
                }
                Ordering::Greater => {
                    if let Some((key, new_hash)) = new.next() {
                        self.entries.push(DiffEntry::Added { key, new_hash });
                    }
                }
                Ordering::Equal => {
                    if let (Some((key, old_hash)), Some((_, new_hash))) = (old.next(), new.next()) {
                        if old_hash != new_hash {
                            self.entries.push(DiffEntry::Modified {
                                key,
                                old_hash,
                                new_hash,
                            });
                        }
                    }
                }
            }
        }
    }

    /// All `(key, value hash)` pairs under `node`, in key order
    fn entries_under<V>(&self, node: &TrieNode<V>, base: &[u8]) -> Vec<(Vec<u8>, Hash)> {
        let mut out = Vec::new();
        let mut path = base.to_vec();
        self.collect(node, &mut path, &mut out);
        out
    }

    fn collect<V>(&self, node: &TrieNode<V>, path: &mut Vec<u8>, out: &mut Vec<(Vec<u8>, Hash)>) {
        let depth = path.len();
        path.extend_from_slice(node.edge());
        if node.value().is_some() {
            out.push((self.codec.collapse(path), node.value_hash()));
        }
        for child in node.children() {
            self.collect(child, path, out);
        }
        path.truncate(depth);
    }
}

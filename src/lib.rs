//! # radix_merkle
//!
//! A content-addressed compressed radix trie.
//!
//! Keys are split into sub-byte digits (nibbles by default) and stored in a
//! PATRICIA-style tree whose edges hold runs of digits. Every node carries a
//! digest of its entire subtree, so two trees built from different data can be
//! told apart by comparing a single root hash.
//!
//! ## Core Concepts
//!
//! - **Digits**: each key byte becomes `parts` digits, giving `2^(8/parts)` child slots
//! - **Edges**: compressed digit runs; nodes only exist where keys end or diverge
//! - **Digests**: `D(edge ‖ value digest ‖ child digests in slot order)`
//! - **Root hash**: a function of the key/value set alone, not of insertion order
//!
//! ## Example
//!
//! ```
//! use radix_merkle::RadixTree;
//!
//! let mut a = RadixTree::new();
//! a.put("cat", "A");
//! a.put("dog", "C");
//!
//! let mut b = RadixTree::new();
//! b.put("dog", "C");
//! b.put("cat", "A");
//!
//! assert_eq!(a.root_hash(), b.root_hash());
//! assert_eq!(a.get("cat"), Some(&"A"));
//! ```

pub mod config;
pub mod digest;
pub mod model;
pub mod nibble;
pub mod ops;
pub mod sync;
pub mod trie;

mod error;

pub use config::TrieConfig;
pub use digest::{Accumulator, Blake3, DigestProvider};
pub use error::{Error, Result};
pub use model::{Digestible, Hash};
pub use nibble::NibbleCodec;
pub use ops::{diff_trees, Diff, DiffEntry};
pub use sync::SharedTree;
pub use trie::{Iter, RadixTree, TrieNode};

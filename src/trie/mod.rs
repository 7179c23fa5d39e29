//! Merkle radix trie
//!
//! This implements a content-addressed trie where:
//! - Keys are split into sub-byte digits and paths are compressed into edges
//! - Each node's hash is derived from its edge, its value and its children's hashes
//! - The root hash uniquely identifies the whole key/value set

mod iter;
mod node;
mod tree;

pub use iter::Iter;
pub use node::TrieNode;
pub use tree::RadixTree;

//! A tree shared between threads
//!
//! [`RadixTree`] mutates nodes in place while splitting, so readers must never
//! run alongside a writer. `SharedTree` puts the whole tree behind one
//! read/write lock: any number of concurrent readers, or a single writer.

use crate::digest::{Blake3, DigestProvider};
use crate::model::{Digestible, Hash};
use crate::trie::RadixTree;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Cloneable handle to a lock-protected [`RadixTree`]
pub struct SharedTree<V, D = Blake3> {
    inner: Arc<RwLock<RadixTree<V, D>>>,
}

impl<V, D> SharedTree<V, D> {
    /// Wrap an existing tree
    pub fn new(tree: RadixTree<V, D>) -> Self {
        SharedTree {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Get a value by key, holding the read lock while the guard lives
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<MappedRwLockReadGuard<'_, V>> {
        RwLockReadGuard::try_map(self.inner.read(), |tree| tree.get(key)).ok()
    }

    /// Get a copy of the value at `key`
    pub fn get_cloned(&self, key: impl AsRef<[u8]>) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn root_hash(&self) -> Hash {
        self.inner.read().root_hash()
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` against a consistent view of the tree
    pub fn read<R>(&self, f: impl FnOnce(&RadixTree<V, D>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<V: Digestible, D: DigestProvider> SharedTree<V, D> {
    /// Insert or replace a value under the write lock
    pub fn put(&self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        self.inner.write().put(key, value)
    }

    /// Remove a value under the write lock
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Option<V> {
        self.inner.write().remove(key)
    }
}

impl<V: Digestible> Default for SharedTree<V, Blake3> {
    fn default() -> Self {
        Self::new(RadixTree::new())
    }
}

impl<V, D> Clone for SharedTree<V, D> {
    fn clone(&self) -> Self {
        SharedTree {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_put_get() {
        let shared = SharedTree::default();
        assert_eq!(shared.put("cat", "A".to_string()), None);
        assert_eq!(shared.get("cat").as_deref(), Some(&"A".to_string()));
        assert!(shared.get("dog").is_none());
        assert_eq!(shared.get_cloned("cat"), Some("A".to_string()));
        assert_eq!(shared.remove("cat"), Some("A".to_string()));
        assert!(shared.is_empty());
    }

    #[test]
    fn test_concurrent_writers_agree_with_serial() {
        let shared: SharedTree<String> = SharedTree::default();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        shared.put(format!("key-{t}-{i}"), format!("value-{i}"));
                        let _ = shared.root_hash();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let serial: RadixTree<String> = (0..4)
            .flat_map(|t| (0..50).map(move |i| (format!("key-{t}-{i}"), format!("value-{i}"))))
            .collect();
        assert_eq!(shared.len(), 200);
        assert_eq!(shared.size(), 200);
        assert_eq!(shared.root_hash(), serial.root_hash());
        assert_eq!(shared.read(|tree| tree.iter().count()), 200);
    }
}

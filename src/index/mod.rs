//! # Index Implementations
//!
//! Every `Table` owns exactly one index mapping its declared key to the
//! position of the tuple in the table's store. Two interchangeable
//! implementations are provided behind the `OrderedIndex` capability:
//!
//! | Type | Structure | Full scan order | Range query |
//! |------|-----------|-----------------|-------------|
//! | `BPlusTree` | Multiway balanced tree, linked leaves | Key order | Leaf walk |
//! | `LinearHashMap` | Linear hashing, chained overflow buckets | Bucket order | Scan + sort |
//!
//! ## Shared Semantics
//!
//! - `put` of a key already present is a no-op and returns `false`
//! - `get` of an absent key returns `None`, never an error
//! - Nothing is ever deleted, so nodes and buckets are never reclaimed
//!
//! ## Selecting an Implementation
//!
//! `IndexKind` describes which structure a table uses and with what
//! geometry. `IndexKind::create` validates the geometry and builds an empty
//! `TableIndex`:
//!
//! ```ignore
//! let kind = IndexKind::LinearHash { slots: 4, initial_buckets: 4 };
//! let mut index = kind.create()?;
//! index.put(KeyType::from(Value::from("Fox")), 0);
//! ```

mod bptree;
mod linhash;

pub use bptree::{BPlusTree, Iter};
pub use linhash::LinearHashMap;

use crate::config::{DEFAULT_TREE_ORDER, HASH_INITIAL_BUCKETS, HASH_SLOTS_PER_BUCKET};
use crate::types::KeyType;
use eyre::Result;

/// Map capability shared by the tree and hash indexes.
pub trait OrderedIndex<K: Ord + Clone, V: Clone> {
    /// Inserts `key -> value`, returning `false` if `key` was already present.
    fn put(&mut self, key: K, value: V) -> bool;

    fn get(&self, key: &K) -> Option<&V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in the implementation's natural iteration order.
    fn entries(&self) -> Vec<(&K, &V)>;

    /// All entries in increasing key order.
    fn sorted_entries(&self) -> Vec<(&K, &V)> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Entries with `from <= key < to`, in key order.
    fn range(&self, from: &K, to: &K) -> Vec<(K, V)> {
        self.sorted_entries()
            .into_iter()
            .filter(|(k, _)| *k >= from && *k < to)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Which index structure a table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    BPlusTree { order: usize },
    LinearHash { slots: usize, initial_buckets: usize },
}

impl IndexKind {
    pub fn tree() -> Self {
        IndexKind::BPlusTree {
            order: DEFAULT_TREE_ORDER,
        }
    }

    pub fn linear_hash() -> Self {
        IndexKind::LinearHash {
            slots: HASH_SLOTS_PER_BUCKET,
            initial_buckets: HASH_INITIAL_BUCKETS,
        }
    }

    /// Builds an empty index of this kind.
    pub fn create(self) -> Result<TableIndex> {
        Ok(match self {
            IndexKind::BPlusTree { order } => TableIndex::Tree(BPlusTree::with_order(order)?),
            IndexKind::LinearHash {
                slots,
                initial_buckets,
            } => TableIndex::Hash(LinearHashMap::with_params(slots, initial_buckets)?),
        })
    }
}

impl Default for IndexKind {
    fn default() -> Self {
        Self::tree()
    }
}

/// A table's index: declared key to tuple-store position.
#[derive(Debug, Clone)]
pub enum TableIndex {
    Tree(BPlusTree<KeyType, usize>),
    Hash(LinearHashMap<KeyType, usize>),
}

impl TableIndex {
    /// Text view of the underlying structure (tree levels or hash buckets).
    pub fn dump(&self) -> String {
        match self {
            TableIndex::Tree(tree) => tree.dump(),
            TableIndex::Hash(map) => map.dump(),
        }
    }
}

impl OrderedIndex<KeyType, usize> for TableIndex {
    fn put(&mut self, key: KeyType, value: usize) -> bool {
        match self {
            TableIndex::Tree(tree) => tree.put(key, value),
            TableIndex::Hash(map) => map.put(key, value),
        }
    }

    fn get(&self, key: &KeyType) -> Option<&usize> {
        match self {
            TableIndex::Tree(tree) => tree.get(key),
            TableIndex::Hash(map) => map.get(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            TableIndex::Tree(tree) => tree.len(),
            TableIndex::Hash(map) => map.len(),
        }
    }

    fn entries(&self) -> Vec<(&KeyType, &usize)> {
        match self {
            TableIndex::Tree(tree) => tree.iter().collect(),
            TableIndex::Hash(map) => map.iter().collect(),
        }
    }

    fn sorted_entries(&self) -> Vec<(&KeyType, &usize)> {
        match self {
            TableIndex::Tree(tree) => tree.iter().collect(),
            TableIndex::Hash(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                entries
            }
        }
    }

    fn range(&self, from: &KeyType, to: &KeyType) -> Vec<(KeyType, usize)> {
        match self {
            TableIndex::Tree(tree) => OrderedIndex::range(tree, from, to),
            TableIndex::Hash(map) => OrderedIndex::range(map, from, to),
        }
    }
}

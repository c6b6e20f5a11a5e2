//! # B+Tree Ordered Map
//!
//! This module implements the multiway balanced tree used as the default
//! table index. All entries live in leaves; interior nodes only route.
//!
//! ## Architecture Overview
//!
//! - Leaves hold sorted keys with parallel values and a forward link to the
//!   next leaf, so a full scan or a range scan never climbs back up the tree.
//! - Interior nodes hold sorted divider keys and exactly one more child than
//!   keys. `divider[i]` is the **maximum** key anywhere in `child[i]`'s
//!   subtree, so a search key equal to a divider routes left.
//! - All leaves sit at the same depth. The tree only grows at the root.
//!
//! ```text
//!                 [ 3 . 7 ]
//!               /     |     \
//!       [1 . 3] -> [5 . 7] -> [9]      (leaf links)
//! ```
//!
//! ## Node Storage
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index.
//! Nodes are created on demand during insertion and never reclaimed: there
//! is no delete, so there is no merge or rebalance logic either.
//!
//! ## Capacity
//!
//! With branching factor `m` (the order):
//! - A leaf holds at most `m - 1` keys
//! - An interior node holds at most `m` children (`m - 1` dividers)
//!
//! ## Node Splitting
//!
//! When a leaf overflows during insertion:
//! 1. Insert the new pair in its sorted slot
//! 2. Move the upper half of the pairs into a new right sibling
//! 3. Relink `left.next -> right -> old left.next`
//! 4. Push the left leaf's maximum key up as the divider
//!
//! Interior overflow is resolved the same way: the left half keeps its
//! children, the divider that separated the halves moves up. When the root
//! splits, a new root with one divider and two children is created and the
//! height grows by one.
//!
//! ## Duplicate Keys
//!
//! `put` of a key already present is a silent no-op: the stored value is
//! kept and `put` returns `false`.
//!
//! ## Access Counting
//!
//! `get` counts every node it visits. `nodes_accessed()` divided by the number
//! of lookups gives the average path length, which is what the order is tuned
//! against.

use super::OrderedIndex;
use crate::config::{DEFAULT_TREE_ORDER, MIN_TREE_ORDER};
use eyre::{ensure, Result};
use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::ops::Bound;
use tracing::trace;

type NodeId = usize;

#[derive(Debug, Clone)]
enum Node<K, V> {
    Leaf {
        keys: Vec<K>,
        values: Vec<V>,
        next: Option<NodeId>,
    },
    Internal {
        keys: Vec<K>,
        children: Vec<NodeId>,
    },
}

impl<K, V> Node<K, V> {
    fn empty_leaf() -> Self {
        Node::Leaf {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        }
    }

    fn keys(&self) -> &[K] {
        match self {
            Node::Leaf { keys, .. } | Node::Internal { keys, .. } => keys,
        }
    }
}

/// Result of inserting into a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InsertResult<K> {
    Inserted,
    Duplicate,
    Split { divider: K, right: NodeId },
}

#[derive(Debug, Clone)]
pub struct BPlusTree<K, V> {
    nodes: Vec<Node<K, V>>,
    root: NodeId,
    order: usize,
    len: usize,
    accessed: Cell<u64>,
}

impl<K: Ord + Clone, V: Clone> BPlusTree<K, V> {
    /// Creates an empty tree with the default branching factor.
    pub fn new() -> Self {
        Self::build(DEFAULT_TREE_ORDER)
    }

    /// Creates an empty tree with branching factor `order` (at least 3).
    pub fn with_order(order: usize) -> Result<Self> {
        ensure!(
            order >= MIN_TREE_ORDER,
            "B+tree order must be at least {}, got {}",
            MIN_TREE_ORDER,
            order
        );
        Ok(Self::build(order))
    }

    fn build(order: usize) -> Self {
        Self {
            nodes: vec![Node::empty_leaf()],
            root: 0,
            order,
            len: 0,
            accessed: Cell::new(0),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes allocated so far (leaves and interior).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels from root to leaf; a lone root leaf has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self.root;
        while let Node::Internal { children, .. } = &self.nodes[node] {
            node = children[0];
            height += 1;
        }
        height
    }

    pub fn nodes_accessed(&self) -> u64 {
        self.accessed.get()
    }

    pub fn reset_access_count(&self) {
        self.accessed.set(0);
    }

    /// Looks up `key`, returning its value if present.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut node = self.root;
        loop {
            self.accessed.set(self.accessed.get() + 1);
            match &self.nodes[node] {
                Node::Internal { keys, children } => {
                    node = children[route(keys, key)];
                }
                Node::Leaf { keys, values, .. } => {
                    return keys.binary_search(key).ok().map(|i| &values[i]);
                }
            }
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_leaf(key).1.is_ok()
    }

    /// Inserts `key -> value`. Returns `false` and leaves the tree untouched
    /// if `key` is already present.
    pub fn put(&mut self, key: K, value: V) -> bool {
        match self.insert_into(self.root, key, value) {
            InsertResult::Duplicate => false,
            InsertResult::Inserted => {
                self.len += 1;
                true
            }
            InsertResult::Split { divider, right } => {
                let old_root = self.root;
                self.root = self.alloc(Node::Internal {
                    keys: vec![divider],
                    children: vec![old_root, right],
                });
                self.len += 1;
                trace!(
                    target: "relcore::index",
                    height = self.height(),
                    nodes = self.nodes.len(),
                    "b+tree root split"
                );
                true
            }
        }
    }

    /// Smallest key, found by following the leftmost child chain.
    pub fn first_key(&self) -> Option<&K> {
        let mut node = self.root;
        loop {
            match &self.nodes[node] {
                Node::Internal { children, .. } => node = children[0],
                Node::Leaf { keys, .. } => return keys.first(),
            }
        }
    }

    /// Largest key, found by following the rightmost child chain.
    pub fn last_key(&self) -> Option<&K> {
        let mut node = self.root;
        loop {
            match &self.nodes[node] {
                Node::Internal { children, .. } => node = children[children.len() - 1],
                Node::Leaf { keys, .. } => return keys.last(),
            }
        }
    }

    /// Entries with `from <= key < to`, as a freshly built tree.
    pub fn sub_map(&self, from: &K, to: &K) -> BPlusTree<K, V> {
        self.collect_range(from, Bound::Excluded(to))
    }

    /// Entries with `key < to`, as a freshly built tree.
    pub fn head_map(&self, to: &K) -> BPlusTree<K, V> {
        match self.first_key() {
            Some(first) => self.collect_range(first, Bound::Excluded(to)),
            None => Self::build(self.order),
        }
    }

    /// Entries with `from <= key` up to and including the last key.
    pub fn tail_map(&self, from: &K) -> BPlusTree<K, V> {
        self.collect_range(from, Bound::Unbounded)
    }

    /// In-order iterator over all entries, walking the leaf links.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut node = self.root;
        while let Node::Internal { children, .. } = &self.nodes[node] {
            node = children[0];
        }
        Iter {
            tree: self,
            leaf: Some(node),
            pos: 0,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    fn collect_range(&self, from: &K, to: Bound<&K>) -> BPlusTree<K, V> {
        let mut out = Self::build(self.order);
        let (leaf, slot) = self.find_leaf(from);
        let start = slot.unwrap_or_else(|pos| pos);
        let iter = Iter {
            tree: self,
            leaf: Some(leaf),
            pos: start,
        };
        for (k, v) in iter {
            let past_end = match to {
                Bound::Excluded(end) => k >= end,
                Bound::Included(end) => k > end,
                Bound::Unbounded => false,
            };
            if past_end {
                break;
            }
            out.put(k.clone(), v.clone());
        }
        out
    }

    /// Descends to the leaf that would hold `key` and binary-searches it.
    fn find_leaf(&self, key: &K) -> (NodeId, std::result::Result<usize, usize>) {
        let mut node = self.root;
        loop {
            match &self.nodes[node] {
                Node::Internal { keys, children } => node = children[route(keys, key)],
                Node::Leaf { keys, .. } => return (node, keys.binary_search(key)),
            }
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn insert_into(&mut self, node: NodeId, key: K, value: V) -> InsertResult<K> {
        let child = match &self.nodes[node] {
            Node::Leaf { .. } => return self.insert_into_leaf(node, key, value),
            Node::Internal { keys, children } => {
                let slot = route(keys, &key);
                (slot, children[slot])
            }
        };

        let (slot, child_id) = child;
        match self.insert_into(child_id, key, value) {
            InsertResult::Split { divider, right } => {
                self.insert_divider(node, slot, divider, right)
            }
            other => other,
        }
    }

    fn insert_into_leaf(&mut self, leaf: NodeId, key: K, value: V) -> InsertResult<K> {
        let order = self.order;
        let Node::Leaf { keys, values, .. } = &mut self.nodes[leaf] else {
            unreachable!("insert_into_leaf called on interior node");
        };

        let pos = match keys.binary_search(&key) {
            Ok(_) => return InsertResult::Duplicate,
            Err(pos) => pos,
        };
        keys.insert(pos, key);
        values.insert(pos, value);

        if keys.len() < order {
            return InsertResult::Inserted;
        }
        self.split_leaf(leaf)
    }

    fn split_leaf(&mut self, leaf: NodeId) -> InsertResult<K> {
        let right_id = self.nodes.len();
        let Node::Leaf { keys, values, next } = &mut self.nodes[leaf] else {
            unreachable!("split_leaf called on interior node");
        };

        let split_at = keys.len() / 2;
        let right_keys = keys.split_off(split_at);
        let right_values = values.split_off(split_at);
        let right_next = next.replace(right_id);
        let divider = keys[keys.len() - 1].clone();

        trace!(
            target: "relcore::index",
            left = leaf,
            right = right_id,
            left_len = keys.len(),
            right_len = right_keys.len(),
            "b+tree leaf split"
        );

        self.alloc(Node::Leaf {
            keys: right_keys,
            values: right_values,
            next: right_next,
        });
        InsertResult::Split {
            divider,
            right: right_id,
        }
    }

    /// Wedges a divider/right-child pair produced by splitting `children[slot]`.
    fn insert_divider(
        &mut self,
        node: NodeId,
        slot: usize,
        divider: K,
        right: NodeId,
    ) -> InsertResult<K> {
        let order = self.order;
        let Node::Internal { keys, children } = &mut self.nodes[node] else {
            unreachable!("insert_divider called on leaf");
        };

        keys.insert(slot, divider);
        children.insert(slot + 1, right);

        if children.len() <= order {
            return InsertResult::Inserted;
        }
        self.split_internal(node)
    }

    fn split_internal(&mut self, node: NodeId) -> InsertResult<K> {
        let right_id = self.nodes.len();
        let Node::Internal { keys, children } = &mut self.nodes[node] else {
            unreachable!("split_internal called on leaf");
        };

        let left_children = children.len().div_ceil(2);
        let right_children = children.split_off(left_children);
        let right_keys = keys.split_off(left_children);
        let Some(divider) = keys.pop() else {
            unreachable!("interior node with order >= 3 has dividers");
        };

        trace!(
            target: "relcore::index",
            left = node,
            right = right_id,
            "b+tree interior split"
        );

        self.alloc(Node::Internal {
            keys: right_keys,
            children: right_children,
        });
        InsertResult::Split {
            divider,
            right: right_id,
        }
    }
}

impl<K: Ord + Clone + fmt::Display, V: Clone> BPlusTree<K, V> {
    /// Renders the tree pre-order, one node per line, indented by level.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, node: NodeId, level: usize, out: &mut String) {
        for _ in 0..level {
            out.push('\t');
        }
        if level == 0 {
            out.push_str("ROOT --> ");
        }
        out.push_str("[ . ");
        for key in self.nodes[node].keys() {
            let _ = write!(out, "{} . ", key);
        }
        out.push_str("]\n");
        if let Node::Internal { children, .. } = &self.nodes[node] {
            for &child in children {
                self.dump_node(child, level + 1, out);
            }
        }
    }
}

impl<K: Ord + Clone, V: Clone> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> OrderedIndex<K, V> for BPlusTree<K, V> {
    fn put(&mut self, key: K, value: V) -> bool {
        BPlusTree::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        BPlusTree::get(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn sorted_entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn range(&self, from: &K, to: &K) -> Vec<(K, V)> {
        self.sub_map(from, to)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Index of the child to follow: the first divider `>=` the key, or the
/// rightmost child when the key exceeds every divider.
fn route<K: Ord>(dividers: &[K], key: &K) -> usize {
    dividers.partition_point(|d| d < key)
}

/// Forward iterator over leaf entries in key order.
pub struct Iter<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let Node::Leaf { keys, values, next } = &tree.nodes[self.leaf?] else {
                return None;
            };
            if self.pos < keys.len() {
                let item = (&keys[self.pos], &values[self.pos]);
                self.pos += 1;
                return Some(item);
            }
            self.leaf = *next;
            self.pos = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(keys: impl IntoIterator<Item = i32>) -> BPlusTree<i32, i32> {
        let mut tree = BPlusTree::new();
        for k in keys {
            tree.put(k, k * k);
        }
        tree
    }

    fn leaves(tree: &BPlusTree<i32, i32>) -> Vec<Vec<i32>> {
        let mut node = tree.root;
        while let Node::Internal { children, .. } = &tree.nodes[node] {
            node = children[0];
        }
        let mut out = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let Node::Leaf { keys, next, .. } = &tree.nodes[id] else {
                panic!("leaf chain reached an interior node");
            };
            out.push(keys.clone());
            cursor = *next;
        }
        out
    }

    /// Checks that every divider equals the maximum key of its left subtree.
    fn check_dividers(tree: &BPlusTree<i32, i32>, node: NodeId) -> Option<i32> {
        match &tree.nodes[node] {
            Node::Leaf { keys, .. } => {
                assert!(keys.windows(2).all(|w| w[0] < w[1]), "leaf keys sorted");
                assert!(keys.len() < tree.order, "leaf within capacity");
                keys.last().copied()
            }
            Node::Internal { keys, children } => {
                assert_eq!(children.len(), keys.len() + 1);
                assert!(children.len() <= tree.order, "interior within capacity");
                let mut max = None;
                for (i, &child) in children.iter().enumerate() {
                    let child_max = check_dividers(tree, child);
                    if i < keys.len() {
                        assert_eq!(child_max, Some(keys[i]), "divider {} is left max", i);
                    }
                    max = child_max;
                }
                max
            }
        }
    }

    #[test]
    fn empty_tree_has_no_keys() {
        let tree: BPlusTree<i32, i32> = BPlusTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.first_key(), None);
        assert_eq!(tree.last_key(), None);
        assert_eq!(tree.get(&1), None);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn with_order_rejects_degenerate_fanout() {
        assert!(BPlusTree::<i32, i32>::with_order(2).is_err());
        assert!(BPlusTree::<i32, i32>::with_order(3).is_ok());
    }

    #[test]
    fn filling_one_leaf_past_capacity_splits_it() {
        let tree = tree_with([10, 20, 30]);

        assert_eq!(tree.height(), 2);
        let leaf_keys = leaves(&tree);
        assert_eq!(leaf_keys.len(), 2);
        let combined: Vec<i32> = leaf_keys.iter().flatten().copied().collect();
        assert_eq!(combined, vec![10, 20, 30]);

        let Node::Internal { keys, .. } = &tree.nodes[tree.root] else {
            panic!("root should be interior after split");
        };
        assert_eq!(keys, &vec![*leaf_keys[0].last().unwrap()]);
    }

    #[test]
    fn split_relinks_existing_right_neighbour() {
        let tree = tree_with([10, 20, 30, 40, 50, 25]);
        let combined: Vec<i32> = leaves(&tree).into_iter().flatten().collect();
        assert_eq!(combined, vec![10, 20, 25, 30, 40, 50]);
        check_dividers(&tree, tree.root);
    }

    #[test]
    fn sequential_inserts_grow_height_and_stay_reachable() {
        let tree = tree_with((1..=200).step_by(2));

        assert!(tree.height() > 3);
        assert_eq!(tree.len(), 100);
        check_dividers(&tree, tree.root);
        for k in (1..=200).step_by(2) {
            assert_eq!(tree.get(&k), Some(&(k * k)), "key {}", k);
        }
        for k in (0..=200).step_by(2) {
            assert_eq!(tree.get(&k), None, "even key {}", k);
        }
    }

    #[test]
    fn descending_and_interleaved_inserts_keep_dividers_exact() {
        let desc = tree_with((0..64).rev());
        check_dividers(&desc, desc.root);

        let interleaved = tree_with((0..64).map(|i| if i % 2 == 0 { i } else { 127 - i }));
        check_dividers(&interleaved, interleaved.root);
        assert_eq!(interleaved.len(), 64);
    }

    #[test]
    fn first_and_last_key_track_extremes() {
        let tree = tree_with([42, 7, 99, -3, 15, 61]);
        assert_eq!(tree.first_key(), Some(&-3));
        assert_eq!(tree.last_key(), Some(&99));
    }

    #[test]
    fn duplicate_put_is_ignored() {
        let mut tree = tree_with([1, 2, 3, 4, 5]);
        let nodes_before = tree.node_count();

        assert!(!tree.put(3, -1));
        assert_eq!(tree.get(&3), Some(&9));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.node_count(), nodes_before);
    }

    #[test]
    fn duplicate_into_full_leaf_does_not_split() {
        let mut tree: BPlusTree<i32, i32> = BPlusTree::new();
        tree.put(1, 1);
        tree.put(2, 2);
        assert!(!tree.put(2, 20));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn iter_walks_leaves_in_key_order() {
        let tree = tree_with([5, 3, 9, 1, 7, 2, 8]);
        let keys: Vec<i32> = tree.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn sub_map_is_half_open() {
        let tree = tree_with(1..=20);
        let sub = tree.sub_map(&5, &11);
        let keys: Vec<i32> = sub.keys().copied().collect();
        assert_eq!(keys, vec![5, 6, 7, 8, 9, 10]);
        assert_eq!(sub.get(&7), Some(&49));
        assert_eq!(sub.order(), tree.order());
    }

    #[test]
    fn sub_map_with_absent_bounds() {
        let tree = tree_with((0..40).step_by(3));
        let keys: Vec<i32> = tree.sub_map(&4, &20).keys().copied().collect();
        assert_eq!(keys, vec![6, 9, 12, 15, 18]);
        assert!(tree.sub_map(&100, &200).is_empty());
    }

    #[test]
    fn head_and_tail_maps() {
        let tree = tree_with(1..=10);
        let head: Vec<i32> = tree.head_map(&4).keys().copied().collect();
        let tail: Vec<i32> = tree.tail_map(&8).keys().copied().collect();
        assert_eq!(head, vec![1, 2, 3]);
        assert_eq!(tail, vec![8, 9, 10]);
    }

    #[test]
    fn larger_order_packs_more_keys_per_node() {
        let mut wide: BPlusTree<i32, i32> = BPlusTree::with_order(8).unwrap();
        for k in 0..100 {
            wide.put(k, k);
        }
        let narrow = tree_with(0..100);
        assert!(wide.height() < narrow.height());
        assert!(wide.node_count() < narrow.node_count());
        for k in 0..100 {
            assert_eq!(wide.get(&k), Some(&k));
        }
    }

    #[test]
    fn access_counter_measures_path_length() {
        let tree = tree_with(1..=50);
        tree.reset_access_count();
        tree.get(&25);
        assert_eq!(tree.nodes_accessed(), tree.height() as u64);

        let copy = tree.clone();
        copy.get(&25);
        assert_eq!(copy.nodes_accessed(), 2 * tree.height() as u64);
        assert_eq!(tree.nodes_accessed(), tree.height() as u64);
    }

    #[test]
    fn dump_marks_root_and_indents_children() {
        let tree = tree_with([1, 2, 3]);
        let text = tree.dump();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ROOT --> [ . "));
        assert!(lines[1].starts_with('\t'));
    }

    #[test]
    fn range_through_trait_matches_sub_map() {
        let tree = tree_with(1..=10);
        let via_trait = OrderedIndex::range(&tree, &3, &6);
        assert_eq!(via_trait, vec![(3, 9), (4, 16), (5, 25)]);
    }
}

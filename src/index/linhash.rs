//! # Linear Hash Map
//!
//! This module implements a dynamically growing hash table using linear
//! hashing. The table grows one bucket at a time instead of rehashing
//! everything when it fills up.
//!
//! ## Addressing
//!
//! Two moduli are kept: `mod1` (home buckets of the current round) and
//! `mod2 = 2 * mod1`. The `split` pointer marks how many home buckets of this
//! round have already been split:
//!
//! ```text
//! h1 = hash(key) % mod1
//! if h1 < split { h2 = hash(key) % mod2 }   // bucket already split this round
//!
//!   0        split              mod1              mod1 + split
//!   |--split--|----not yet split---|--split images--|
//! ```
//!
//! ## Buckets
//!
//! Every bucket has `slots` entries of room plus an optional overflow bucket of
//! the same shape. Overflow chains can be arbitrarily long; they shrink again
//! when their home bucket is split.
//!
//! ## Growth
//!
//! After each successful insert the load factor is
//! `len / (bucket_count * slots)`. Once it exceeds
//! `HASH_SPLIT_LOAD_PERCENT`:
//!
//! 1. Append an empty bucket at index `mod1 + split`
//! 2. Advance `split`; when it reaches `mod1`, reset it to 0 and double both
//!    moduli (a new round begins)
//! 3. Rehash every entry of the bucket that was split (home and overflow) with
//!    the pre-advance `mod2`; entries whose image is not the old index move to
//!    the new bucket, the rest are compacted in place
//!
//! ## Duplicate Keys
//!
//! `put` of a key already present is a no-op returning `false`, matching the
//! B+tree. The stored value is never overwritten.
//!
//! ## Hashing
//!
//! Keys are hashed with a zero-keyed SipHash (`DefaultHasher::new()`), so
//! bucket placement is deterministic across runs.

use super::OrderedIndex;
use crate::config::{HASH_INITIAL_BUCKETS, HASH_SLOTS_PER_BUCKET, HASH_SPLIT_LOAD_PERCENT};
use eyre::{ensure, Result};
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use tracing::trace;

#[derive(Debug, Clone)]
struct Bucket<K, V> {
    entries: Vec<(K, V)>,
    overflow: Option<Box<Bucket<K, V>>>,
}

impl<K, V> Bucket<K, V> {
    fn with_slots(slots: usize) -> Self {
        Self {
            entries: Vec::with_capacity(slots),
            overflow: None,
        }
    }

    /// This bucket followed by its overflow chain.
    fn chain(&self) -> impl Iterator<Item = &Bucket<K, V>> {
        std::iter::successors(Some(self), |b| b.overflow.as_deref())
    }

    /// Appends to the first bucket in the chain with a free slot, extending
    /// the chain when every bucket is full.
    fn push(&mut self, slots: usize, entry: (K, V)) {
        let mut bucket = self;
        while bucket.entries.len() >= slots {
            bucket = bucket
                .overflow
                .get_or_insert_with(|| Box::new(Bucket::with_slots(slots)))
                .as_mut();
        }
        bucket.entries.push(entry);
    }

    /// Removes every entry from the chain and drops the overflow buckets.
    fn take_all(&mut self) -> Vec<(K, V)> {
        let mut out = std::mem::take(&mut self.entries);
        let mut overflow = self.overflow.take();
        while let Some(mut bucket) = overflow {
            out.append(&mut bucket.entries);
            overflow = bucket.overflow.take();
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct LinearHashMap<K, V> {
    buckets: Vec<Bucket<K, V>>,
    slots: usize,
    mod1: usize,
    mod2: usize,
    split: usize,
    len: usize,
    accessed: Cell<u64>,
}

impl<K: Hash + Eq, V> LinearHashMap<K, V> {
    /// Creates a table with the default slot count and home-bucket count.
    pub fn new() -> Self {
        Self::build(HASH_SLOTS_PER_BUCKET, HASH_INITIAL_BUCKETS)
    }

    /// Creates a table with `slots` entries per bucket and `initial_buckets`
    /// home buckets (a power of two).
    pub fn with_params(slots: usize, initial_buckets: usize) -> Result<Self> {
        ensure!(slots > 0, "linear hash buckets need at least one slot");
        ensure!(
            initial_buckets.is_power_of_two(),
            "initial bucket count must be a power of two, got {}",
            initial_buckets
        );
        Ok(Self::build(slots, initial_buckets))
    }

    fn build(slots: usize, initial_buckets: usize) -> Self {
        Self {
            buckets: (0..initial_buckets)
                .map(|_| Bucket::with_slots(slots))
                .collect(),
            slots,
            mod1: initial_buckets,
            mod2: 2 * initial_buckets,
            split: 0,
            len: 0,
            accessed: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of home buckets (overflow buckets are not counted).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn split_pointer(&self) -> usize {
        self.split
    }

    pub fn mod1(&self) -> usize {
        self.mod1
    }

    pub fn mod2(&self) -> usize {
        self.mod2
    }

    /// Slot capacity of the home buckets: `slots * (mod1 + split)`.
    pub fn capacity(&self) -> usize {
        self.slots * (self.mod1 + self.split)
    }

    /// Entries per hundred home-bucket slots.
    pub fn load_factor_percent(&self) -> f64 {
        (self.len as f64 * 100.0) / (self.buckets.len() * self.slots) as f64
    }

    pub fn buckets_accessed(&self) -> u64 {
        self.accessed.get()
    }

    pub fn reset_access_count(&self) {
        self.accessed.set(0);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let home = &self.buckets[self.bucket_of(key)];
        for bucket in home.chain() {
            self.accessed.set(self.accessed.get() + 1);
            if let Some((_, v)) = bucket.entries.iter().find(|(k, _)| k == key) {
                return Some(v);
            }
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets[self.bucket_of(key)]
            .chain()
            .any(|b| b.entries.iter().any(|(k, _)| k == key))
    }

    /// Inserts `key -> value`. Returns `false` without modifying the table if
    /// `key` is already present.
    pub fn put(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        let target = self.bucket_of(&key);
        let slots = self.slots;
        self.buckets[target].push(slots, (key, value));
        self.len += 1;

        if self.len * 100 > HASH_SPLIT_LOAD_PERCENT * self.buckets.len() * self.slots {
            self.split_next();
        }
        true
    }

    /// Entries in bucket order: each home bucket, then its overflow chain.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|home| home.chain())
            .flat_map(|bucket| bucket.entries.iter().map(|(k, v)| (k, v)))
    }

    fn hash_of(key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn bucket_of(&self, key: &K) -> usize {
        let hash = Self::hash_of(key);
        let h1 = (hash % self.mod1 as u64) as usize;
        if h1 < self.split {
            (hash % self.mod2 as u64) as usize
        } else {
            h1
        }
    }

    fn split_next(&mut self) {
        let old = self.split;
        let old_mod2 = self.mod2 as u64;
        let slots = self.slots;

        self.buckets.push(Bucket::with_slots(slots));
        let image = self.buckets.len() - 1;

        self.split += 1;
        if self.split == self.mod1 {
            self.split = 0;
            self.mod1 *= 2;
            self.mod2 *= 2;
        }

        let mut moved = 0usize;
        for (k, v) in self.buckets[old].take_all() {
            if (Self::hash_of(&k) % old_mod2) as usize == old {
                self.buckets[old].push(slots, (k, v));
            } else {
                self.buckets[image].push(slots, (k, v));
                moved += 1;
            }
        }

        trace!(
            target: "relcore::index",
            bucket = old,
            image,
            moved,
            split = self.split,
            mod1 = self.mod1,
            "linear hash split"
        );
    }
}

impl<K: Hash + Eq + fmt::Display, V: fmt::Display> LinearHashMap<K, V> {
    /// Renders one `bucket key value` line per entry, in bucket order.
    pub fn dump(&self) -> String {
        let mut out = String::from("bucket\tkey\tvalue\n");
        for (i, home) in self.buckets.iter().enumerate() {
            for bucket in home.chain() {
                for (k, v) in &bucket.entries {
                    let _ = writeln!(out, "{}\t{}\t{}", i, k, v);
                }
            }
        }
        out
    }
}

impl<K: Hash + Eq, V> Default for LinearHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Ord + Clone, V: Clone> OrderedIndex<K, V> for LinearHashMap<K, V> {
    fn put(&mut self, key: K, value: V) -> bool {
        LinearHashMap::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        LinearHashMap::get(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odd_squares(total: i32) -> LinearHashMap<i32, i32> {
        let mut map = LinearHashMap::new();
        for i in (1..=total).step_by(2) {
            map.put(i, i * i);
        }
        map
    }

    #[test]
    fn starts_with_initial_home_buckets() {
        let map: LinearHashMap<i32, i32> = LinearHashMap::new();
        assert_eq!(map.bucket_count(), HASH_INITIAL_BUCKETS);
        assert_eq!(map.mod1(), HASH_INITIAL_BUCKETS);
        assert_eq!(map.mod2(), 2 * HASH_INITIAL_BUCKETS);
        assert_eq!(map.split_pointer(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn with_params_validates_geometry() {
        assert!(LinearHashMap::<i32, i32>::with_params(0, 4).is_err());
        assert!(LinearHashMap::<i32, i32>::with_params(4, 6).is_err());
        assert!(LinearHashMap::<i32, i32>::with_params(2, 8).is_ok());
    }

    #[test]
    fn get_after_puts() {
        let map = odd_squares(30);
        assert_eq!(map.get(&3), Some(&9));
        assert_eq!(map.get(&9), Some(&81));
        assert_eq!(map.get(&2), None);
        assert_eq!(map.len(), 15);
    }

    #[test]
    fn exceeding_half_load_appends_a_bucket() {
        let mut map: LinearHashMap<i32, i32> = LinearHashMap::new();
        let threshold = HASH_INITIAL_BUCKETS * HASH_SLOTS_PER_BUCKET / 2;
        for i in 0..threshold as i32 {
            map.put(i, i);
        }
        assert_eq!(map.bucket_count(), HASH_INITIAL_BUCKETS);

        map.put(1000, 1000);
        assert_eq!(map.bucket_count(), HASH_INITIAL_BUCKETS + 1);
        assert_eq!(map.split_pointer(), 1);
    }

    #[test]
    fn split_pointer_wraps_and_doubles_moduli() {
        let mut map: LinearHashMap<i32, i32> = LinearHashMap::new();
        let mut i = 0;
        while map.mod1() == HASH_INITIAL_BUCKETS {
            map.put(i, i);
            i += 1;
            assert!(map.split_pointer() < map.mod1());
        }
        assert_eq!(map.split_pointer(), 0);
        assert_eq!(map.mod1(), 2 * HASH_INITIAL_BUCKETS);
        assert_eq!(map.mod2(), 4 * HASH_INITIAL_BUCKETS);
        assert_eq!(map.bucket_count(), map.mod1());
    }

    #[test]
    fn bucket_count_tracks_mod1_plus_split() {
        let mut map: LinearHashMap<i32, i32> = LinearHashMap::new();
        for i in 0..500 {
            map.put(i, -i);
            assert_eq!(map.bucket_count(), map.mod1() + map.split_pointer());
            assert!(map.load_factor_percent() <= HASH_SPLIT_LOAD_PERCENT as f64);
        }
    }

    #[test]
    fn every_key_survives_many_splits() {
        let mut map: LinearHashMap<i32, i32> = LinearHashMap::new();
        for i in 0..2000 {
            assert!(map.put(i * 7, i));
        }
        assert!(map.bucket_count() > 100);
        for i in 0..2000 {
            assert_eq!(map.get(&(i * 7)), Some(&i), "key {}", i * 7);
        }
        assert_eq!(map.get(&1), None);
    }

    #[test]
    fn duplicate_put_is_ignored() {
        let mut map = odd_squares(10);
        assert!(!map.put(3, -1));
        assert_eq!(map.get(&3), Some(&9));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn single_slot_buckets_overflow_into_chains() {
        let mut map: LinearHashMap<i32, i32> = LinearHashMap::with_params(1, 1).unwrap();
        for i in 0..64 {
            map.put(i, i + 1);
        }
        for i in 0..64 {
            assert_eq!(map.get(&i), Some(&(i + 1)));
        }
        assert_eq!(map.iter().count(), 64);
    }

    #[test]
    fn iter_visits_each_entry_once() {
        let map = odd_squares(200);
        let mut keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        let expected: Vec<i32> = (1..=200).step_by(2).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn access_counter_counts_buckets_touched() {
        let map = odd_squares(30);
        map.reset_access_count();
        map.get(&5);
        let after_one = map.buckets_accessed();
        assert!(after_one >= 1);

        let copy = map.clone();
        copy.get(&5);
        assert_eq!(copy.buckets_accessed(), 2 * after_one);
        assert_eq!(map.buckets_accessed(), after_one);
    }

    #[test]
    fn capacity_follows_home_buckets() {
        let map = odd_squares(100);
        assert_eq!(
            map.capacity(),
            map.slots() * (map.mod1() + map.split_pointer())
        );
    }

    #[test]
    fn range_through_trait_is_sorted_and_half_open() {
        let map = odd_squares(20);
        let got = OrderedIndex::range(&map, &5, &11);
        assert_eq!(got, vec![(5, 25), (7, 49), (9, 81)]);
    }

    #[test]
    fn dump_has_header_and_one_line_per_entry() {
        let map = odd_squares(10);
        let text = map.dump();
        assert!(text.starts_with("bucket\tkey\tvalue\n"));
        assert_eq!(text.lines().count(), 1 + map.len());
    }
}

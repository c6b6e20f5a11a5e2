//! Single-table and set operators: project, select, union, minus.

use super::Table;
use crate::index::OrderedIndex;
use crate::schema::NameSeq;
use crate::types::{KeyType, Tuple};
use eyre::{ensure, Result};
use tracing::debug;

impl Table {
    /// Keeps the columns named in `attrs`, in that order.
    ///
    /// The result keeps the original declared key when `attrs` contains all of
    /// it; otherwise every projected column becomes the key. A later tuple
    /// whose key is already present in the result is dropped.
    pub fn project(&self, attrs: &[&str], names: &mut NameSeq) -> Result<Table> {
        ensure!(!attrs.is_empty(), "project on '{}' needs at least one attribute", self.name);
        let positions = self.schema.positions(&self.name, attrs)?;
        let schema = self.schema.select(&positions)?;

        let key_positions: Vec<usize> = if self.key_positions.iter().all(|k| positions.contains(k)) {
            self.key_positions
                .iter()
                .filter_map(|k| positions.iter().position(|p| p == k))
                .collect()
        } else {
            (0..positions.len()).collect()
        };

        let mut result = Table::derived(names.next_name(), schema, key_positions, self.kind)?;
        for tuple in &self.tuples {
            result.push(positions.iter().map(|&p| tuple[p].clone()).collect());
        }

        debug!(target: "relcore::ra", op = "project", table = %self.name, result = %result.name, rows = result.len());
        Ok(result)
    }

    /// Full scan keeping the tuples for which `predicate` holds.
    pub fn select<F>(&self, predicate: F, names: &mut NameSeq) -> Result<Table>
    where
        F: Fn(&Tuple) -> bool,
    {
        let mut result = self.empty_like(names)?;
        for tuple in self.tuples.iter().filter(|t| predicate(t)) {
            result.push(tuple.clone());
        }

        debug!(target: "relcore::ra", op = "select", table = %self.name, result = %result.name, rows = result.len());
        Ok(result)
    }

    /// Index probe for the tuple whose declared key equals `key`; the result
    /// holds zero or one tuple.
    pub fn select_key(&self, key: &KeyType, names: &mut NameSeq) -> Result<Table> {
        let mut result = self.empty_like(names)?;
        if let Some(tuple) = self.get(key) {
            result.push(tuple.clone());
        }

        debug!(target: "relcore::ra", op = "select_key", table = %self.name, key = %key, rows = result.len());
        Ok(result)
    }

    /// Rows of `self` followed by the rows of `other` not already present.
    ///
    /// Duplicates are detected by whole-tuple identity, so the result is keyed
    /// on every attribute. Fails when the schemas are not compatible.
    pub fn union(&self, other: &Table, names: &mut NameSeq) -> Result<Table> {
        self.ensure_compatible(other, "union")?;

        let all: Vec<usize> = (0..self.schema.len()).collect();
        let mut result = Table::derived(names.next_name(), self.schema.clone(), all, self.kind)?;
        for tuple in self.tuples.iter().chain(&other.tuples) {
            result.push(tuple.clone());
        }

        debug!(target: "relcore::ra", op = "union", table = %self.name, other = %other.name, rows = result.len());
        Ok(result)
    }

    /// Rows of `self` whose declared key is absent from `other`'s index.
    ///
    /// Fails when the schemas are not compatible.
    pub fn minus(&self, other: &Table, names: &mut NameSeq) -> Result<Table> {
        self.ensure_compatible(other, "minus")?;

        let mut result = self.empty_like(names)?;
        for tuple in &self.tuples {
            if other.index.get(&self.key_of(tuple)).is_none() {
                result.push(tuple.clone());
            }
        }

        debug!(target: "relcore::ra", op = "minus", table = %self.name, other = %other.name, rows = result.len());
        Ok(result)
    }

    fn empty_like(&self, names: &mut NameSeq) -> Result<Table> {
        Table::derived(
            names.next_name(),
            self.schema.clone(),
            self.key_positions.clone(),
            self.kind,
        )
    }
}

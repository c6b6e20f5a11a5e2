//! Join operators.
//!
//! `join` picks one of three strategies, cheapest first:
//!
//! ```text
//! attrs1 == key(self)   ──> scan other, probe self's index   rows: other ++ self
//! attrs2 == key(other)  ──> scan self,  probe other's index  rows: self ++ other
//! otherwise             ──> nested loop over all pairs       rows: self ++ other
//! ```
//!
//! In the probe strategies the result is keyed by the scanned side's key, so
//! a foreign-key side with many rows per referenced key keeps all of them.
//! The nested loop keys the result by both keys concatenated.
//!
//! `natural_join` compares every attribute name the two schemas share. The
//! output holds the left schema's columns in order, followed by the right
//! schema's non-shared columns in order. It emits one row per matching pair
//! even when several rows share the result key; the index keeps the first.

use super::{Table, TableError};
use crate::schema::{NameSeq, Schema};
use crate::types::{KeyType, Tuple, Value};
use eyre::{ensure, Result};
use hashbrown::HashSet;
use tracing::debug;

fn concat(left: &[Value], right: &[Value]) -> Tuple {
    let mut row = Vec::with_capacity(left.len() + right.len());
    row.extend_from_slice(left);
    row.extend_from_slice(right);
    row
}

fn agree(left: &[Value], lpos: &[usize], right: &[Value], rpos: &[usize]) -> bool {
    lpos.iter().zip(rpos).all(|(&l, &r)| left[l] == right[r])
}

impl Table {
    /// Equi-join: keeps pairs where `self`'s `attrs1` equal `other`'s `attrs2`
    /// elementwise.
    ///
    /// Colliding attribute names in the two schemas are kept as-is.
    pub fn join(
        &self,
        attrs1: &[&str],
        attrs2: &[&str],
        other: &Table,
        names: &mut NameSeq,
    ) -> Result<Table> {
        ensure!(
            attrs1.len() == attrs2.len(),
            TableError::ArityMismatch {
                expected: attrs1.len(),
                actual: attrs2.len(),
            }
        );
        let lpos = self.schema.positions(&self.name, attrs1)?;
        let rpos = other.schema.positions(&other.name, attrs2)?;

        let (result, strategy) = if lpos == self.key_positions {
            let mut result = Table::derived(
                names.next_name(),
                other.schema.concat(&self.schema),
                other.key_positions.clone(),
                self.kind,
            )?;
            for tuple in &other.tuples {
                if let Some(hit) = self.get(&KeyType::project(tuple, &rpos)) {
                    result.push(concat(tuple, hit));
                }
            }
            (result, "probe-left")
        } else if rpos == other.key_positions {
            let mut result = Table::derived(
                names.next_name(),
                self.schema.concat(&other.schema),
                self.key_positions.clone(),
                self.kind,
            )?;
            for tuple in &self.tuples {
                if let Some(hit) = other.get(&KeyType::project(tuple, &lpos)) {
                    result.push(concat(tuple, hit));
                }
            }
            (result, "probe-right")
        } else {
            let width = self.schema.len();
            let mut result = Table::derived(
                names.next_name(),
                self.schema.concat(&other.schema),
                self.concat_keys(other, |p| width + p),
                self.kind,
            )?;
            for left in &self.tuples {
                for right in other.tuples.iter().filter(|r| agree(left, &lpos, r, &rpos)) {
                    result.push(concat(left, right));
                }
            }
            (result, "nested-loop")
        };

        debug!(
            target: "relcore::ra",
            op = "join",
            strategy,
            table = %self.name,
            other = %other.name,
            rows = result.len()
        );
        Ok(result)
    }

    /// Natural join on every attribute name the two schemas share. With no
    /// shared names this is the cross product.
    pub fn natural_join(&self, other: &Table, names: &mut NameSeq) -> Result<Table> {
        let (larger, smaller) = if other.schema.len() > self.schema.len() {
            (&other.schema, &self.schema)
        } else {
            (&self.schema, &other.schema)
        };
        let mut shared = HashSet::new();
        let common: Vec<&str> = larger
            .names()
            .filter(|n| smaller.column_index(n).is_some() && shared.insert(*n))
            .collect();

        if common.is_empty() {
            let width = self.schema.len();
            let mut result = Table::derived(
                names.next_name(),
                self.schema.concat(&other.schema),
                self.concat_keys(other, |p| width + p),
                self.kind,
            )?;
            for left in &self.tuples {
                for right in &other.tuples {
                    result.append(concat(left, right));
                }
            }
            debug!(target: "relcore::ra", op = "natural_join", strategy = "cross", table = %self.name, other = %other.name, rows = result.len());
            return Ok(result);
        }

        let lpos = self.schema.positions(&self.name, &common)?;
        let rpos = other.schema.positions(&other.name, &common)?;
        let rest: Vec<usize> = (0..other.schema.len()).filter(|p| !rpos.contains(p)).collect();

        let mut columns = self.schema.columns().to_vec();
        columns.extend(rest.iter().map(|&p| other.schema.columns()[p].clone()));
        let schema = Schema::from_columns_unchecked(columns);

        // Output position of each `other` column: shared columns fold onto the
        // matching left column, the rest follow the left schema.
        let mut out_pos = vec![0; other.schema.len()];
        for (&r, &l) in rpos.iter().zip(&lpos) {
            out_pos[r] = l;
        }
        for (i, &r) in rest.iter().enumerate() {
            out_pos[r] = self.schema.len() + i;
        }

        let self_in = self.key().iter().all(|k| shared.contains(k));
        let other_in = other.key().iter().all(|k| shared.contains(k));
        let key_positions = match (self_in, other_in) {
            (true, false) => self.key_positions.clone(),
            (false, true) => other.key_positions.iter().map(|&p| out_pos[p]).collect(),
            _ => self.concat_keys(other, |p| out_pos[p]),
        };

        let mut result = Table::derived(names.next_name(), schema, key_positions, self.kind)?;
        for left in &self.tuples {
            for right in other.tuples.iter().filter(|r| agree(left, &lpos, r, &rpos)) {
                let mut row = left.clone();
                row.extend(rest.iter().map(|&p| right[p].clone()));
                result.append(row);
            }
        }

        debug!(
            target: "relcore::ra",
            op = "natural_join",
            common = common.len(),
            table = %self.name,
            other = %other.name,
            rows = result.len()
        );
        Ok(result)
    }

    /// `self`'s key positions followed by `other`'s, mapped through `map`.
    fn concat_keys(&self, other: &Table, map: impl Fn(usize) -> usize) -> Vec<usize> {
        self.key_positions
            .iter()
            .copied()
            .chain(other.key_positions.iter().map(|&p| map(p)))
            .collect()
    }
}

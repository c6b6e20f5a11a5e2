//! # Tables and Relational Operators
//!
//! A `Table` is a relation: a schema, a declared key, an append-only tuple
//! store, and exactly one owned index mapping the declared key of every stored
//! tuple to that tuple's position in the store.
//!
//! ## Storage Layout
//!
//! ```text
//! Table "movie"  key = (title, year)
//! ┌──────────────────────────────────────┐
//! │ tuples: Vec<Tuple>  (insertion order)│
//! │   0: [Star_Wars, 1977, 124, ...]     │
//! │   1: [Rocky,     1985, 200, ...]     │
//! ├──────────────────────────────────────┤
//! │ index: TableIndex                    │
//! │   (Rocky, 1985)     -> 1             │
//! │   (Star_Wars, 1977) -> 0             │
//! └──────────────────────────────────────┘
//! ```
//!
//! For tables filled by `insert` and by every operator except `natural_join`,
//! the store and the index have matching membership: a tuple whose declared
//! key is already indexed is not stored at all. A natural join stores every
//! matching pair, so two rows may share a declared key. The index then points
//! at the first of them, and `get` returns that row.
//!
//! ## Operators
//!
//! | Operator | Module | Strategy |
//! |----------|--------|----------|
//! | `project` | `ops` | Scan, dedup by new key |
//! | `select` | `ops` | Scan with predicate |
//! | `select_key` | `ops` | Single index probe |
//! | `union` | `ops` | Scan both, dedup by whole tuple |
//! | `minus` | `ops` | Scan left, probe right index |
//! | `join` | `join` | Index probe when one side joins on its key, else nested loop |
//! | `natural_join` | `join` | Nested loop over common attributes |
//!
//! Every operator builds a brand-new table with its own store and index,
//! named from a caller-supplied `NameSeq`, and using the index kind of the
//! left operand. Sources are never mutated.
//!
//! ## Errors
//!
//! Failures are `eyre::Report`s wrapping a `TableError`:
//!
//! - Wrong arity or domain kind on `insert`
//! - `union`/`minus` over incompatible schemas
//! - Unknown attribute names passed to an operator
//!
//! A duplicate key on `insert` is not an error: it returns `Ok(false)`.

mod display;
mod error;
mod join;
mod ops;

pub use error::TableError;

use crate::index::{IndexKind, OrderedIndex, TableIndex};
use crate::schema::Schema;
use crate::types::{KeyType, Tuple, Value};
use eyre::{bail, ensure, Result};
use std::fmt::Write as _;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    key_positions: Vec<usize>,
    tuples: Vec<Tuple>,
    index: TableIndex,
    kind: IndexKind,
}

impl Table {
    /// Creates an empty table indexed by a B+tree of the default order.
    pub fn new(name: impl Into<String>, schema: Schema, key: &[&str]) -> Result<Self> {
        Self::with_index_kind(name, schema, key, IndexKind::default())
    }

    /// Creates an empty table using the given index structure.
    pub fn with_index_kind(
        name: impl Into<String>,
        schema: Schema,
        key: &[&str],
        kind: IndexKind,
    ) -> Result<Self> {
        let name = name.into();
        ensure!(
            !key.is_empty(),
            "table '{}' must declare at least one key attribute",
            name
        );
        let key_positions = schema.positions(&name, key)?;
        Self::derived(name, schema, key_positions, kind)
    }

    /// Creates a table and replays `insert` for every tuple, in order.
    pub fn from_tuples(
        name: impl Into<String>,
        schema: Schema,
        key: &[&str],
        tuples: impl IntoIterator<Item = Tuple>,
    ) -> Result<Self> {
        let mut table = Self::new(name, schema, key)?;
        for tuple in tuples {
            table.insert(tuple)?;
        }
        Ok(table)
    }

    pub(crate) fn derived(
        name: String,
        schema: Schema,
        key_positions: Vec<usize>,
        kind: IndexKind,
    ) -> Result<Self> {
        Ok(Self {
            name,
            schema,
            key_positions,
            tuples: Vec::new(),
            index: kind.create()?,
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Declared key attribute names, in key order.
    pub fn key(&self) -> Vec<&str> {
        self.key_positions
            .iter()
            .map(|&p| self.schema.columns()[p].name())
            .collect()
    }

    pub fn key_positions(&self) -> &[usize] {
        &self.key_positions
    }

    pub fn index_kind(&self) -> IndexKind {
        self.kind
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.column_index(name)
    }

    /// Full scan in store (insertion) order.
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Declared-key projection of `tuple`.
    pub fn key_of(&self, tuple: &[Value]) -> KeyType {
        KeyType::project(tuple, &self.key_positions)
    }

    /// Index probe on the declared key.
    pub fn get(&self, key: &KeyType) -> Option<&Tuple> {
        self.index.get(key).map(|&pos| &self.tuples[pos])
    }

    /// Type-checks `tuple` and stores it.
    ///
    /// Returns `Ok(false)` without storing anything when a tuple with the same
    /// declared key is already present.
    pub fn insert(&mut self, tuple: Tuple) -> Result<bool> {
        self.type_check(&tuple)?;
        let inserted = self.push(tuple);
        debug!(target: "relcore::dml", table = %self.name, inserted, rows = self.tuples.len(), "insert");
        Ok(inserted)
    }

    fn type_check(&self, tuple: &[Value]) -> Result<()> {
        if tuple.len() != self.schema.len() {
            bail!(TableError::ArityMismatch {
                expected: self.schema.len(),
                actual: tuple.len(),
            });
        }
        for (position, (value, expected)) in tuple.iter().zip(self.schema.domains()).enumerate() {
            let actual = value.data_type();
            if actual != expected {
                bail!(TableError::DomainMismatch {
                    position,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Stores an already well-typed tuple unless its key is present.
    pub(crate) fn push(&mut self, tuple: Tuple) -> bool {
        let key = self.key_of(&tuple);
        if !self.index.put(key, self.tuples.len()) {
            return false;
        }
        self.tuples.push(tuple);
        true
    }

    /// Stores an already well-typed tuple unconditionally. Only the first
    /// tuple stored under a key is indexed.
    pub(crate) fn append(&mut self, tuple: Tuple) {
        let key = self.key_of(&tuple);
        self.index.put(key, self.tuples.len());
        self.tuples.push(tuple);
    }

    pub(crate) fn ensure_compatible(&self, other: &Table, op: &str) -> Result<()> {
        if !self.schema.is_compatible(&other.schema) {
            let domains = |s: &Schema| {
                s.domains()
                    .map(|d| d.name())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            bail!(TableError::Incompatible {
                reason: format!(
                    "{}: '{}' is ({}) but '{}' is ({})",
                    op,
                    self.name,
                    domains(&self.schema),
                    other.name,
                    domains(&other.schema)
                ),
            });
        }
        Ok(())
    }

    /// One `key -> [values]` line per index entry, in index iteration order.
    pub fn index_dump(&self) -> String {
        let mut out = String::new();
        for (key, &pos) in self.index.entries() {
            let values: Vec<String> = self.tuples[pos].iter().map(|v| v.to_string()).collect();
            let _ = writeln!(out, "{} -> [{}]", key, values.join(", "));
        }
        out
    }

    /// Text view of the index structure itself.
    pub fn index_structure(&self) -> String {
        self.index.dump()
    }

    /// Order-insensitive comparison of the stored rows.
    pub fn same_rows(&self, other: &Table) -> bool {
        if self.tuples.len() != other.tuples.len() {
            return false;
        }
        let mut mine: Vec<&Tuple> = self.tuples.iter().collect();
        let mut theirs: Vec<&Tuple> = other.tuples.iter().collect();
        mine.sort();
        theirs.sort();
        mine == theirs
    }
}

/// Positional: equal when both stores hold equal tuples in the same order.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.tuples == other.tuples
    }
}

//! # Relation Schemas
//!
//! A `Schema` is the ordered list of `(attribute-name, domain-kind)` pairs
//! that fixes the arity and the per-position kind of every tuple in a table.
//!
//! ## Attribute Names
//!
//! Schemas built through `Schema::new` or `Schema::from_names` reject
//! duplicate attribute names. Equi-join results are the one exception: they
//! concatenate both input schemas verbatim, so a name shared by both sides
//! appears twice, and a natural join over such a result keeps the repeats.
//! Name lookups (`column_index`, `positions`) always resolve
//! to the first column carrying the name.
//!
//! ## Compatibility
//!
//! Two schemas are union-compatible when they have the same arity and the same
//! domain-kind sequence, position by position. Attribute names are not
//! compared:
//!
//! ```text
//! movie  (title:String, year:Integer)   ┐
//!                                        ├─ compatible
//! cinema (name:String,  opened:Integer) ┘
//! ```
//!
//! ## Temporary Names
//!
//! Operators name their results with a caller-owned `NameSeq` rather than a
//! process-wide counter, so two independent sessions never race on names and
//! tests get reproducible output.

mod naming;

pub use naming::NameSeq;

use crate::table::TableError;
use crate::types::DataType;
use eyre::{ensure, Result};
use hashbrown::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Builds a schema, rejecting duplicate attribute names.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        {
            let mut seen = HashSet::with_capacity(columns.len());
            for col in &columns {
                ensure!(
                    seen.insert(col.name()),
                    "duplicate attribute '{}' in schema",
                    col.name()
                );
            }
        }
        Ok(Self { columns })
    }

    /// Builds a schema from parallel attribute-name and domain-kind-name lists,
    /// e.g. `["title", "year"]` with `["String", "Integer"]`.
    pub fn from_names(attrs: &[&str], domains: &[&str]) -> Result<Self> {
        ensure!(
            attrs.len() == domains.len(),
            TableError::ArityMismatch {
                expected: attrs.len(),
                actual: domains.len(),
            }
        );
        let columns = attrs
            .iter()
            .zip(domains)
            .map(|(&attr, &domain)| {
                DataType::from_name(domain)
                    .map(|dt| ColumnDef::new(attr, dt))
                    .ok_or_else(|| TableError::UnknownDomain(domain.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    pub(crate) fn from_columns_unchecked(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    pub fn domains(&self) -> impl Iterator<Item = DataType> + '_ {
        self.columns.iter().map(|c| c.data_type())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Resolves every name in `attrs` to its column position.
    ///
    /// `table` only labels the error when a name is missing.
    pub fn positions<S: AsRef<str>>(&self, table: &str, attrs: &[S]) -> Result<Vec<usize>> {
        attrs
            .iter()
            .map(|a| {
                let a = a.as_ref();
                self.column_index(a).ok_or_else(|| {
                    TableError::UnknownAttribute {
                        table: table.to_string(),
                        attribute: a.to_string(),
                    }
                    .into()
                })
            })
            .collect()
    }

    /// Same arity and same domain-kind sequence; names are ignored.
    pub fn is_compatible(&self, other: &Schema) -> bool {
        self.len() == other.len() && self.domains().eq(other.domains())
    }

    /// The columns at `positions`, in that order.
    pub fn select(&self, positions: &[usize]) -> Result<Schema> {
        Schema::new(positions.iter().map(|&p| self.columns[p].clone()).collect())
    }

    /// `self` followed by `other`, keeping colliding names as they are.
    pub fn concat(&self, other: &Schema) -> Schema {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Schema::from_columns_unchecked(columns)
    }
}

//! # relcore - Indexed Relational Tables
//!
//! relcore is an in-memory relational engine: typed tables with the classic
//! relational-algebra operators, each table backed by its own ordered or
//! associative index. This implementation prioritizes:
//!
//! - **Index-driven joins**: primary-key/foreign-key joins probe an index
//!   instead of looping over every pair
//! - **Interchangeable indexes**: a B+tree and a linear hash table behind one
//!   capability, selectable per table
//! - **Owned results**: every operator returns a fresh table, sources are
//!   never mutated
//!
//! ## Quick Start
//!
//! ```ignore
//! use relcore::{NameSeq, Schema, Table};
//!
//! let schema = Schema::from_names(&["name", "address", "presNo"],
//!                                 &["String", "String", "Integer"])?;
//! let mut studio = Table::new("studio", schema, &["name"])?;
//! studio.insert(vec!["Fox".into(), "Los_Angeles".into(), 7777.into()])?;
//!
//! let mut names = NameSeq::new();
//! let joined = movie.join(&["studioName"], &["name"], &studio, &mut names)?;
//! println!("{}", joined);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Table + operators (table)          │
//! │   project select union minus join    │
//! ├───────────────────┬─────────────────┤
//! │  Schema (schema)  │  TableIndex      │
//! │  names, domains   │  (index)         │
//! ├───────────────────┼─────────────────┤
//! │                   │ BPlusTree        │
//! │                   │ LinearHashMap    │
//! ├───────────────────┴─────────────────┤
//! │   Value / KeyType / DataType (types) │
//! ├─────────────────────────────────────┤
//! │   Tunables (config)                  │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: Index geometry and display constants
//! - [`types`]: Scalar values, domain kinds, composite keys
//! - [`index`]: `OrderedIndex`, `BPlusTree`, `LinearHashMap`, `IndexKind`
//! - [`schema`]: Attribute lists, compatibility, temporary names
//! - [`table`]: Relations and the relational operators
//!
//! ## Logging
//!
//! Operators emit `tracing` events (`relcore::ra`, `relcore::dml`,
//! `relcore::index`). The library never installs a subscriber.

pub mod config;
pub mod index;
pub mod schema;
pub mod table;
pub mod types;

pub use index::{BPlusTree, IndexKind, LinearHashMap, OrderedIndex};
pub use schema::{ColumnDef, NameSeq, Schema};
pub use table::{Table, TableError};
pub use types::{DataType, KeyType, Tuple, Value};

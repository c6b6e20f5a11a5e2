//! # Type System for relcore
//!
//! This module provides the scalar domain kinds, the runtime value
//! representation, and the composite key used by every index.
//!
//! ## Module Structure
//!
//! - `data_type`: Closed `DataType` enum and declaration-name mapping
//! - `value`: Tagged scalar `Value` with a total order and hashing
//! - `key`: Composite `KeyType` built from tuple positions
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `DataType` | Domain kind of a column |
//! | `Value` | One scalar in a tuple |
//! | `Tuple` | Fixed-length row of values |
//! | `KeyType` | Ordered, hashable index key |
//!
//! ## Usage
//!
//! ```ignore
//! use relcore::types::{KeyType, Value};
//!
//! let film: Vec<Value> = vec!["Star_Wars".into(), 1977.into(), 124.into()];
//! let key = KeyType::project(&film, &[0, 1]);
//! ```

mod data_type;
mod key;
mod value;

pub use data_type::DataType;
pub use key::KeyType;
pub use value::Value;

/// A row: one value per schema attribute, in schema order.
pub type Tuple = Vec<Value>;

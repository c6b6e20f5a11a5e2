//! # Composite Index Keys
//!
//! `KeyType` is the unit of identity for every index lookup. It wraps the
//! values found at a table's key positions (or, for union dedup, every
//! position of a tuple).
//!
//! - Equality: same length and elementwise equal, in order.
//! - Ordering: lexicographic; the first differing element decides, and a
//!   strict prefix sorts before the longer key.
//! - Hashing: a pure, order-sensitive function of the elements. Two keys
//!   built from different tuples hash identically whenever they are equal.
//!
//! Most keys have one to four parts, so the parts live inline in a
//! `SmallVec` and only spill to the heap for wide composite keys.

use super::Value;
use smallvec::SmallVec;
use std::fmt;

const INLINE_KEY_PARTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyType {
    parts: SmallVec<[Value; INLINE_KEY_PARTS]>,
}

impl KeyType {
    pub fn new(parts: impl IntoIterator<Item = Value>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
        }
    }

    /// Builds a key from the values of `tuple` at `positions`, in that order.
    ///
    /// Positions come from schema lookups and are always in bounds for a
    /// tuple that passed the owning table's type check.
    pub fn project(tuple: &[Value], positions: &[usize]) -> Self {
        Self {
            parts: positions.iter().map(|&p| tuple[p].clone()).collect(),
        }
    }

    pub fn parts(&self) -> &[Value] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<Value> for KeyType {
    fn from(v: Value) -> Self {
        Self::new([v])
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", part)?;
        }
        f.write_str(")")
    }
}

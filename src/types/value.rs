//! # Scalar Values
//!
//! `Value` is the tagged scalar stored in every tuple position. Unlike SQL
//! values there is no NULL: every position holds a value of its column's kind.
//!
//! ## Ordering and Equality
//!
//! Values are totally ordered so they can serve as index keys:
//!
//! - Same kind: natural order of the payload. Floats use IEEE 754
//!   `total_cmp`, so `-0.0 < 0.0` and NaN sorts above every number.
//! - Different kinds: ordered by kind discriminant (`Int < Long < ... < Text`).
//!   Kinds are never coerced; `Int(1)` and `Long(1)` are distinct values.
//!
//! `Eq` and `Hash` agree with `Ord`: floats compare and hash by bit pattern,
//! and the kind tag is part of the hash.

use super::DataType;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A scalar value of one of the fixed domain kinds.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Float(f32),
    Double(f64),
    Char(char),
    Text(String),
}

impl Value {
    /// Returns the domain kind of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::Short(_) => DataType::Short,
            Value::Byte(_) => DataType::Byte,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Char(_) => DataType::Char,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Widens any integer kind to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(i) => Some(*i),
            Value::Short(i) => Some(i64::from(*i)),
            Value::Byte(i) => Some(i64::from(*i)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Short(a), Value::Short(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.data_type().cmp(&other.data_type()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.data_type() as u8).hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Long(i) => i.hash(state),
            Value::Short(i) => i.hash(state),
            Value::Byte(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Double(f) => f.to_bits().hash(state),
            Value::Char(c) => c.hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(i) => write!(f, "{}", i),
            Value::Short(i) => write!(f, "{}", i),
            Value::Byte(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    i32 => Int,
    i64 => Long,
    i16 => Short,
    i8 => Byte,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Text,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

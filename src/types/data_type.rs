//! # Scalar Domain Kinds
//!
//! `DataType` is the closed set of domains a column may declare. Every
//! `Value` carries exactly one of these kinds, and `Table::insert` checks each
//! position of a tuple against the schema by comparing kinds directly.
//!
//! ## Kinds
//!
//! | Kind | Rust Type | Declared As |
//! |------|-----------|-------------|
//! | Int | i32 | `Integer` |
//! | Long | i64 | `Long` |
//! | Short | i16 | `Short` |
//! | Byte | i8 | `Byte` |
//! | Float | f32 | `Float` |
//! | Double | f64 | `Double` |
//! | Char | char | `Character` |
//! | Text | String | `String` |
//!
//! The "Declared As" column is the domain-kind name used by the schema
//! declaration surface (`Schema::from_names`).

use std::fmt;

/// Domain kind of a column or a scalar value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    Int = 0,
    Long = 1,
    Short = 2,
    Byte = 3,
    Float = 4,
    Double = 5,
    Char = 6,
    Text = 7,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Int,
        DataType::Long,
        DataType::Short,
        DataType::Byte,
        DataType::Float,
        DataType::Double,
        DataType::Char,
        DataType::Text,
    ];

    /// Returns the declaration name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "Integer",
            DataType::Long => "Long",
            DataType::Short => "Short",
            DataType::Byte => "Byte",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::Char => "Character",
            DataType::Text => "String",
        }
    }

    /// Resolves a declaration name to a kind, or `None` for an unknown domain.
    pub fn from_name(name: &str) -> Option<DataType> {
        Self::ALL.iter().copied().find(|dt| dt.name() == name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

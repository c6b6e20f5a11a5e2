use crate::types::DataType;

/// Structured failure kinds raised by table construction and the operators.
///
/// These travel inside an `eyre::Report`; recover them with
/// `report.downcast_ref::<TableError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A tuple (or a domain list) has the wrong number of values.
    ArityMismatch { expected: usize, actual: usize },
    /// A tuple value's kind disagrees with its schema position.
    DomainMismatch {
        position: usize,
        expected: DataType,
        actual: DataType,
    },
    /// Union or minus over tables whose domain-kind sequences differ.
    Incompatible { reason: String },
    UnknownAttribute { table: String, attribute: String },
    UnknownDomain(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::ArityMismatch { expected, actual } => {
                write!(f, "arity mismatch: expected {} values, got {}", expected, actual)
            }
            TableError::DomainMismatch {
                position,
                expected,
                actual,
            } => write!(
                f,
                "domain mismatch at position {}: expected {}, got {}",
                position, expected, actual
            ),
            TableError::Incompatible { reason } => write!(f, "incompatible tables: {}", reason),
            TableError::UnknownAttribute { table, attribute } => {
                write!(f, "table '{}' has no attribute '{}'", table, attribute)
            }
            TableError::UnknownDomain(name) => write!(f, "unknown domain kind '{}'", name),
        }
    }
}

impl std::error::Error for TableError {}

//! Sequential names for tables produced by relational operators.

/// Caller-owned generator of temporary table names (`temp0`, `temp1`, ...).
#[derive(Debug, Clone)]
pub struct NameSeq {
    prefix: String,
    next: u64,
}

impl NameSeq {
    pub fn new() -> Self {
        Self::with_prefix("temp")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        name
    }

    /// How many names have been handed out.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

impl Default for NameSeq {
    fn default() -> Self {
        Self::new()
    }
}

//! Boxed text rendering of a table.
//!
//! ```text
//!  Table studio
//! |-----------------------------------------------|
//! |            name        address         presNo |
//! |-----------------------------------------------|
//! |             Fox    Los_Angeles           7777 |
//! |-----------------------------------------------|
//! ```
//!
//! Every cell is right-aligned to `DISPLAY_COLUMN_WIDTH`; longer values are
//! printed in full and push the row wider.

use super::Table;
use crate::config::DISPLAY_COLUMN_WIDTH;
use std::fmt;

fn rule(f: &mut fmt::Formatter<'_>, columns: usize) -> fmt::Result {
    writeln!(f, "|-{}-|", "-".repeat(columns * DISPLAY_COLUMN_WIDTH))
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.schema.len();
        writeln!(f, " Table {}", self.name)?;
        rule(f, columns)?;
        f.write_str("| ")?;
        for name in self.schema.names() {
            write!(f, "{:>width$}", name, width = DISPLAY_COLUMN_WIDTH)?;
        }
        f.write_str(" |\n")?;
        rule(f, columns)?;
        for tuple in &self.tuples {
            f.write_str("| ")?;
            for value in tuple {
                write!(f, "{:>width$}", value.to_string(), width = DISPLAY_COLUMN_WIDTH)?;
            }
            f.write_str(" |\n")?;
        }
        rule(f, columns)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::Schema;
    use crate::table::Table;

    #[test]
    fn renders_header_rows_and_rules() {
        let schema = Schema::from_names(&["name", "presNo"], &["String", "Integer"]).unwrap();
        let t = Table::from_tuples(
            "studio",
            schema,
            &["name"],
            [vec!["Fox".into(), 7777.into()]],
        )
        .unwrap();

        let text = t.to_string();
        let lines: Vec<&str> = text.lines().collect();
        let rule = format!("|-{}-|", "-".repeat(30));

        assert_eq!(lines[0], " Table studio");
        assert_eq!(lines[1], rule);
        assert_eq!(lines[2], format!("| {:>15}{:>15} |", "name", "presNo"));
        assert_eq!(lines[3], rule);
        assert_eq!(lines[4], format!("| {:>15}{:>15} |", "Fox", "7777"));
        assert_eq!(lines[5], rule);
        assert_eq!(lines.len(), 6);
    }
}

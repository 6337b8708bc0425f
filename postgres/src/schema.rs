//! Names of the destination schema objects.

/// Schema holding all scikgdash statement data.
pub const STATEMENTS_SCHEMA: &str = "scikgdash_stmt";

/// Table holding per-paper statement counts, keyed by paper id.
pub const STATEMENT_COUNTS_TABLE: &str = "papers_statement_counts";

/// Returns the fully qualified name of the statement counts table.
pub fn statement_counts_table() -> String {
    format!("{STATEMENTS_SCHEMA}.{STATEMENT_COUNTS_TABLE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_table_name() {
        assert_eq!(
            statement_counts_table(),
            "scikgdash_stmt.papers_statement_counts"
        );
    }
}

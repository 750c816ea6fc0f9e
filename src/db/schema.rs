//! SQL DDL for initializing the database schema.

/// SQLite schema: the single `patients` table.
///
/// `AUTOINCREMENT` keeps ids strictly increasing and never reused, even after
/// rows are deleted by client-supplied statements.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    age INTEGER,
    gender TEXT
);
"#;

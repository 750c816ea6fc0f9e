//! Verb-prefix gate for client-supplied SQL.
//!
//! This is the only check applied to raw statements before they reach the
//! store. It does not parse SQL: a statement is admitted when its trimmed,
//! upper-cased text starts with the expected keyword.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementVerb {
    /// Accepted by `POST /api/query`.
    Insert,
    /// Accepted by `GET /api/query`.
    Select,
}

impl StatementVerb {
    pub fn keyword(self) -> &'static str {
        match self {
            StatementVerb::Insert => "INSERT",
            StatementVerb::Select => "SELECT",
        }
    }

    /// Fixed plain-text body returned when a statement fails the gate.
    pub fn rejection_message(self) -> &'static str {
        match self {
            StatementVerb::Insert => "Only INSERT queries are allowed via POST.",
            StatementVerb::Select => "Only SELECT queries are allowed via GET.",
        }
    }

    pub fn admits(self, sql: &str) -> bool {
        sql.trim().to_uppercase().starts_with(self.keyword())
    }
}

impl fmt::Display for StatementVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

use thiserror::Error as ThisError;

/// Failures raised by the store layer.
#[derive(Debug, ThisError)]
pub enum PatientsError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    /// A JSON object or array was supplied where a column value was expected.
    #[error("Unsupported value for `{field}`: objects and arrays cannot be stored")]
    UnsupportedValue { field: &'static str },
}

use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

use super::PatientsError;
use crate::statement::StatementVerb;

pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// Which endpoint a store failure came from; selects the generic 500 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreContext {
    Insert,
    Query,
}

impl StoreContext {
    pub fn failure_message(self) -> &'static str {
        match self {
            StoreContext::Insert => "Error inserting patient data.",
            StoreContext::Query => "Error executing query.",
        }
    }
}

/// Errors surfaced at the request boundary. Every variant renders as a
/// plain-text response; none escapes the handler that produced it.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Body unreadable, not JSON, or missing a required field.
    #[error("{0}")]
    MalformedInput(String),

    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),

    /// SQL did not carry the verb prefix the endpoint accepts. Never executed.
    #[error("statement rejected: expected {0}")]
    RejectedStatement(StatementVerb),

    #[error("store failure during {context:?}: {source}")]
    StoreFailure {
        context: StoreContext,
        #[source]
        source: PatientsError,
    },

    #[error("Not Found")]
    NotFound,
}

impl ApiError {
    pub fn store(context: StoreContext) -> impl FnOnce(PatientsError) -> Self {
        move |source| ApiError::StoreFailure { context, source }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::MalformedInput(format!("Invalid JSON body: {e}"))
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::MalformedInput(format!("Failed to read request body: {rejection}"))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedInput(format!("Invalid query string: {rejection}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedInput(message) => {
                tracing::warn!(message = %message, "Malformed request rejected");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::MissingParameter(name) => {
                let message = format!("Missing required query parameter: {name}");
                tracing::warn!(message = %message, "Request missing parameter");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::RejectedStatement(verb) => {
                tracing::warn!(expected = %verb, "Statement rejected by verb gate");
                (StatusCode::BAD_REQUEST, verb.rejection_message()).into_response()
            }
            ApiError::StoreFailure { context, source } => {
                // Detail stays in the log; the client only sees the fixed message.
                tracing::error!(context = ?context, error = %source, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    context.failure_message(),
                )
                    .into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
        }
    }
}

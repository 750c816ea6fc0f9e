use serde::{Deserialize, Serialize};

/// Body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecuteQueryRequest {
    pub query: String,
}

/// Query string of `GET /api/query`.
///
/// `sql` stays optional here so its absence can be reported as a missing
/// parameter instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectQueryParams {
    #[serde(default)]
    pub sql: Option<String>,
}

use crate::db::JsonRow;
use crate::error::{ApiError, StoreContext};
use crate::server::extract::{ExactTarget, JsonBody};
use crate::server::router::AppState;
use crate::statement::StatementVerb;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use patients_schema::{ExecuteQueryRequest, SelectQueryParams};
use tracing::debug;

pub const QUERY_OK_MESSAGE: &str = "Query executed successfully.";

/// POST /api/query
///
/// Runs a client-supplied statement if it starts with `INSERT`.
pub async fn insert_query(
    State(state): State<AppState>,
    _target: ExactTarget,
    JsonBody(body): JsonBody<ExecuteQueryRequest>,
) -> Result<&'static str, ApiError> {
    if !StatementVerb::Insert.admits(&body.query) {
        return Err(ApiError::RejectedStatement(StatementVerb::Insert));
    }

    let rows_affected = state
        .db
        .execute_unsafe_statement(body.query)
        .await
        .map_err(ApiError::store(StoreContext::Query))?;

    debug!(rows_affected, "Client INSERT executed");
    Ok(QUERY_OK_MESSAGE)
}

/// GET /api/query?sql=...
///
/// Runs a client-supplied statement if it starts with `SELECT` and returns the
/// rows as a JSON array, in the order the store produced them.
pub async fn select_query(
    State(state): State<AppState>,
    params: Result<Query<SelectQueryParams>, QueryRejection>,
) -> Result<Json<Vec<JsonRow>>, ApiError> {
    let Query(params) = params?;
    let sql = params.sql.ok_or(ApiError::MissingParameter("sql"))?;

    if !StatementVerb::Select.admits(&sql) {
        return Err(ApiError::RejectedStatement(StatementVerb::Select));
    }

    let rows = state
        .db
        .select_rows(sql)
        .await
        .map_err(ApiError::store(StoreContext::Query))?;

    debug!(rows = rows.len(), "Client SELECT executed");
    Ok(Json(rows))
}

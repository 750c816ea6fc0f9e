use crate::db::PatientCreate;
use crate::error::{ApiError, StoreContext};
use crate::server::extract::{ExactTarget, JsonBody};
use crate::server::router::AppState;
use crate::utils::logging::pretty_json_for_debug;
use axum::extract::State;
use patients_schema::InsertPatientRequest;
use serde_json::{Map, Value};
use tracing::debug;

pub const INSERT_OK_MESSAGE: &str = "Patient data inserted successfully.";

/// POST /api/insert
///
/// Stores `{name, age, gender}` as a new row, each value bound by its JSON
/// type. The body must be a JSON object; the assigned id is not returned.
pub async fn insert_patient(
    State(state): State<AppState>,
    _target: ExactTarget,
    JsonBody(object): JsonBody<Map<String, Value>>,
) -> Result<&'static str, ApiError> {
    let body = InsertPatientRequest::from(object);
    if let Some(pretty_body) = pretty_json_for_debug(&body) {
        debug!(body = %pretty_body, "Insert patient payload");
    }

    let create =
        PatientCreate::try_from(body).map_err(|e| ApiError::MalformedInput(e.to_string()))?;

    let id = state
        .db
        .insert_patient(create)
        .await
        .map_err(ApiError::store(StoreContext::Insert))?;

    debug!(id, "Patient row inserted");
    Ok(INSERT_OK_MESSAGE)
}

use crate::server::router::{AppState, not_found_handler};
use axum::{
    Router,
    routing::{get, post},
};

pub mod patients;
pub mod query;

/// `/api` routes. A known path hit with an unsupported method answers 404,
/// same as an unknown path. `HEAD` is listed explicitly because `get` would
/// otherwise answer it by running the SELECT.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/insert",
            post(patients::insert_patient).fallback(not_found_handler),
        )
        .route(
            "/api/query",
            get(query::select_query)
                .head(not_found_handler)
                .post(query::insert_query)
                .fallback(not_found_handler),
        )
}

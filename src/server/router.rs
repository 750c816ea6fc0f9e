use crate::db::DbActorHandle;
use crate::error::ApiError;
use crate::server::routes;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::{
        HeaderName, HeaderValue, Method, StatusCode, Version,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, USER_AGENT,
        },
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use rand::RngCore;
use std::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const CORS_ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
const CORS_ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, POST, OPTIONS");
const CORS_ALLOW_HEADERS: HeaderValue = HeaderValue::from_static(
    "Content-Type, Access-Control-Allow-Headers, Authorization, X-Requested-With",
);

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

/// Shared state handed to every handler. The store handle is built once at
/// startup and owned here.
#[derive(Clone)]
pub struct AppState {
    pub db: DbActorHandle,
}

impl AppState {
    pub fn new(db: DbActorHandle) -> Self {
        Self { db }
    }
}

pub(crate) async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

/// Answers every `OPTIONS` request with an empty 200 before routing.
async fn cors_preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Always reflect `x-request-id` for easier correlation, even if the client didn't send one.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    let line = format!(
        "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
        status.as_u16(),
        request_id,
        method.as_str(),
        protocol,
        path,
        latency_ms,
        user_agent
    );
    if status.is_server_error() {
        error!("{line}");
    } else if status.is_client_error() {
        warn!("{line}");
    } else {
        info!("{line}");
    }

    resp
}

pub fn patients_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .fallback(not_found_handler)
        .with_state(state)
        // Bodies are buffered whole, with no size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(cors_preflight))
        // CORS headers go on every response, including preflights, errors and 404s.
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            CORS_ALLOW_ORIGIN,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            CORS_ALLOW_METHODS,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            CORS_ALLOW_HEADERS,
        ))
        .layer(middleware::from_fn(access_log))
}

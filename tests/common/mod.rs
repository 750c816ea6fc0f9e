#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode},
};
use patients::server::{AppState, patients_router};
use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// Temp SQLite file removed (with its WAL/SHM side files) on drop.
pub struct TestDb {
    path: PathBuf,
}

impl TestDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "patients-{tag}-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            NEXT_DB.fetch_add(1, Ordering::Relaxed)
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let base = self.path.to_string_lossy().into_owned();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{base}{suffix}"));
        }
    }
}

pub async fn app(db: &TestDb) -> Router {
    let handle = patients::db::spawn(&db.url())
        .await
        .expect("failed to spawn DbActor");
    patients_router(AppState::new(handle))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body was not JSON")
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = String::from_utf8(body.to_vec()).expect("response body was not utf-8");
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("failed to build request")
}

pub fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

pub fn select_uri(sql: &str) -> String {
    format!("/api/query?sql={}", encode_query(sql))
}

pub async fn select(app: &Router, sql: &str) -> Vec<serde_json::Value> {
    let resp = send(app, get(&select_uri(sql))).await;
    assert_eq!(resp.status, StatusCode::OK, "select failed: {}", resp.body);
    resp.json()
        .as_array()
        .cloned()
        .expect("select result was not an array")
}

pub async fn count_patients(app: &Router) -> i64 {
    let rows = select(app, "SELECT COUNT(*) AS n FROM patients").await;
    rows[0]["n"].as_i64().expect("count was not an integer")
}

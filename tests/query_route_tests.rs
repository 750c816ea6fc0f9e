mod common;

use axum::http::StatusCode;
use common::{TestDb, app, count_patients, get, post_json, select, select_uri, send};
use serde_json::json;

async fn seed(app: &axum::Router) {
    for (name, age, gender) in [("Kid", 9, "M"), ("Ann", 34, "F"), ("Old", 81, "F"), ("Teen", 18, "X")] {
        let resp = send(
            app,
            post_json(
                "/api/insert",
                json!({"name": name, "age": age, "gender": gender}).to_string(),
            ),
        )
        .await;
        assert_eq!(resp.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn post_query_runs_insert_statements() {
    let db = TestDb::new("query-insert");
    let app = app(&db).await;
    let before = count_patients(&app).await;

    let resp = send(
        &app,
        post_json(
            "/api/query",
            json!({"query": "INSERT INTO patients (name, age, gender) VALUES ('Alice', 30, 'F')"})
                .to_string(),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "Query executed successfully.");
    assert_eq!(count_patients(&app).await, before + 1);

    // Leading whitespace and lower case still pass the gate.
    let resp = send(
        &app,
        post_json(
            "/api/query",
            json!({"query": "  \n insert into patients (name) values ('Bo')"}).to_string(),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(count_patients(&app).await, before + 2);
}

#[tokio::test]
async fn post_query_rejects_non_insert_without_executing() {
    let db = TestDb::new("query-post-reject");
    let app = app(&db).await;
    seed(&app).await;

    for query in [
        "SELECT * FROM patients",
        "DELETE FROM patients",
        "UPDATE patients SET age = 0",
    ] {
        let resp = send(
            &app,
            post_json("/api/query", json!({"query": query}).to_string()),
        )
        .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(resp.body, "Only INSERT queries are allowed via POST.");
    }

    assert_eq!(count_patients(&app).await, 4);
    let ages = select(&app, "SELECT age FROM patients ORDER BY id").await;
    assert_eq!(
        ages,
        vec![json!({"age": 9}), json!({"age": 34}), json!({"age": 81}), json!({"age": 18})]
    );
}

#[tokio::test]
async fn post_query_bad_statement_is_500_with_generic_message() {
    let db = TestDb::new("query-post-500");
    let app = app(&db).await;

    let resp = send(
        &app,
        post_json(
            "/api/query",
            json!({"query": "INSERT INTO no_such_table VALUES (1)"}).to_string(),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Error executing query.");
}

#[tokio::test]
async fn post_query_malformed_body_is_400() {
    let db = TestDb::new("query-post-malformed");
    let app = app(&db).await;

    for body in ["{", "{}", r#"{"query": 42}"#] {
        let resp = send(&app, post_json("/api/query", body)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert!(resp.body.starts_with("Invalid JSON body:"), "{}", resp.body);
    }
}

#[tokio::test]
async fn get_query_filters_and_projects_columns() {
    let db = TestDb::new("query-get-filter");
    let app = app(&db).await;
    seed(&app).await;

    let resp = send(
        &app,
        get(&select_uri("SELECT name, age FROM patients WHERE age > 18")),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"))
    );

    let rows = resp.json();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let obj = row.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "age"]);
        assert!(obj["age"].as_i64().unwrap() > 18);
    }
}

#[tokio::test]
async fn get_query_rejects_non_select_without_executing() {
    let db = TestDb::new("query-get-reject");
    let app = app(&db).await;
    seed(&app).await;

    let resp = send(&app, get(&select_uri("UPDATE patients SET age=1"))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, "Only SELECT queries are allowed via GET.");

    let ages = select(&app, "select age from patients where age = 1").await;
    assert!(ages.is_empty(), "a row was altered: {ages:?}");
}

#[tokio::test]
async fn get_query_trailing_write_statements_do_not_run() {
    let db = TestDb::new("query-get-readonly");
    let app = app(&db).await;
    seed(&app).await;

    for sql in [
        "SELECT 1 AS x; DELETE FROM patients",
        "SELECT * FROM patients;\nUPDATE patients SET age = 1",
        "select 1; DROP TABLE patients",
    ] {
        let resp = send(&app, get(&select_uri(sql))).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR, "sql {sql:?}");
        assert_eq!(resp.body, "Error executing query.");
    }

    assert_eq!(count_patients(&app).await, 4);
    let ages = select(&app, "SELECT age FROM patients ORDER BY id").await;
    assert_eq!(ages, vec![json!({"age": 9}), json!({"age": 34}), json!({"age": 81}), json!({"age": 18})]);

    // Writes through POST are unaffected by the read-only GET path.
    let resp = send(
        &app,
        post_json(
            "/api/query",
            json!({"query": "INSERT INTO patients (name) VALUES ('After')"}).to_string(),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(count_patients(&app).await, 5);
}

#[tokio::test]
async fn get_query_missing_sql_is_400() {
    let db = TestDb::new("query-get-missing");
    let app = app(&db).await;

    for uri in ["/api/query", "/api/query?other=1"] {
        let resp = send(&app, get(uri)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(resp.body, "Missing required query parameter: sql");
    }
}

#[tokio::test]
async fn get_query_bad_select_is_500_and_empty_result_is_empty_array() {
    let db = TestDb::new("query-get-500");
    let app = app(&db).await;

    let resp = send(&app, get(&select_uri("SELECT * FROM missing_table"))).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Error executing query.");

    let resp = send(&app, get(&select_uri("SELECT * FROM patients"))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "[]");
}

#[tokio::test]
async fn get_query_decodes_plus_and_percent_encoding() {
    let db = TestDb::new("query-get-decode");
    let app = app(&db).await;
    seed(&app).await;

    let resp = send(
        &app,
        get("/api/query?sql=SELECT+name+FROM+patients+WHERE+name+%3D+%27Ann%27"),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!([{"name": "Ann"}]));
}

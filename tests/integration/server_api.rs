//! Integration tests for the reference task service HTTP API.
//!
//! Starts the server in-process on an ephemeral port and talks raw JSON to
//! it, checking status codes, wire field names and the completion-time
//! rules.
//!
//! Verification command: `cargo test --test server_api`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use taskboard_server::server;

// =============================================================================
// Test helpers
// =============================================================================

/// Starts a fresh server and returns its API base URL (with trailing slash).
async fn start() -> String {
    let (addr, _handle) = server::start_server("127.0.0.1:0")
        .await
        .expect("start server");
    format!("http://{addr}/api/")
}

async fn create(client: &reqwest::Client, base: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{base}tasks"))
        .json(&body)
        .send()
        .await
        .expect("POST tasks")
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_reports_service_name() {
    let base = start().await;
    let body: Value = reqwest::get(format!("{base}health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "healthy", "service": "taskboard"}));
}

#[tokio::test]
async fn create_returns_201_with_wire_fields() {
    let base = start().await;
    let client = reqwest::Client::new();

    let resp = create(&client, &base, json!({"titulo": "Buy milk"})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["titulo"], "Buy milk");
    assert_eq!(body["status"], "pendente");
    assert!(body["descricao"].is_null());
    assert!(body["data_criacao"].is_string());
    assert!(body["data_atualizacao"].is_null());
}

#[tokio::test]
async fn create_accepts_english_field_names() {
    let base = start().await;
    let client = reqwest::Client::new();

    let resp = create(
        &client,
        &base,
        json!({"title": "Pay rent", "description": "before friday"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["titulo"], "Pay rent");
    assert_eq!(body["descricao"], "before friday");
}

#[tokio::test]
async fn blank_title_is_422_with_detail() {
    let base = start().await;
    let client = reqwest::Client::new();

    let resp = create(&client, &base, json!({"titulo": "   "})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn list_keeps_insertion_order_and_paginates() {
    let base = start().await;
    let client = reqwest::Client::new();
    for title in ["a", "b", "c"] {
        create(&client, &base, json!({"titulo": title})).await;
    }

    let all: Vec<Value> = client
        .get(format!("{base}tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<&str> = all.iter().map(|t| t["titulo"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);

    let page: Vec<Value> = client
        .get(format!("{base}tasks?skip=1&limit=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["titulo"], "b");
}

#[tokio::test]
async fn status_change_stamps_and_clears_completion_time() {
    let base = start().await;
    let client = reqwest::Client::new();
    create(&client, &base, json!({"titulo": "t"})).await;
    let url = format!("{base}tasks/1");

    let done: Value = client
        .put(&url)
        .json(&json!({"status": "concluida"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(done["status"], "concluida");
    assert!(done["data_atualizacao"].is_string());

    let reopened: Value = client
        .put(&url)
        .json(&json!({"status": "pendente"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reopened["status"], "pendente");
    assert!(reopened["data_atualizacao"].is_null());
}

#[tokio::test]
async fn partial_update_leaves_other_fields() {
    let base = start().await;
    let client = reqwest::Client::new();
    create(&client, &base, json!({"titulo": "t", "descricao": "keep me"})).await;

    let body: Value = client
        .put(format!("{base}tasks/1"))
        .json(&json!({"titulo": "renamed"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["titulo"], "renamed");
    assert_eq!(body["descricao"], "keep me");
    assert_eq!(body["status"], "pendente");
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let base = start().await;
    let client = reqwest::Client::new();
    let url = format!("{base}tasks/99");

    assert_eq!(
        client.get(&url).send().await.unwrap().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client
            .put(&url)
            .json(&json!({"status": "concluida"}))
            .send()
            .await
            .unwrap()
            .status(),
        StatusCode::NOT_FOUND
    );
    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn delete_returns_204_and_removes() {
    let base = start().await;
    let client = reqwest::Client::new();
    create(&client, &base, json!({"titulo": "gone"})).await;
    create(&client, &base, json!({"titulo": "stays"})).await;

    let resp = client
        .delete(format!("{base}tasks/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let all: Vec<Value> = client
        .get(format!("{base}tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["titulo"], "stays");
}

#[tokio::test]
async fn null_description_clears_it() {
    let base = start().await;
    let client = reqwest::Client::new();
    create(&client, &base, json!({"titulo": "t", "descricao": "old notes"})).await;
    let url = format!("{base}tasks/1");

    let untouched: Value = client
        .put(&url)
        .json(&json!({"status": "pendente"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(untouched["descricao"], "old notes");

    let cleared: Value = client
        .put(&url)
        .json(&json!({"descricao": null}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cleared["descricao"].is_null());
    assert_eq!(cleared["titulo"], "t");
}

mod common;

use common::StubProvider;
use serde_json::{Value, json};
use std::net::SocketAddr;

use tamil_dialect_translator::{TranslationError, Translator, server};

async fn post_form(addr: SocketAddr, body: &'static str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .unwrap()
}

async fn start_app(stub: StubProvider) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve(listener, Translator::new(stub)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn form_page_lists_dialects() {
    let addr = start_app(StubProvider::replying("unused")).await;
    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Enter an English sentence:"));
    assert!(html.contains("Select a Tamil dialect:"));
    for label in ["Chennai", "Kanyakumari", "Coimbatore"] {
        assert!(html.contains(&format!(r#"value="{}""#, label)));
    }
}

#[tokio::test]
async fn form_submit_shows_translation() {
    let stub = StubProvider::replying("Eppadi irukkinga?");
    let addr = start_app(stub.clone()).await;
    let response = post_form(addr, "text=How+are+you%3F&dialect=Chennai").await;
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Translated in Chennai dialect:"));
    assert!(html.contains("Eppadi irukkinga?"));
    assert!(html.contains(r#"value="How are you?""#));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn form_submit_without_text_warns() {
    let stub = StubProvider::replying("unused");
    let addr = start_app(stub.clone()).await;
    let response = post_form(addr, "text=&dialect=Kanyakumari").await;
    let html = response.text().await.unwrap();
    assert!(html.contains("Please fill in both the English sentence and select a dialect."));
    assert!(!html.contains("translated-text-box"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn json_translate_success() {
    let stub = StubProvider::replying("Enga poringa?");
    let addr = start_app(stub.clone()).await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/translate", addr))
        .json(&json!({"text": "Where are you going?", "dialect": "coimbatore"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"dialect": "Coimbatore", "translated": "Enga poringa?"})
    );
}

#[tokio::test]
async fn json_translate_error_statuses() {
    let cases = [
        (
            TranslationError::Authentication("API key not found".to_string()),
            401,
            "authentication",
        ),
        (
            TranslationError::ServiceUnavailable("request timed out".to_string()),
            502,
            "service_unavailable",
        ),
        (
            TranslationError::MalformedResponse("no candidate".to_string()),
            502,
            "malformed_response",
        ),
    ];
    for (error, status, kind) in cases {
        let stub = StubProvider::failing(error);
        let addr = start_app(stub.clone()).await;
        let response = reqwest::Client::new()
            .post(format!("http://{}/translate", addr))
            .json(&json!({"text": "Hello", "dialect": "Chennai"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), status);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["kind"], kind);
        assert_eq!(stub.calls(), 1);
    }
}

#[tokio::test]
async fn json_translate_validation() {
    let stub = StubProvider::replying("unused");
    let addr = start_app(stub.clone()).await;
    let client = reqwest::Client::new();

    let missing_dialect = client
        .post(format!("http://{}/translate", addr))
        .json(&json!({"text": "Hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_dialect.status().as_u16(), 400);

    let unknown_dialect = client
        .post(format!("http://{}/translate", addr))
        .json(&json!({"text": "Hello", "dialect": "Madurai"}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_dialect.status().as_u16(), 400);
    let body: Value = unknown_dialect.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Madurai"));

    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn dialects_and_health() {
    let addr = start_app(StubProvider::replying("unused")).await;
    let dialects: Value = reqwest::get(format!("http://{}/dialects", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dialects, json!(["Chennai", "Kanyakumari", "Coimbatore"]));

    let health = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(
        health.headers()["access-control-allow-origin"],
        "*"
    );
}

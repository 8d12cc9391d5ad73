use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use inkwell_invoice::config::AppConfig;
use inkwell_invoice::server::build_app;

fn app_with_dir(invoices_dir: PathBuf) -> Router {
    build_app(AppConfig {
        invoices_dir,
        ..AppConfig::default()
    })
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("inkwell-invoice-api-{}-{}", name, std::process::id()))
}

fn acme() -> Value {
    json!({
        "clientName": "Acme",
        "fromName": "Jane",
        "invoiceNumber": "INV-20240001-001",
        "date": "2024-01-15",
        "items": [
            { "description": "Consulting", "quantity": 2, "price": 150.0 }
        ]
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn render_returns_pdf_attachment() {
    let app = app_with_dir(scratch_dir("render"));
    let response = app.oneshot(post_json("/render-pdf", &acme())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"invoice-INV-20240001-001.pdf\""));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn render_accepts_template_query() {
    let app = app_with_dir(scratch_dir("badge"));
    let response = app
        .oneshot(post_json("/render-pdf?template=badge", &acme()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn invalid_record_is_rejected_with_field_errors() {
    let mut record = acme();
    record["clientName"] = json!("  ");
    record["items"][0]["quantity"] = json!(0);

    let app = app_with_dir(scratch_dir("invalid"));
    let response = app.oneshot(post_json("/render-pdf", &record)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["clientName", "items.0.quantity"]);
}

#[tokio::test]
async fn save_writes_file_into_invoice_dir() {
    let dir = scratch_dir("save");
    let app = app_with_dir(dir.clone());

    let request = json!({ "fileName": "invoice-1.pdf", "content": [37, 80, 68, 70] });
    let response = app.oneshot(post_json("/save-invoice", &request)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    assert_eq!(std::fs::read(dir.join("invoice-1.pdf")).unwrap(), b"%PDF");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn save_rejects_path_traversal() {
    let dir = scratch_dir("traversal");
    let app = app_with_dir(dir.clone());

    let request = json!({ "fileName": "../x.pdf", "content": [1, 2, 3] });
    let response = app.oneshot(post_json("/save-invoice", &request)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid file name" }));
    assert!(!dir.exists());
}

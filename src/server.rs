//! HTTP surface: `/render-pdf` and `/save-invoice`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::delivery::InvoiceStore;
use crate::error::{DeliveryError, GenerationError};
use crate::invoice::{validate, InvoiceRecord};
use crate::pdf::{render_pdf, RenderedInvoice};
use crate::template::TemplateKind;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: InvoiceStore,
}

pub fn build_app(config: AppConfig) -> Router {
    let store = InvoiceStore::new(config.invoices_dir.clone());
    let state = AppState {
        config: Arc::new(config),
        store,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/render-pdf", post(render_invoice))
        .route("/save-invoice", post(save_invoice))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

// ============================================================================
// RENDER
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub template: Option<TemplateKind>,
}

async fn render_invoice(
    State(state): State<AppState>,
    Query(query): Query<RenderQuery>,
    Json(record): Json<InvoiceRecord>,
) -> Response {
    let errors = validate(&record);
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "validation_error",
                "fields": errors,
            })),
        )
            .into_response();
    }

    let template = state.config.template(query.template);
    let rendered = tokio::task::spawn_blocking(move || render_pdf(&record, template.as_ref()))
        .await
        .unwrap_or_else(|err| {
            tracing::error!(error = %err, "render task failed");
            Err(GenerationError)
        });

    match rendered {
        Ok(invoice) => pdf_attachment(invoice),
        Err(err) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "generation_failed", err.to_string()),
    }
}

fn pdf_attachment(invoice: RenderedInvoice) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&invoice.file_name)),
        ],
        invoice.bytes,
    )
        .into_response()
}

/// `attachment` with an ASCII fallback name plus the RFC 5987 UTF-8 form.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' ' => c,
            c if c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

// ============================================================================
// SAVE
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub file_name: String,
    pub content: Vec<u8>,
}

async fn save_invoice(State(state): State<AppState>, Json(request): Json<SaveRequest>) -> Response {
    match state.store.save(&request.file_name, &request.content).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(DeliveryError::InvalidFileName(name)) => {
            tracing::warn!(file_name = %name, "rejected invoice file name");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid file name" }))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "error saving invoice");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save invoice" })),
            )
                .into_response()
        }
    }
}

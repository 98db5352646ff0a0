use crate::pipeline::{convert_file_to_json, translate_file_bytes, JsonConversion};
use crate::server::SharedState;
use crate::tabular::json::render_json;
use crate::tabular::JsonOrient;
use crate::translation::TranslationWarning;
use crate::utils::HeaderTranslatorError;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

const WARNINGS_HEADER: HeaderName = HeaderName::from_static("x-translation-warnings");
const WARNING_DETAILS_HEADER: HeaderName = HeaderName::from_static("x-translation-warning-details");

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct JsonQuery {
    pub filename: String,
    pub orient: Option<JsonOrient>,
    pub indent: Option<usize>,
    pub ascii_only: Option<bool>,
}

fn error_response(e: HeaderTranslatorError) -> Response {
    tracing::error!(error = %e, "Request failed");
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

/// Warnings as a JSON array, escaped to ASCII so it fits in a header value.
fn warning_details(warnings: &[TranslationWarning]) -> HeaderValue {
    serde_json::to_value(warnings)
        .map_err(HeaderTranslatorError::from)
        .and_then(|value| render_json(&value, None, true))
        .ok()
        .and_then(|rendered| HeaderValue::from_str(&rendered).ok())
        .unwrap_or_else(|| HeaderValue::from_static("[]"))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "header-translator",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn info() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "header-translator",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Translate spreadsheet and CSV column headers to English",
        "endpoints": {
            "GET /health": "Health check",
            "GET /info": "Server info",
            "POST /translate?filename=": "Upload a CSV/Excel file, receive it with translated headers",
            "POST /to-json?filename=&orient=&indent=&ascii_only=": "Upload a CSV file, receive JSON",
            "GET /progress": "Latest progress snapshot"
        }
    }))
}

pub async fn translate(
    State(state): State<SharedState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response {
    state.progress.clear();

    match translate_file_bytes(&state.context, &query.filename, body.to_vec()).await {
        Ok(file) => {
            state.record_warnings(&file.warnings).await;
            let disposition = format!("attachment; filename=\"{}\"", file.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, file.mime_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                    (WARNINGS_HEADER, file.warnings.len().to_string()),
                ],
                [(WARNING_DETAILS_HEADER, warning_details(&file.warnings))],
                file.bytes,
            )
                .into_response()
        }
        Err(e) => {
            state.record_warnings(&[]).await;
            error_response(e)
        }
    }
}

pub async fn to_json(
    State(state): State<SharedState>,
    Query(query): Query<JsonQuery>,
    body: Bytes,
) -> Response {
    let options = state.json_options(query.orient, query.indent, query.ascii_only);

    match convert_file_to_json(&query.filename, body.to_vec(), &options) {
        Ok(JsonConversion::Converted(json)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            json.rendered,
        )
            .into_response(),
        Ok(JsonConversion::Unsupported { warning }) => {
            Json(serde_json::json!({ "warning": warning })).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn progress(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.progress_report().await)
}

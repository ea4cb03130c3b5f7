use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use labregister_core::RegisterError;

pub fn register_error_to_response(err: RegisterError) -> axum::response::Response {
    tracing::warn!("request rejected: {err}");
    match err {
        RegisterError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        RegisterError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockbook_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::DuplicateProduct(_) => StatusCode::CONFLICT,
        DomainError::UnknownProduct(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::StorageUnavailable(detail) => {
            tracing::error!(%detail, "storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    json_error(status, err.code(), err.to_string())
}

/// Same as [`domain_error_to_response`], except that an unknown product is
/// the resource being looked up and so a 404.
pub fn lookup_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::UnknownProduct(_) => {
            json_error(StatusCode::NOT_FOUND, err.code(), err.to_string())
        }
        other => domain_error_to_response(other),
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_input", rejection.body_text())
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

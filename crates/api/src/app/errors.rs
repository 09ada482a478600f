use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Map, Value};

use stockdesk_core::DomainError;
use stockdesk_infra::ServiceError;
use stockdesk_products::FormValidation;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Invalid(report) => validation_error(&report),
        ServiceError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "product store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        ServiceError::Blob(e) => {
            tracing::error!(error = %e, "media upload failure");
            json_error(StatusCode::BAD_GATEWAY, "upload_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
        }
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

/// 400 carrying every field error; `message` is the first one in form order.
pub fn validation_error(report: &FormValidation) -> axum::response::Response {
    let errors: Map<String, Value> = report
        .errors()
        .iter()
        .map(|e| (e.field.clone(), Value::String(e.message.clone())))
        .collect();
    let message = report
        .first_error()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "invalid product".to_string());

    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "success": false,
            "error": "validation_error",
            "message": message,
            "errors": errors,
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_product_id(raw: &str) -> Result<stockdesk_core::ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

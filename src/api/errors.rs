use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::domain::customer::{CustomerError, FieldViolation};

pub const MALFORMED_REQUEST: &str = "MALFORMED_REQUEST";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

/// Error body: `{errorCode, errors?}`. `errors` only for validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            errors: None,
        }
    }
}

impl ResponseError for CustomerError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomerError::Validation(_) | CustomerError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            CustomerError::NotFound(_) => StatusCode::NOT_FOUND,
            CustomerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            // Storage details stay in the log
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error_code = self.error_code(), error = %self, "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error_code: self.error_code().to_string(),
            errors: self.violations().map(|v| v.to_vec()),
        })
    }
}

/// JSON extractor config: unreadable bodies become 400 MALFORMED_REQUEST.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(malformed_json)
}

/// Query extractor config: unreadable query strings become 400 MALFORMED_REQUEST.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(malformed_query)
}

fn malformed_json(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Malformed request body");
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(MALFORMED_REQUEST));
    InternalError::from_response(err, response).into()
}

fn malformed_query(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Malformed query string");
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(MALFORMED_REQUEST));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CustomerError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CustomerError::AlreadyExists("a@b.c".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CustomerError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CustomerError::Storage(StorageError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_omits_errors_when_absent() {
        let json = serde_json::to_value(ErrorResponse::new("CUSTOMER_NOT_FOUND")).unwrap();
        assert_eq!(json, serde_json::json!({ "errorCode": "CUSTOMER_NOT_FOUND" }));
    }

    #[test]
    fn test_error_body_lists_violations() {
        let body = ErrorResponse {
            error_code: "VALIDATION_ERROR".to_string(),
            errors: Some(vec![FieldViolation::new("age", "Age is required")]),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "errorCode": "VALIDATION_ERROR",
                "errors": [{ "field": "age", "message": "Age is required" }]
            })
        );
    }
}

//! API error responses
//!
//! Every handler failure funnels through [`ApiError`], which owns the
//! status code and JSON body. Backend detail is logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use sindhu_core::{CatalogError, PricingError};
use tracing::error;
use validator::ValidationErrors;

/// One failed field of a request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 with field-level detail
    Validation {
        message: &'static str,
        errors: Vec<FieldError>,
    },
    /// 400, e.g. a non-numeric id in the path
    BadRequest(&'static str),
    NotFound(&'static str),
    Unauthorized(&'static str),
    /// 500; the cause has already been logged
    Internal(&'static str),
}

impl ApiError {
    pub fn validation(message: &'static str, errors: &ValidationErrors) -> Self {
        ApiError::Validation {
            message,
            errors: field_errors(errors),
        }
    }

    pub fn malformed_body(message: &'static str, detail: String) -> Self {
        ApiError::Validation {
            message,
            errors: vec![FieldError {
                field: None,
                message: detail,
            }],
        }
    }

    pub fn pricing(message: &'static str, e: PricingError) -> Self {
        ApiError::Validation {
            message,
            errors: vec![FieldError::new(e.field(), e.message())],
        }
    }

    /// Log a store failure and turn it into a generic 500
    pub fn backend(message: &'static str) -> impl FnOnce(CatalogError) -> ApiError {
        move |e| {
            error!("{}: {}", message, e);
            ApiError::Internal(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation { message, errors } => json!({
                "success": false,
                "message": message,
                "errors": errors,
            }),
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Internal(message) => json!({ "message": message }),
            ApiError::Unauthorized(message) => json!({
                "message": message,
                "code": "unauthorized",
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Parse a path id, 400 when it is not an integer
pub fn parse_id(raw: &str, message: &'static str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::BadRequest(message))
}

/// Flatten validator output into wire-format field errors, sorted by field
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            let field = camel_case(&field);
            list.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

//! HTTP error mapping
//!
//! Maps `KnotbookError` onto HTTP status codes with a JSON error body:
//! validation failures are 400, missing entities 404, conflicts (duplicate
//! names, still-referenced categories) 409, and everything else 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;

use crate::error::KnotbookError;

/// Error returned while starting or running the HTTP server
#[derive(Debug)]
pub enum ServerError {
    Io(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "server io error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// JSON body carried by every error response
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// An error response: status code plus JSON body
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl HttpError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiErrorBody {
                code: "validation_error",
                message: message.into(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<KnotbookError> for HttpError {
    fn from(err: KnotbookError) -> Self {
        let (status, code) = if err.is_validation() {
            (StatusCode::BAD_REQUEST, "validation_error")
        } else if err.is_not_found() {
            (StatusCode::NOT_FOUND, "not_found")
        } else if err.is_conflict() {
            (StatusCode::CONFLICT, "conflict")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        };

        Self {
            status,
            body: ApiErrorBody {
                code,
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

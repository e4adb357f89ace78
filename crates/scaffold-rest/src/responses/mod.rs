//! API response types.
//!
//! Dao envelopes are returned as-is with the HTTP status derived from the
//! result code. Failures before a Dao call use [`AppError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scaffold_core::{CountedEnvelope, Envelope, ErrorResponse, ResultCode, ScaffoldError};
use serde::Serialize;

fn status_of(code: ResultCode) -> StatusCode {
    StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Renders an envelope with the status matching its result code.
pub fn envelope<T: Serialize>(envelope: Envelope<T>) -> Response {
    (status_of(envelope.code()), Json(envelope)).into_response()
}

/// Renders a counted envelope with the status matching its result code.
pub fn counted<T: Serialize>(envelope: CountedEnvelope<T>) -> Response {
    (status_of(envelope.code()), Json(envelope)).into_response()
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub ScaffoldError);

impl From<ScaffoldError> for AppError {
    fn from(err: ScaffoldError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult = Result<Response, AppError>;

//! JSON body and query extractors with `ErrorResponse` rejections.
//!
//! Axum's own rejections render as plain text. These wrappers keep every
//! 400 in the same shape as the rest of the API.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use scaffold_core::ErrorResponse;
use serde::de::DeserializeOwned;

/// `Json<T>` rendering rejections as `INVALID_JSON`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

/// `Query<T>` rendering rejections as `INVALID_QUERY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

/// Rejection for [`ApiJson`] and [`ApiQuery`].
#[derive(Debug)]
pub enum RequestRejection {
    Json(JsonRejection),
    Query(QueryRejection),
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        let body = match self {
            Self::Json(rejection) => {
                ErrorResponse::new("INVALID_JSON", format!("Invalid JSON: {}", rejection.body_text()))
            }
            Self::Query(rejection) => ErrorResponse::new(
                "INVALID_QUERY",
                format!("Invalid query: {}", rejection.body_text()),
            ),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(RequestRejection::Json)?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(RequestRejection::Query)?;
        Ok(Self(value))
    }
}

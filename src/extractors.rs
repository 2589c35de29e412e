//! Request body extractor whose failures use the `{"error": ...}` shape.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{AppError, ValidationError};

/// JSON request body. A missing content type, an empty body, bad syntax and type mismatches
/// are all reported as 422 validation errors.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            warn!(status = %e.status(), "request body rejected");
            AppError::from(ValidationError::MalformedBody(e.body_text()))
        })?;
        Ok(JsonBody(value))
    }
}

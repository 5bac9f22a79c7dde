//! Request body extraction

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::warn;

/// JSON body extractor whose rejection is itself JSON
///
/// Keeps axum's status code (400, 415 or 422) but replaces the plain text
/// body with `{"error": <reason>}` so the extension can always decode it.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let reason = rejection.body_text();
                warn!("Rejected request body: {}", reason);
                Err((rejection.status(), Json(json!({ "error": reason }))))
            }
        }
    }
}

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::shared::AppError;

/// JSON body extractor that ignores `Content-Type`
///
/// Every failure to read or decode the body becomes a 400, including bodies
/// that parse as JSON but do not match the expected shape. Only a JSON object
/// is accepted at the top level; serde would otherwise decode an array
/// positionally into a struct.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "Failed to read request body");
            AppError::BadRequest(e.body_text())
        })?;

        decode_object(&bytes).map(JsonBody)
    }
}

fn decode_object<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        warn!(error = %e, "Failed to decode request body");
        AppError::BadRequest(e.to_string())
    })?;

    if !value.is_object() {
        warn!("Request body is not a JSON object");
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "Request body has the wrong shape");
        AppError::BadRequest(e.to_string())
    })
}

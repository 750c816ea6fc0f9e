use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// JSON body extractor that ignores `Content-Type`.
///
/// Browsers post cross-origin JSON as `text/plain` to skip the preflight, so
/// the body is read whole and parsed regardless of the declared media type.
/// Read or parse failures become [`ApiError::MalformedInput`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value = serde_json::from_slice::<T>(&bytes)?;
        Ok(Self(value))
    }
}

/// Matches only when the request target has no query string at all, not even
/// a bare `?`. POST routes compare the whole target, so `/api/insert?x=1` is
/// an unknown route.
pub struct ExactTarget;

impl<S> FromRequestParts<S> for ExactTarget
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.uri.query() {
            Some(_) => Err(ApiError::NotFound),
            None => Ok(ExactTarget),
        }
    }
}

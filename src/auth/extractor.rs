// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the presented API key.
//!
//! The extractor never rejects. Whether the key is present and valid is
//! decided by the [`Authorizer`](super::Authorizer), so the handler controls
//! the order of authorization and parameter validation:
//!
//! ```rust,ignore
//! async fn my_action(State(state): State<AppState>, ApiKey(key): ApiKey) -> ... {
//!     let role = state.authorizer.authorize(key.as_deref(), Role::Reader)?;
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The raw `X-API-Key` header value, if any.
///
/// A header that is not valid visible ASCII is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(pub Option<String>);

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string());
        Ok(ApiKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> ApiKey {
        let mut parts = request.into_parts().0;
        ApiKey::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_header_case_insensitively() {
        let request = Request::builder()
            .uri("/actions/find_orders")
            .header("X-API-Key", "reader-key-123")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, ApiKey(Some("reader-key-123".into())));
    }

    #[tokio::test]
    async fn missing_header_yields_none() {
        let request = Request::builder()
            .uri("/actions/find_orders")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, ApiKey(None));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Action error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthError;

/// Every way an action call can fail.
///
/// Authorization and validation failures happen before any storage access
/// and are safe to retry. `AuditWriteFailed` with `mutation_committed` set
/// means the write may have taken effect without an audit record; callers
/// must reconcile instead of retrying.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Audit write failed for {action}: {reason}")]
    AuditWriteFailed {
        action: &'static str,
        mutation_committed: bool,
        reason: String,
    },
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub ok: bool,
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error kind.
    pub error_code: String,
    /// Present on `audit_write_failed`: whether the mutation had already committed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_committed: Option<bool>,
}

impl ActionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ActionError::InvalidParameters(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ActionError::NotFound(message.into())
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ActionError::Unauthenticated(_) => "unauthenticated",
            ActionError::Forbidden(_) => "forbidden",
            ActionError::InvalidParameters(_) => "invalid_parameters",
            ActionError::NotFound(_) => "not_found",
            ActionError::AuditWriteFailed { .. } => "audit_write_failed",
            ActionError::StorageUnavailable(_) => "storage_unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ActionError::Forbidden(_) => StatusCode::FORBIDDEN,
            ActionError::InvalidParameters(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::AuditWriteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<AuthError> for ActionError {
    fn from(err: AuthError) -> Self {
        if err.is_forbidden() {
            ActionError::Forbidden(err.to_string())
        } else {
            ActionError::Unauthenticated(err.to_string())
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mutation_committed = match &self {
            ActionError::AuditWriteFailed {
                mutation_committed, ..
            } => Some(*mutation_committed),
            _ => None,
        };
        let body = Json(ErrorBody {
            ok: false,
            error: self.to_string(),
            error_code: self.error_code().to_string(),
            mutation_committed,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::body::to_bytes;

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (ActionError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (ActionError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ActionError::invalid("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (ActionError::not_found("x"), StatusCode::NOT_FOUND),
            (
                ActionError::AuditWriteFailed {
                    action: "find_orders",
                    mutation_committed: false,
                    reason: "x".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ActionError::StorageUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err.error_code());
        }
    }

    #[test]
    fn auth_errors_convert_to_matching_kind() {
        let err: ActionError = AuthError::MissingApiKey.into();
        assert_eq!(err.error_code(), "unauthenticated");

        let err: ActionError = AuthError::InsufficientRole {
            required: Role::Writer,
            actual: Role::Reader,
        }
        .into();
        assert_eq!(err.error_code(), "forbidden");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ActionError::not_found("customer_id not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(
            body,
            r#"{"ok":false,"error":"customer_id not found","error_code":"not_found"}"#
        );
    }

    #[tokio::test]
    async fn audit_failure_reports_commit_state() {
        let response = ActionError::AuditWriteFailed {
            action: "update_customer_tier",
            mutation_committed: true,
            reason: "disk full".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "audit_write_failed");
        assert_eq!(body["mutation_committed"], true);
    }
}

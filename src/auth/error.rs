// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use super::Role;

/// Authorization error type.
///
/// `MissingApiKey` and `InvalidApiKey` are both reported to callers as
/// `unauthenticated`; they are kept apart for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `X-API-Key` header present (or empty)
    MissingApiKey,
    /// Key is not in the key table
    InvalidApiKey,
    /// Resolved role ranks below the action's minimum
    InsufficientRole { required: Role, actual: Role },
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingApiKey | AuthError::InvalidApiKey => "unauthenticated",
            AuthError::InsufficientRole { .. } => "forbidden",
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::InsufficientRole { .. })
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingApiKey | AuthError::InvalidApiKey => {
                write!(f, "Missing or invalid API key")
            }
            AuthError::InsufficientRole { required, actual } => {
                write!(f, "Insufficient role: {required} required, caller is {actual}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_invalid_share_a_code() {
        assert_eq!(AuthError::MissingApiKey.error_code(), "unauthenticated");
        assert_eq!(AuthError::InvalidApiKey.error_code(), "unauthenticated");
        assert_eq!(
            AuthError::MissingApiKey.to_string(),
            AuthError::InvalidApiKey.to_string()
        );
    }

    #[test]
    fn insufficient_role_is_forbidden() {
        let err = AuthError::InsufficientRole {
            required: Role::Writer,
            actual: Role::Reader,
        };
        assert!(err.is_forbidden());
        assert_eq!(err.error_code(), "forbidden");
        assert_eq!(
            err.to_string(),
            "Insufficient role: writer required, caller is reader"
        );
    }
}

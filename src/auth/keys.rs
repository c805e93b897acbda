// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API key table and the authorizer built on top of it.
//!
//! The key table is immutable once constructed. It is handed to the
//! [`Authorizer`] at startup, so a different credential source only has to
//! produce an [`ApiKeyTable`].

use std::collections::HashMap;

use super::{AuthError, Role};
use crate::config::ConfigError;

/// Demo keys used when no `API_KEYS` table is configured.
pub const DEMO_API_KEYS: &[(&str, Role)] = &[
    ("reader-key-123", Role::Reader),
    ("writer-key-456", Role::Writer),
];

/// Immutable mapping of API key to role.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyTable {
    keys: HashMap<String, Role>,
}

impl ApiKeyTable {
    pub fn new<K: Into<String>>(keys: impl IntoIterator<Item = (K, Role)>) -> Self {
        Self {
            keys: keys.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }

    /// The built-in demo table (`reader-key-123`, `writer-key-456`).
    pub fn demo() -> Self {
        Self::new(DEMO_API_KEYS.iter().copied())
    }

    /// Parse a `key=role,key=role` table.
    ///
    /// Whitespace around entries is ignored; empty entries are skipped.
    pub fn parse(table: &str) -> Result<Self, ConfigError> {
        let mut keys = HashMap::new();
        for entry in table.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, role) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidApiKeyEntry(entry.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidApiKeyEntry(entry.to_string()));
            }
            let role =
                Role::parse(role).ok_or_else(|| ConfigError::UnknownRole(role.trim().to_string()))?;
            keys.insert(key.to_string(), role);
        }
        if keys.is_empty() {
            return Err(ConfigError::EmptyApiKeyTable);
        }
        Ok(Self { keys })
    }

    pub fn role_for(&self, key: &str) -> Option<Role> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Resolves credentials to roles and enforces minimum roles.
///
/// Has no side effects: rejected attempts are not written to the audit log.
#[derive(Debug, Clone)]
pub struct Authorizer {
    table: ApiKeyTable,
}

impl Authorizer {
    pub fn new(table: ApiKeyTable) -> Self {
        Self { table }
    }

    /// Resolve `credential` and check it against `minimum`.
    pub fn authorize(&self, credential: Option<&str>, minimum: Role) -> Result<Role, AuthError> {
        let key = credential
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::MissingApiKey)?;
        let role = self.table.role_for(key).ok_or(AuthError::InvalidApiKey)?;
        if !role.has_privilege(minimum) {
            return Err(AuthError::InsufficientRole {
                required: minimum,
                actual: role,
            });
        }
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizer() -> Authorizer {
        Authorizer::new(ApiKeyTable::demo())
    }

    #[test]
    fn missing_credential_is_unauthenticated() {
        assert_eq!(
            authorizer().authorize(None, Role::Reader),
            Err(AuthError::MissingApiKey)
        );
        assert_eq!(
            authorizer().authorize(Some(""), Role::Reader),
            Err(AuthError::MissingApiKey)
        );
    }

    #[test]
    fn unknown_credential_is_unauthenticated() {
        assert_eq!(
            authorizer().authorize(Some("nope"), Role::Reader),
            Err(AuthError::InvalidApiKey)
        );
    }

    #[test]
    fn reader_cannot_reach_writer_actions() {
        assert_eq!(
            authorizer().authorize(Some("reader-key-123"), Role::Writer),
            Err(AuthError::InsufficientRole {
                required: Role::Writer,
                actual: Role::Reader,
            })
        );
    }

    #[test]
    fn resolved_role_is_returned() {
        assert_eq!(
            authorizer().authorize(Some("reader-key-123"), Role::Reader),
            Ok(Role::Reader)
        );
        assert_eq!(
            authorizer().authorize(Some("writer-key-456"), Role::Reader),
            Ok(Role::Writer)
        );
        assert_eq!(
            authorizer().authorize(Some("writer-key-456"), Role::Writer),
            Ok(Role::Writer)
        );
    }

    #[test]
    fn parse_reads_key_role_pairs() {
        let table = ApiKeyTable::parse(" a=reader, b=WRITER ,,").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.role_for("a"), Some(Role::Reader));
        assert_eq!(table.role_for("b"), Some(Role::Writer));
        assert_eq!(table.role_for("c"), None);
    }

    #[test]
    fn parse_rejects_malformed_tables() {
        assert!(matches!(
            ApiKeyTable::parse("a-reader"),
            Err(ConfigError::InvalidApiKeyEntry(_))
        ));
        assert!(matches!(
            ApiKeyTable::parse("=reader"),
            Err(ConfigError::InvalidApiKeyEntry(_))
        ));
        assert!(matches!(
            ApiKeyTable::parse("a=admin"),
            Err(ConfigError::UnknownRole(role)) if role == "admin"
        ));
        assert!(matches!(
            ApiKeyTable::parse(" , "),
            Err(ConfigError::EmptyApiKeyTable)
        ));
    }
}

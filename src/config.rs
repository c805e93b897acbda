// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DB_PATH` | SQLite database file | `demo.db` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `API_KEYS` | API key table, `key=role` pairs separated by commas | demo keys |
//! | `SEED_DEMO_DATA` | Seed demo customers and orders into an empty database | off |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::ApiKeyTable;

/// Environment variable name for the SQLite database path.
pub const DB_PATH_ENV: &str = "DB_PATH";
pub const DEFAULT_DB_PATH: &str = "demo.db";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Environment variable name for the API key table.
///
/// # Format
/// `reader-key=reader,writer-key=writer`
pub const API_KEYS_ENV: &str = "API_KEYS";

/// Any non-empty value other than `0`/`false` enables seeding.
pub const SEED_DEMO_DATA_ENV: &str = "SEED_DEMO_DATA";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API key entry '{0}' (expected key=role)")]
    InvalidApiKeyEntry(String),
    #[error("unknown role '{0}' (expected reader or writer)")]
    UnknownRole(String),
    #[error("API key table is empty")]
    EmptyApiKeyTable,
    #[error("invalid {name} value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub api_keys: ApiKeyTable,
    /// True when `API_KEYS` was unset and the demo keys are in use.
    pub using_demo_keys: bool,
    pub seed_demo_data: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path: PathBuf = lookup(DB_PATH_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
            .into();

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: HOST_ENV,
                value: host.clone(),
            })?;

        let (api_keys, using_demo_keys) = match lookup(API_KEYS_ENV) {
            Some(raw) => (ApiKeyTable::parse(&raw)?, false),
            None => (ApiKeyTable::demo(), true),
        };

        let seed_demo_data = lookup(SEED_DEMO_DATA_ENV)
            .map(|v| {
                let v = v.trim().to_lowercase();
                !(v.is_empty() || v == "0" || v == "false")
            })
            .unwrap_or(false);

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            bind_addr,
            api_keys,
            using_demo_keys,
            seed_demo_data,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("demo.db"));
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.using_demo_keys);
        assert_eq!(config.api_keys.role_for("writer-key-456"), Some(Role::Writer));
        assert!(!config.seed_demo_data);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config(&[
            ("DB_PATH", "/tmp/actions.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("API_KEYS", "k1=writer"),
            ("SEED_DEMO_DATA", "1"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/actions.db"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert!(!config.using_demo_keys);
        assert_eq!(config.api_keys.role_for("k1"), Some(Role::Writer));
        assert_eq!(config.api_keys.role_for("reader-key-123"), None);
        assert!(config.seed_demo_data);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn seed_flag_accepts_false_spellings() {
        assert!(!config(&[("SEED_DEMO_DATA", "false")]).unwrap().seed_demo_data);
        assert!(!config(&[("SEED_DEMO_DATA", "0")]).unwrap().seed_demo_data);
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
    }

    #[test]
    fn malformed_key_table_is_rejected() {
        assert!(matches!(
            config(&[("API_KEYS", "k1=root")]),
            Err(ConfigError::UnknownRole(_))
        ));
    }
}

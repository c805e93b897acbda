// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! MCP DB Actions - Audited, role-gated database actions
//!
//! This crate exposes three fixed actions over a customers/orders data set.
//! Each call is authorized by API key, validated, executed against SQLite,
//! and recorded in an append-only audit log.
//!
//! ## Modules
//!
//! - `actions` - Action dispatcher and parameter validation
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - API keys, roles, and authorization
//! - `storage` - SQLite gateway, audit recorder, demo seed data

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! API-key authentication and role-based authorization for the action
//! endpoints.
//!
//! ## Auth Flow
//!
//! 1. Caller sends `X-API-Key: <key>`
//! 2. The [`ApiKey`] extractor hands the raw header to the handler
//! 3. The handler asks the [`Authorizer`] for the action's minimum role:
//!    - absent or unknown key → `unauthenticated` (401)
//!    - role ranks below the minimum → `forbidden` (403)
//!    - otherwise the resolved [`Role`] becomes the audit actor
//!
//! ## Audit
//!
//! Rejected attempts are logged with `tracing` but never reach the audit
//! log. The raw key is never logged or stored.

pub mod error;
pub mod extractor;
pub mod keys;
pub mod roles;

pub use error::AuthError;
pub use extractor::{ApiKey, API_KEY_HEADER};
pub use keys::{ApiKeyTable, Authorizer};
pub use roles::Role;

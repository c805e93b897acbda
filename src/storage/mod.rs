// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! This module owns all persistence. Data lives in a single SQLite file.
//!
//! ## Tables
//!
//! ```text
//! customers (id, name, revenue, tier, updated_at)   -- tier CHECKed to bronze|silver|gold
//! orders    (id, customer_id → customers.id, amount, created_at)
//! audit_log (id AUTOINCREMENT, ts, actor, action, params_json, row_count, dry_run)
//! ```
//!
//! ## Guarantees
//!
//! - Reads use SQLite's default isolation; nothing stronger is requested
//! - The tier update is a single `UPDATE`, so tier and `updated_at` change
//!   together or not at all
//! - `audit_log` rejects `UPDATE` and `DELETE` via triggers
//! - Audit appends are not in the same transaction as the action they
//!   describe; a crash in between can lose the audit row

pub mod audit;
pub mod seed;
pub mod sqlite;

pub use audit::{canonical_json, AuditRecord, AuditRecorder, NewAuditRecord};
pub use seed::seed_demo_data;
pub use sqlite::{SqliteStore, StoreError, StoreResult};

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the stored entities and the request and response
//! structures used by the action endpoints. All types derive `Serialize`,
//! `Deserialize` (where applicable), and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! ## Timestamps
//!
//! Timestamps are naive UTC ISO-8601 strings with microsecond precision
//! (`2026-01-31T09:15:00.000000`). Every stored timestamp uses this exact
//! format, so string comparison in SQL is chronological comparison.
//!
//! ## Model Categories
//!
//! - **Entities**: Customers, orders, and their tier enum
//! - **Requests**: Raw action parameters as sent by callers
//! - **Responses**: Row sets with a pagination cursor, and write outcomes

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Timestamps
// =============================================================================

/// Storage format for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time in storage format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now().naive_utc())
}

/// Normalize a caller-supplied timestamp into storage format.
///
/// Accepts RFC 3339 (any offset, converted to UTC), naive ISO date-times
/// with or without seconds and fraction, and bare dates (midnight UTC).
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(format_timestamp(ts.with_timezone(&Utc).naive_utc()));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(format_timestamp(ts));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(format_timestamp)
}

// =============================================================================
// Entities
// =============================================================================

/// Customer tier. The database enforces the same three values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }

    pub fn parse(s: &str) -> Option<Tier> {
        match s {
            "bronze" => Some(Tier::Bronze),
            "silver" => Some(Tier::Silver),
            "gold" => Some(Tier::Gold),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub revenue: f64,
    pub tier: Tier,
    /// Last modification time (storage format).
    pub updated_at: String,
}

/// An order row. Orders are never written by an action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub amount: f64,
    /// Creation time (storage format).
    pub created_at: String,
}

// =============================================================================
// Action Requests
// =============================================================================

pub const DEFAULT_TOP_CUSTOMERS_LIMIT: i64 = 5;
pub const DEFAULT_FIND_ORDERS_LIMIT: i64 = 10;
/// Inclusive bounds for every `limit` parameter.
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

fn default_top_customers_limit() -> i64 {
    DEFAULT_TOP_CUSTOMERS_LIMIT
}

fn default_find_orders_limit() -> i64 {
    DEFAULT_FIND_ORDERS_LIMIT
}

fn default_dry_run() -> bool {
    true
}

/// Parameters for `list_top_customers`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListTopCustomersRequest {
    /// Maximum rows to return (1-100).
    #[serde(default = "default_top_customers_limit")]
    #[schema(default = 5, minimum = 1, maximum = 100)]
    pub limit: i64,
    /// Only customers updated at or after this timestamp.
    #[serde(default)]
    pub since: Option<String>,
}

/// Parameters for `find_orders`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FindOrdersRequest {
    pub customer_id: i64,
    /// Only orders created at or after this timestamp.
    #[serde(default)]
    pub since: Option<String>,
    /// Page size (1-100).
    #[serde(default = "default_find_orders_limit")]
    #[schema(default = 10, minimum = 1, maximum = 100)]
    pub limit: i64,
    /// Offset cursor returned by the previous page.
    #[serde(default)]
    #[schema(minimum = 0)]
    pub cursor: Option<i64>,
}

/// Parameters for `update_customer_tier`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerTierRequest {
    pub customer_id: i64,
    pub tier: Tier,
    /// Simulate only. Defaults to `true`.
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

// =============================================================================
// Action Responses
// =============================================================================

/// Result of `list_top_customers`. Never paginated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TopCustomersResponse {
    pub ok: bool,
    pub rows: Vec<Customer>,
    pub row_count: usize,
    /// Always `null`.
    pub cursor: Option<u64>,
}

/// Result of `find_orders`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FindOrdersResponse {
    pub ok: bool,
    pub rows: Vec<Order>,
    pub row_count: usize,
    /// Offset of the next page, or `null` when exhausted.
    pub cursor: Option<u64>,
}

/// Result of `update_customer_tier`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TierUpdateResponse {
    pub ok: bool,
    pub row_count: usize,
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_supported_formats() {
        assert_eq!(
            normalize_timestamp("2026-03-01T12:30:00").as_deref(),
            Some("2026-03-01T12:30:00.000000")
        );
        assert_eq!(
            normalize_timestamp("2026-03-01T12:30:00.123456").as_deref(),
            Some("2026-03-01T12:30:00.123456")
        );
        assert_eq!(
            normalize_timestamp("2026-03-01 12:30:00").as_deref(),
            Some("2026-03-01T12:30:00.000000")
        );
        assert_eq!(
            normalize_timestamp("2026-03-01T12:30").as_deref(),
            Some("2026-03-01T12:30:00.000000")
        );
        assert_eq!(
            normalize_timestamp("2026-03-01").as_deref(),
            Some("2026-03-01T00:00:00.000000")
        );
    }

    #[test]
    fn normalize_converts_offsets_to_utc() {
        assert_eq!(
            normalize_timestamp("2026-03-01T14:30:00+02:00"),
            normalize_timestamp("2026-03-01T12:30:00Z")
        );
        assert_eq!(
            normalize_timestamp("2026-03-01T12:30:00Z").as_deref(),
            Some("2026-03-01T12:30:00.000000")
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert_eq!(normalize_timestamp("yesterday"), None);
        assert_eq!(normalize_timestamp("2026-13-01"), None);
        assert_eq!(normalize_timestamp(""), None);
    }

    #[test]
    fn request_defaults_are_filled_in() {
        let top: ListTopCustomersRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(top.limit, 5);
        assert!(top.since.is_none());

        let orders: FindOrdersRequest = serde_json::from_str(r#"{"customer_id":3}"#).unwrap();
        assert_eq!(orders.limit, 10);
        assert!(orders.cursor.is_none());

        let update: UpdateCustomerTierRequest =
            serde_json::from_str(r#"{"customer_id":3,"tier":"gold"}"#).unwrap();
        assert!(update.dry_run);
        assert_eq!(update.tier, Tier::Gold);
    }

    #[test]
    fn unknown_tier_does_not_deserialize() {
        let result: Result<UpdateCustomerTierRequest, _> =
            serde_json::from_str(r#"{"customer_id":3,"tier":"platinum"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn hint_is_omitted_when_absent() {
        let response = TierUpdateResponse {
            ok: true,
            row_count: 1,
            dry_run: false,
            hint: None,
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"ok":true,"row_count":1,"dry_run":false}"#
        );
    }
}

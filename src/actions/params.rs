// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Parameter parsing and validation.
//!
//! Raw request bodies become typed, range-checked parameter structs. The
//! validated structs are also what gets serialized into the audit log, so
//! defaults appear explicitly and `since` is stored normalized.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ActionError;
use crate::models::{
    normalize_timestamp, FindOrdersRequest, ListTopCustomersRequest, Tier,
    UpdateCustomerTierRequest, MAX_LIMIT, MIN_LIMIT,
};

/// Validated `list_top_customers` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopCustomersParams {
    pub limit: u32,
    pub since: Option<String>,
}

/// Validated `find_orders` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindOrdersParams {
    pub customer_id: i64,
    pub since: Option<String>,
    pub limit: u32,
    pub cursor: Option<u64>,
}

impl FindOrdersParams {
    pub fn offset(&self) -> u64 {
        self.cursor.unwrap_or(0)
    }
}

/// Validated `update_customer_tier` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateTierParams {
    pub customer_id: i64,
    pub tier: Tier,
    pub dry_run: bool,
}

/// Decode a JSON object body. An empty body counts as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ActionError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_str("{}").map_err(|e| ActionError::invalid(e.to_string()));
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ActionError::invalid(format!("malformed JSON body: {e}")))?;
    if !value.is_object() {
        return Err(ActionError::invalid("request body must be a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| ActionError::invalid(e.to_string()))
}

fn validate_limit(limit: i64) -> Result<u32, ActionError> {
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ActionError::invalid(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
        )));
    }
    u32::try_from(limit).map_err(|_| ActionError::invalid("limit out of range"))
}

fn validate_since(since: Option<String>) -> Result<Option<String>, ActionError> {
    since
        .map(|raw| {
            normalize_timestamp(&raw)
                .ok_or_else(|| ActionError::invalid(format!("since is not a valid timestamp: {raw:?}")))
        })
        .transpose()
}

impl TryFrom<ListTopCustomersRequest> for TopCustomersParams {
    type Error = ActionError;

    fn try_from(request: ListTopCustomersRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            limit: validate_limit(request.limit)?,
            since: validate_since(request.since)?,
        })
    }
}

impl TryFrom<FindOrdersRequest> for FindOrdersParams {
    type Error = ActionError;

    fn try_from(request: FindOrdersRequest) -> Result<Self, Self::Error> {
        let cursor = request
            .cursor
            .map(|c| {
                u64::try_from(c).map_err(|_| {
                    ActionError::invalid(format!("cursor must be a non-negative offset, got {c}"))
                })
            })
            .transpose()?;
        Ok(Self {
            customer_id: request.customer_id,
            since: validate_since(request.since)?,
            limit: validate_limit(request.limit)?,
            cursor,
        })
    }
}

impl From<UpdateCustomerTierRequest> for UpdateTierParams {
    fn from(request: UpdateCustomerTierRequest) -> Self {
        Self {
            customer_id: request.customer_id,
            tier: request.tier,
            dry_run: request.dry_run,
        }
    }
}

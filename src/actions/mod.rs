// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Action Dispatcher
//!
//! The three fixed actions and the pipeline every call goes through:
//!
//! 1. authorize the presented key against the action's minimum role
//! 2. parse and validate parameters
//! 3. run the query or mutation
//! 4. append the audit record
//! 5. return the structured result
//!
//! A failure at any step ends the call. Steps 1 and 2 never touch storage
//! and never write audit rows. The audit append is part of success: if it
//! fails, the caller gets `AuditWriteFailed` instead of the result.

pub mod params;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::auth::{Authorizer, Role};
use crate::error::ActionError;
use crate::models::{
    now_timestamp, FindOrdersRequest, FindOrdersResponse, ListTopCustomersRequest,
    TierUpdateResponse, TopCustomersResponse, UpdateCustomerTierRequest,
};
use crate::storage::{AuditRecorder, SqliteStore, StoreError};

pub use params::{FindOrdersParams, TopCustomersParams, UpdateTierParams};

/// Hint attached to dry-run responses.
pub const DRY_RUN_HINT: &str = "Set dry_run=false to commit";

/// The fixed set of actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    ListTopCustomers,
    FindOrders,
    UpdateCustomerTier,
}

impl ActionName {
    /// Name used in routes and audit rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::ListTopCustomers => "list_top_customers",
            ActionName::FindOrders => "find_orders",
            ActionName::UpdateCustomerTier => "update_customer_tier",
        }
    }

    pub fn min_role(&self) -> Role {
        match self {
            ActionName::ListTopCustomers | ActionName::FindOrders => Role::Reader,
            ActionName::UpdateCustomerTier => Role::Writer,
        }
    }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs actions end to end.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    authorizer: Authorizer,
    store: SqliteStore,
    audit: AuditRecorder,
}

impl ActionDispatcher {
    pub fn new(authorizer: Authorizer, store: SqliteStore) -> Self {
        let audit = AuditRecorder::new(store.clone());
        Self {
            authorizer,
            store,
            audit,
        }
    }

    fn authorize(&self, action: ActionName, credential: Option<&str>) -> Result<Role, ActionError> {
        self.authorizer
            .authorize(credential, action.min_role())
            .map_err(|err| {
                warn!(
                    action = %action,
                    error_code = err.error_code(),
                    "authorization rejected"
                );
                ActionError::from(err)
            })
    }

    /// `list_top_customers`: highest-revenue customers, never paginated.
    pub async fn list_top_customers(
        &self,
        credential: Option<&str>,
        body: &[u8],
    ) -> Result<TopCustomersResponse, ActionError> {
        let action = ActionName::ListTopCustomers;
        let role = self.authorize(action, credential)?;
        let params: TopCustomersParams =
            params::parse_body::<ListTopCustomersRequest>(body)?.try_into()?;

        let rows = self
            .store
            .top_customers(params.since.clone(), params.limit)
            .await
            .map_err(|e| storage_unavailable(action, e))?;
        let row_count = rows.len();

        self.audit(role, action, &params, row_count, false, false)
            .await?;
        info!(actor = %role, action = %action, row_count, "action completed");

        Ok(TopCustomersResponse {
            ok: true,
            rows,
            row_count,
            cursor: None,
        })
    }

    /// `find_orders`: one page of a customer's orders, newest first.
    ///
    /// The returned cursor is `offset + limit` when the page is full and
    /// `None` once a short page shows the results are exhausted. Offsets
    /// shift if orders are inserted or deleted between pages.
    pub async fn find_orders(
        &self,
        credential: Option<&str>,
        body: &[u8],
    ) -> Result<FindOrdersResponse, ActionError> {
        let action = ActionName::FindOrders;
        let role = self.authorize(action, credential)?;
        let params: FindOrdersParams =
            params::parse_body::<FindOrdersRequest>(body)?.try_into()?;

        let offset = params.offset();
        let rows = self
            .store
            .find_orders(params.customer_id, params.since.clone(), params.limit, offset)
            .await
            .map_err(|e| storage_unavailable(action, e))?;
        let row_count = rows.len();
        let cursor = next_cursor(offset, params.limit, row_count);

        self.audit(role, action, &params, row_count, false, false)
            .await?;
        info!(actor = %role, action = %action, row_count, ?cursor, "action completed");

        Ok(FindOrdersResponse {
            ok: true,
            rows,
            row_count,
            cursor,
        })
    }

    /// `update_customer_tier`: dry run by default.
    ///
    /// A missing customer fails with `NotFound` before anything is audited.
    /// If the customer disappears between lookup and update, the zero-row
    /// update is audited and then reported as `NotFound`.
    pub async fn update_customer_tier(
        &self,
        credential: Option<&str>,
        body: &[u8],
    ) -> Result<TierUpdateResponse, ActionError> {
        let action = ActionName::UpdateCustomerTier;
        let role = self.authorize(action, credential)?;
        let params: UpdateTierParams =
            params::parse_body::<UpdateCustomerTierRequest>(body)?.into();

        let existing = self
            .store
            .find_customer(params.customer_id)
            .await
            .map_err(|e| storage_unavailable(action, e))?;
        if existing.is_none() {
            warn!(actor = %role, action = %action, customer_id = params.customer_id, "customer not found");
            return Err(ActionError::not_found("customer_id not found"));
        }

        if params.dry_run {
            self.audit(role, action, &params, 0, true, false).await?;
            info!(actor = %role, action = %action, customer_id = params.customer_id, tier = %params.tier, dry_run = true, "action completed");
            return Ok(TierUpdateResponse {
                ok: true,
                row_count: 0,
                dry_run: true,
                hint: Some(DRY_RUN_HINT.to_string()),
            });
        }

        let row_count = self
            .store
            .update_customer_tier(params.customer_id, params.tier, now_timestamp())
            .await
            .map_err(|e| storage_unavailable(action, e))?;

        self.audit(role, action, &params, row_count, false, row_count > 0)
            .await?;

        if row_count == 0 {
            warn!(actor = %role, action = %action, customer_id = params.customer_id, "customer disappeared before update");
            return Err(ActionError::not_found("customer_id not found"));
        }
        info!(actor = %role, action = %action, customer_id = params.customer_id, tier = %params.tier, row_count, dry_run = false, "action completed");

        Ok(TierUpdateResponse {
            ok: true,
            row_count,
            dry_run: false,
            hint: None,
        })
    }

    async fn audit<P: Serialize>(
        &self,
        role: Role,
        action: ActionName,
        params: &P,
        row_count: usize,
        dry_run: bool,
        mutation_committed: bool,
    ) -> Result<(), ActionError> {
        self.audit
            .record(role.as_str(), action.as_str(), params, row_count, dry_run)
            .await
            .map(|_| ())
            .map_err(|e| {
                error!(
                    action = %action,
                    mutation_committed,
                    error = %e,
                    "audit append failed"
                );
                ActionError::AuditWriteFailed {
                    action: action.as_str(),
                    mutation_committed,
                    reason: e.to_string(),
                }
            })
    }
}

/// Offset of the next page, or `None` when this page came back short.
pub fn next_cursor(offset: u64, limit: u32, row_count: usize) -> Option<u64> {
    if row_count < limit as usize {
        None
    } else {
        Some(offset + u64::from(limit))
    }
}

fn storage_unavailable(action: ActionName, err: StoreError) -> ActionError {
    error!(action = %action, error = %err, "storage call failed");
    ActionError::StorageUnavailable(err.to_string())
}

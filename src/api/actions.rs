// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Action endpoints.
//!
//! Bodies are taken as raw bytes so that authorization runs before any
//! parameter parsing, and malformed JSON reports as `invalid_parameters`.

use axum::{body::Bytes, extract::State, Json};

use crate::{
    auth::ApiKey,
    error::{ActionError, ErrorBody},
    models::{
        FindOrdersRequest, FindOrdersResponse, ListTopCustomersRequest, TierUpdateResponse,
        TopCustomersResponse, UpdateCustomerTierRequest,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/actions/list_top_customers",
    request_body = ListTopCustomersRequest,
    tag = "Actions",
    security(("api_key" = [])),
    responses(
        (status = 200, body = TopCustomersResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 422, description = "Invalid parameters", body = ErrorBody)
    )
)]
pub async fn list_top_customers(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
    body: Bytes,
) -> Result<Json<TopCustomersResponse>, ActionError> {
    let response = state
        .actions
        .list_top_customers(key.as_deref(), &body)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/actions/find_orders",
    request_body = FindOrdersRequest,
    tag = "Actions",
    security(("api_key" = [])),
    responses(
        (status = 200, body = FindOrdersResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 422, description = "Invalid parameters", body = ErrorBody)
    )
)]
pub async fn find_orders(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
    body: Bytes,
) -> Result<Json<FindOrdersResponse>, ActionError> {
    let response = state.actions.find_orders(key.as_deref(), &body).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/actions/update_customer_tier",
    request_body = UpdateCustomerTierRequest,
    tag = "Actions",
    security(("api_key" = [])),
    responses(
        (status = 200, body = TierUpdateResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 403, description = "Writer role required", body = ErrorBody),
        (status = 404, description = "Customer not found", body = ErrorBody),
        (status = 422, description = "Invalid parameters", body = ErrorBody),
        (status = 500, description = "Audit write failed", body = ErrorBody)
    )
)]
pub async fn update_customer_tier(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
    body: Bytes,
) -> Result<Json<TierUpdateResponse>, ActionError> {
    let response = state
        .actions
        .update_customer_tier(key.as_deref(), &body)
        .await?;
    Ok(Json(response))
}

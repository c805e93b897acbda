// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{
        Customer, FindOrdersRequest, FindOrdersResponse, ListTopCustomersRequest, Order, Tier,
        TierUpdateResponse, TopCustomersResponse, UpdateCustomerTierRequest,
    },
    state::AppState,
};

pub mod actions;
pub mod health;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let action_routes = Router::new()
        .route("/list_top_customers", post(actions::list_top_customers))
        // Legacy name used by existing clients; audited as list_top_customers.
        .route("/get_top_customers", post(actions::list_top_customers))
        .route("/find_orders", post(actions::find_orders))
        .route("/update_customer_tier", post(actions::update_customer_tier))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/actions", action_routes)
        .route("/healthz", get(health::healthz))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        actions::list_top_customers,
        actions::find_orders,
        actions::update_customer_tier,
        health::healthz
    ),
    components(
        schemas(
            Customer,
            Order,
            Tier,
            ListTopCustomersRequest,
            FindOrdersRequest,
            UpdateCustomerTierRequest,
            TopCustomersResponse,
            FindOrdersResponse,
            TierUpdateResponse,
            ErrorBody,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Actions", description = "Role-gated, audited actions"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

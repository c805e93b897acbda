// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo data set: six customers with five orders each.

use chrono::{Duration, NaiveDateTime};

use super::{SqliteStore, StoreResult};
use crate::models::{format_timestamp, Customer, Order, Tier};

const DEMO_CUSTOMERS: &[(i64, &str, f64, Tier)] = &[
    (1, "Acme Corp", 125_000.0, Tier::Gold),
    (2, "Globex", 78_000.0, Tier::Silver),
    (3, "Initech", 54_000.0, Tier::Silver),
    (4, "Umbrella Co", 22_000.0, Tier::Bronze),
    (5, "Soylent", 94_000.0, Tier::Gold),
    (6, "Hooli", 150_000.0, Tier::Gold),
];

const ORDERS_PER_CUSTOMER: i64 = 5;

pub fn demo_customers(now: NaiveDateTime) -> Vec<Customer> {
    let updated_at = format_timestamp(now);
    DEMO_CUSTOMERS
        .iter()
        .map(|&(id, name, revenue, tier)| Customer {
            id,
            name: name.to_string(),
            revenue,
            tier,
            updated_at: updated_at.clone(),
        })
        .collect()
}

/// Order `k` of customer `cid` is worth `1000 * (cid + k)` and was created
/// `cid * k + 1` days before `now`.
pub fn demo_orders(now: NaiveDateTime) -> Vec<Order> {
    let mut orders = Vec::new();
    let mut id = 1;
    for &(cid, ..) in DEMO_CUSTOMERS {
        for k in 0..ORDERS_PER_CUSTOMER {
            orders.push(Order {
                id,
                customer_id: cid,
                amount: 1000.0 * (cid + k) as f64,
                created_at: format_timestamp(now - Duration::days(cid * k + 1)),
            });
            id += 1;
        }
    }
    orders
}

/// Seed the demo data set into an empty database.
///
/// Returns `false` without writing anything when customers already exist.
pub async fn seed_demo_data(store: &SqliteStore, now: NaiveDateTime) -> StoreResult<bool> {
    store
        .seed_if_empty(demo_customers(now), demo_orders(now))
        .await
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for action invocations.
//!
//! One row is appended per authorized invocation that reaches the audit
//! step, dry runs included. Rows are never updated or deleted; the database
//! enforces this with triggers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{SqliteStore, StoreResult};

/// A stored audit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Append-only sequence number.
    pub id: i64,
    /// Server-assigned timestamp (storage format).
    pub ts: String,
    /// Resolved role of the caller, never the raw key.
    pub actor: String,
    pub action: String,
    /// Canonical JSON of the validated parameters.
    pub params_json: String,
    pub row_count: i64,
    pub dry_run: bool,
}

/// An audit row before the store assigns `id` and `ts`.
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub actor: String,
    pub action: String,
    pub params_json: String,
    pub row_count: usize,
    pub dry_run: bool,
}

/// Serialize parameters canonically: keys sorted, no whitespace.
///
/// Identical logical calls produce byte-identical output regardless of
/// field declaration order.
pub fn canonical_json<P: Serialize>(params: &P) -> serde_json::Result<String> {
    let value = sort_keys(serde_json::to_value(params)?);
    serde_json::to_string(&value)
}

/// Rebuild every object with its keys in lexicographic order.
///
/// `serde_json::Map` only sorts while the `preserve_order` feature is off,
/// so the order is imposed here instead of inherited from the map type.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Appends audit rows through the storage gateway.
#[derive(Clone, Debug)]
pub struct AuditRecorder {
    store: SqliteStore,
}

impl AuditRecorder {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// Record one invocation.
    ///
    /// Any failure is returned to the caller; nothing is retried or dropped.
    pub async fn record<P: Serialize>(
        &self,
        actor: &str,
        action: &str,
        params: &P,
        row_count: usize,
        dry_run: bool,
    ) -> StoreResult<AuditRecord> {
        let params_json = canonical_json(params)?;
        self.store
            .append_audit(NewAuditRecord {
                actor: actor.to_string(),
                action: action.to_string(),
                params_json,
                row_count,
                dry_run,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Params {
        limit: u32,
        customer_id: i64,
        since: Option<String>,
    }

    #[test]
    fn canonical_json_sorts_keys_and_drops_whitespace() {
        let params = Params {
            limit: 3,
            customer_id: 7,
            since: None,
        };
        assert_eq!(
            canonical_json(&params).unwrap(),
            r#"{"customer_id":7,"limit":3,"since":null}"#
        );
    }

    #[test]
    fn sort_keys_orders_nested_objects() {
        let mut inner = Map::new();
        inner.insert("zeta".to_string(), Value::from(1));
        inner.insert("alpha".to_string(), Value::from(2));
        let mut outer = Map::new();
        outer.insert("b".to_string(), Value::Array(vec![Value::Object(inner)]));
        outer.insert("a".to_string(), Value::Null);

        let sorted = sort_keys(Value::Object(outer));
        let keys: Vec<&str> = sorted.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
        let inner_keys: Vec<&str> = sorted["b"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(inner_keys, ["alpha", "zeta"]);
    }

    #[test]
    fn canonical_json_ignores_input_key_order() {
        let a = json!({"b": 1, "a": {"y": true, "x": [1, 2]}});
        let b = json!({"a": {"x": [1, 2], "y": true}, "b": 1});
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
    }

    #[tokio::test]
    async fn record_appends_canonical_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("audit.sqlite"));
        store.init().await.expect("init");
        let recorder = AuditRecorder::new(store.clone());

        let params = Params {
            limit: 10,
            customer_id: 3,
            since: None,
        };
        let record = recorder
            .record("reader", "find_orders", &params, 5, false)
            .await
            .expect("record");

        assert_eq!(record.actor, "reader");
        assert_eq!(record.action, "find_orders");
        assert_eq!(record.params_json, r#"{"customer_id":3,"limit":10,"since":null}"#);
        assert_eq!(record.row_count, 5);
        assert!(!record.dry_run);

        let stored = store.list_audit_records(10).await.unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn record_surfaces_append_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("audit.sqlite"));
        store.init().await.expect("init");
        rusqlite::Connection::open(store.path())
            .unwrap()
            .execute_batch("DROP TABLE audit_log;")
            .unwrap();

        let recorder = AuditRecorder::new(store);
        let result = recorder
            .record("reader", "find_orders", &json!({}), 0, false)
            .await;
        assert!(result.is_err());
    }
}

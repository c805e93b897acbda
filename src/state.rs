// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::actions::ActionDispatcher;
use crate::auth::{ApiKeyTable, Authorizer};
use crate::storage::SqliteStore;

#[derive(Clone)]
pub struct AppState {
    pub actions: Arc<ActionDispatcher>,
}

impl AppState {
    pub fn new(store: SqliteStore, api_keys: ApiKeyTable) -> Self {
        Self {
            actions: Arc::new(ActionDispatcher::new(Authorizer::new(api_keys), store)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    /// State over a fresh, seeded database with the demo keys.
    pub async fn seeded_state() -> (AppState, SqliteStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("actions.sqlite"));
        store.init().await.expect("Failed to initialize storage");
        let seeded_at = NaiveDate::from_ymd_opt(2026, 1, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        crate::storage::seed_demo_data(&store, seeded_at)
            .await
            .expect("Failed to seed storage");
        let state = AppState::new(store.clone(), ApiKeyTable::demo());
        (state, store, temp_dir)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SQLite storage gateway.
//!
//! Every operation runs on the blocking pool with its own connection, so no
//! connection is shared across requests. Values are always bound as
//! positional parameters; SQL text is static.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::OptionalExtension;
use thiserror::Error;

use super::audit::{AuditRecord, NewAuditRecord};
use crate::models::{now_timestamp, Customer, Order, Tier};

#[derive(Clone, Debug)]
pub struct SqliteStore {
    path: PathBuf,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite join error: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create tables, indexes and audit triggers if missing.
    pub async fn init(&self) -> StoreResult<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            let conn = open_connection(path)?;
            init_schema(&conn)?;
            Ok(())
        })
        .await?
    }

    /// Customers ordered by revenue (highest first), optionally restricted
    /// to rows updated at or after `since`.
    pub async fn top_customers(
        &self,
        since: Option<String>,
        limit: u32,
    ) -> StoreResult<Vec<Customer>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<Vec<Customer>> {
            let conn = open_connection(path)?;
            let mut stmt = conn.prepare(
                "SELECT id, name, revenue, tier, updated_at
                 FROM customers
                 WHERE (?1 IS NULL OR updated_at >= ?1)
                 ORDER BY revenue DESC, id ASC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![since, i64::from(limit)], customer_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await?
    }

    /// One page of a customer's orders, newest first.
    pub async fn find_orders(
        &self,
        customer_id: i64,
        since: Option<String>,
        limit: u32,
        offset: u64,
    ) -> StoreResult<Vec<Order>> {
        let path = self.path.clone();
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        tokio::task::spawn_blocking(move || -> StoreResult<Vec<Order>> {
            let conn = open_connection(path)?;
            let mut stmt = conn.prepare(
                "SELECT id, customer_id, amount, created_at
                 FROM orders
                 WHERE customer_id = ?1
                   AND (?2 IS NULL OR created_at >= ?2)
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3 OFFSET ?4",
            )?;
            let rows = stmt.query_map(
                rusqlite::params![customer_id, since, i64::from(limit), offset],
                order_from_row,
            )?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await?
    }

    pub async fn find_customer(&self, id: i64) -> StoreResult<Option<Customer>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<Option<Customer>> {
            let conn = open_connection(path)?;
            let customer = conn
                .query_row(
                    "SELECT id, name, revenue, tier, updated_at FROM customers WHERE id = ?1",
                    rusqlite::params![id],
                    customer_from_row,
                )
                .optional()?;
            Ok(customer)
        })
        .await?
    }

    /// Set tier and `updated_at` in one statement.
    ///
    /// Returns the number of rows changed: 0 when the customer no longer
    /// exists, 1 otherwise.
    pub async fn update_customer_tier(
        &self,
        id: i64,
        tier: Tier,
        updated_at: String,
    ) -> StoreResult<usize> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<usize> {
            let conn = open_connection(path)?;
            let changed = conn.execute(
                "UPDATE customers SET tier = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![tier, updated_at, id],
            )?;
            Ok(changed)
        })
        .await?
    }

    /// Append one audit row. The timestamp is assigned here.
    pub async fn append_audit(&self, record: NewAuditRecord) -> StoreResult<AuditRecord> {
        let path = self.path.clone();
        let ts = now_timestamp();
        tokio::task::spawn_blocking(move || -> StoreResult<AuditRecord> {
            let conn = open_connection(path)?;
            let row_count = i64::try_from(record.row_count).unwrap_or(i64::MAX);
            conn.execute(
                "INSERT INTO audit_log (ts, actor, action, params_json, row_count, dry_run)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    ts,
                    record.actor,
                    record.action,
                    record.params_json,
                    row_count,
                    record.dry_run
                ],
            )?;
            Ok(AuditRecord {
                id: conn.last_insert_rowid(),
                ts,
                actor: record.actor,
                action: record.action,
                params_json: record.params_json,
                row_count,
                dry_run: record.dry_run,
            })
        })
        .await?
    }

    /// The `limit` most recent audit rows, oldest first.
    pub async fn list_audit_records(&self, limit: usize) -> StoreResult<Vec<AuditRecord>> {
        let path = self.path.clone();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        tokio::task::spawn_blocking(move || -> StoreResult<Vec<AuditRecord>> {
            let conn = open_connection(path)?;
            let mut stmt = conn.prepare(
                "SELECT id, ts, actor, action, params_json, row_count, dry_run
                 FROM (SELECT * FROM audit_log ORDER BY id DESC LIMIT ?1)
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(rusqlite::params![limit], |row| {
                Ok(AuditRecord {
                    id: row.get(0)?,
                    ts: row.get(1)?,
                    actor: row.get(2)?,
                    action: row.get(3)?,
                    params_json: row.get(4)?,
                    row_count: row.get(5)?,
                    dry_run: row.get(6)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await?
    }

    pub async fn customer_count(&self) -> StoreResult<u64> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<u64> {
            let conn = open_connection(path)?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await?
    }

    /// Insert customers and orders in one transaction, but only into an
    /// empty customers table. Returns whether anything was written.
    pub async fn seed_if_empty(
        &self,
        customers: Vec<Customer>,
        orders: Vec<Order>,
    ) -> StoreResult<bool> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<bool> {
            let mut conn = open_connection(path)?;
            let tx = conn.transaction()?;
            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(false);
            }
            for c in &customers {
                tx.execute(
                    "INSERT INTO customers (id, name, revenue, tier, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![c.id, c.name, c.revenue, c.tier, c.updated_at],
                )?;
            }
            for o in &orders {
                tx.execute(
                    "INSERT INTO orders (id, customer_id, amount, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![o.id, o.customer_id, o.amount, o.created_at],
                )?;
            }
            tx.commit()?;
            Ok(true)
        })
        .await?
    }
}

impl ToSql for Tier {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Tier {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        Tier::parse(raw).ok_or_else(|| FromSqlError::Other(format!("invalid tier '{raw}'").into()))
    }
}

fn customer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        revenue: row.get(2)?,
        tier: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn order_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        amount: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn init_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            revenue REAL NOT NULL,
            tier TEXT NOT NULL CHECK (tier IN ('bronze','silver','gold')),
            updated_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers(id)
        );
        CREATE INDEX IF NOT EXISTS idx_customers_revenue
            ON customers(revenue DESC);
        CREATE INDEX IF NOT EXISTS idx_orders_customer_created
            ON orders(customer_id, created_at DESC);
        CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            action TEXT NOT NULL,
            params_json TEXT NOT NULL,
            row_count INTEGER NOT NULL DEFAULT 0,
            dry_run INTEGER NOT NULL DEFAULT 0 CHECK (dry_run IN (0, 1))
        );
        CREATE INDEX IF NOT EXISTS idx_audit_log_actor_action
            ON audit_log(actor, action);
        CREATE TRIGGER IF NOT EXISTS trg_audit_log_no_update
        BEFORE UPDATE ON audit_log
        BEGIN
            SELECT RAISE(ABORT, 'audit_log is append-only');
        END;
        CREATE TRIGGER IF NOT EXISTS trg_audit_log_no_delete
        BEFORE DELETE ON audit_log
        BEGIN
            SELECT RAISE(ABORT, 'audit_log is append-only');
        END;",
    )?;
    Ok(())
}

fn open_connection(path: PathBuf) -> Result<rusqlite::Connection, rusqlite::Error> {
    let conn = rusqlite::Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    let _ = conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
    Ok(conn)
}

use std::path::Path;

use chrono::Utc;
use mobc::{Manager, Pool};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use tracing::{debug, info};

use crate::dispatch::DispatchReceipt;
use crate::models::Result;

pub struct SqliteManager {
    db_path: String,
}

impl SqliteManager {
    pub fn new(db_path: String) -> Self {
        debug!("Creating SqliteManager for path: {}", db_path);
        Self { db_path }
    }
}

#[async_trait::async_trait]
impl Manager for SqliteManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    async fn connect(&self) -> std::result::Result<Self::Connection, Self::Error> {
        let conn = Connection::open(&self.db_path)?;

        // Some PRAGMA statements return a row; route those through query_row
        let exec_pragma = |conn: &Connection, pragma: &str| -> SqliteResult<()> {
            match conn.execute(pragma, []) {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::ExecuteReturnedResults) => {
                    conn.query_row(pragma, [], |_| Ok(()))
                }
                Err(e) => Err(e),
            }
        };

        exec_pragma(&conn, "PRAGMA journal_mode=WAL")?;
        exec_pragma(&conn, "PRAGMA synchronous=NORMAL")?;
        exec_pragma(&conn, "PRAGMA temp_store=memory")?;

        init_schema(&conn)?;
        Ok(conn)
    }

    async fn check(&self, conn: Self::Connection) -> std::result::Result<Self::Connection, Self::Error> {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(conn)
    }
}

fn init_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS engine_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS dispatch_history (
            id TEXT PRIMARY KEY,
            action TEXT NOT NULL,
            lead_count INTEGER NOT NULL,
            credits_charged INTEGER NOT NULL,
            requested_at TEXT NOT NULL,
            status TEXT NOT NULL,
            failed_lead_ids TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_dispatch_history_requested_at
         ON dispatch_history(requested_at)",
        [],
    )?;

    Ok(())
}

pub type DbPool = Pool<SqliteManager>;

/// Opaque key-value persistence collaborator (plus the dispatch-history
/// table). The engine treats it as get/set; SQLite is an implementation
/// detail, not a query surface.
#[derive(Clone)]
pub struct StateStore {
    pool: DbPool,
}

impl StateStore {
    pub async fn open(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let manager = SqliteManager::new(db_path.to_string());
        let pool = Pool::builder().max_open(10).max_idle(5).build(manager);

        info!("State store opened: {}", db_path);
        Ok(Self { pool })
    }

    /// Single-connection in-memory store for tests. A pooled `:memory:`
    /// database must never open a second connection, each one would get its
    /// own empty database.
    pub async fn open_in_memory() -> Result<Self> {
        let manager = SqliteManager::new(":memory:".to_string());
        let pool = Pool::builder().max_open(1).max_idle(1).build(manager);
        Ok(Self { pool })
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.pool.get().await?;
        let value = conn
            .query_row(
                "SELECT value FROM engine_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.pool.get().await?;
        conn.execute(
            "INSERT INTO engine_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub async fn append_receipt(&self, receipt: &DispatchReceipt) -> Result<()> {
        let conn = self.pool.get().await?;
        conn.execute(
            "INSERT INTO dispatch_history
             (id, action, lead_count, credits_charged, requested_at, status, failed_lead_ids)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                receipt.id,
                receipt.action.to_string(),
                receipt.lead_count as i64,
                receipt.credits_charged as i64,
                receipt.requested_at.to_rfc3339(),
                receipt.status.to_string(),
                serde_json::to_string(&receipt.failed_lead_ids)?,
            ],
        )?;
        Ok(())
    }

    /// Most recent dispatches first.
    pub async fn recent_receipts(&self, limit: usize) -> Result<Vec<ReceiptRow>> {
        let conn = self.pool.get().await?;
        let mut stmt = conn.prepare(
            "SELECT id, action, lead_count, credits_charged, requested_at, status, failed_lead_ids
             FROM dispatch_history ORDER BY requested_at DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ReceiptRow {
                    id: row.get(0)?,
                    action: row.get(1)?,
                    lead_count: row.get::<_, i64>(2)? as usize,
                    credits_charged: row.get::<_, i64>(3)? as u64,
                    requested_at: row.get(4)?,
                    status: row.get(5)?,
                    failed_lead_ids: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

/// History row as stored; status and failed IDs stay in their serialized
/// form for display.
#[derive(Debug, Clone)]
pub struct ReceiptRow {
    pub id: String,
    pub action: String,
    pub lead_count: usize,
    pub credits_charged: u64,
    pub requested_at: String,
    pub status: String,
    pub failed_lead_ids: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_roundtrip_and_overwrite() {
        let store = StateStore::open_in_memory().await.expect("store");

        assert_eq!(store.get("credits").await.expect("get"), None);

        store.set("credits", "25").await.expect("set");
        assert_eq!(store.get("credits").await.expect("get"), Some("25".to_string()));

        store.set("credits", "20").await.expect("set");
        assert_eq!(store.get("credits").await.expect("get"), Some("20".to_string()));
    }

    #[tokio::test]
    async fn receipts_come_back_most_recent_first() {
        use crate::dispatch::{DispatchAction, DispatchReceipt, DispatchStatus};

        let store = StateStore::open_in_memory().await.expect("store");
        for (i, ts) in ["2026-08-01T09:00:00Z", "2026-08-02T09:00:00Z"].iter().enumerate() {
            let receipt = DispatchReceipt {
                id: format!("receipt-{}", i),
                action: DispatchAction::Verify,
                lead_count: 2,
                credits_charged: 2,
                requested_at: ts.parse().expect("timestamp"),
                status: DispatchStatus::Completed,
                failed_lead_ids: Vec::new(),
            };
            store.append_receipt(&receipt).await.expect("append");
        }

        let rows = store.recent_receipts(10).await.expect("query");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "receipt-1");
        assert_eq!(rows[1].id, "receipt-0");
    }
}

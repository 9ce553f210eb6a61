//! Append-only action log for privileged operations.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use turfbook_core::error::Result;
use turfbook_core::stores::ActionLog;
use turfbook_core::types::{ActionLogEntry, Actor};
use uuid::Uuid;

#[async_trait]
impl ActionLog for PostgresStore {
    async fn record(&self, actor: &Actor, action: &str, details: &str) -> Result<()> {
        sqlx::query("INSERT INTO action_log (id, actor, action, details) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(actor.to_string())
            .bind(action)
            .bind(details)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ActionLogEntry>> {
        let records = sqlx::query(
            "SELECT id, actor, action, details, created_at \
             FROM action_log ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.iter().map(rows::action_entry).collect())
    }
}

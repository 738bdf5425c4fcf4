//! InboxStore implementation for PostgreSQL

use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::models::{transition, InboxRecord};
use folio_core::Fields;
use serde_json::Value;
use sqlx::PgPool;
use std::marker::PhantomData;

use super::{db_error, PostgresStore};
use crate::inbox;
use crate::ports::InboxStore;

/// Inbox records of one kind in the shared `inbox_records` table
pub struct PostgresInbox<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: InboxRecord> PostgresInbox<R> {
    pub fn new(store: &PostgresStore) -> Self {
        Self {
            pool: store.pool().clone(),
            _record: PhantomData,
        }
    }
}

fn decode<R: InboxRecord>(payload: Value) -> Result<R> {
    serde_json::from_value(payload).map_err(|e| db_error("Stored inbox record is invalid", e))
}

/// Move a locked row's record to `status`, returning it with its new payload
fn advance<R: InboxRecord>(payload: Value, status: R::Status) -> Result<(R, Value)> {
    let mut record: R = decode(payload)?;
    transition(&mut record, status)?;
    let payload = serde_json::to_value(&record)?;
    Ok((record, payload))
}

#[async_trait]
impl<R: InboxRecord> InboxStore<R> for PostgresInbox<R> {
    async fn submit(&self, fields: Fields) -> Result<R> {
        let record: R = inbox::new_record(fields)?;

        sqlx::query(
            r#"
            INSERT INTO inbox_records (kind, id, status, payload, received_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(R::KIND)
        .bind(record.id())
        .bind(record.status().to_string())
        .bind(serde_json::to_value(&record)?)
        .bind(record.received_at())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to store submission", e))?;

        tracing::info!(kind = R::KIND, id = record.id(), "Received submission");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<R>> {
        let rows: Vec<(Value,)> = sqlx::query_as(
            "SELECT payload FROM inbox_records WHERE kind = $1 ORDER BY received_at DESC",
        )
        .bind(R::KIND)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list inbox", e))?;

        rows.into_iter().map(|(payload,)| decode(payload)).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        let row: Option<(Value,)> =
            sqlx::query_as("SELECT payload FROM inbox_records WHERE kind = $1 AND id = $2")
                .bind(R::KIND)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to read inbox record", e))?;

        row.map(|(payload,)| decode(payload)).transpose()
    }

    async fn set_status(&self, id: &str, status: R::Status) -> Result<Option<R>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let row: Option<(Value,)> = sqlx::query_as(
            "SELECT payload FROM inbox_records WHERE kind = $1 AND id = $2 FOR UPDATE",
        )
        .bind(R::KIND)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to read inbox record", e))?;

        let Some((payload,)) = row else {
            return Ok(None);
        };
        let (record, payload) = advance::<R>(payload, status)?;

        sqlx::query(
            "UPDATE inbox_records SET status = $3, payload = $4 WHERE kind = $1 AND id = $2",
        )
        .bind(R::KIND)
        .bind(id)
        .bind(record.status().to_string())
        .bind(payload)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to update inbox record", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit status change", e))?;

        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM inbox_records WHERE kind = $1 AND id = $2")
            .bind(R::KIND)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete inbox record", e))?;

        Ok(result.rows_affected() > 0)
    }
}

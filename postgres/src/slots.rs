//! Slot persistence.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::Row;
use turfbook_core::error::{BookingError, Result};
use turfbook_core::slots::{SlotRange, partition_range, validate_price};
use turfbook_core::stores::SlotStore;
use turfbook_core::types::{Money, Slot, SlotId, VenueId};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, venue_id, start_time, end_time, price_paise, is_booked";

impl PostgresStore {
    async fn venue_exists(&self, venue: VenueId) -> Result<()> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM venues WHERE id = $1")
            .bind(venue.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        if exists.is_none() {
            return Err(BookingError::not_found("venue", venue));
        }
        Ok(())
    }
}

#[async_trait]
impl SlotStore for PostgresStore {
    async fn generate(
        &self,
        venue: VenueId,
        range: SlotRange,
        duration: Duration,
        price: Money,
    ) -> Result<Vec<SlotId>> {
        validate_price(price)?;
        let intervals = partition_range(range, duration)?;
        self.venue_exists(venue).await?;

        let mut tx = self.pool.begin().await.map_err(storage)?;
        let mut ids = Vec::with_capacity(intervals.len());
        for interval in &intervals {
            let id = SlotId::new();
            sqlx::query(
                "INSERT INTO slots (id, venue_id, start_time, end_time, price_paise) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id.as_uuid())
            .bind(venue.as_uuid())
            .bind(interval.start)
            .bind(interval.end)
            .bind(price.paise())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
            ids.push(id);
        }
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            venue_id = %venue,
            count = ids.len(),
            start = %range.start,
            end = %range.end,
            "slots generated"
        );
        Ok(ids)
    }

    async fn create(&self, venue: VenueId, range: SlotRange, price: Money) -> Result<Slot> {
        validate_price(price)?;
        self.venue_exists(venue).await?;

        let row = sqlx::query(&format!(
            "INSERT INTO slots (id, venue_id, start_time, end_time, price_paise) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SLOT_COLUMNS}"
        ))
        .bind(SlotId::new().as_uuid())
        .bind(venue.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .bind(price.paise())
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;
        Ok(rows::slot(&row))
    }

    async fn list(&self, venue: VenueId, date: Option<NaiveDate>) -> Result<Vec<Slot>> {
        let records = sqlx::query(&format!(
            "SELECT {SLOT_COLUMNS} FROM slots \
             WHERE venue_id = $1 \
               AND ($2::date IS NULL OR (start_time AT TIME ZONE 'UTC')::date = $2) \
             ORDER BY start_time"
        ))
        .bind(venue.as_uuid())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.iter().map(rows::slot).collect())
    }

    async fn get(&self, slot: SlotId) -> Result<Slot> {
        let row = sqlx::query(&format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1"))
            .bind(slot.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("slot", slot))?;
        Ok(rows::slot(&row))
    }

    async fn delete(&self, slot: SlotId) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let row = sqlx::query("SELECT is_booked FROM slots WHERE id = $1 FOR UPDATE")
            .bind(slot.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("slot", slot))?;
        if row.get::<bool, _>("is_booked") {
            return Err(BookingError::SlotBooked(slot));
        }
        sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(slot.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(slot_id = %slot, "slot deleted");
        Ok(())
    }
}

//! Transactional booking engine.
//!
//! Every multi-entity mutation runs in one transaction and takes a
//! `FOR UPDATE` lock on the slot row first, so concurrent reservations
//! of the same slot serialize on that lock and the loser observes the
//! booked flag the winner committed.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Postgres, Row, Transaction};
use turfbook_core::engine::{
    BookingEngine, BookingFilter, CancelOutcome, ReserveOutcome, SlotAvailability,
};
use turfbook_core::error::{BookingError, Result};
use turfbook_core::ledger::resolve_refund;
use turfbook_core::types::{
    Booking, BookingId, Money, PaymentStatus, PlayerId, SlotId, TransactionKind, VenueId,
};
use uuid::Uuid;

type PgTx<'c> = Transaction<'c, Postgres>;

const BOOKING_COLUMNS: &str = "id, player_id, slot_id, payment_status, is_cancelled, \
     cancel_reason, refunded_paise, advance_paise, booked_at";

impl PostgresStore {
    /// Lock a slot row and return `(price, is_booked)`.
    pub(crate) async fn lock_slot(tx: &mut PgTx<'_>, slot: SlotId) -> Result<(Money, bool)> {
        let row = sqlx::query("SELECT price_paise, is_booked FROM slots WHERE id = $1 FOR UPDATE")
            .bind(slot.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("slot", slot))?;
        Ok((Money::from_paise(row.get("price_paise")), row.get("is_booked")))
    }

    /// Lock a player row and return the wallet balance.
    pub(crate) async fn lock_player(tx: &mut PgTx<'_>, player: PlayerId) -> Result<Money> {
        let row = sqlx::query("SELECT wallet_paise FROM players WHERE id = $1 FOR UPDATE")
            .bind(player.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("player", player))?;
        Ok(Money::from_paise(row.get("wallet_paise")))
    }

    /// Move the balance and append a ledger entry inside `tx`.
    /// The caller has already locked the player row.
    pub(crate) async fn apply_ledger_tx(
        tx: &mut PgTx<'_>,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
        credit: bool,
    ) -> Result<Money> {
        let delta = if credit { amount.paise() } else { -amount.paise() };
        let row = sqlx::query(
            "UPDATE players SET wallet_paise = wallet_paise + $1 WHERE id = $2 \
             RETURNING wallet_paise",
        )
        .bind(delta)
        .bind(player.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("player", player))?;

        sqlx::query(
            "INSERT INTO wallet_entries (id, player_id, amount_paise, kind) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(player.as_uuid())
        .bind(amount.paise())
        .bind(kind.as_str())
        .execute(&mut **tx)
        .await
        .map_err(storage)?;

        Ok(Money::from_paise(row.get("wallet_paise")))
    }

    async fn insert_booking(
        tx: &mut PgTx<'_>,
        booking: &Booking,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO bookings (id, player_id, slot_id, payment_status, advance_paise, booked_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.player_id.as_uuid())
        .bind(booking.slot_id.as_uuid())
        .bind(booking.payment_status.as_str())
        .bind(booking.advance_amount.paise())
        .bind(booking.booked_at)
        .execute(&mut **tx)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn set_booked(tx: &mut PgTx<'_>, slot: SlotId, booked: bool) -> Result<()> {
        sqlx::query("UPDATE slots SET is_booked = $1 WHERE id = $2")
            .bind(booked)
            .bind(slot.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(storage)?;
        Ok(())
    }
}

#[async_trait]
impl BookingEngine for PostgresStore {
    #[tracing::instrument(skip(self))]
    async fn reserve(&self, player: PlayerId, slot: SlotId) -> Result<ReserveOutcome> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let (price, is_booked) = Self::lock_slot(&mut tx, slot).await?;
        if is_booked {
            metrics::counter!("booking.reserve.lost").increment(1);
            return Err(BookingError::SlotUnavailable(slot));
        }

        let available = Self::lock_player(&mut tx, player).await?;
        if available < price {
            return Err(BookingError::InsufficientFunds {
                required: price,
                available,
            });
        }

        let balance = if price.is_positive() {
            Self::apply_ledger_tx(&mut tx, player, price, TransactionKind::Debit, false).await?
        } else {
            available
        };

        let booking = Booking {
            id: BookingId::new(),
            player_id: player,
            slot_id: slot,
            payment_status: PaymentStatus::Confirmed,
            is_cancelled: false,
            cancel_reason: None,
            refunded_amount: Money::ZERO,
            advance_amount: Money::ZERO,
            booked_at: Utc::now(),
        };
        Self::insert_booking(&mut tx, &booking).await?;
        Self::set_booked(&mut tx, slot, true).await?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            booking_id = %booking.id,
            player_id = %player,
            slot_id = %slot,
            price = %price,
            "slot reserved"
        );
        metrics::counter!("booking.reserved").increment(1);

        Ok(ReserveOutcome { booking, balance })
    }

    #[tracing::instrument(skip(self))]
    async fn reserve_with_advance(
        &self,
        player: PlayerId,
        slot: SlotId,
        advance: Money,
        status: PaymentStatus,
    ) -> Result<Booking> {
        if advance.is_negative() {
            return Err(BookingError::Validation(format!(
                "advance amount must not be negative, got {advance}"
            )));
        }

        let mut tx = self.pool.begin().await.map_err(storage)?;

        let (_, is_booked) = Self::lock_slot(&mut tx, slot).await?;
        if is_booked {
            return Err(BookingError::SlotUnavailable(slot));
        }
        Self::lock_player(&mut tx, player).await?;

        let booking = Booking {
            id: BookingId::new(),
            player_id: player,
            slot_id: slot,
            payment_status: status,
            is_cancelled: false,
            cancel_reason: None,
            refunded_amount: Money::ZERO,
            advance_amount: advance,
            booked_at: Utc::now(),
        };
        Self::insert_booking(&mut tx, &booking).await?;
        Self::set_booked(&mut tx, slot, true).await?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            booking_id = %booking.id,
            player_id = %player,
            slot_id = %slot,
            advance = %advance,
            status = %status,
            "advance booking created"
        );
        metrics::counter!("booking.reserved_advance").increment(1);

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel(
        &self,
        booking: BookingId,
        refund: Option<Money>,
        reason: Option<String>,
    ) -> Result<CancelOutcome> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(booking.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("booking", booking))?;
        let record = rows::booking(&row)?;
        if record.is_cancelled {
            return Err(BookingError::AlreadyCancelled(booking));
        }

        let refund = resolve_refund(refund, record.advance_amount);
        if refund.is_negative() {
            return Err(BookingError::InvalidAmount(refund));
        }

        let balance = if refund.is_positive() {
            Self::lock_player(&mut tx, record.player_id).await?;
            Self::apply_ledger_tx(&mut tx, record.player_id, refund, TransactionKind::Refund, true)
                .await?
        } else {
            Self::lock_player(&mut tx, record.player_id).await?
        };

        Self::set_booked(&mut tx, record.slot_id, false).await?;
        let row = sqlx::query(&format!(
            "UPDATE bookings SET is_cancelled = TRUE, cancel_reason = $1, \
             refunded_paise = $2, payment_status = $3 WHERE id = $4 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(&reason)
        .bind(refund.paise())
        .bind(PaymentStatus::Refunded.as_str())
        .bind(booking.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;
        let cancelled = rows::booking(&row)?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            booking_id = %booking,
            player_id = %cancelled.player_id,
            refund = %refund,
            "booking cancelled"
        );
        metrics::counter!("booking.cancelled").increment(1);

        Ok(CancelOutcome {
            booking: cancelled,
            refund,
            balance,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn reschedule(&self, booking: BookingId, new_slot: SlotId) -> Result<Booking> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row = sqlx::query(
            "SELECT slot_id, is_cancelled FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("booking", booking))?;
        if row.get::<bool, _>("is_cancelled") {
            return Err(BookingError::AlreadyCancelled(booking));
        }
        let old_slot = SlotId::from_uuid(row.get("slot_id"));

        let (_, is_booked) = Self::lock_slot(&mut tx, new_slot).await?;
        if is_booked {
            return Err(BookingError::SlotUnavailable(new_slot));
        }

        Self::set_booked(&mut tx, old_slot, false).await?;
        Self::set_booked(&mut tx, new_slot, true).await?;
        let row = sqlx::query(&format!(
            "UPDATE bookings SET slot_id = $1 WHERE id = $2 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(new_slot.as_uuid())
        .bind(booking.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;
        let updated = rows::booking(&row)?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            booking_id = %booking,
            old_slot = %old_slot,
            new_slot = %new_slot,
            "booking rescheduled"
        );
        metrics::counter!("booking.rescheduled").increment(1);

        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, booking: BookingId, status: PaymentStatus) -> Result<Booking> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row = sqlx::query("SELECT payment_status FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(booking.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("booking", booking))?;
        let current: PaymentStatus = row.get::<String, _>("payment_status").parse()?;
        if !current.can_transition_to(status) {
            return Err(BookingError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        let row = sqlx::query(&format!(
            "UPDATE bookings SET payment_status = $1 WHERE id = $2 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(booking.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;
        let updated = rows::booking(&row)?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(booking_id = %booking, from = %current, to = %status, "payment status updated");
        Ok(updated)
    }

    async fn availability(
        &self,
        venue: VenueId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<SlotAvailability> {
        if start >= end {
            return Err(BookingError::Validation(format!(
                "window start {start} must be before end {end}"
            )));
        }

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM venues WHERE id = $1")
            .bind(venue.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        if exists.is_none() {
            return Err(BookingError::not_found("venue", venue));
        }

        let conflict: Option<(Uuid,)> = sqlx::query_as(
            "SELECT b.id FROM bookings b \
             JOIN slots s ON s.id = b.slot_id \
             WHERE s.venue_id = $1 \
               AND NOT b.is_cancelled \
               AND b.payment_status = 'confirmed' \
               AND (s.start_time AT TIME ZONE 'UTC')::date = $2 \
               AND (s.start_time AT TIME ZONE 'UTC')::time < $4 \
               AND (s.end_time AT TIME ZONE 'UTC')::time > $3 \
             LIMIT 1",
        )
        .bind(venue.as_uuid())
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(SlotAvailability {
            available: conflict.is_none(),
            conflict: conflict.map(|(id,)| BookingId::from_uuid(id)),
        })
    }

    async fn booking(&self, booking: BookingId) -> Result<Booking> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(booking.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("booking", booking))?;
        rows::booking(&row)
    }

    async fn bookings_for_player(&self, player: PlayerId) -> Result<Vec<Booking>> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM players WHERE id = $1")
            .bind(player.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        if exists.is_none() {
            return Err(BookingError::not_found("player", player));
        }

        let records = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE player_id = $1 ORDER BY booked_at DESC"
        ))
        .bind(player.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        records.iter().map(rows::booking).collect()
    }

    async fn bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>> {
        let records = sqlx::query(
            "SELECT b.id, b.player_id, b.slot_id, b.payment_status, b.is_cancelled, \
                    b.cancel_reason, b.refunded_paise, b.advance_paise, b.booked_at \
             FROM bookings b \
             JOIN slots s ON s.id = b.slot_id \
             WHERE ($1::uuid IS NULL OR s.venue_id = $1) \
               AND ($2::uuid IS NULL OR b.player_id = $2) \
               AND ($3::text IS NULL OR b.payment_status = $3) \
             ORDER BY b.booked_at DESC",
        )
        .bind(filter.venue.map(|v| *v.as_uuid()))
        .bind(filter.player.map(|p| *p.as_uuid()))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        records.iter().map(rows::booking).collect()
    }
}

//! Booking endpoints: player self-service plus the admin desk.

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use turfbook_core::engine::BookingFilter;
use turfbook_core::stores::log_action;
use turfbook_core::types::{Booking, BookingId, Money, PaymentStatus, PlayerId, SlotId, VenueId};

/// Request body for a player reservation.
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    /// Slot to reserve.
    pub slot_id: SlotId,
}

/// Response for a successful player reservation.
#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    /// The created booking.
    pub booking: Booking,
    /// Wallet balance after the debit.
    pub balance: Money,
}

/// Request body for a player cancellation.
#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    /// Optional cancellation reason.
    pub reason: Option<String>,
}

/// Response for a successful cancellation.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// The booking after the cancel transition.
    pub booking: Booking,
    /// Amount credited back to the wallet.
    pub refund: Money,
    /// Wallet balance after the refund.
    pub balance: Money,
}

/// Request body for an admin-created booking.
#[derive(Debug, Deserialize)]
pub struct AdminReserveRequest {
    /// Player the booking is for.
    pub player_id: PlayerId,
    /// Slot to reserve.
    pub slot_id: SlotId,
    /// Advance collected offline, in paise.
    #[serde(default)]
    pub advance: Money,
    /// Initial payment status.
    pub status: PaymentStatus,
}

/// Request body for an admin cancellation.
#[derive(Debug, Default, Deserialize)]
pub struct AdminCancelRequest {
    /// Explicit refund amount; defaults to the recorded advance.
    pub refund: Option<Money>,
    /// Optional cancellation reason.
    pub reason: Option<String>,
}

/// Request body for rescheduling.
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    /// The slot to move the booking to.
    pub slot_id: SlotId,
}

/// Request body for a payment-status change.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target payment status.
    pub status: PaymentStatus,
}

/// Query parameters for the admin booking listing.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    /// Restrict to one venue.
    pub venue_id: Option<VenueId>,
    /// Restrict to one player.
    pub player_id: Option<PlayerId>,
    /// Restrict to one payment status.
    pub status: Option<PaymentStatus>,
}

/// `POST /api/bookings`, pays from the player's wallet.
pub async fn reserve(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<ReserveResponse>), AppError> {
    let player = actor.require_player()?;
    let outcome = state.engine.reserve(player, body.slot_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReserveResponse {
            booking: outcome.booking,
            balance: outcome.balance,
        }),
    ))
}

/// `GET /api/bookings`, the caller's own bookings, newest first.
pub async fn list_own(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<Vec<Booking>>, AppError> {
    let player = actor.require_player()?;
    Ok(Json(state.engine.bookings_for_player(player).await?))
}

/// `GET /api/bookings/:id`
///
/// Players see only their own bookings; an unknown or foreign id is 404
/// either way.
pub async fn get(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(booking): Path<BookingId>,
) -> Result<Json<Booking>, AppError> {
    let found = state.engine.booking(booking).await?;
    if let Some(player) = actor.actor().player_id() {
        if found.player_id != player {
            return Err(AppError::not_found("booking", booking));
        }
    }
    Ok(Json(found))
}

/// `POST /api/bookings/:id/cancel`
///
/// Self-service cancellation refunds the full slot price.
pub async fn cancel(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(booking): Path<BookingId>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, AppError> {
    let player = actor.require_player()?;
    let found = state.engine.booking(booking).await?;
    if found.player_id != player {
        return Err(AppError::not_found("booking", booking));
    }

    let slot = state.slots.get(found.slot_id).await?;
    let outcome = state
        .engine
        .cancel(booking, Some(slot.price), body.reason)
        .await?;
    Ok(Json(CancelResponse {
        booking: outcome.booking,
        refund: outcome.refund,
        balance: outcome.balance,
    }))
}

/// `POST /api/admin/bookings`, offline-payment booking with an advance.
pub async fn admin_reserve(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<AdminReserveRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let actor = actor.require_admin()?;
    let booking = state
        .engine
        .reserve_with_advance(body.player_id, body.slot_id, body.advance, body.status)
        .await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "create_booking",
        &format!("booking {} for player {}", booking.id, body.player_id),
    )
    .await;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /api/admin/bookings`
pub async fn admin_list(
    State(state): State<AppState>,
    actor: CurrentActor,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    actor.require_admin()?;
    let bookings = state
        .engine
        .bookings(BookingFilter {
            venue: query.venue_id,
            player: query.player_id,
            status: query.status,
        })
        .await?;
    Ok(Json(bookings))
}

/// `POST /api/admin/bookings/:id/cancel`
pub async fn admin_cancel(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(booking): Path<BookingId>,
    Json(body): Json<AdminCancelRequest>,
) -> Result<Json<CancelResponse>, AppError> {
    let actor = actor.require_admin()?;
    let outcome = state.engine.cancel(booking, body.refund, body.reason).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "cancel_booking",
        &format!("booking {booking} refund {}", outcome.refund),
    )
    .await;
    Ok(Json(CancelResponse {
        booking: outcome.booking,
        refund: outcome.refund,
        balance: outcome.balance,
    }))
}

/// `POST /api/admin/bookings/:id/reschedule`
pub async fn reschedule(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(booking): Path<BookingId>,
    Json(body): Json<RescheduleRequest>,
) -> Result<Json<Booking>, AppError> {
    let actor = actor.require_admin()?;
    let updated = state.engine.reschedule(booking, body.slot_id).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "reschedule_booking",
        &format!("booking {booking} to slot {}", body.slot_id),
    )
    .await;
    Ok(Json(updated))
}

/// `POST /api/admin/bookings/:id/status`
pub async fn update_status(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(booking): Path<BookingId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let actor = actor.require_admin()?;
    let updated = state.engine.update_status(booking, body.status).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "update_booking_status",
        &format!("booking {booking} to {}", body.status),
    )
    .await;
    Ok(Json(updated))
}

//! Slot inventory endpoints.

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use turfbook_core::error::BookingError;
use turfbook_core::slots::SlotRange;
use turfbook_core::stores::log_action;
use turfbook_core::types::{Money, Slot, SlotId, VenueId};

/// Query parameters for the slot listing.
#[derive(Debug, Default, Deserialize)]
pub struct SlotListQuery {
    /// Restrict to one calendar date.
    pub date: Option<NaiveDate>,
}

/// Request body for creating one slot.
#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    /// Slot start (UTC).
    pub start: DateTime<Utc>,
    /// Slot end (UTC).
    pub end: DateTime<Utc>,
    /// Price in paise.
    pub price: Money,
}

/// Request body for bulk slot generation.
#[derive(Debug, Deserialize)]
pub struct GenerateSlotsRequest {
    /// Range start (UTC).
    pub start: DateTime<Utc>,
    /// Range end (UTC).
    pub end: DateTime<Utc>,
    /// Length of each generated slot.
    pub duration_minutes: i64,
    /// Price per slot in paise.
    pub price: Money,
}

/// Response for bulk generation: the created ids in start-time order.
#[derive(Debug, Serialize)]
pub struct GenerateSlotsResponse {
    /// Ids of the created slots.
    pub slot_ids: Vec<SlotId>,
}

/// Query parameters for the availability check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Calendar date to check.
    pub date: NaiveDate,
    /// Window start time.
    pub start: NaiveTime,
    /// Window end time.
    pub end: NaiveTime,
}

/// Availability response.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Whether the window is free of confirmed bookings.
    pub available: bool,
    /// Conflicting booking id, when one exists.
    pub conflict: Option<turfbook_core::types::BookingId>,
}

/// `GET /api/venues/:id/slots`
pub async fn list(
    State(state): State<AppState>,
    Path(venue): Path<VenueId>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    Ok(Json(state.slots.list(venue, query.date).await?))
}

/// `GET /api/venues/:id/availability`
pub async fn availability(
    State(state): State<AppState>,
    Path(venue): Path<VenueId>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let check = state
        .engine
        .availability(venue, query.date, query.start, query.end)
        .await?;
    Ok(Json(AvailabilityResponse {
        available: check.available,
        conflict: check.conflict,
    }))
}

/// `POST /api/admin/venues/:id/slots`
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(venue): Path<VenueId>,
    Json(body): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<Slot>), AppError> {
    let actor = actor.require_admin()?;
    let range = SlotRange::new(body.start, body.end)?;
    let slot = state.slots.create(venue, range, body.price).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "create_slot",
        &format!("slot {} at venue {venue}", slot.id),
    )
    .await;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// `POST /api/admin/venues/:id/slots/generate`
pub async fn generate(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(venue): Path<VenueId>,
    Json(body): Json<GenerateSlotsRequest>,
) -> Result<(StatusCode, Json<GenerateSlotsResponse>), AppError> {
    let actor = actor.require_admin()?;
    let range = SlotRange::new(body.start, body.end)?;
    let duration = Duration::try_minutes(body.duration_minutes).ok_or_else(|| {
        BookingError::InvalidRange(format!(
            "slot duration of {} minutes is out of range",
            body.duration_minutes
        ))
    })?;
    let slot_ids = state
        .slots
        .generate(venue, range, duration, body.price)
        .await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "generate_slots",
        &format!("{} slots at venue {venue}", slot_ids.len()),
    )
    .await;
    Ok((StatusCode::CREATED, Json(GenerateSlotsResponse { slot_ids })))
}

/// `DELETE /api/admin/slots/:id`
pub async fn delete(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(slot): Path<SlotId>,
) -> Result<StatusCode, AppError> {
    let actor = actor.require_admin()?;
    state.slots.delete(slot).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "delete_slot",
        &format!("slot {slot}"),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

//! Venue catalog endpoints.

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::{Json, http::StatusCode};
use serde::Deserialize;
use turfbook_core::stores::{NewVenue, VenueUpdate, log_action};
use turfbook_core::types::{Money, Venue, VenueId};

/// Request body for creating a venue.
#[derive(Debug, Deserialize)]
pub struct CreateVenueRequest {
    /// Display name.
    pub name: String,
    /// Human-readable location.
    pub location: String,
    /// Sport played here.
    pub sport_type: String,
    /// Hourly rate in paise.
    pub price_per_hour: Money,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Request body for a partial venue update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVenueRequest {
    /// New display name.
    pub name: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New sport type.
    pub sport_type: Option<String>,
    /// New hourly rate in paise.
    pub price_per_hour: Option<Money>,
    /// New description.
    pub description: Option<String>,
}

/// Request body for toggling the active flag.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// New active state.
    pub active: bool,
}

/// `GET /api/venues`, active venues only, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Venue>>, AppError> {
    Ok(Json(state.venues.list(false).await?))
}

/// `GET /api/venues/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(venue): Path<VenueId>,
) -> Result<Json<Venue>, AppError> {
    Ok(Json(state.venues.get(venue).await?))
}

/// `GET /api/admin/venues`, inactive venues included.
pub async fn admin_list(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<Vec<Venue>>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.venues.list(true).await?))
}

/// `POST /api/admin/venues`
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<CreateVenueRequest>,
) -> Result<(StatusCode, Json<Venue>), AppError> {
    let actor = actor.require_admin()?;
    let venue = state
        .venues
        .create(NewVenue {
            name: body.name,
            location: body.location,
            sport_type: body.sport_type,
            price_per_hour: body.price_per_hour,
            description: body.description,
        })
        .await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "create_venue",
        &format!("venue {} ({})", venue.id, venue.name),
    )
    .await;
    Ok((StatusCode::CREATED, Json(venue)))
}

/// `PATCH /api/admin/venues/:id`
pub async fn update(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(venue): Path<VenueId>,
    Json(body): Json<UpdateVenueRequest>,
) -> Result<Json<Venue>, AppError> {
    let actor = actor.require_admin()?;
    let updated = state
        .venues
        .update(
            venue,
            VenueUpdate {
                name: body.name,
                location: body.location,
                sport_type: body.sport_type,
                price_per_hour: body.price_per_hour,
                description: body.description,
            },
        )
        .await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "update_venue",
        &format!("venue {venue}"),
    )
    .await;
    Ok(Json(updated))
}

/// `POST /api/admin/venues/:id/activate`, soft delete and restore.
pub async fn set_active(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(venue): Path<VenueId>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<Venue>, AppError> {
    let actor = actor.require_admin()?;
    let updated = state.venues.set_active(venue, body.active).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "set_venue_active",
        &format!("venue {venue} active={}", body.active),
    )
    .await;
    Ok(Json(updated))
}

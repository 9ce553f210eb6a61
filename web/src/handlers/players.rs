//! Player registration and directory endpoints.

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use serde::Deserialize;
use turfbook_core::stores::{NewPlayer, PlayerUpdate, log_action};
use turfbook_core::types::{Player, PlayerId};

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Phone number; must be unique.
    pub phone: String,
    /// Display name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Home city.
    pub city: Option<String>,
}

/// Query parameters for the admin player listing.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerListQuery {
    /// Name/phone substring search.
    pub q: Option<String>,
}

/// Request body for an admin player update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlayerRequest {
    /// New display name.
    pub name: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// Activate or deactivate the account.
    pub is_active: Option<bool>,
}

/// `POST /api/players`, open registration.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    let player = state
        .players
        .create(NewPlayer {
            name: body.name,
            phone: body.phone,
            email: body.email,
            city: body.city,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// `GET /api/players/me`
pub async fn me(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<Player>, AppError> {
    let player = actor.require_player()?;
    Ok(Json(state.players.get(player).await?))
}

/// `GET /api/admin/players`
pub async fn admin_list(
    State(state): State<AppState>,
    actor: CurrentActor,
    Query(query): Query<PlayerListQuery>,
) -> Result<Json<Vec<Player>>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.players.list(query.q.as_deref()).await?))
}

/// `GET /api/admin/players/:id`
pub async fn admin_get(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(player): Path<PlayerId>,
) -> Result<Json<Player>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.players.get(player).await?))
}

/// `PATCH /api/admin/players/:id`
pub async fn admin_update(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(player): Path<PlayerId>,
    Json(body): Json<UpdatePlayerRequest>,
) -> Result<Json<Player>, AppError> {
    let actor = actor.require_admin()?;
    let updated = state
        .players
        .update(
            player,
            PlayerUpdate {
                name: body.name,
                city: body.city,
                is_active: body.is_active,
            },
        )
        .await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "update_player",
        &format!("player {player}"),
    )
    .await;
    Ok(Json(updated))
}

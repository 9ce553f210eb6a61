//! Wallet endpoints.
//!
//! Players read their own wallet; admins adjust any player's wallet
//! through the directory routes.

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use turfbook_core::stores::log_action;
use turfbook_core::types::{Money, PlayerId, TransactionKind, WalletEntry};

/// Wallet view: balance plus the transaction log, newest first.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    /// Current balance in paise.
    pub balance: Money,
    /// Transaction history, newest first.
    pub history: Vec<WalletEntry>,
}

/// Direction of a manual adjustment.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    /// Credit the wallet.
    Add,
    /// Debit the wallet.
    Debit,
}

/// Request body for a manual wallet adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Amount in paise; must be positive.
    pub amount: Money,
    /// Whether to credit or debit.
    pub direction: AdjustDirection,
}

/// Response for a manual adjustment.
#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    /// Balance after the adjustment.
    pub balance: Money,
}

/// `GET /api/wallet`, the caller's own wallet.
pub async fn get_own(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<WalletResponse>, AppError> {
    let player = actor.require_player()?;
    let balance = state.wallet.balance(player).await?;
    let history = state.wallet.history(player).await?;
    Ok(Json(WalletResponse { balance, history }))
}

/// `GET /api/admin/players/:id/wallet`
pub async fn admin_get(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(player): Path<PlayerId>,
) -> Result<Json<WalletResponse>, AppError> {
    actor.require_admin()?;
    let balance = state.wallet.balance(player).await?;
    let history = state.wallet.history(player).await?;
    Ok(Json(WalletResponse { balance, history }))
}

/// `POST /api/admin/players/:id/wallet`, manual credit or debit.
pub async fn adjust(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(player): Path<PlayerId>,
    Json(body): Json<AdjustRequest>,
) -> Result<Json<AdjustResponse>, AppError> {
    let actor = actor.require_admin()?;
    let balance = match body.direction {
        AdjustDirection::Add => {
            state
                .wallet
                .credit(player, body.amount, TransactionKind::Add)
                .await?
        }
        AdjustDirection::Debit => {
            state
                .wallet
                .debit(player, body.amount, TransactionKind::Debit)
                .await?
        }
    };

    log_action(
        state.audit.as_ref(),
        &actor,
        "adjust_wallet",
        &format!("player {player} {:?} {}", body.direction, body.amount),
    )
    .await;
    Ok(Json(AdjustResponse { balance }))
}

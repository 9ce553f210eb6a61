//! Admin dashboard, sales report and audit trail endpoints.

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use turfbook_core::types::{ActionLogEntry, DashboardSummary, SalesReport};

/// Query parameters for the audit trail listing.
#[derive(Debug, Default, Deserialize)]
pub struct ActionsQuery {
    /// Maximum number of entries to return.
    pub limit: Option<i64>,
}

const DEFAULT_ACTION_LIMIT: i64 = 50;
const MAX_ACTION_LIMIT: i64 = 500;

/// `GET /api/admin/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<DashboardSummary>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.reports.dashboard(Utc::now()).await?))
}

/// `GET /api/admin/reports/sales`
pub async fn sales(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<SalesReport>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.reports.sales(Utc::now()).await?))
}

/// `GET /api/admin/actions`, the audit trail, newest first.
pub async fn actions(
    State(state): State<AppState>,
    actor: CurrentActor,
    Query(query): Query<ActionsQuery>,
) -> Result<Json<Vec<ActionLogEntry>>, AppError> {
    actor.require_admin()?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACTION_LIMIT)
        .clamp(1, MAX_ACTION_LIMIT);
    Ok(Json(state.audit.recent(limit).await?))
}

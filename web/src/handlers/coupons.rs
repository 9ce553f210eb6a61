//! Coupon campaign endpoints (admin only).

use crate::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::{Json, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use turfbook_core::coupons::generate_codes;
use turfbook_core::stores::{NewCampaign, log_action};
use turfbook_core::types::{CampaignId, CouponCampaign, CouponCode, Discount, Money};

/// Request body for creating a campaign.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    /// Internal campaign name.
    pub name: String,
    /// Code prefix; minted codes are `PREFIX-XXXXXX`.
    pub code: String,
    /// Discount the codes grant.
    pub discount: Discount,
    /// Minimum order value in paise.
    #[serde(default)]
    pub min_order: Money,
    /// Uses allowed per code.
    pub usage_limit: i32,
    /// First valid day.
    pub valid_from: Option<NaiveDate>,
    /// Last valid day.
    pub valid_to: Option<NaiveDate>,
}

/// Request body for minting codes.
#[derive(Debug, Deserialize)]
pub struct MintCodesRequest {
    /// How many codes to mint.
    pub count: usize,
}

/// `POST /api/admin/coupons`
pub async fn create_campaign(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<CouponCampaign>), AppError> {
    let actor = actor.require_admin()?;
    let campaign = state
        .coupons
        .create_campaign(NewCampaign {
            name: body.name,
            code: body.code,
            discount: body.discount,
            min_order: body.min_order,
            usage_limit: body.usage_limit,
            valid_from: body.valid_from,
            valid_to: body.valid_to,
        })
        .await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "create_campaign",
        &format!("campaign {} ({})", campaign.id, campaign.code),
    )
    .await;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// `GET /api/admin/coupons`
pub async fn list_campaigns(
    State(state): State<AppState>,
    actor: CurrentActor,
) -> Result<Json<Vec<CouponCampaign>>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.coupons.list_campaigns().await?))
}

/// `GET /api/admin/coupons/:id`
pub async fn get_campaign(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(campaign): Path<CampaignId>,
) -> Result<Json<CouponCampaign>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.coupons.get_campaign(campaign).await?))
}

/// `POST /api/admin/coupons/:id/codes`, mints a batch of codes.
pub async fn mint_codes(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(campaign): Path<CampaignId>,
    Json(body): Json<MintCodesRequest>,
) -> Result<(StatusCode, Json<Vec<CouponCode>>), AppError> {
    let actor = actor.require_admin()?;
    if body.count == 0 || body.count > 10_000 {
        return Err(AppError::validation(
            "code count must be between 1 and 10000",
        ));
    }

    let found = state.coupons.get_campaign(campaign).await?;
    let codes = generate_codes(&found.code, body.count, &mut rand::thread_rng());
    let minted = state.coupons.insert_codes(campaign, codes).await?;

    log_action(
        state.audit.as_ref(),
        &actor,
        "mint_coupon_codes",
        &format!("{} codes for campaign {campaign}", minted.len()),
    )
    .await;
    Ok((StatusCode::CREATED, Json(minted)))
}

/// `GET /api/admin/coupons/:id/codes`
pub async fn list_codes(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(campaign): Path<CampaignId>,
) -> Result<Json<Vec<CouponCode>>, AppError> {
    actor.require_admin()?;
    Ok(Json(state.coupons.codes(campaign).await?))
}

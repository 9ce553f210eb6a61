//! Coupon campaign and code persistence.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use turfbook_core::error::{BookingError, Result};
use turfbook_core::stores::{CouponStore, NewCampaign};
use turfbook_core::types::{CampaignId, CouponCampaign, CouponCode};
use uuid::Uuid;

const CAMPAIGN_COLUMNS: &str = "id, name, code, discount_kind, discount_value, \
     min_order_paise, usage_limit, valid_from, valid_to, active, created_at";

const CODE_COLUMNS: &str = "id, campaign_id, code, assigned_to, used_by, used_at, created_at";

impl PostgresStore {
    async fn campaign_exists(&self, campaign: CampaignId) -> Result<()> {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM coupon_campaigns WHERE id = $1")
                .bind(campaign.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;
        if exists.is_none() {
            return Err(BookingError::not_found("campaign", campaign));
        }
        Ok(())
    }
}

#[async_trait]
impl CouponStore for PostgresStore {
    async fn create_campaign(&self, campaign: NewCampaign) -> Result<CouponCampaign> {
        if campaign.name.trim().is_empty() || campaign.code.trim().is_empty() {
            return Err(BookingError::Validation(
                "campaign name and code are required".to_string(),
            ));
        }
        if campaign.usage_limit < 1 {
            return Err(BookingError::Validation(
                "usage_limit must be at least 1".to_string(),
            ));
        }

        let (discount_kind, discount_value) = rows::discount_columns(campaign.discount);
        let result = sqlx::query(&format!(
            "INSERT INTO coupon_campaigns \
                (id, name, code, discount_kind, discount_value, min_order_paise, \
                 usage_limit, valid_from, valid_to) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {CAMPAIGN_COLUMNS}"
        ))
        .bind(CampaignId::new().as_uuid())
        .bind(&campaign.name)
        .bind(&campaign.code)
        .bind(discount_kind)
        .bind(discount_value)
        .bind(campaign.min_order.paise())
        .bind(campaign.usage_limit)
        .bind(campaign.valid_from)
        .bind(campaign.valid_to)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(BookingError::Validation(format!(
                    "campaign code {} already exists",
                    campaign.code
                )));
            }
            Err(err) => return Err(storage(err)),
        };
        let created = rows::campaign(&row)?;

        tracing::info!(campaign_id = %created.id, code = %created.code, "coupon campaign created");
        Ok(created)
    }

    async fn list_campaigns(&self) -> Result<Vec<CouponCampaign>> {
        let records = sqlx::query(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM coupon_campaigns ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        records.iter().map(rows::campaign).collect()
    }

    async fn get_campaign(&self, campaign: CampaignId) -> Result<CouponCampaign> {
        let row = sqlx::query(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM coupon_campaigns WHERE id = $1"
        ))
        .bind(campaign.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("campaign", campaign))?;
        rows::campaign(&row)
    }

    async fn insert_codes(
        &self,
        campaign: CampaignId,
        codes: Vec<String>,
    ) -> Result<Vec<CouponCode>> {
        self.campaign_exists(campaign).await?;

        let mut tx = self.pool.begin().await.map_err(storage)?;
        let mut minted = Vec::with_capacity(codes.len());
        for code in codes {
            let result = sqlx::query(&format!(
                "INSERT INTO coupon_codes (id, campaign_id, code) \
                 VALUES ($1, $2, $3) RETURNING {CODE_COLUMNS}"
            ))
            .bind(Uuid::new_v4())
            .bind(campaign.as_uuid())
            .bind(&code)
            .fetch_one(&mut *tx)
            .await;

            let row = match result {
                Ok(row) => row,
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    return Err(BookingError::Validation(format!(
                        "coupon code {code} already exists"
                    )));
                }
                Err(err) => return Err(storage(err)),
            };
            minted.push(rows::coupon_code(&row));
        }
        tx.commit().await.map_err(storage)?;

        tracing::info!(campaign_id = %campaign, count = minted.len(), "coupon codes minted");
        Ok(minted)
    }

    async fn codes(&self, campaign: CampaignId) -> Result<Vec<CouponCode>> {
        self.campaign_exists(campaign).await?;

        let records = sqlx::query(&format!(
            "SELECT {CODE_COLUMNS} FROM coupon_codes \
             WHERE campaign_id = $1 ORDER BY created_at"
        ))
        .bind(campaign.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.iter().map(rows::coupon_code).collect())
    }
}

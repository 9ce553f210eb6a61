//! Venue catalog persistence.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use turfbook_core::error::{BookingError, Result};
use turfbook_core::slots::validate_price;
use turfbook_core::stores::{NewVenue, VenueCatalog, VenueUpdate};
use turfbook_core::types::{Venue, VenueId};

const VENUE_COLUMNS: &str =
    "id, name, location, sport_type, price_per_hour_paise, description, is_active, created_at";

#[async_trait]
impl VenueCatalog for PostgresStore {
    async fn create(&self, venue: NewVenue) -> Result<Venue> {
        if venue.name.trim().is_empty()
            || venue.location.trim().is_empty()
            || venue.sport_type.trim().is_empty()
        {
            return Err(BookingError::Validation(
                "name, location and sport_type are required".to_string(),
            ));
        }
        validate_price(venue.price_per_hour)?;

        let row = sqlx::query(&format!(
            "INSERT INTO venues (id, name, location, sport_type, price_per_hour_paise, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VENUE_COLUMNS}"
        ))
        .bind(VenueId::new().as_uuid())
        .bind(&venue.name)
        .bind(&venue.location)
        .bind(&venue.sport_type)
        .bind(venue.price_per_hour.paise())
        .bind(&venue.description)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;
        let created = rows::venue(&row);

        tracing::info!(venue_id = %created.id, name = %created.name, "venue listed");
        Ok(created)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Venue>> {
        let records = sqlx::query(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues \
             WHERE is_active OR $1 \
             ORDER BY created_at DESC"
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.iter().map(rows::venue).collect())
    }

    async fn get(&self, venue: VenueId) -> Result<Venue> {
        let row = sqlx::query(&format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"))
            .bind(venue.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("venue", venue))?;
        Ok(rows::venue(&row))
    }

    async fn update(&self, venue: VenueId, update: VenueUpdate) -> Result<Venue> {
        if let Some(rate) = update.price_per_hour {
            validate_price(rate)?;
        }

        let row = sqlx::query(&format!(
            "UPDATE venues SET \
                name = COALESCE($1, name), \
                location = COALESCE($2, location), \
                sport_type = COALESCE($3, sport_type), \
                price_per_hour_paise = COALESCE($4, price_per_hour_paise), \
                description = COALESCE($5, description) \
             WHERE id = $6 RETURNING {VENUE_COLUMNS}"
        ))
        .bind(update.name)
        .bind(update.location)
        .bind(update.sport_type)
        .bind(update.price_per_hour.map(|rate| rate.paise()))
        .bind(update.description)
        .bind(venue.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("venue", venue))?;
        Ok(rows::venue(&row))
    }

    async fn set_active(&self, venue: VenueId, active: bool) -> Result<Venue> {
        let row = sqlx::query(&format!(
            "UPDATE venues SET is_active = $1 WHERE id = $2 RETURNING {VENUE_COLUMNS}"
        ))
        .bind(active)
        .bind(venue.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("venue", venue))?;

        tracing::info!(venue_id = %venue, active, "venue active flag changed");
        Ok(rows::venue(&row))
    }
}

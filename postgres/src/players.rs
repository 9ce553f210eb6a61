//! Player directory persistence.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use turfbook_core::error::{BookingError, Result};
use turfbook_core::stores::{NewPlayer, PlayerDirectory, PlayerUpdate};
use turfbook_core::types::{Player, PlayerId};

const PLAYER_COLUMNS: &str =
    "id, name, phone, email, city, is_active, wallet_paise, created_at";

#[async_trait]
impl PlayerDirectory for PostgresStore {
    async fn create(&self, player: NewPlayer) -> Result<Player> {
        if player.phone.trim().is_empty() {
            return Err(BookingError::Validation("phone is required".to_string()));
        }

        let result = sqlx::query(&format!(
            "INSERT INTO players (id, name, phone, email, city) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(PlayerId::new().as_uuid())
        .bind(player.name)
        .bind(&player.phone)
        .bind(player.email)
        .bind(player.city)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(BookingError::Validation(format!(
                    "phone {} is already registered",
                    player.phone
                )));
            }
            Err(err) => return Err(storage(err)),
        };
        let created = rows::player(&row);

        tracing::info!(player_id = %created.id, "player registered");
        Ok(created)
    }

    async fn get(&self, player: PlayerId) -> Result<Player> {
        let row = sqlx::query(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"))
            .bind(player.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("player", player))?;
        Ok(rows::player(&row))
    }

    async fn list(&self, query: Option<&str>) -> Result<Vec<Player>> {
        let pattern = query.map(|q| format!("%{q}%"));
        let records = sqlx::query(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players \
             WHERE $1::text IS NULL OR phone LIKE $1 OR name LIKE $1 \
             ORDER BY created_at DESC"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.iter().map(rows::player).collect())
    }

    async fn update(&self, player: PlayerId, update: PlayerUpdate) -> Result<Player> {
        let row = sqlx::query(&format!(
            "UPDATE players SET \
                name = COALESCE($1, name), \
                city = COALESCE($2, city), \
                is_active = COALESCE($3, is_active) \
             WHERE id = $4 RETURNING {PLAYER_COLUMNS}"
        ))
        .bind(update.name)
        .bind(update.city)
        .bind(update.is_active)
        .bind(player.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| BookingError::not_found("player", player))?;
        Ok(rows::player(&row))
    }
}

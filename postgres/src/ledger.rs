//! Wallet ledger persistence.
//!
//! Balance update and entry append happen in one transaction with the
//! player row locked, so the denormalized balance can never drift from
//! the entry log.

use crate::{PostgresStore, rows, storage};
use async_trait::async_trait;
use sqlx::Row;
use turfbook_core::error::{BookingError, Result};
use turfbook_core::ledger::{WalletLedger, ensure_positive};
use turfbook_core::types::{Money, PlayerId, TransactionKind, WalletEntry};

impl PostgresStore {
    async fn move_wallet(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
        credit: bool,
    ) -> Result<Money> {
        ensure_positive(amount)?;

        let mut tx = self.pool.begin().await.map_err(storage)?;
        Self::lock_player(&mut tx, player).await?;
        let balance = Self::apply_ledger_tx(&mut tx, player, amount, kind, credit).await?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            player_id = %player,
            amount = %amount,
            kind = %kind,
            balance = %balance,
            "wallet movement applied"
        );
        metrics::counter!("wallet.movement", "kind" => kind.as_str()).increment(1);
        Ok(balance)
    }
}

#[async_trait]
impl WalletLedger for PostgresStore {
    async fn credit(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
    ) -> Result<Money> {
        self.move_wallet(player, amount, kind, true).await
    }

    async fn debit(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
    ) -> Result<Money> {
        self.move_wallet(player, amount, kind, false).await
    }

    async fn balance(&self, player: PlayerId) -> Result<Money> {
        let row = sqlx::query("SELECT wallet_paise FROM players WHERE id = $1")
            .bind(player.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| BookingError::not_found("player", player))?;
        Ok(Money::from_paise(row.get("wallet_paise")))
    }

    async fn history(&self, player: PlayerId) -> Result<Vec<WalletEntry>> {
        self.balance(player).await?;

        let records = sqlx::query(
            "SELECT id, player_id, amount_paise, kind, created_at \
             FROM wallet_entries WHERE player_id = $1 ORDER BY created_at DESC",
        )
        .bind(player.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        records.iter().map(rows::wallet_entry).collect()
    }
}

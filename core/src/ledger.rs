//! Wallet ledger: denormalized balance plus an append-only entry log.
//!
//! The ledger is the only writer of both the balance and the entry log,
//! and every implementation must apply the two writes in one atomic unit.
//! Amount validation lives here, centralized, so booking and cancellation
//! call sites cannot drift apart from the admin adjustment endpoints.

use crate::error::{BookingError, Result};
use crate::types::{Money, PlayerId, TransactionKind, WalletEntry};
use async_trait::async_trait;

/// Reject zero and negative ledger movements.
///
/// Every [`WalletLedger`] implementation calls this before touching
/// storage; callers do not re-validate.
///
/// # Errors
///
/// Returns [`BookingError::InvalidAmount`] if `amount <= 0`.
pub const fn ensure_positive(amount: Money) -> Result<Money> {
    if !amount.is_positive() {
        return Err(BookingError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Resolve a cancellation refund amount.
///
/// Caller-supplied value wins; otherwise the booking's recorded advance
/// amount; otherwise zero. A non-positive advance collapses to zero so a
/// stale negative record can never mint money.
#[must_use]
pub fn resolve_refund(explicit: Option<Money>, advance: Money) -> Money {
    match explicit {
        Some(amount) => amount,
        None if advance.is_positive() => advance,
        None => Money::ZERO,
    }
}

/// Persisted player wallet: scalar balance plus ordered transaction log.
///
/// Balance equals the signed sum of entries since account creation; the
/// balance column is a cached projection kept consistent inside each
/// ledger transaction. The ledger does not assert non-negative balances;
/// administrative debits may drive a wallet below zero.
#[async_trait]
pub trait WalletLedger: Send + Sync {
    /// Add `amount` to the player's wallet and append an entry.
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount <= 0`; `NotFound` for an unknown
    /// player; `Storage` if the atomic write fails.
    async fn credit(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
    ) -> Result<Money>;

    /// Subtract `amount` from the player's wallet and append an entry.
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount <= 0`; `NotFound` for an unknown
    /// player; `Storage` if the atomic write fails.
    async fn debit(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
    ) -> Result<Money>;

    /// Current wallet balance.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown player.
    async fn balance(&self, player: PlayerId) -> Result<Money>;

    /// Transaction history, newest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown player.
    async fn history(&self, player: PlayerId) -> Result<Vec<WalletEntry>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn refund_resolution_prefers_explicit() {
        let advance = Money::from_rupees(200);
        assert_eq!(
            resolve_refund(Some(Money::from_rupees(500)), advance),
            Money::from_rupees(500)
        );
    }

    #[test]
    fn refund_resolution_falls_back_to_advance_then_zero() {
        assert_eq!(
            resolve_refund(None, Money::from_rupees(200)),
            Money::from_rupees(200)
        );
        assert_eq!(resolve_refund(None, Money::ZERO), Money::ZERO);
        assert_eq!(resolve_refund(None, Money::from_paise(-50)), Money::ZERO);
    }

    #[test]
    fn amount_validation() {
        assert!(ensure_positive(Money::from_paise(1)).is_ok());
        assert!(matches!(
            ensure_positive(Money::ZERO),
            Err(BookingError::InvalidAmount(_))
        ));
        assert!(ensure_positive(Money::from_paise(-100)).is_err());
    }
}

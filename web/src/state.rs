//! Application state shared across all HTTP handlers.

use crate::auth::TokenVerifier;
use std::sync::Arc;
use turfbook_core::{
    ActionLog, BookingEngine, CouponStore, PlayerDirectory, ReportStore, SlotStore, VenueCatalog,
    WalletLedger,
};

/// Trait-object handles to every store the handlers use.
///
/// One backend usually implements all of the traits (`PostgresStore` in
/// production, `MemoryBackend` in tests); [`AppState::from_backend`]
/// fans a single backend out into the individual handles.
#[derive(Clone)]
pub struct AppState {
    /// The booking engine.
    pub engine: Arc<dyn BookingEngine>,
    /// Slot persistence.
    pub slots: Arc<dyn SlotStore>,
    /// Venue catalog.
    pub venues: Arc<dyn VenueCatalog>,
    /// Player directory.
    pub players: Arc<dyn PlayerDirectory>,
    /// Wallet ledger.
    pub wallet: Arc<dyn WalletLedger>,
    /// Coupon campaigns and codes.
    pub coupons: Arc<dyn CouponStore>,
    /// Dashboard and sales aggregates.
    pub reports: Arc<dyn ReportStore>,
    /// Append-only audit trail.
    pub audit: Arc<dyn ActionLog>,
    /// Resolves bearer tokens to actors.
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Build the state from one backend implementing every store trait.
    pub fn from_backend<B>(backend: B, verifier: Arc<dyn TokenVerifier>) -> Self
    where
        B: BookingEngine
            + SlotStore
            + VenueCatalog
            + PlayerDirectory
            + WalletLedger
            + CouponStore
            + ReportStore
            + ActionLog
            + Clone
            + 'static,
    {
        Self {
            engine: Arc::new(backend.clone()),
            slots: Arc::new(backend.clone()),
            venues: Arc::new(backend.clone()),
            players: Arc::new(backend.clone()),
            wallet: Arc::new(backend.clone()),
            coupons: Arc::new(backend.clone()),
            reports: Arc::new(backend.clone()),
            audit: Arc::new(backend),
            verifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_clone() {
        // Axum requires Clone state.
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}

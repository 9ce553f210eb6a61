//! Repository traits for the entities around the booking engine.
//!
//! Each trait has two implementations: Postgres (`turfbook-postgres`)
//! and in-memory (`turfbook-testing`). The HTTP layer consumes them as
//! trait objects.

use crate::error::Result;
use crate::slots::SlotRange;
use crate::types::{
    ActionLogEntry, Actor, CampaignId, CouponCampaign, CouponCode, DashboardSummary, Discount,
    Money, Player, PlayerId, SalesReport, Slot, SlotId, Venue, VenueId,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

// ============================================================================
// Slots
// ============================================================================

/// Persisted time slots per venue.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Bulk-generate slots by partitioning `range` into `duration`-sized
    /// intervals, all at the same price. Returns the created ids in
    /// start-time order.
    ///
    /// # Errors
    ///
    /// `InvalidRange` / `InvalidPrice` per the partitioning rules;
    /// `NotFound` for an unknown venue.
    async fn generate(
        &self,
        venue: VenueId,
        range: SlotRange,
        duration: Duration,
        price: Money,
    ) -> Result<Vec<SlotId>>;

    /// Create a single slot (owner path).
    ///
    /// # Errors
    ///
    /// `InvalidPrice` for a negative price; `NotFound` for an unknown
    /// venue.
    async fn create(&self, venue: VenueId, range: SlotRange, price: Money) -> Result<Slot>;

    /// Slots for a venue, optionally restricted to one calendar date,
    /// ordered by start time ascending.
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn list(&self, venue: VenueId, date: Option<NaiveDate>) -> Result<Vec<Slot>>;

    /// Fetch one slot.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn get(&self, slot: SlotId) -> Result<Slot>;

    /// Delete a slot. Booked slots are protected.
    ///
    /// # Errors
    ///
    /// `SlotBooked` while an active booking holds the slot; `NotFound`
    /// if absent.
    async fn delete(&self, slot: SlotId) -> Result<()>;
}

// ============================================================================
// Venues
// ============================================================================

/// Fields for creating a venue.
#[derive(Clone, Debug)]
pub struct NewVenue {
    /// Display name.
    pub name: String,
    /// Human-readable location.
    pub location: String,
    /// Sport played here.
    pub sport_type: String,
    /// Reference hourly rate.
    pub price_per_hour: Money,
    /// Free-text description.
    pub description: String,
}

/// Partial venue update; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct VenueUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New sport type.
    pub sport_type: Option<String>,
    /// New hourly rate.
    pub price_per_hour: Option<Money>,
    /// New description.
    pub description: Option<String>,
}

/// The venue (turf) catalog.
#[async_trait]
pub trait VenueCatalog: Send + Sync {
    /// List a new venue.
    ///
    /// # Errors
    ///
    /// `Validation` for empty required fields; `InvalidPrice` for a
    /// negative rate.
    async fn create(&self, venue: NewVenue) -> Result<Venue>;

    /// All venues, newest first. Inactive venues are included only when
    /// `include_inactive` is set (admin listings).
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn list(&self, include_inactive: bool) -> Result<Vec<Venue>>;

    /// Fetch one venue.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn get(&self, venue: VenueId) -> Result<Venue>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent; `InvalidPrice` for a negative rate.
    async fn update(&self, venue: VenueId, update: VenueUpdate) -> Result<Venue>;

    /// Activate or deactivate a venue. Deactivation is the soft-delete
    /// path; slot and booking history is retained.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn set_active(&self, venue: VenueId, active: bool) -> Result<Venue>;
}

// ============================================================================
// Players
// ============================================================================

/// Fields for registering a player.
#[derive(Clone, Debug)]
pub struct NewPlayer {
    /// Display name.
    pub name: Option<String>,
    /// Phone number; must be unique.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// Home city.
    pub city: Option<String>,
}

/// Partial player update; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct PlayerUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// Activate/deactivate the account.
    pub is_active: Option<bool>,
}

/// The player directory (external user store from the engine's point of
/// view; the engine only resolves players by id).
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Register a player.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty phone or a phone already registered.
    async fn create(&self, player: NewPlayer) -> Result<Player>;

    /// Fetch one player.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn get(&self, player: PlayerId) -> Result<Player>;

    /// Players, newest first, optionally filtered by a name/phone
    /// substring (admin search).
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn list(&self, query: Option<&str>) -> Result<Vec<Player>>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn update(&self, player: PlayerId, update: PlayerUpdate) -> Result<Player>;
}

// ============================================================================
// Coupons
// ============================================================================

/// Fields for creating a coupon campaign.
#[derive(Clone, Debug)]
pub struct NewCampaign {
    /// Internal campaign name.
    pub name: String,
    /// Code prefix; generated codes are `PREFIX-XXXXXX`.
    pub code: String,
    /// Discount the codes grant.
    pub discount: Discount,
    /// Minimum order value.
    pub min_order: Money,
    /// Uses allowed per code.
    pub usage_limit: i32,
    /// First valid day.
    pub valid_from: Option<NaiveDate>,
    /// Last valid day.
    pub valid_to: Option<NaiveDate>,
}

/// Coupon campaigns and their minted codes.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Create a campaign.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty name/prefix or a duplicate prefix.
    async fn create_campaign(&self, campaign: NewCampaign) -> Result<CouponCampaign>;

    /// All campaigns, newest first.
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn list_campaigns(&self) -> Result<Vec<CouponCampaign>>;

    /// Fetch one campaign.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    async fn get_campaign(&self, campaign: CampaignId) -> Result<CouponCampaign>;

    /// Persist freshly generated codes for a campaign.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown campaign; `Validation` on a code
    /// collision.
    async fn insert_codes(
        &self,
        campaign: CampaignId,
        codes: Vec<String>,
    ) -> Result<Vec<CouponCode>>;

    /// Codes minted for a campaign, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown campaign.
    async fn codes(&self, campaign: CampaignId) -> Result<Vec<CouponCode>>;
}

// ============================================================================
// Reports
// ============================================================================

/// Read-only operational aggregates for the admin panel.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Dashboard counters relative to `now`.
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSummary>;

    /// Daily/monthly revenue relative to `now`.
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn sales(&self, now: DateTime<Utc>) -> Result<SalesReport>;
}

// ============================================================================
// Audit trail
// ============================================================================

/// Append-only audit trail for privileged operations.
///
/// Writes are best-effort from the caller's perspective: use
/// [`log_action`] so a failing sink can never fail the primary
/// operation.
#[async_trait]
pub trait ActionLog: Send + Sync {
    /// Append one entry.
    ///
    /// # Errors
    ///
    /// `Storage` if the sink is unavailable (callers swallow this via
    /// [`log_action`]).
    async fn record(&self, actor: &Actor, action: &str, details: &str) -> Result<()>;

    /// Most recent entries, newest first, bounded by `limit`.
    ///
    /// # Errors
    ///
    /// `Storage` on query failure.
    async fn recent(&self, limit: i64) -> Result<Vec<ActionLogEntry>>;
}

/// Record an audit entry, swallowing sink failures.
///
/// Audit logging must never block or fail the primary business
/// operation; a failure is downgraded to a warning.
pub async fn log_action(log: &dyn ActionLog, actor: &Actor, action: &str, details: &str) {
    if let Err(err) = log.record(actor, action, details).await {
        tracing::warn!(%actor, action, error = %err, "action log write failed");
    }
}

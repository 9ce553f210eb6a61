//! Domain types for the Turfbook booking marketplace.
//!
//! Value objects and entities shared by every crate in the workspace:
//! identifier newtypes, fixed-point money, the payment-status state
//! machine, and the persisted entity shapes (venues, slots, bookings,
//! players, wallet entries, coupons, audit entries).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a venue (turf).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(Uuid);

impl VenueId {
    /// Creates a new random `VenueId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `VenueId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VenueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a bookable time slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(Uuid);

impl SlotId {
    /// Creates a new random `SlotId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SlotId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a player account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Creates a new random `PlayerId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PlayerId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an admin account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(Uuid);

impl AdminId {
    /// Creates a new random `AdminId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `AdminId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AdminId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a coupon campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(Uuid);

impl CampaignId {
    /// Creates a new random `CampaignId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `CampaignId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// Money amount in paise (avoids floating point issues).
///
/// Signed so that ledger arithmetic can represent debits without a
/// separate direction flag; persisted amounts are non-negative.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` amount from paise.
    #[must_use]
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    /// Creates a `Money` amount from whole rupees.
    #[must_use]
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// Returns the amount in paise.
    #[must_use]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Checks if this amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if this amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if this amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition; `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction; `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}\u{20b9}{}.{:02}", abs / 100, abs % 100)
    }
}

// ============================================================================
// Payment status state machine
// ============================================================================

/// Payment status of a booking.
///
/// Legal transitions form a small state machine:
///
/// ```text
/// Pending ──► Confirmed ──► Completed
///    │            │
///    │            ├──► Cancelled
///    └──► Cancelled
///                 └──► Refunded
/// ```
///
/// `Completed`, `Cancelled` and `Refunded` are terminal as far as the
/// booking engine is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment not yet received.
    Pending,
    /// Payment received, booking holds the slot.
    Confirmed,
    /// Play happened; the booking is settled.
    Completed,
    /// Booking cancelled.
    Cancelled,
    /// Booking cancelled with a refund issued.
    Refunded,
}

impl PaymentStatus {
    /// All statuses, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// The statuses this one may legally move to.
    #[must_use]
    pub const fn successors(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Completed, Self::Cancelled, Self::Refunded],
            Self::Completed | Self::Cancelled | Self::Refunded => &[],
        }
    }

    /// Whether moving to `next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown payment status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid payment status: {0:?}")]
pub struct InvalidStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Wallet
// ============================================================================

/// Direction of a wallet transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Top-up or administrative credit.
    Add,
    /// Payment taken out of the wallet.
    Debit,
    /// Money returned after a cancellation.
    Refund,
}

impl TransactionKind {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Debit => "debit",
            Self::Refund => "refund",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "debit" => Ok(Self::Debit),
            "refund" => Ok(Self::Refund),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// One immutable entry in a player's wallet ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEntry {
    /// Entry identifier.
    pub id: Uuid,
    /// Owning player.
    pub player_id: PlayerId,
    /// Amount moved (always positive; direction is in `kind`).
    pub amount: Money,
    /// Direction of the movement.
    pub kind: TransactionKind,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Actors
// ============================================================================

/// The authenticated party performing an operation.
///
/// A tagged variant instead of an `is_admin` flag, so privileged paths
/// are gated by construction rather than by scattered boolean checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Actor {
    /// A player acting on their own bookings and wallet.
    Player(PlayerId),
    /// An operator with access to the admin facade.
    Admin(AdminId),
}

impl Actor {
    /// Whether this actor is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// The player id, if this actor is a player.
    #[must_use]
    pub const fn player_id(&self) -> Option<PlayerId> {
        match self {
            Self::Player(id) => Some(*id),
            Self::Admin(_) => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "player:{id}"),
            Self::Admin(id) => write!(f, "admin:{id}"),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A bookable sports facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue identifier.
    pub id: VenueId,
    /// Display name.
    pub name: String,
    /// Human-readable location.
    pub location: String,
    /// Sport played here (e.g. "football", "cricket").
    pub sport_type: String,
    /// Reference hourly rate shown on listings.
    pub price_per_hour: Money,
    /// Free-text description.
    pub description: String,
    /// Inactive venues are hidden from players; deletion is a soft state.
    pub is_active: bool,
    /// When the venue was listed.
    pub created_at: DateTime<Utc>,
}

/// A fixed time interval at a venue, bookable at most once concurrently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier.
    pub id: SlotId,
    /// Owning venue.
    pub venue_id: VenueId,
    /// Interval start (inclusive).
    pub start_time: DateTime<Utc>,
    /// Interval end (exclusive).
    pub end_time: DateTime<Utc>,
    /// Price to book this slot.
    pub price: Money,
    /// True iff exactly one active booking references this slot.
    pub is_booked: bool,
}

impl Slot {
    /// The calendar date this slot starts on (UTC).
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// A reservation linking one player to one slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// The player who holds the reservation.
    pub player_id: PlayerId,
    /// The reserved slot.
    pub slot_id: SlotId,
    /// Payment status; transitions are validated by the engine.
    pub payment_status: PaymentStatus,
    /// Soft-cancel flag; cancelled bookings are retained for audit.
    pub is_cancelled: bool,
    /// Why the booking was cancelled, if it was.
    pub cancel_reason: Option<String>,
    /// Amount returned to the wallet on cancellation.
    pub refunded_amount: Money,
    /// Up-front amount recorded by admin-initiated bookings.
    pub advance_amount: Money,
    /// When the reservation was made.
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking currently holds its slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_cancelled
    }
}

/// A player account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: Option<String>,
    /// Phone number; unique, used for login.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// Home city.
    pub city: Option<String>,
    /// Deactivated players cannot book.
    pub is_active: bool,
    /// Denormalized wallet balance; kept consistent with the ledger
    /// inside each ledger transaction.
    pub wallet: Money,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Coupons
// ============================================================================

/// What a coupon campaign takes off an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Discount {
    /// Flat amount off.
    Amount(Money),
    /// Whole-percent discount.
    Percent(u8),
}

/// A coupon campaign from which individual codes are minted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouponCampaign {
    /// Campaign identifier.
    pub id: CampaignId,
    /// Internal campaign name.
    pub name: String,
    /// Code prefix; generated codes are `PREFIX-XXXXXX`.
    pub code: String,
    /// The discount the codes grant.
    pub discount: Discount,
    /// Minimum order value for the discount to apply.
    pub min_order: Money,
    /// How many times each code may be used.
    pub usage_limit: i32,
    /// First valid day, if bounded.
    pub valid_from: Option<NaiveDate>,
    /// Last valid day, if bounded.
    pub valid_to: Option<NaiveDate>,
    /// Inactive campaigns mint no redeemable codes.
    pub active: bool,
    /// When the campaign was created.
    pub created_at: DateTime<Utc>,
}

/// An individual coupon code minted from a campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouponCode {
    /// Code identifier.
    pub id: Uuid,
    /// Campaign this code belongs to.
    pub campaign_id: CampaignId,
    /// The full code string, unique across all campaigns.
    pub code: String,
    /// Player this code was handed to, if targeted.
    pub assigned_to: Option<PlayerId>,
    /// Player who redeemed the code, once used.
    pub used_by: Option<PlayerId>,
    /// When the code was redeemed.
    pub used_at: Option<DateTime<Utc>>,
    /// When the code was minted.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Audit & reporting
// ============================================================================

/// One append-only audit trail entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    /// Entry identifier.
    pub id: Uuid,
    /// Who performed the action, rendered as `role:id`.
    pub actor: String,
    /// Short action name, e.g. `admin_cancel_booking`.
    pub action: String,
    /// Free-text detail.
    pub details: String,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// Operational counters for the admin dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Registered players.
    pub players: i64,
    /// Listed venues.
    pub venues: i64,
    /// Bookings made today.
    pub bookings_today: i64,
    /// Revenue booked today.
    pub revenue_today: Money,
    /// Revenue booked this calendar month.
    pub revenue_month: Money,
}

/// Revenue aggregates for the sales report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Revenue booked today.
    pub daily_revenue: Money,
    /// Revenue booked this calendar month.
    pub monthly_revenue: Money,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn money_display() {
        assert_eq!(Money::from_rupees(500).to_string(), "\u{20b9}500.00");
        assert_eq!(Money::from_paise(50050).to_string(), "\u{20b9}500.50");
        assert_eq!(Money::from_paise(-25).to_string(), "-\u{20b9}0.25");
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(3);
        assert_eq!(a.checked_sub(b), Some(Money::from_rupees(7)));
        assert_eq!(a.checked_add(b), Some(Money::from_rupees(13)));
        assert_eq!(Money::from_paise(i64::MAX).checked_add(Money::from_paise(1)), None);
    }

    #[test]
    fn status_round_trip() {
        for status in PaymentStatus::ALL {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("paid".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn status_transitions_follow_adjacency_table() {
        use PaymentStatus::{Cancelled, Completed, Confirmed, Pending, Refunded};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Refunded));

        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Refunded));
        assert!(!Confirmed.can_transition_to(Pending));

        for terminal in [Completed, Cancelled, Refunded] {
            assert!(terminal.is_terminal());
            for next in PaymentStatus::ALL {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn same_status_is_not_a_transition() {
        for status in PaymentStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn actor_display_and_role() {
        let player = Actor::Player(PlayerId::new());
        let admin = Actor::Admin(AdminId::new());
        assert!(player.to_string().starts_with("player:"));
        assert!(admin.to_string().starts_with("admin:"));
        assert!(!player.is_admin());
        assert!(admin.is_admin());
        assert!(player.player_id().is_some());
        assert!(admin.player_id().is_none());
    }

    #[test]
    fn status_serde_uses_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        let back: PaymentStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(back, PaymentStatus::Refunded);
    }
}

//! Mutex-serialized in-memory implementation of every Turfbook trait.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use turfbook_core::engine::{
    BookingEngine, BookingFilter, CancelOutcome, ReserveOutcome, SlotAvailability,
};
use turfbook_core::error::{BookingError, Result};
use turfbook_core::ledger::{ensure_positive, resolve_refund, WalletLedger};
use turfbook_core::slots::{partition_range, validate_price, SlotRange};
use turfbook_core::stores::{
    ActionLog, CouponStore, NewCampaign, NewPlayer, NewVenue, PlayerDirectory, PlayerUpdate,
    ReportStore, SlotStore, VenueCatalog, VenueUpdate,
};
use turfbook_core::types::{
    ActionLogEntry, Actor, Booking, BookingId, CampaignId, CouponCampaign, CouponCode,
    DashboardSummary, Money, PaymentStatus, Player, PlayerId, SalesReport, Slot, SlotId,
    TransactionKind, Venue, VenueId, WalletEntry,
};
use uuid::Uuid;

/// Everything the backend knows, behind one lock.
#[derive(Debug, Default)]
struct MemoryState {
    venues: HashMap<VenueId, Venue>,
    slots: HashMap<SlotId, Slot>,
    bookings: HashMap<BookingId, Booking>,
    players: HashMap<PlayerId, Player>,
    wallet_entries: Vec<WalletEntry>,
    campaigns: HashMap<CampaignId, CouponCampaign>,
    codes: Vec<CouponCode>,
    log: Vec<ActionLogEntry>,
}

impl MemoryState {
    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found("player", id))
    }

    fn slot_mut(&mut self, id: SlotId) -> Result<&mut Slot> {
        self.slots
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found("slot", id))
    }

    /// Append a ledger entry and move the balance, in one step.
    fn apply_ledger(
        &mut self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
        credit: bool,
    ) -> Result<Money> {
        ensure_positive(amount)?;
        let account = self.player_mut(player)?;
        let moved = if credit {
            account.wallet.checked_add(amount)
        } else {
            account.wallet.checked_sub(amount)
        };
        let balance =
            moved.ok_or_else(|| BookingError::Storage("wallet balance overflow".to_string()))?;
        account.wallet = balance;
        self.wallet_entries.push(WalletEntry {
            id: Uuid::new_v4(),
            player_id: player,
            amount,
            kind,
            created_at: Utc::now(),
        });
        Ok(balance)
    }
}

/// In-memory backend implementing every `turfbook-core` trait.
///
/// Cloning shares the underlying state, so one backend can be handed to
/// an application state as several trait objects.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.inner
            .lock()
            .map_err(|_| BookingError::Storage("state lock poisoned".to_string()))
    }

    /// Seed a venue with sensible defaults.
    ///
    /// # Errors
    ///
    /// `Storage` if the state lock is poisoned.
    pub fn seed_venue(&self, name: &str, price_per_hour: Money) -> Result<Venue> {
        let venue = Venue {
            id: VenueId::new(),
            name: name.to_string(),
            location: "Test Town".to_string(),
            sport_type: "football".to_string(),
            price_per_hour,
            description: String::new(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.lock()?.venues.insert(venue.id, venue.clone());
        Ok(venue)
    }

    /// Seed an active player with an opening wallet balance.
    ///
    /// # Errors
    ///
    /// `Storage` if the state lock is poisoned.
    pub fn seed_player(&self, phone: &str, wallet: Money) -> Result<Player> {
        let player = Player {
            id: PlayerId::new(),
            name: None,
            phone: phone.to_string(),
            email: None,
            city: None,
            is_active: true,
            wallet,
            created_at: Utc::now(),
        };
        self.lock()?.players.insert(player.id, player.clone());
        Ok(player)
    }

    /// Seed a one-hour slot starting at `hour` UTC today.
    ///
    /// # Errors
    ///
    /// `Storage` if the state lock is poisoned.
    pub fn seed_slot(&self, venue: VenueId, hour: u32, price: Money) -> Result<Slot> {
        let today = Utc::now().date_naive();
        let start = Utc
            .from_utc_datetime(&today.and_hms_opt(hour, 0, 0).unwrap_or_default());
        let slot = Slot {
            id: SlotId::new(),
            venue_id: venue,
            start_time: start,
            end_time: start + Duration::hours(1),
            price,
            is_booked: false,
        };
        self.lock()?.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    /// Check the slot/booking invariant: a slot is booked iff exactly one
    /// active booking references it.
    ///
    /// # Errors
    ///
    /// `Storage` if the state lock is poisoned or the invariant is
    /// violated.
    pub fn check_invariants(&self) -> Result<()> {
        let state = self.lock()?;
        for slot in state.slots.values() {
            let active = state
                .bookings
                .values()
                .filter(|b| b.slot_id == slot.id && b.is_active())
                .count();
            let ok = if slot.is_booked { active == 1 } else { active == 0 };
            if !ok {
                return Err(BookingError::Storage(format!(
                    "invariant violated: slot {} booked={} with {active} active bookings",
                    slot.id, slot.is_booked
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Booking engine
// ============================================================================

#[async_trait]
impl BookingEngine for MemoryBackend {
    async fn reserve(&self, player: PlayerId, slot: SlotId) -> Result<ReserveOutcome> {
        let mut state = self.lock()?;

        let price = {
            let record = state
                .slots
                .get(&slot)
                .ok_or_else(|| BookingError::not_found("slot", slot))?;
            if record.is_booked {
                return Err(BookingError::SlotUnavailable(slot));
            }
            record.price
        };

        let available = state.player_mut(player)?.wallet;
        if available < price {
            return Err(BookingError::InsufficientFunds {
                required: price,
                available,
            });
        }

        let balance = if price.is_positive() {
            state.apply_ledger(player, price, TransactionKind::Debit, false)?
        } else {
            available
        };

        let booking = Booking {
            id: BookingId::new(),
            player_id: player,
            slot_id: slot,
            payment_status: PaymentStatus::Confirmed,
            is_cancelled: false,
            cancel_reason: None,
            refunded_amount: Money::ZERO,
            advance_amount: Money::ZERO,
            booked_at: Utc::now(),
        };
        state.bookings.insert(booking.id, booking.clone());
        state.slot_mut(slot)?.is_booked = true;

        Ok(ReserveOutcome { booking, balance })
    }

    async fn reserve_with_advance(
        &self,
        player: PlayerId,
        slot: SlotId,
        advance: Money,
        status: PaymentStatus,
    ) -> Result<Booking> {
        if advance.is_negative() {
            return Err(BookingError::Validation(format!(
                "advance amount must not be negative, got {advance}"
            )));
        }

        let mut state = self.lock()?;
        if !state.players.contains_key(&player) {
            return Err(BookingError::not_found("player", player));
        }
        {
            let record = state
                .slots
                .get(&slot)
                .ok_or_else(|| BookingError::not_found("slot", slot))?;
            if record.is_booked {
                return Err(BookingError::SlotUnavailable(slot));
            }
        }

        let booking = Booking {
            id: BookingId::new(),
            player_id: player,
            slot_id: slot,
            payment_status: status,
            is_cancelled: false,
            cancel_reason: None,
            refunded_amount: Money::ZERO,
            advance_amount: advance,
            booked_at: Utc::now(),
        };
        state.bookings.insert(booking.id, booking.clone());
        state.slot_mut(slot)?.is_booked = true;
        Ok(booking)
    }

    async fn cancel(
        &self,
        booking: BookingId,
        refund: Option<Money>,
        reason: Option<String>,
    ) -> Result<CancelOutcome> {
        let mut state = self.lock()?;

        let (player, slot, refund) = {
            let record = state
                .bookings
                .get(&booking)
                .ok_or_else(|| BookingError::not_found("booking", booking))?;
            if record.is_cancelled {
                return Err(BookingError::AlreadyCancelled(booking));
            }
            (
                record.player_id,
                record.slot_id,
                resolve_refund(refund, record.advance_amount),
            )
        };
        if refund.is_negative() {
            return Err(BookingError::InvalidAmount(refund));
        }

        let balance = if refund.is_positive() {
            state.apply_ledger(player, refund, TransactionKind::Refund, true)?
        } else {
            state.player_mut(player)?.wallet
        };

        state.slot_mut(slot)?.is_booked = false;
        let record = state
            .bookings
            .get_mut(&booking)
            .ok_or_else(|| BookingError::not_found("booking", booking))?;
        record.is_cancelled = true;
        record.cancel_reason = reason;
        record.refunded_amount = refund;
        record.payment_status = PaymentStatus::Refunded;

        Ok(CancelOutcome {
            booking: record.clone(),
            refund,
            balance,
        })
    }

    async fn reschedule(&self, booking: BookingId, new_slot: SlotId) -> Result<Booking> {
        let mut state = self.lock()?;

        let old_slot = {
            let record = state
                .bookings
                .get(&booking)
                .ok_or_else(|| BookingError::not_found("booking", booking))?;
            if record.is_cancelled {
                return Err(BookingError::AlreadyCancelled(booking));
            }
            record.slot_id
        };
        {
            let target = state
                .slots
                .get(&new_slot)
                .ok_or_else(|| BookingError::not_found("slot", new_slot))?;
            if target.is_booked {
                return Err(BookingError::SlotUnavailable(new_slot));
            }
        }

        state.slot_mut(old_slot)?.is_booked = false;
        state.slot_mut(new_slot)?.is_booked = true;
        let record = state
            .bookings
            .get_mut(&booking)
            .ok_or_else(|| BookingError::not_found("booking", booking))?;
        record.slot_id = new_slot;
        Ok(record.clone())
    }

    async fn update_status(&self, booking: BookingId, status: PaymentStatus) -> Result<Booking> {
        let mut state = self.lock()?;
        let record = state
            .bookings
            .get_mut(&booking)
            .ok_or_else(|| BookingError::not_found("booking", booking))?;
        if !record.payment_status.can_transition_to(status) {
            return Err(BookingError::InvalidTransition {
                from: record.payment_status,
                to: status,
            });
        }
        record.payment_status = status;
        Ok(record.clone())
    }

    async fn availability(
        &self,
        venue: VenueId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<SlotAvailability> {
        if start >= end {
            return Err(BookingError::Validation(format!(
                "window start {start} must be before end {end}"
            )));
        }
        let state = self.lock()?;
        if !state.venues.contains_key(&venue) {
            return Err(BookingError::not_found("venue", venue));
        }

        let conflict = state
            .bookings
            .values()
            .filter(|b| b.is_active() && b.payment_status == PaymentStatus::Confirmed)
            .find(|b| {
                state.slots.get(&b.slot_id).is_some_and(|s| {
                    s.venue_id == venue
                        && s.date() == date
                        && s.start_time.time() < end
                        && start < s.end_time.time()
                })
            })
            .map(|b| b.id);

        Ok(SlotAvailability {
            available: conflict.is_none(),
            conflict,
        })
    }

    async fn booking(&self, booking: BookingId) -> Result<Booking> {
        self.lock()?
            .bookings
            .get(&booking)
            .cloned()
            .ok_or_else(|| BookingError::not_found("booking", booking))
    }

    async fn bookings_for_player(&self, player: PlayerId) -> Result<Vec<Booking>> {
        let state = self.lock()?;
        if !state.players.contains_key(&player) {
            return Err(BookingError::not_found("player", player));
        }
        let mut out: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.player_id == player)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(out)
    }

    async fn bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>> {
        let state = self.lock()?;
        let mut out: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| filter.player.is_none_or(|p| b.player_id == p))
            .filter(|b| filter.status.is_none_or(|s| b.payment_status == s))
            .filter(|b| {
                filter.venue.is_none_or(|v| {
                    state
                        .slots
                        .get(&b.slot_id)
                        .is_some_and(|s| s.venue_id == v)
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(out)
    }
}

// ============================================================================
// Slot store
// ============================================================================

#[async_trait]
impl SlotStore for MemoryBackend {
    async fn generate(
        &self,
        venue: VenueId,
        range: SlotRange,
        duration: Duration,
        price: Money,
    ) -> Result<Vec<SlotId>> {
        validate_price(price)?;
        let intervals = partition_range(range, duration)?;

        let mut state = self.lock()?;
        if !state.venues.contains_key(&venue) {
            return Err(BookingError::not_found("venue", venue));
        }
        let mut ids = Vec::with_capacity(intervals.len());
        for interval in intervals {
            let slot = Slot {
                id: SlotId::new(),
                venue_id: venue,
                start_time: interval.start,
                end_time: interval.end,
                price,
                is_booked: false,
            };
            ids.push(slot.id);
            state.slots.insert(slot.id, slot);
        }
        Ok(ids)
    }

    async fn create(&self, venue: VenueId, range: SlotRange, price: Money) -> Result<Slot> {
        validate_price(price)?;
        let mut state = self.lock()?;
        if !state.venues.contains_key(&venue) {
            return Err(BookingError::not_found("venue", venue));
        }
        let slot = Slot {
            id: SlotId::new(),
            venue_id: venue,
            start_time: range.start,
            end_time: range.end,
            price,
            is_booked: false,
        };
        state.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn list(&self, venue: VenueId, date: Option<NaiveDate>) -> Result<Vec<Slot>> {
        let state = self.lock()?;
        let mut out: Vec<Slot> = state
            .slots
            .values()
            .filter(|s| s.venue_id == venue)
            .filter(|s| date.is_none_or(|d| s.date() == d))
            .cloned()
            .collect();
        out.sort_by_key(|s| s.start_time);
        Ok(out)
    }

    async fn get(&self, slot: SlotId) -> Result<Slot> {
        self.lock()?
            .slots
            .get(&slot)
            .cloned()
            .ok_or_else(|| BookingError::not_found("slot", slot))
    }

    async fn delete(&self, slot: SlotId) -> Result<()> {
        let mut state = self.lock()?;
        let record = state
            .slots
            .get(&slot)
            .ok_or_else(|| BookingError::not_found("slot", slot))?;
        if record.is_booked {
            return Err(BookingError::SlotBooked(slot));
        }
        state.slots.remove(&slot);
        Ok(())
    }
}

// ============================================================================
// Wallet ledger
// ============================================================================

#[async_trait]
impl WalletLedger for MemoryBackend {
    async fn credit(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
    ) -> Result<Money> {
        self.lock()?.apply_ledger(player, amount, kind, true)
    }

    async fn debit(
        &self,
        player: PlayerId,
        amount: Money,
        kind: TransactionKind,
    ) -> Result<Money> {
        self.lock()?.apply_ledger(player, amount, kind, false)
    }

    async fn balance(&self, player: PlayerId) -> Result<Money> {
        Ok(self.lock()?.player_mut(player)?.wallet)
    }

    async fn history(&self, player: PlayerId) -> Result<Vec<WalletEntry>> {
        let state = self.lock()?;
        if !state.players.contains_key(&player) {
            return Err(BookingError::not_found("player", player));
        }
        let mut out: Vec<WalletEntry> = state
            .wallet_entries
            .iter()
            .filter(|e| e.player_id == player)
            .cloned()
            .collect();
        out.reverse();
        Ok(out)
    }
}

// ============================================================================
// Venue catalog
// ============================================================================

#[async_trait]
impl VenueCatalog for MemoryBackend {
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
        let record = Venue {
            id: VenueId::new(),
            name: venue.name,
            location: venue.location,
            sport_type: venue.sport_type,
            price_per_hour: venue.price_per_hour,
            description: venue.description,
            is_active: true,
            created_at: Utc::now(),
        };
        self.lock()?.venues.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Venue>> {
        let state = self.lock()?;
        let mut out: Vec<Venue> = state
            .venues
            .values()
            .filter(|v| include_inactive || v.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, venue: VenueId) -> Result<Venue> {
        self.lock()?
            .venues
            .get(&venue)
            .cloned()
            .ok_or_else(|| BookingError::not_found("venue", venue))
    }

    async fn update(&self, venue: VenueId, update: VenueUpdate) -> Result<Venue> {
        if let Some(rate) = update.price_per_hour {
            validate_price(rate)?;
        }
        let mut state = self.lock()?;
        let record = state
            .venues
            .get_mut(&venue)
            .ok_or_else(|| BookingError::not_found("venue", venue))?;
        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(location) = update.location {
            record.location = location;
        }
        if let Some(sport_type) = update.sport_type {
            record.sport_type = sport_type;
        }
        if let Some(rate) = update.price_per_hour {
            record.price_per_hour = rate;
        }
        if let Some(description) = update.description {
            record.description = description;
        }
        Ok(record.clone())
    }

    async fn set_active(&self, venue: VenueId, active: bool) -> Result<Venue> {
        let mut state = self.lock()?;
        let record = state
            .venues
            .get_mut(&venue)
            .ok_or_else(|| BookingError::not_found("venue", venue))?;
        record.is_active = active;
        Ok(record.clone())
    }
}

// ============================================================================
// Player directory
// ============================================================================

#[async_trait]
impl PlayerDirectory for MemoryBackend {
    async fn create(&self, player: NewPlayer) -> Result<Player> {
        if player.phone.trim().is_empty() {
            return Err(BookingError::Validation("phone is required".to_string()));
        }
        let mut state = self.lock()?;
        if state.players.values().any(|p| p.phone == player.phone) {
            return Err(BookingError::Validation(format!(
                "phone {} is already registered",
                player.phone
            )));
        }
        let record = Player {
            id: PlayerId::new(),
            name: player.name,
            phone: player.phone,
            email: player.email,
            city: player.city,
            is_active: true,
            wallet: Money::ZERO,
            created_at: Utc::now(),
        };
        state.players.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, player: PlayerId) -> Result<Player> {
        self.lock()?
            .players
            .get(&player)
            .cloned()
            .ok_or_else(|| BookingError::not_found("player", player))
    }

    async fn list(&self, query: Option<&str>) -> Result<Vec<Player>> {
        let state = self.lock()?;
        let mut out: Vec<Player> = state
            .players
            .values()
            .filter(|p| {
                query.is_none_or(|q| {
                    p.phone.contains(q)
                        || p.name.as_deref().is_some_and(|n| n.contains(q))
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn update(&self, player: PlayerId, update: PlayerUpdate) -> Result<Player> {
        let mut state = self.lock()?;
        let record = state.player_mut(player)?;
        if let Some(name) = update.name {
            record.name = Some(name);
        }
        if let Some(city) = update.city {
            record.city = Some(city);
        }
        if let Some(active) = update.is_active {
            record.is_active = active;
        }
        Ok(record.clone())
    }
}

// ============================================================================
// Coupons
// ============================================================================

#[async_trait]
impl CouponStore for MemoryBackend {
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
        let mut state = self.lock()?;
        if state.campaigns.values().any(|c| c.code == campaign.code) {
            return Err(BookingError::Validation(format!(
                "campaign code {} already exists",
                campaign.code
            )));
        }
        let record = CouponCampaign {
            id: CampaignId::new(),
            name: campaign.name,
            code: campaign.code,
            discount: campaign.discount,
            min_order: campaign.min_order,
            usage_limit: campaign.usage_limit,
            valid_from: campaign.valid_from,
            valid_to: campaign.valid_to,
            active: true,
            created_at: Utc::now(),
        };
        state.campaigns.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_campaigns(&self) -> Result<Vec<CouponCampaign>> {
        let state = self.lock()?;
        let mut out: Vec<CouponCampaign> = state.campaigns.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get_campaign(&self, campaign: CampaignId) -> Result<CouponCampaign> {
        self.lock()?
            .campaigns
            .get(&campaign)
            .cloned()
            .ok_or_else(|| BookingError::not_found("campaign", campaign))
    }

    async fn insert_codes(
        &self,
        campaign: CampaignId,
        codes: Vec<String>,
    ) -> Result<Vec<CouponCode>> {
        let mut state = self.lock()?;
        if !state.campaigns.contains_key(&campaign) {
            return Err(BookingError::not_found("campaign", campaign));
        }
        for code in &codes {
            if state.codes.iter().any(|c| &c.code == code) {
                return Err(BookingError::Validation(format!(
                    "coupon code {code} already exists"
                )));
            }
        }
        let minted: Vec<CouponCode> = codes
            .into_iter()
            .map(|code| CouponCode {
                id: Uuid::new_v4(),
                campaign_id: campaign,
                code,
                assigned_to: None,
                used_by: None,
                used_at: None,
                created_at: Utc::now(),
            })
            .collect();
        state.codes.extend(minted.iter().cloned());
        Ok(minted)
    }

    async fn codes(&self, campaign: CampaignId) -> Result<Vec<CouponCode>> {
        let state = self.lock()?;
        if !state.campaigns.contains_key(&campaign) {
            return Err(BookingError::not_found("campaign", campaign));
        }
        Ok(state
            .codes
            .iter()
            .filter(|c| c.campaign_id == campaign)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Reports
// ============================================================================

#[async_trait]
impl ReportStore for MemoryBackend {
    async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSummary> {
        let state = self.lock()?;
        let today = now.date_naive();
        let month_start = today.with_day(1).unwrap_or(today);

        let mut bookings_today = 0i64;
        let mut revenue_today = Money::ZERO;
        let mut revenue_month = Money::ZERO;
        for booking in state.bookings.values() {
            let Some(slot) = state.slots.get(&booking.slot_id) else {
                continue;
            };
            let day = booking.booked_at.date_naive();
            if day == today {
                bookings_today += 1;
                revenue_today = revenue_today
                    .checked_add(slot.price)
                    .unwrap_or(revenue_today);
            }
            if day >= month_start {
                revenue_month = revenue_month
                    .checked_add(slot.price)
                    .unwrap_or(revenue_month);
            }
        }

        Ok(DashboardSummary {
            players: i64::try_from(state.players.len()).unwrap_or(i64::MAX),
            venues: i64::try_from(state.venues.len()).unwrap_or(i64::MAX),
            bookings_today,
            revenue_today,
            revenue_month,
        })
    }

    async fn sales(&self, now: DateTime<Utc>) -> Result<SalesReport> {
        let summary = self.dashboard(now).await?;
        Ok(SalesReport {
            daily_revenue: summary.revenue_today,
            monthly_revenue: summary.revenue_month,
        })
    }
}

// ============================================================================
// Action log
// ============================================================================

#[async_trait]
impl ActionLog for MemoryBackend {
    async fn record(&self, actor: &Actor, action: &str, details: &str) -> Result<()> {
        self.lock()?.log.push(ActionLogEntry {
            id: Uuid::new_v4(),
            actor: actor.to_string(),
            action: action.to_string(),
            details: details.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ActionLogEntry>> {
        let state = self.lock()?;
        let limit = usize::try_from(limit.max(0)).unwrap_or(0);
        Ok(state.log.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[tokio::test]
    async fn ledger_rejects_non_positive_amounts() {
        let backend = MemoryBackend::new();
        let player = backend.seed_player("1", Money::ZERO).unwrap();
        let err = backend
            .credit(player.id, Money::ZERO, TransactionKind::Add)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn debit_may_go_negative() {
        // The engine never asserts a non-negative balance; admin debits
        // can overdraw.
        let backend = MemoryBackend::new();
        let player = backend.seed_player("1", Money::from_rupees(50)).unwrap();
        let balance = backend
            .debit(player.id, Money::from_rupees(80), TransactionKind::Debit)
            .await
            .unwrap();
        assert_eq!(balance, Money::from_rupees(-30));
    }

    #[tokio::test]
    async fn booked_slot_cannot_be_deleted() {
        let backend = MemoryBackend::new();
        let venue = backend.seed_venue("V", Money::from_rupees(500)).unwrap();
        let player = backend.seed_player("1", Money::from_rupees(1000)).unwrap();
        let slot = backend.seed_slot(venue.id, 9, Money::from_rupees(500)).unwrap();

        backend.reserve(player.id, slot.id).await.unwrap();
        let err = SlotStore::delete(&backend, slot.id).await.unwrap_err();
        assert!(matches!(err, BookingError::SlotBooked(_)));
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected() {
        let backend = MemoryBackend::new();
        backend.seed_player("98765", Money::ZERO).unwrap();
        let err = PlayerDirectory::create(
            &backend,
            NewPlayer {
                name: None,
                phone: "98765".to_string(),
                email: None,
                city: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }
}

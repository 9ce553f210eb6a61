//! Row-to-entity decoding shared by the store modules.

use sqlx::Row;
use sqlx::postgres::PgRow;
use turfbook_core::error::{BookingError, Result};
use turfbook_core::types::{
    ActionLogEntry, Booking, BookingId, CampaignId, CouponCampaign, CouponCode, Discount, Money,
    PaymentStatus, Player, PlayerId, Slot, SlotId, TransactionKind, Venue, VenueId, WalletEntry,
};
use uuid::Uuid;

pub(crate) fn venue(row: &PgRow) -> Venue {
    Venue {
        id: VenueId::from_uuid(row.get("id")),
        name: row.get("name"),
        location: row.get("location"),
        sport_type: row.get("sport_type"),
        price_per_hour: Money::from_paise(row.get("price_per_hour_paise")),
        description: row.get("description"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

pub(crate) fn slot(row: &PgRow) -> Slot {
    Slot {
        id: SlotId::from_uuid(row.get("id")),
        venue_id: VenueId::from_uuid(row.get("venue_id")),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        price: Money::from_paise(row.get("price_paise")),
        is_booked: row.get("is_booked"),
    }
}

pub(crate) fn booking(row: &PgRow) -> Result<Booking> {
    let status: String = row.get("payment_status");
    Ok(Booking {
        id: BookingId::from_uuid(row.get("id")),
        player_id: PlayerId::from_uuid(row.get("player_id")),
        slot_id: SlotId::from_uuid(row.get("slot_id")),
        payment_status: status.parse::<PaymentStatus>()?,
        is_cancelled: row.get("is_cancelled"),
        cancel_reason: row.get("cancel_reason"),
        refunded_amount: Money::from_paise(row.get("refunded_paise")),
        advance_amount: Money::from_paise(row.get("advance_paise")),
        booked_at: row.get("booked_at"),
    })
}

pub(crate) fn player(row: &PgRow) -> Player {
    Player {
        id: PlayerId::from_uuid(row.get("id")),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        city: row.get("city"),
        is_active: row.get("is_active"),
        wallet: Money::from_paise(row.get("wallet_paise")),
        created_at: row.get("created_at"),
    }
}

pub(crate) fn wallet_entry(row: &PgRow) -> Result<WalletEntry> {
    let kind: String = row.get("kind");
    Ok(WalletEntry {
        id: row.get::<Uuid, _>("id"),
        player_id: PlayerId::from_uuid(row.get("player_id")),
        amount: Money::from_paise(row.get("amount_paise")),
        kind: kind.parse::<TransactionKind>()?,
        created_at: row.get("created_at"),
    })
}

pub(crate) fn campaign(row: &PgRow) -> Result<CouponCampaign> {
    let kind: String = row.get("discount_kind");
    let value: i64 = row.get("discount_value");
    let discount = match kind.as_str() {
        "amount" => Discount::Amount(Money::from_paise(value)),
        "percent" => {
            let percent = u8::try_from(value).map_err(|_| {
                BookingError::Storage(format!("discount percent {value} out of range"))
            })?;
            Discount::Percent(percent)
        }
        other => {
            return Err(BookingError::Storage(format!(
                "unknown discount kind {other:?}"
            )));
        }
    };
    Ok(CouponCampaign {
        id: CampaignId::from_uuid(row.get("id")),
        name: row.get("name"),
        code: row.get("code"),
        discount,
        min_order: Money::from_paise(row.get("min_order_paise")),
        usage_limit: row.get("usage_limit"),
        valid_from: row.get("valid_from"),
        valid_to: row.get("valid_to"),
        active: row.get("active"),
        created_at: row.get("created_at"),
    })
}

pub(crate) fn coupon_code(row: &PgRow) -> CouponCode {
    CouponCode {
        id: row.get::<Uuid, _>("id"),
        campaign_id: CampaignId::from_uuid(row.get("campaign_id")),
        code: row.get("code"),
        assigned_to: row.get::<Option<Uuid>, _>("assigned_to").map(PlayerId::from_uuid),
        used_by: row.get::<Option<Uuid>, _>("used_by").map(PlayerId::from_uuid),
        used_at: row.get("used_at"),
        created_at: row.get("created_at"),
    }
}

pub(crate) fn action_entry(row: &PgRow) -> ActionLogEntry {
    ActionLogEntry {
        id: row.get::<Uuid, _>("id"),
        actor: row.get("actor"),
        action: row.get("action"),
        details: row.get("details"),
        created_at: row.get("created_at"),
    }
}

/// The discount columns for an insert, inverse of [`campaign`].
pub(crate) fn discount_columns(discount: Discount) -> (&'static str, i64) {
    match discount {
        Discount::Amount(money) => ("amount", money.paise()),
        Discount::Percent(percent) => ("percent", i64::from(percent)),
    }
}

//! Read-only aggregates for the admin dashboard and sales report.

use crate::{PostgresStore, storage};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::Row;
use turfbook_core::error::Result;
use turfbook_core::stores::ReportStore;
use turfbook_core::types::{DashboardSummary, Money, SalesReport};

impl PostgresStore {
    /// `(bookings_today, revenue_today, revenue_month)` relative to `now`.
    ///
    /// Revenue is the slot price of every booking made in the window,
    /// cancelled ones included; refunds are visible in the ledger, not
    /// subtracted here.
    async fn revenue_window(&self, now: DateTime<Utc>) -> Result<(i64, Money, Money)> {
        let today = now.date_naive();
        let day_start = Utc.from_utc_datetime(&today.and_hms_opt(0, 0, 0).unwrap_or_default());
        let month_start = today
            .with_day(1)
            .map_or(day_start, |d| {
                Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default())
            });

        let row = sqlx::query(
            "SELECT \
                COUNT(*) FILTER (WHERE b.booked_at >= $1) AS bookings_today, \
                COALESCE(SUM(s.price_paise) FILTER (WHERE b.booked_at >= $1), 0)::BIGINT \
                    AS revenue_today, \
                COALESCE(SUM(s.price_paise) FILTER (WHERE b.booked_at >= $2), 0)::BIGINT \
                    AS revenue_month \
             FROM bookings b \
             JOIN slots s ON s.id = b.slot_id \
             WHERE b.booked_at < $3",
        )
        .bind(day_start)
        .bind(month_start)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        Ok((
            row.get("bookings_today"),
            Money::from_paise(row.get("revenue_today")),
            Money::from_paise(row.get("revenue_month")),
        ))
    }
}

#[async_trait]
impl ReportStore for PostgresStore {
    async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSummary> {
        let row = sqlx::query(
            "SELECT \
                (SELECT COUNT(*) FROM players) AS players, \
                (SELECT COUNT(*) FROM venues) AS venues",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;
        let (bookings_today, revenue_today, revenue_month) = self.revenue_window(now).await?;

        Ok(DashboardSummary {
            players: row.get("players"),
            venues: row.get("venues"),
            bookings_today,
            revenue_today,
            revenue_month,
        })
    }

    async fn sales(&self, now: DateTime<Utc>) -> Result<SalesReport> {
        let (_, daily_revenue, monthly_revenue) = self.revenue_window(now).await?;
        Ok(SalesReport {
            daily_revenue,
            monthly_revenue,
        })
    }
}

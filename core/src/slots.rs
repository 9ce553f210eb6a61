//! Slot-range partitioning for bulk slot generation.
//!
//! The administrative bulk-generation operation turns a time range and a
//! fixed duration into consecutive, non-overlapping intervals. The
//! partitioning itself is pure so its laws can be tested at memory speed;
//! persistence happens in the slot store.

use crate::error::{BookingError, Result};
use crate::types::Money;
use chrono::{DateTime, Duration, Utc};

/// A half-open `[start, end)` interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRange {
    /// Interval start (inclusive).
    pub start: DateTime<Utc>,
    /// Interval end (exclusive).
    pub end: DateTime<Utc>,
}

impl SlotRange {
    /// Create a range; fails with [`BookingError::InvalidRange`] if
    /// `start >= end`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for an empty or inverted range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(BookingError::InvalidRange(format!(
                "start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Validate a slot price: must be a non-negative amount.
///
/// # Errors
///
/// Returns [`BookingError::InvalidPrice`] for negative prices.
pub const fn validate_price(price: Money) -> Result<Money> {
    if price.is_negative() {
        return Err(BookingError::InvalidPrice(price));
    }
    Ok(price)
}

/// Partition `[range.start, range.end)` into consecutive fixed-duration
/// intervals.
///
/// Only intervals that fit entirely inside the range are produced; a
/// trailing remainder shorter than `duration` is dropped. Generating
/// 06:00-08:00 at 60 minutes yields exactly two slots.
///
/// # Errors
///
/// Returns [`BookingError::InvalidRange`] if the duration is zero or
/// negative, or if no whole interval fits.
pub fn partition_range(range: SlotRange, duration: Duration) -> Result<Vec<SlotRange>> {
    if duration <= Duration::zero() {
        return Err(BookingError::InvalidRange(format!(
            "slot duration must be positive, got {duration}"
        )));
    }

    let mut intervals = Vec::new();
    let mut cursor = range.start;
    // checked_add_signed: adding near chrono's representable maximum must
    // stop the loop, not abort the process.
    while let Some(end) = cursor.checked_add_signed(duration) {
        if end > range.end {
            break;
        }
        intervals.push(SlotRange { start: cursor, end });
        cursor = end;
    }

    if intervals.is_empty() {
        return Err(BookingError::InvalidRange(format!(
            "no {duration} interval fits between {} and {}",
            range.start, range.end
        )));
    }

    Ok(intervals)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, min, 0).single().unwrap()
    }

    #[test]
    fn two_hours_at_sixty_minutes_gives_two_slots() {
        let range = SlotRange::new(at(6, 0), at(8, 0)).unwrap();
        let slots = partition_range(range, Duration::minutes(60)).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], SlotRange { start: at(6, 0), end: at(7, 0) });
        assert_eq!(slots[1], SlotRange { start: at(7, 0), end: at(8, 0) });
    }

    #[test]
    fn trailing_remainder_is_dropped() {
        let range = SlotRange::new(at(6, 0), at(7, 30)).unwrap();
        let slots = partition_range(range, Duration::minutes(60)).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end, at(7, 0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(SlotRange::new(at(8, 0), at(6, 0)).is_err());
        assert!(SlotRange::new(at(6, 0), at(6, 0)).is_err());
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        let range = SlotRange::new(at(6, 0), at(8, 0)).unwrap();
        assert!(partition_range(range, Duration::zero()).is_err());
        assert!(partition_range(range, Duration::minutes(-30)).is_err());
    }

    #[test]
    fn range_at_the_end_of_time_is_rejected_not_a_panic() {
        let end = DateTime::<Utc>::MAX_UTC;
        let range = SlotRange::new(end - Duration::seconds(30), end).unwrap();
        assert!(matches!(
            partition_range(range, Duration::minutes(1)),
            Err(BookingError::InvalidRange(_))
        ));
    }

    #[test]
    fn overflow_after_a_full_interval_keeps_the_interval() {
        let end = DateTime::<Utc>::MAX_UTC;
        let range = SlotRange::new(end - Duration::seconds(90), end).unwrap();
        let slots = partition_range(range, Duration::minutes(1)).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, end - Duration::seconds(90));
    }

    #[test]
    fn range_shorter_than_duration_is_rejected() {
        let range = SlotRange::new(at(6, 0), at(6, 30)).unwrap();
        assert!(partition_range(range, Duration::minutes(60)).is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(validate_price(Money::from_paise(-1)).is_err());
        assert!(validate_price(Money::ZERO).is_ok());
        assert!(validate_price(Money::from_rupees(300)).is_ok());
    }

    proptest! {
        #[test]
        fn partition_laws(
            start_min in 0i64..10_000,
            len_min in 1i64..10_000,
            dur_min in 1i64..500,
        ) {
            let start = at(0, 0) + Duration::minutes(start_min);
            let end = start + Duration::minutes(len_min);
            let range = SlotRange { start, end };
            let duration = Duration::minutes(dur_min);

            match partition_range(range, duration) {
                Ok(slots) => {
                    // Count matches floor division.
                    prop_assert_eq!(slots.len() as i64, len_min / dur_min);
                    // Consecutive, non-overlapping, fixed duration, in range.
                    let mut cursor = start;
                    for slot in &slots {
                        prop_assert_eq!(slot.start, cursor);
                        prop_assert_eq!(slot.end - slot.start, duration);
                        prop_assert!(slot.end <= end);
                        cursor = slot.end;
                    }
                }
                Err(_) => {
                    // Only legitimate when not even one interval fits.
                    prop_assert!(len_min < dur_min);
                }
            }
        }
    }
}

use chrono::{Days, NaiveDate};

use crate::model::*;

use super::overlap::room_occupied_count;

// ── Availability Aggregator ──────────────────────────────────────
//
// Turns per-date occupancy counts into availability numbers for single
// dates or calendar ranges. Pure recomputation: no cursor, no cache.

/// Every calendar day in `[start, end]`, ascending. Empty when `end < start`.
pub(crate) fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// `available = total - occupied`, clamped at zero. The clamp masks
/// upstream overbooking from the UI; `overbooked_dates` is how callers
/// surface the underlying condition instead of hiding it.
pub fn availability_for_date(room: &RoomState, date: NaiveDate) -> DateAvailability {
    let occupied = room_occupied_count(room, date);
    DateAvailability {
        date,
        total: room.total_count,
        available: room.total_count.saturating_sub(occupied),
    }
}

/// One entry per calendar day in `[start, end]` inclusive, chronological.
pub fn availability_for_range(room: &RoomState, start: NaiveDate, end: NaiveDate) -> Vec<DateAvailability> {
    days_inclusive(start, end)
        .map(|date| availability_for_date(room, date))
        .collect()
}

/// Exact-equality thresholds. A zero-room type reads FullyBooked: with no
/// physical rooms there is nothing to arrive into.
pub fn badge(availability: &DateAvailability) -> AvailabilityBadge {
    if availability.available == 0 {
        AvailabilityBadge::FullyBooked
    } else if availability.available == availability.total {
        AvailabilityBadge::FullyAvailable
    } else {
        AvailabilityBadge::PartiallyAvailable
    }
}

/// Occupancy percentage in `[0, 100]`. `total == 0` reads as 0% occupied.
pub fn occupancy_rate(availability: &DateAvailability) -> f64 {
    if availability.total == 0 {
        return 0.0;
    }
    let occupied = availability.total.saturating_sub(availability.available);
    occupied as f64 / availability.total as f64 * 100.0
}

pub fn tier_for_rate(rate: f64) -> OccupancyTier {
    if rate >= 80.0 {
        OccupancyTier::High
    } else if rate >= 50.0 {
        OccupancyTier::Medium
    } else {
        OccupancyTier::Low
    }
}

/// Availability + badge + tier for one calendar cell.
pub fn calendar_day(room: &RoomState, date: NaiveDate) -> CalendarDay {
    let availability = availability_for_date(room, date);
    CalendarDay {
        badge: badge(&availability),
        tier: tier_for_rate(occupancy_rate(&availability)),
        availability,
    }
}

/// Days in `[from, to]` where active stays exceed `total_count`. Empty for
/// healthy data; non-empty means the storage layer let an overbooking
/// through and the caller should surface it.
pub fn overbooked_dates(room: &RoomState, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    days_inclusive(from, to)
        .filter(|date| room_occupied_count(room, *date) > room.total_count)
        .collect()
}

/// The last night of a stay beginning on `check_in` with `nights` nights.
#[allow(dead_code)]
pub(crate) fn last_night(check_in: NaiveDate, nights: u64) -> Option<NaiveDate> {
    check_in.checked_add_days(Days::new(nights.saturating_sub(1)))
}

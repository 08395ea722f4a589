use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::*;
use crate::model::{RoomState, StayInterval};

use super::EngineError;

// ── Interval Overlap Engine ──────────────────────────────────────
//
// Date-level occupancy with half-open semantics `[check_in, check_out)`.
// The checkout day never counts as occupied, so a departure and an
// arrival on the same day share the room without conflict.

/// Count the stays holding `room_id` on `date`. Pure function over its
/// inputs; cancelled stays never count.
pub fn occupied_count(room_id: Ulid, date: NaiveDate, stays: &[StayInterval]) -> u32 {
    stays
        .iter()
        .filter(|s| s.room_id == room_id && s.occupies_on(date))
        .count() as u32
}

/// Same count over a room's own sorted stay list, pruned by binary search.
pub fn room_occupied_count(room: &RoomState, date: NaiveDate) -> u32 {
    room.stays_touching(date, date)
        .filter(|s| s.occupies_on(date))
        .count() as u32
}

pub(crate) fn validate_stay_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), EngineError> {
    use chrono::Datelike;
    if check_out <= check_in {
        return Err(EngineError::InvalidStayRange { check_in, check_out });
    }
    if check_in.year() < MIN_STAY_YEAR || check_out.year() > MAX_STAY_YEAR {
        return Err(EngineError::LimitExceeded("stay date out of range"));
    }
    if (check_out - check_in).num_days() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StayStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn stay_for(room_id: Ulid, check_in: NaiveDate, check_out: NaiveDate, status: StayStatus) -> StayInterval {
        StayInterval {
            id: Ulid::new(),
            booking_id: Ulid::new(),
            room_id,
            check_in,
            check_out,
            status,
            guest: None,
        }
    }

    #[test]
    fn counts_only_matching_room() {
        let room_a = Ulid::new();
        let room_b = Ulid::new();
        let stays = vec![
            stay_for(room_a, d(2025, 3, 10), d(2025, 3, 12), StayStatus::Confirmed),
            stay_for(room_b, d(2025, 3, 10), d(2025, 3, 12), StayStatus::Confirmed),
        ];
        assert_eq!(occupied_count(room_a, d(2025, 3, 10), &stays), 1);
        assert_eq!(occupied_count(room_b, d(2025, 3, 11), &stays), 1);
    }

    #[test]
    fn checkout_day_not_counted() {
        let room = Ulid::new();
        let stays = vec![stay_for(room, d(2025, 3, 10), d(2025, 3, 12), StayStatus::Confirmed)];
        assert_eq!(occupied_count(room, d(2025, 3, 9), &stays), 0);
        assert_eq!(occupied_count(room, d(2025, 3, 10), &stays), 1);
        assert_eq!(occupied_count(room, d(2025, 3, 11), &stays), 1);
        assert_eq!(occupied_count(room, d(2025, 3, 12), &stays), 0);
    }

    #[test]
    fn same_day_turnover_counts_once() {
        // Departure [10, 12) and arrival [12, 14) share March 12 without
        // stacking: the departing stay has already freed the room.
        let room = Ulid::new();
        let stays = vec![
            stay_for(room, d(2025, 3, 10), d(2025, 3, 12), StayStatus::Confirmed),
            stay_for(room, d(2025, 3, 12), d(2025, 3, 14), StayStatus::Confirmed),
        ];
        assert_eq!(occupied_count(room, d(2025, 3, 11), &stays), 1);
        assert_eq!(occupied_count(room, d(2025, 3, 12), &stays), 1);
        assert_eq!(occupied_count(room, d(2025, 3, 13), &stays), 1);
    }

    #[test]
    fn cancelled_excluded_on_every_date() {
        let room = Ulid::new();
        let stays = vec![stay_for(room, d(2025, 3, 10), d(2025, 3, 12), StayStatus::Cancelled)];
        for day in 9..=13 {
            assert_eq!(occupied_count(room, d(2025, 3, day), &stays), 0);
        }
    }

    #[test]
    fn pending_counts_like_confirmed() {
        let room = Ulid::new();
        let stays = vec![
            stay_for(room, d(2025, 3, 10), d(2025, 3, 12), StayStatus::Pending),
            stay_for(room, d(2025, 3, 11), d(2025, 3, 13), StayStatus::Confirmed),
        ];
        assert_eq!(occupied_count(room, d(2025, 3, 11), &stays), 2);
    }

    #[test]
    fn room_count_matches_slice_count() {
        let room_id = Ulid::new();
        let mut room = RoomState::new(room_id, "Deluxe".into(), 5, 2, 180.0);
        for offset in 0..4 {
            room.insert_stay(stay_for(
                room_id,
                d(2025, 3, 10 + offset),
                d(2025, 3, 12 + offset),
                StayStatus::Confirmed,
            ));
        }
        for day in 8..=16 {
            let date = d(2025, 3, day);
            assert_eq!(
                room_occupied_count(&room, date),
                occupied_count(room_id, date, &room.stays),
            );
        }
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let err = validate_stay_dates(d(2025, 3, 12), d(2025, 3, 10)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStayRange { .. }));
    }

    #[test]
    fn validate_rejects_zero_nights() {
        let err = validate_stay_dates(d(2025, 3, 10), d(2025, 3, 10)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStayRange { .. }));
    }

    #[test]
    fn validate_rejects_out_of_range_year() {
        let err = validate_stay_dates(d(1999, 12, 30), d(2000, 1, 2)).unwrap_err();
        assert!(matches!(err, EngineError::LimitExceeded(_)));
    }

    #[test]
    fn validate_rejects_overlong_stay() {
        let err = validate_stay_dates(d(2025, 1, 1), d(2027, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::LimitExceeded(_)));
    }

    #[test]
    fn validate_accepts_one_night() {
        assert!(validate_stay_dates(d(2025, 3, 10), d(2025, 3, 11)).is_ok());
    }
}

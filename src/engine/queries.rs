use chrono::{NaiveDate, NaiveDateTime};
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::availability::{availability_for_date, availability_for_range, calendar_day, occupancy_rate, tier_for_rate};
use super::lifecycle::classify;
use super::{Engine, EngineError, SharedRoomState};

fn check_window(start: NaiveDate, end: NaiveDate) -> Result<(), EngineError> {
    // Inclusive bounds: [start, end] spans (end - start) + 1 days.
    if (end - start).num_days() + 1 > MAX_CALENDAR_DAYS {
        return Err(EngineError::LimitExceeded("calendar window too wide"));
    }
    Ok(())
}

impl Engine {
    fn room_arcs(&self) -> Vec<SharedRoomState> {
        self.rooms.iter().map(|e| e.value().clone()).collect()
    }

    /// Snapshot availability for one room type on one date.
    pub async fn availability_on(&self, room_id: Ulid, date: NaiveDate) -> Result<DateAvailability, EngineError> {
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(availability_for_date(&guard, date))
    }

    /// One entry per calendar day in `[start, end]` inclusive, ascending.
    /// An inverted window is empty, not an error.
    pub async fn availability_between(
        &self,
        room_id: Ulid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DateAvailability>, EngineError> {
        check_window(start, end)?;
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(availability_for_range(&guard, start, end))
    }

    /// Calendar grid for one room type: availability + badge + tier per day.
    pub async fn room_calendar(
        &self,
        room_id: Ulid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>, EngineError> {
        check_window(start, end)?;
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        let days = super::availability::days_inclusive(start, end)
            .map(|date| calendar_day(&guard, date))
            .collect();
        Ok(days)
    }

    pub async fn occupancy_rate_on(&self, room_id: Ulid, date: NaiveDate) -> Result<(f64, OccupancyTier), EngineError> {
        let availability = self.availability_on(room_id, date).await?;
        let rate = occupancy_rate(&availability);
        Ok((rate, tier_for_rate(rate)))
    }

    /// The date-based inventory manager view: one row per room type,
    /// sorted by name (id as tiebreak).
    pub async fn inventory_sheet(&self, date: NaiveDate) -> Vec<SheetRow> {
        let start = std::time::Instant::now();
        let mut rows = Vec::new();
        for rs in self.room_arcs() {
            let guard = rs.read().await;
            let availability = availability_for_date(&guard, date);
            let rate = occupancy_rate(&availability);
            rows.push(SheetRow {
                room: RoomTypeInfo {
                    id: guard.id,
                    name: guard.name.clone(),
                    total_count: guard.total_count,
                    capacity: guard.capacity,
                    nightly_rate: guard.nightly_rate,
                },
                badge: super::availability::badge(&availability),
                tier: tier_for_rate(rate),
                availability,
            });
        }
        rows.sort_by(|a, b| a.room.name.cmp(&b.room.name).then(a.room.id.cmp(&b.room.id)));
        metrics::histogram!(observability::SHEET_QUERY_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        rows
    }

    /// The booking-status dashboard: every non-cancelled stay classified
    /// against the injected clock, sorted by check-in.
    pub async fn stay_board(&self, now: NaiveDateTime) -> Result<Vec<BoardRow>, EngineError> {
        let start = std::time::Instant::now();
        let mut rows = Vec::new();
        for rs in self.room_arcs() {
            let guard = rs.read().await;
            for stay in &guard.stays {
                if stay.status == StayStatus::Cancelled {
                    continue;
                }
                let snapshot = classify(stay.check_in, stay.check_out, now, self.policy())?;
                rows.push(BoardRow {
                    stay: StayInfo::from(stay),
                    snapshot,
                });
            }
        }
        rows.sort_by(|a, b| a.stay.check_in.cmp(&b.stay.check_in).then(a.stay.id.cmp(&b.stay.id)));
        metrics::histogram!(observability::BOARD_QUERY_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        Ok(rows)
    }

    pub async fn list_room_types(&self) -> Vec<RoomTypeInfo> {
        let mut out = Vec::new();
        for rs in self.room_arcs() {
            let guard = rs.read().await;
            out.push(RoomTypeInfo {
                id: guard.id,
                name: guard.name.clone(),
                total_count: guard.total_count,
                capacity: guard.capacity,
                nightly_rate: guard.nightly_rate,
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        out
    }

    pub async fn stays_for_room(&self, room_id: Ulid) -> Result<Vec<StayInfo>, EngineError> {
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(guard.stays.iter().map(StayInfo::from).collect())
    }
}

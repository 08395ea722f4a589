use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Booking status as stored by the platform. Only `Pending` and `Confirmed`
/// occupy inventory; `Cancelled` never does and there is no un-cancel path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StayStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl StayStatus {
    pub fn occupies_inventory(&self) -> bool {
        !matches!(self, StayStatus::Cancelled)
    }
}

/// The date range a specific room is held for a specific booking.
/// Half-open on dates: a stay `[Jan 1, Jan 3)` occupies the nights of
/// Jan 1 and Jan 2; the checkout day itself is free for a new arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayInterval {
    pub id: Ulid,
    /// Parent booking — a multi-room booking records one stay per room.
    pub booking_id: Ulid,
    pub room_id: Ulid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: StayStatus,
    pub guest: Option<String>,
}

impl StayInterval {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// True iff this stay holds its room on `date`. The single overlap
    /// predicate — every availability and occupancy computation goes
    /// through here so the semantics can't drift between views.
    pub fn occupies_on(&self, date: NaiveDate) -> bool {
        self.status.occupies_inventory() && self.check_in <= date && date < self.check_out
    }

    /// True iff the stay's date range intersects `[from, to]` (inclusive
    /// day bounds), ignoring status.
    pub fn touches_range(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.check_in <= to && from < self.check_out
    }
}

/// A room type at one property: the unit availability is computed over.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: Ulid,
    pub name: String,
    /// Physical rooms of this type. Admin-mutable, never negative.
    pub total_count: u32,
    /// Max occupants per room. Informational — not used in availability math.
    pub capacity: u32,
    /// Per-night rate. Informational.
    pub nightly_rate: f64,
    /// All stays for this room type, sorted by `check_in`.
    pub stays: Vec<StayInterval>,
}

impl RoomState {
    pub fn new(id: Ulid, name: String, total_count: u32, capacity: u32, nightly_rate: f64) -> Self {
        Self {
            id,
            name,
            total_count,
            capacity,
            nightly_rate,
            stays: Vec::new(),
        }
    }

    /// Insert a stay maintaining sort order by check_in.
    pub fn insert_stay(&mut self, stay: StayInterval) {
        let pos = self
            .stays
            .binary_search_by_key(&stay.check_in, |s| s.check_in)
            .unwrap_or_else(|e| e);
        self.stays.insert(pos, stay);
    }

    /// Remove a stay by id.
    pub fn remove_stay(&mut self, id: Ulid) -> Option<StayInterval> {
        if let Some(pos) = self.stays.iter().position(|s| s.id == id) {
            Some(self.stays.remove(pos))
        } else {
            None
        }
    }

    pub fn stay(&self, id: Ulid) -> Option<&StayInterval> {
        self.stays.iter().find(|s| s.id == id)
    }

    pub fn stay_mut(&mut self, id: Ulid) -> Option<&mut StayInterval> {
        self.stays.iter_mut().find(|s| s.id == id)
    }

    /// Return only stays whose range touches `[from, to]`.
    /// Uses binary search to skip stays checking in after `to`.
    pub fn stays_touching(&self, from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = &StayInterval> {
        // Everything at index >= right_bound checks in after `to` → can't touch.
        let right_bound = self.stays.partition_point(|s| s.check_in <= to);
        self.stays[..right_bound]
            .iter()
            .filter(move |s| s.touches_range(from, to))
    }
}

/// Inventory-affecting changes, published to dashboard subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeEvent {
    RoomTypeCreated {
        id: Ulid,
        name: String,
        total_count: u32,
        capacity: u32,
        nightly_rate: f64,
    },
    RoomTypeUpdated {
        id: Ulid,
        name: String,
        capacity: u32,
        nightly_rate: f64,
    },
    TotalCountSet {
        id: Ulid,
        total_count: u32,
    },
    RoomTypeRemoved {
        id: Ulid,
    },
    StayRecorded {
        stay: StayInterval,
    },
    StayStatusChanged {
        id: Ulid,
        room_id: Ulid,
        status: StayStatus,
    },
    StayCancelled {
        id: Ulid,
        room_id: Ulid,
    },
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypeInfo {
    pub id: Ulid,
    pub name: String,
    pub total_count: u32,
    pub capacity: u32,
    pub nightly_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StayInfo {
    pub id: Ulid,
    pub booking_id: Ulid,
    pub room_id: Ulid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: StayStatus,
    pub guest: Option<String>,
}

impl From<&StayInterval> for StayInfo {
    fn from(s: &StayInterval) -> Self {
        Self {
            id: s.id,
            booking_id: s.booking_id,
            room_id: s.room_id,
            check_in: s.check_in,
            check_out: s.check_out,
            status: s.status,
            guest: s.guest.clone(),
        }
    }
}

/// One day of availability for one room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateAvailability {
    pub date: NaiveDate,
    pub total: u32,
    pub available: u32,
}

/// Calendar-grid badge. Thresholds are exact equalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AvailabilityBadge {
    FullyBooked,
    PartiallyAvailable,
    FullyAvailable,
}

impl AvailabilityBadge {
    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityBadge::FullyBooked => "Fully Booked",
            AvailabilityBadge::PartiallyAvailable => "Partially Available",
            AvailabilityBadge::FullyAvailable => "Fully Available",
        }
    }
}

/// Visual severity tier for an occupancy rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum OccupancyTier {
    Low,
    Medium,
    High,
}

/// Derived lifecycle phase of a stay relative to an injected "now".
/// Strictly forward-only as a function of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StayPhase {
    Upcoming,
    CheckedIn,
    CheckedOut,
}

impl StayPhase {
    pub fn code(&self) -> u8 {
        match self {
            StayPhase::Upcoming => 0,
            StayPhase::CheckedIn => 1,
            StayPhase::CheckedOut => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StayPhase::Upcoming => "Upcoming",
            StayPhase::CheckedIn => "Checked In",
            StayPhase::CheckedOut => "Checked Out",
        }
    }
}

/// Computed on read, never stored — always consistent with the clock it
/// was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaySnapshot {
    pub phase: StayPhase,
    pub is_late_checkout: bool,
    pub message: String,
}

/// One row of the date-based inventory sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub room: RoomTypeInfo,
    pub availability: DateAvailability,
    pub badge: AvailabilityBadge,
    pub tier: OccupancyTier,
}

/// One cell of a per-room calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub availability: DateAvailability,
    pub badge: AvailabilityBadge,
    pub tier: OccupancyTier,
}

/// One row of the booking-status board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    pub stay: StayInfo,
    pub snapshot: StaySnapshot,
}

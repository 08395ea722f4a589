mod availability;
mod error;
mod lifecycle;
mod mutations;
mod overlap;
mod queries;

pub use availability::{
    availability_for_date, availability_for_range, badge, calendar_day, occupancy_rate,
    overbooked_dates, tier_for_rate,
};
pub use error::EngineError;
pub use lifecycle::{CheckoutPolicy, classify};
pub use overlap::{occupied_count, room_occupied_count};

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::*;
use crate::notify::NotifyHub;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

/// In-memory inventory engine for one property. Holds every room type and
/// its stays; all availability, calendar, and board reads go through here.
/// Reads are pure over the data it holds — no booking-creation guarantee
/// is offered against a concurrent write elsewhere (that race belongs to
/// the storage transaction).
pub struct Engine {
    pub rooms: DashMap<Ulid, SharedRoomState>,
    pub notify: Arc<NotifyHub>,
    /// Reverse lookup: stay id → room type id.
    pub(super) stay_to_room: DashMap<Ulid, Ulid>,
    policy: CheckoutPolicy,
}

/// Apply an event directly to a RoomState (no locking — caller holds the lock).
fn apply_to_room(rs: &mut RoomState, event: &ChangeEvent, stay_map: &DashMap<Ulid, Ulid>) {
    match event {
        ChangeEvent::StayRecorded { stay } => {
            stay_map.insert(stay.id, stay.room_id);
            rs.insert_stay(stay.clone());
        }
        ChangeEvent::StayStatusChanged { id, status, .. } => {
            if let Some(stay) = rs.stay_mut(*id) {
                stay.status = *status;
            }
        }
        ChangeEvent::StayCancelled { id, .. } => {
            // The record is kept — dashboards still show it — but it never
            // occupies inventory again.
            if let Some(stay) = rs.stay_mut(*id) {
                stay.status = StayStatus::Cancelled;
            }
        }
        ChangeEvent::TotalCountSet { total_count, .. } => {
            rs.total_count = *total_count;
        }
        ChangeEvent::RoomTypeUpdated { name, capacity, nightly_rate, .. } => {
            rs.name = name.clone();
            rs.capacity = *capacity;
            rs.nightly_rate = *nightly_rate;
        }
        // Created/Removed are handled at the DashMap level, not here.
        ChangeEvent::RoomTypeCreated { .. } | ChangeEvent::RoomTypeRemoved { .. } => {}
    }
}

impl Engine {
    pub fn new(policy: CheckoutPolicy, notify: Arc<NotifyHub>) -> Self {
        Self {
            rooms: DashMap::new(),
            notify,
            stay_to_room: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    pub fn get_room(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    pub fn get_room_for_stay(&self, stay_id: &Ulid) -> Option<Ulid> {
        self.stay_to_room.get(stay_id).map(|e| *e.value())
    }

    /// Apply + notify in one call — every mutation funnels through here so
    /// subscribers always see exactly what the engine applied.
    pub(super) fn apply_and_publish(&self, room_id: Ulid, rs: &mut RoomState, event: &ChangeEvent) {
        apply_to_room(rs, event, &self.stay_to_room);
        self.notify.send(room_id, event);
    }

    /// Lookup stay → room, get room, acquire write lock.
    pub(super) async fn resolve_stay_write(
        &self,
        stay_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .get_room_for_stay(stay_id)
            .ok_or(EngineError::NotFound(*stay_id))?;
        let rs = self
            .get_room(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.write_owned().await;
        Ok((room_id, guard))
    }
}

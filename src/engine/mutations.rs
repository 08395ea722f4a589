use std::sync::Arc;

use chrono::Days;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::availability::overbooked_dates;
use super::overlap::validate_stay_dates;
use super::{Engine, EngineError};

impl Engine {
    pub async fn add_room_type(
        &self,
        id: Ulid,
        name: String,
        total_count: u32,
        capacity: u32,
        nightly_rate: f64,
    ) -> Result<(), EngineError> {
        if self.rooms.len() >= MAX_ROOM_TYPES {
            return Err(EngineError::LimitExceeded("too many room types"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("room type name too long"));
        }
        if self.rooms.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }

        let event = ChangeEvent::RoomTypeCreated {
            id,
            name: name.clone(),
            total_count,
            capacity,
            nightly_rate,
        };
        let rs = RoomState::new(id, name, total_count, capacity, nightly_rate);
        self.rooms.insert(id, Arc::new(RwLock::new(rs)));
        metrics::gauge!(observability::ROOM_TYPES_ACTIVE).set(self.rooms.len() as f64);
        self.notify.send(id, &event);
        Ok(())
    }

    pub async fn update_room_type(
        &self,
        id: Ulid,
        name: String,
        capacity: u32,
        nightly_rate: f64,
    ) -> Result<(), EngineError> {
        if name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("room type name too long"));
        }
        let rs = self.get_room(&id).ok_or(EngineError::NotFound(id))?;
        let mut guard = rs.write().await;

        let event = ChangeEvent::RoomTypeUpdated { id, name, capacity, nightly_rate };
        self.apply_and_publish(id, &mut guard, &event);
        Ok(())
    }

    /// Single inventory edit. `total_count` is unsigned — the "never
    /// negative" invariant holds by construction.
    pub async fn set_total_count(&self, id: Ulid, total_count: u32) -> Result<(), EngineError> {
        let rs = self.get_room(&id).ok_or(EngineError::NotFound(id))?;
        let mut guard = rs.write().await;

        debug!("room type {id}: total_count {} -> {total_count}", guard.total_count);
        let event = ChangeEvent::TotalCountSet { id, total_count };
        self.apply_and_publish(id, &mut guard, &event);
        Ok(())
    }

    /// Bulk inventory edit. All-or-nothing: every target is validated and
    /// locked before the first write, so a missing room type leaves the
    /// whole batch unapplied. Locks are acquired in sorted id order.
    pub async fn set_total_counts(&self, edits: Vec<(Ulid, u32)>) -> Result<(), EngineError> {
        if edits.is_empty() {
            return Ok(());
        }
        if edits.len() > MAX_BATCH_SIZE {
            return Err(EngineError::LimitExceeded("batch too large"));
        }

        let mut room_ids: Vec<Ulid> = edits.iter().map(|(id, _)| *id).collect();
        room_ids.sort();
        room_ids.dedup();

        let mut guards = Vec::with_capacity(room_ids.len());
        for id in &room_ids {
            let rs = self.get_room(id).ok_or(EngineError::NotFound(*id))?;
            guards.push((*id, rs.write_owned().await));
        }

        for (id, total_count) in edits {
            let (_, guard) = guards
                .iter_mut()
                .find(|(gid, _)| *gid == id)
                .expect("locked above");
            let event = ChangeEvent::TotalCountSet { id, total_count };
            self.apply_and_publish(id, guard, &event);
        }
        Ok(())
    }

    /// Refused while non-cancelled stays reference the room type. Storage
    /// enforces this referential rule too; the engine mirrors it so a
    /// mis-sequenced admin call can't orphan the stay index.
    pub async fn remove_room_type(&self, id: Ulid) -> Result<(), EngineError> {
        let rs = self.get_room(&id).ok_or(EngineError::NotFound(id))?;
        let guard = rs.read().await;
        if guard.stays.iter().any(|s| s.status.occupies_inventory()) {
            return Err(EngineError::HasActiveStays(id));
        }
        let stay_ids: Vec<Ulid> = guard.stays.iter().map(|s| s.id).collect();
        drop(guard);

        self.rooms.remove(&id);
        for stay_id in stay_ids {
            self.stay_to_room.remove(&stay_id);
        }
        metrics::gauge!(observability::ROOM_TYPES_ACTIVE).set(self.rooms.len() as f64);
        self.notify.send(id, &ChangeEvent::RoomTypeRemoved { id });
        Ok(())
    }

    /// Record one stay interval (one per room of a booking). The date range
    /// is validated; capacity is NOT enforced here — preventing two
    /// simultaneous bookings from over-subscribing a room belongs to the
    /// storage transaction. Nights pushed over `total_count` are surfaced
    /// via a warning and a counter rather than rejected or hidden.
    pub async fn record_stay(&self, stay: StayInterval) -> Result<(), EngineError> {
        validate_stay_dates(stay.check_in, stay.check_out)?;
        if let Some(ref g) = stay.guest
            && g.len() > MAX_GUEST_LABEL_LEN {
                return Err(EngineError::LimitExceeded("guest label too long"));
            }
        if self.stay_to_room.contains_key(&stay.id) {
            return Err(EngineError::AlreadyExists(stay.id));
        }
        let rs = self
            .get_room(&stay.room_id)
            .ok_or(EngineError::NotFound(stay.room_id))?;
        let mut guard = rs.write().await;
        if guard.stays.len() >= MAX_STAYS_PER_ROOM {
            return Err(EngineError::LimitExceeded("too many stays on room type"));
        }

        let room_id = stay.room_id;
        let occupies = stay.status.occupies_inventory();
        // check_out > check_in, so the stay's last night always exists.
        let last_night = stay.check_out.checked_sub_days(Days::new(1)).unwrap_or(stay.check_in);
        let first_night = stay.check_in;

        let event = ChangeEvent::StayRecorded { stay };
        self.apply_and_publish(room_id, &mut guard, &event);
        metrics::counter!(observability::STAYS_RECORDED_TOTAL).increment(1);

        if occupies {
            let over = overbooked_dates(&guard, first_night, last_night);
            if !over.is_empty() {
                warn!(
                    "room type {room_id} overbooked on {} night(s): {over:?}",
                    over.len()
                );
                metrics::counter!(observability::OVERBOOKED_NIGHTS_TOTAL)
                    .increment(over.len() as u64);
            }
        }
        Ok(())
    }

    /// Record an externally-driven status transition. `Cancelled` is final:
    /// any transition out of it is rejected.
    pub async fn set_stay_status(&self, id: Ulid, status: StayStatus) -> Result<Ulid, EngineError> {
        let (room_id, mut guard) = self.resolve_stay_write(&id).await?;
        let current = guard.stay(id).ok_or(EngineError::NotFound(id))?;
        if current.status == StayStatus::Cancelled && status != StayStatus::Cancelled {
            return Err(EngineError::CancelledIsFinal(id));
        }

        let event = ChangeEvent::StayStatusChanged { id, room_id, status };
        self.apply_and_publish(room_id, &mut guard, &event);
        Ok(room_id)
    }

    /// Permanently exclude a stay from occupancy. Idempotent; the record
    /// stays visible on the board.
    pub async fn cancel_stay(&self, id: Ulid) -> Result<Ulid, EngineError> {
        let (room_id, mut guard) = self.resolve_stay_write(&id).await?;
        let event = ChangeEvent::StayCancelled { id, room_id };
        self.apply_and_publish(room_id, &mut guard, &event);
        Ok(room_id)
    }
}

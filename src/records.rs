use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;
use ulid::Ulid;

use crate::engine::{Engine, EngineError};
use crate::model::{StayInterval, StayStatus};
use crate::observability;

// ── Upstream record ingestion ────────────────────────────────────
//
// The storage/API layer fetches bookings and room types and hands them
// over serialized. Everything is validated on the way in: a malformed
// interval is rejected and surfaced, never coerced into the engine.

/// Room type record as the storage layer hands it over.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeRecord {
    pub id: Ulid,
    pub name: String,
    pub total_count: u32,
    pub capacity: u32,
    pub price: f64,
}

/// Booking interval record. Dates are ISO-8601 calendar dates
/// (`YYYY-MM-DD`); status is one of PENDING | CONFIRMED | CANCELLED.
/// A multi-room booking sends one record per room.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRecord {
    /// Interval id; generated at ingestion when the upstream row has none.
    #[serde(default)]
    pub id: Option<Ulid>,
    pub booking_id: Ulid,
    pub room_id: Ulid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: StayStatus,
    #[serde(default)]
    pub guest: Option<String>,
}

impl From<StayRecord> for StayInterval {
    fn from(r: StayRecord) -> Self {
        Self {
            id: r.id.unwrap_or_else(Ulid::new),
            booking_id: r.booking_id,
            room_id: r.room_id,
            check_in: r.check_in,
            check_out: r.check_out,
            status: r.status,
            guest: r.guest,
        }
    }
}

pub fn parse_room_records(json: &str) -> serde_json::Result<Vec<RoomTypeRecord>> {
    serde_json::from_str(json)
}

pub fn parse_stay_records(json: &str) -> serde_json::Result<Vec<StayRecord>> {
    serde_json::from_str(json)
}

/// A stay record the engine refused, with the reason.
#[derive(Debug)]
pub struct RecordRejection {
    pub booking_id: Ulid,
    pub room_id: Ulid,
    pub reason: EngineError,
}

/// Load a fetched batch into an engine. Room type failures are hard
/// errors (the admin catalog must be consistent before stays can land);
/// invalid stay records are rejected individually and returned so the
/// caller can surface them.
pub async fn load_property(
    engine: &Engine,
    rooms: Vec<RoomTypeRecord>,
    stays: Vec<StayRecord>,
) -> Result<Vec<RecordRejection>, EngineError> {
    for room in rooms {
        engine
            .add_room_type(room.id, room.name, room.total_count, room.capacity, room.price)
            .await?;
    }

    let mut rejections = Vec::new();
    for record in stays {
        let booking_id = record.booking_id;
        let room_id = record.room_id;
        if let Err(reason) = engine.record_stay(StayInterval::from(record)).await {
            warn!("rejected stay record (booking {booking_id}, room {room_id}): {reason}");
            metrics::counter!(observability::STAYS_REJECTED_TOTAL).increment(1);
            rejections.push(RecordRejection { booking_id, room_id, reason });
        }
    }
    Ok(rejections)
}

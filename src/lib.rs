//! Room-inventory availability and booking-status engine for a
//! multi-property hotel platform.
//!
//! The web/admin application fetches room-type and booking records from
//! storage, loads them into a per-property [`engine::Engine`], and reads
//! back availability sheets, calendar grids, and the booking-status
//! board. All derivations are pure over the data handed in: the clock is
//! injected, nothing is cached, and recomputation is idempotent.

pub mod engine;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod properties;
pub mod records;

pub use engine::{CheckoutPolicy, Engine, EngineError};
pub use model::{StayInterval, StayPhase, StayStatus};
pub use properties::PropertyDirectory;

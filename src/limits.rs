//! Hard bounds on inputs. Everything here exists so a single bad caller
//! can't balloon memory or wedge a scan.

/// Earliest year accepted for a stay date.
pub const MIN_STAY_YEAR: i32 = 2000;

/// Latest year accepted for a stay date.
pub const MAX_STAY_YEAR: i32 = 2100;

/// Longest stay, in nights.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Widest calendar/range query, in days (inclusive bounds).
pub const MAX_CALENDAR_DAYS: i64 = 366;

/// Room types per property.
pub const MAX_ROOM_TYPES: usize = 4096;

/// Stay intervals per room type.
pub const MAX_STAYS_PER_ROOM: usize = 65_536;

/// Room type name length in bytes.
pub const MAX_NAME_LEN: usize = 256;

/// Guest label length in bytes.
pub const MAX_GUEST_LABEL_LEN: usize = 256;

/// Edits per bulk inventory update.
pub const MAX_BATCH_SIZE: usize = 1024;

/// Property slug length in bytes.
pub const MAX_PROPERTY_SLUG_LEN: usize = 128;

/// Properties per directory.
pub const MAX_PROPERTIES: usize = 1024;

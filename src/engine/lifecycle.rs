use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::{StayPhase, StaySnapshot};

use super::EngineError;

// ── Booking Lifecycle Classifier ─────────────────────────────────
//
// Derives the presumed phase of a stay from its dates and an injected
// clock. Nothing here reads wall-clock time; `now` is always a parameter.

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Time-of-day a room must be vacated on the check-out date. Properties
/// with a non-noon policy override the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    checkout_time: NaiveTime,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            checkout_time: NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time"),
        }
    }
}

impl CheckoutPolicy {
    /// Policy with checkout at `hour`:00 local. None if `hour > 23`.
    pub fn from_hour(hour: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, 0, 0).map(|checkout_time| Self { checkout_time })
    }

    /// The instant on the check-out date at which the stay becomes overdue.
    pub fn checkout_instant(&self, check_out: NaiveDate) -> NaiveDateTime {
        check_out.and_time(self.checkout_time)
    }
}

/// Classify a stay window against `now`.
///
/// Phase is monotone in `now`: Upcoming until check-in day starts, then
/// CheckedIn, then CheckedOut from the midnight following the check-out
/// date. Late checkout is a sub-state of CheckedIn — past the checkout
/// instant the guest is still presumed on property (and flagged) until the
/// checkout day rolls over; `is_late_checkout` implies `CheckedIn`.
///
/// `check_out <= check_in` is a data-integrity error, never coerced.
pub fn classify(
    check_in: NaiveDate,
    check_out: NaiveDate,
    now: NaiveDateTime,
    policy: &CheckoutPolicy,
) -> Result<StaySnapshot, EngineError> {
    if check_out <= check_in {
        return Err(EngineError::InvalidStayRange { check_in, check_out });
    }

    let arrival = check_in.and_time(NaiveTime::MIN);
    let checkout_instant = policy.checkout_instant(check_out);
    let departed_at = check_out
        .checked_add_days(Days::new(1))
        .ok_or(EngineError::LimitExceeded("check-out date out of range"))?
        .and_time(NaiveTime::MIN);

    if now < arrival {
        let days_until =
            ((arrival - now).num_seconds() + SECS_PER_DAY - 1) / SECS_PER_DAY;
        return Ok(StaySnapshot {
            phase: StayPhase::Upcoming,
            is_late_checkout: false,
            message: format!("Arriving in {days_until} day(s)"),
        });
    }

    if now < departed_at {
        let is_late_checkout = now >= checkout_instant;
        let message = if is_late_checkout {
            let hours_late = (now - checkout_instant).num_seconds() / SECS_PER_HOUR;
            format!("Late checkout ({hours_late}h past due)")
        } else {
            let hours_until =
                ((checkout_instant - now).num_seconds() + SECS_PER_HOUR - 1) / SECS_PER_HOUR;
            format!("Checkout in {hours_until} hour(s)")
        };
        return Ok(StaySnapshot {
            phase: StayPhase::CheckedIn,
            is_late_checkout,
            message,
        });
    }

    Ok(StaySnapshot {
        phase: StayPhase::CheckedOut,
        is_late_checkout: false,
        message: format!("Checked out on {}", check_out.format("%Y-%m-%d")),
    })
}

use chrono::NaiveDate;
use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    NotFound(Ulid),
    AlreadyExists(Ulid),
    /// Data-integrity violation: check-out not after check-in.
    InvalidStayRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    HasActiveStays(Ulid),
    CancelledIsFinal(Ulid),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            EngineError::InvalidStayRange { check_in, check_out } => {
                write!(f, "invalid stay range: check-out {check_out} not after check-in {check_in}")
            }
            EngineError::HasActiveStays(id) => {
                write!(f, "cannot remove room type {id}: active stays reference it")
            }
            EngineError::CancelledIsFinal(id) => {
                write!(f, "stay {id} is cancelled and cannot be reactivated")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

//! Error types for the store and the tracker boundary.
use std::fmt;

use thiserror::Error;

/// Failures raised by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Expected, user-facing refusals. These are not faults: the caller is told why.
#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    TankOverCapacity {
        equipment: String,
        level: f64,
        liters: f64,
        capacity: f64,
    },
    InsufficientSiteFuel {
        requested: f64,
        available: f64,
    },
    SiteTankOverCapacity {
        current: f64,
        liters: f64,
        capacity: f64,
    },
    NoFuelStock,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TankOverCapacity {
                equipment,
                level,
                liters,
                capacity,
            } => write!(
                f,
                "{equipment} holds {level:.1} L; adding {liters:.1} L exceeds its {capacity:.1} L tank"
            ),
            Rejection::InsufficientSiteFuel {
                requested,
                available,
            } => write!(
                f,
                "site fuel stock has {available:.1} L, cannot dispense {requested:.1} L"
            ),
            Rejection::SiteTankOverCapacity {
                current,
                liters,
                capacity,
            } => write!(
                f,
                "site tank holds {current:.1} L; adding {liters:.1} L exceeds its {capacity:.1} L capacity"
            ),
            Rejection::NoFuelStock => f.write_str("no site fuel stock is configured"),
        }
    }
}

/// Outcome of a failed tracker operation. Every variant is scoped to the one
/// operation that produced it; tracker state stays at its last committed value.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("rejected: {0}")]
    Rejected(Rejection),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("storage failure: {0}")]
    Persistence(#[from] StoreError),
}

impl TrackerError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        TrackerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TrackerError::Validation(message.into())
    }
}

impl From<Rejection> for TrackerError {
    fn from(rejection: Rejection) -> Self {
        TrackerError::Rejected(rejection)
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

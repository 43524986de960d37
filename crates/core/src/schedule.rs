//! Tournament schedule: registration window, play window, and phase
//! classification.
//!
//! A tournament is `future` until it starts, `active` while it runs and
//! `past` once it has ended. The three phases partition the timeline so a
//! tournament is always in exactly one of them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Where a tournament sits on the timeline relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Future,
    Active,
    Past,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Future => "future",
            Phase::Active => "active",
            Phase::Past => "past",
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "future" => Ok(Phase::Future),
            "active" => Ok(Phase::Active),
            "past" => Ok(Phase::Past),
            other => Err(CoreError::Validation(format!(
                "Unknown phase '{other}'. Expected one of: future, active, past"
            ))),
        }
    }
}

/// The four instants that define a tournament's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub registration_opens_at: Timestamp,
    pub registration_closes_at: Timestamp,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl Schedule {
    /// Reject inverted or empty windows.
    ///
    /// Registration may overlap the play window (late sign-ups are allowed
    /// until the bracket is generated), so only each window's own ordering
    /// is checked.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.registration_opens_at >= self.registration_closes_at {
            return Err(CoreError::Validation(
                "registration_opens_at must be before registration_closes_at".to_string(),
            ));
        }
        if self.starts_at >= self.ends_at {
            return Err(CoreError::Validation(
                "starts_at must be before ends_at".to_string(),
            ));
        }
        Ok(())
    }

    /// Classify the schedule at `now`.
    pub fn phase_at(&self, now: Timestamp) -> Phase {
        if now < self.starts_at {
            Phase::Future
        } else if now < self.ends_at {
            Phase::Active
        } else {
            Phase::Past
        }
    }

    /// Whether sign-ups are accepted at `now` (half-open window).
    pub fn registration_open_at(&self, now: Timestamp) -> bool {
        self.registration_opens_at <= now && now < self.registration_closes_at
    }
}

//! Query parameter types shared by handler modules.

use serde::Deserialize;
use tourney_core::error::CoreError;
use tourney_core::schedule::Phase;

/// `?phase=future|active|past` for tournament listings. Absent means all.
///
/// Kept as a string so an unknown value surfaces as a JSON validation error
/// rather than a plain-text query rejection.
#[derive(Debug, Deserialize)]
pub struct PhaseParams {
    pub phase: Option<String>,
}

impl PhaseParams {
    pub fn parse(&self) -> Result<Option<Phase>, CoreError> {
        self.phase.as_deref().map(str::parse).transpose()
    }
}

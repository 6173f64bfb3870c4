//! The seam between the coordinator and the simulation engine.
//!
//! The coordinator never looks inside the simulation. It consumes the
//! narrow stepping and query surface of [`Simulation`], and builds new
//! simulations through a [`SimulationFactory`]. Tests substitute a
//! counting fake; production wires in the city engine.

use chrono::{Datelike, NaiveDate};
use polis_types::{BuildingView, GovernmentState, Persona, PersonaId, PlayerId, Proposal};
use serde::de::DeserializeOwned;

use crate::error::{EngineError, SessionError};

/// A running simulation, owned exclusively by the session state.
pub trait Simulation: Send + 'static {
    /// Current calendar position as `(year, month)` with month in `1..=12`.
    fn year_month(&self) -> (i32, u32);

    /// Advance the simulation by a single day.
    fn advance_one_day(&mut self);

    /// Every persona in the simulation.
    fn people(&self) -> &[Persona];

    /// Set or clear the player bound to a persona.
    ///
    /// Returns `false` if no persona with `persona` exists.
    fn bind_persona(&mut self, persona: PersonaId, player: Option<PlayerId>) -> bool;

    /// Building topology with current tenants.
    fn buildings(&self) -> Vec<BuildingView>;

    /// Public government state.
    fn government(&self) -> GovernmentState;

    /// Policy changes the government would currently entertain.
    fn proposal_options(&self) -> Vec<Proposal>;

    /// Enact a policy change.
    fn apply_proposal(&mut self, proposal: &Proposal);
}

/// Builds simulations for new sessions.
pub trait SimulationFactory: Send + Sync + 'static {
    /// The simulation type produced.
    type Simulation: Simulation;

    /// Per-session configuration carried by the setup trigger.
    type Config: DeserializeOwned + Send + core::fmt::Debug + 'static;

    /// Load the candidate population for a new session.
    ///
    /// The coordinator caps the result at its configured maximum.
    fn load_population(&self) -> Result<Vec<Persona>, EngineError>;

    /// Construct a simulation over `population`.
    fn create(
        &self,
        population: Vec<Persona>,
        config: Self::Config,
    ) -> Result<Self::Simulation, EngineError>;
}

/// Number of days in the given month of the given year.
///
/// # Errors
///
/// Returns [`SessionError::Calendar`] if `year`/`month` is not a real
/// calendar month.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, SessionError> {
    let invalid = || SessionError::Calendar { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1).ok_or_else(invalid)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.checked_add(1).ok_or_else(invalid)?, 1)
    }
    .ok_or_else(invalid)?;
    let last = next.pred_opt().ok_or_else(invalid)?;
    debug_assert_eq!(last.month(), first.month());
    Ok(last.day())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2005, 1).unwrap(), 31);
        assert_eq!(days_in_month(2005, 4).unwrap(), 30);
        assert_eq!(days_in_month(2005, 12).unwrap(), 31);
    }

    #[test]
    fn february_respects_leap_years() {
        assert_eq!(days_in_month(2005, 2).unwrap(), 28);
        assert_eq!(days_in_month(2008, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(matches!(
            days_in_month(2005, 13),
            Err(SessionError::Calendar { month: 13, .. })
        ));
        assert!(days_in_month(2005, 0).is_err());
    }
}

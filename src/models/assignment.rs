//! Division assignment as produced by an interactive editor.
//!
//! While a user arranges teams, slots may hold fewer than three teams. The
//! generator only runs on a complete assignment: four slots of three teams
//! that together cover every team once.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Division, LeagueConfig, Team, DIVISION_COUNT, DIVISION_SIZE};
use crate::error::{Result, ScheduleError};
use crate::validation::{validate_assignment, ValidationResult};

/// Up to four division slots of up to three teams each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionAssignment {
    slots: Vec<Vec<Team>>,
}

impl DivisionAssignment {
    /// Creates an assignment from raw slots.
    pub fn new(slots: Vec<Vec<Team>>) -> Self {
        Self { slots }
    }

    /// Creates a complete assignment from divisions.
    pub fn from_divisions(divisions: &[Division]) -> Self {
        Self {
            slots: divisions.iter().map(|d| d.teams().to_vec()).collect(),
        }
    }

    /// Randomly partitions all twelve teams into four divisions of three.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut teams = Team::ALL.to_vec();
        teams.shuffle(rng);
        Self {
            slots: teams.chunks(DIVISION_SIZE).map(<[Team]>::to_vec).collect(),
        }
    }

    /// The raw slots.
    pub fn slots(&self) -> &[Vec<Team>] {
        &self.slots
    }

    /// Whether every slot is filled and the slots partition the league.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks the assignment, reporting every problem found.
    pub fn validate(&self) -> ValidationResult {
        validate_assignment(&self.slots)
    }

    /// Same teams per slot, with the order inside each slot shuffled.
    pub fn shuffled_team_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                let mut slot = slot.clone();
                slot.shuffle(rng);
                slot
            })
            .collect();
        Self { slots }
    }

    /// Converts complete slots into divisions.
    pub fn to_divisions(&self) -> Result<Vec<Division>> {
        self.validate().map_err(ScheduleError::InvalidConfig)?;
        debug_assert_eq!(self.slots.len(), DIVISION_COUNT);
        self.slots
            .iter()
            .map(|slot| Division::try_from(slot.as_slice()))
            .collect()
    }

    /// Builds a league configuration with deterministic rivalries.
    pub fn to_league_config(&self) -> Result<LeagueConfig> {
        LeagueConfig::with_computed_rivalries(self.to_divisions()?)
    }

    /// Builds a league configuration with a random rivalry matching.
    pub fn to_league_config_with_random_rivalries<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<LeagueConfig> {
        LeagueConfig::with_random_rivalries(self.to_divisions()?, rng)
    }
}

impl From<&LeagueConfig> for DivisionAssignment {
    fn from(config: &LeagueConfig) -> Self {
        Self::from_divisions(config.divisions())
    }
}

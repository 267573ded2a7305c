//! Match-up model.

use serde::{Deserialize, Serialize};

use super::{LeagueConfig, Pair, Team};

/// A single game: home team, away team, and its classification.
///
/// Flags are computed against the league configuration when the match-up
/// is created and are never affected by swapping home and away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchUp {
    /// Hosting team.
    pub home: Team,
    /// Visiting team.
    pub away: Team,
    /// Both teams share a division.
    pub is_divisional: bool,
    /// Rivalry pair that is not divisional.
    pub is_rivalry: bool,
}

impl MatchUp {
    /// Creates a match-up, classifying it against `config`.
    pub fn new(home: Team, away: Team, config: &LeagueConfig) -> Self {
        Self {
            home,
            away,
            is_divisional: config.is_divisional(home, away),
            is_rivalry: config.is_rivalry(home, away),
        }
    }

    /// The unordered pair of teams.
    #[inline]
    pub fn pair(&self) -> Pair {
        Pair::new(self.home, self.away)
    }

    /// Whether `team` plays in this game.
    pub fn involves(&self, team: Team) -> bool {
        self.home == team || self.away == team
    }

    /// The opponent of `team`, if `team` plays in this game.
    pub fn opponent_of(&self, team: Team) -> Option<Team> {
        if self.home == team {
            Some(self.away)
        } else if self.away == team {
            Some(self.home)
        } else {
            None
        }
    }

    /// Same game with home and away swapped.
    pub(crate) fn flipped(self) -> Self {
        Self {
            home: self.away,
            away: self.home,
            ..self
        }
    }
}

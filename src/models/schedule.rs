//! Week and season schedule models.
//!
//! A [`Schedule`] is the value handed back to callers. It exposes no
//! mutators: home/away repair happens on the generator's working weeks
//! before the schedule is assembled.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{MatchUp, Pair, Team};

/// Weeks in a season.
pub const WEEK_COUNT: usize = 14;

/// Match-ups per week.
pub const MATCH_UPS_PER_WEEK: usize = 6;

/// Match-ups per season.
pub const SEASON_MATCH_UPS: usize = WEEK_COUNT * MATCH_UPS_PER_WEEK;

/// One week of games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Games of the week, in slot order.
    pub match_ups: Vec<MatchUp>,
}

impl Week {
    /// Creates a week from its games.
    pub fn new(match_ups: Vec<MatchUp>) -> Self {
        Self { match_ups }
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.match_ups.len()
    }

    /// Whether the week has no games.
    pub fn is_empty(&self) -> bool {
        self.match_ups.is_empty()
    }

    /// Unordered pairs played this week.
    pub fn pairs(&self) -> HashSet<Pair> {
        self.match_ups.iter().map(MatchUp::pair).collect()
    }

    /// Team slots in order (home, away, home, away, ...).
    pub fn team_slots(&self) -> impl Iterator<Item = Team> + '_ {
        self.match_ups.iter().flat_map(|m| [m.home, m.away])
    }

    /// The game `team` plays this week.
    pub fn game_for(&self, team: Team) -> Option<&MatchUp> {
        self.match_ups.iter().find(|m| m.involves(team))
    }
}

/// A full season: fourteen weeks of six games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    weeks: Vec<Week>,
}

impl Schedule {
    /// Wraps generated weeks.
    pub(crate) fn from_weeks(weeks: Vec<Week>) -> Self {
        Self { weeks }
    }

    /// Weeks in order (week 1 first).
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Number of weeks.
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Total games across all weeks.
    pub fn match_up_count(&self) -> usize {
        self.weeks.iter().map(Week::len).sum()
    }

    /// Whether the schedule has the expected shape (14 weeks of 6 games).
    pub fn is_structurally_valid(&self) -> bool {
        self.weeks.len() == WEEK_COUNT
            && self.weeks.iter().all(|w| w.len() == MATCH_UPS_PER_WEEK)
    }

    /// All games in week order.
    pub fn match_ups(&self) -> impl Iterator<Item = &MatchUp> {
        self.weeks.iter().flat_map(|w| w.match_ups.iter())
    }

    /// Home games for `team`.
    pub fn home_games(&self, team: Team) -> usize {
        self.match_ups().filter(|m| m.home == team).count()
    }

    /// Away games for `team`.
    pub fn away_games(&self, team: Team) -> usize {
        self.match_ups().filter(|m| m.away == team).count()
    }

    /// How many times two teams meet.
    pub fn meetings(&self, a: Team, b: Team) -> usize {
        let pair = Pair::new(a, b);
        self.match_ups().filter(|m| m.pair() == pair).count()
    }

    /// All games of `team`, in week order.
    pub fn games_for(&self, team: Team) -> Vec<&MatchUp> {
        self.match_ups().filter(|m| m.involves(team)).collect()
    }
}

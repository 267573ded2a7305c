//! Per-team home-game tally threaded through the generation stages.

use crate::models::{Team, Week, TEAM_COUNT};

/// Running count of home games per team.
///
/// Each stage takes a tally, extends it with the games it creates, and
/// returns it to the next stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeTally {
    counts: [usize; TEAM_COUNT],
}

impl HomeTally {
    /// An all-zero tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts home games across `weeks`.
    pub fn from_weeks(weeks: &[Week]) -> Self {
        let mut tally = Self::new();
        for m in weeks.iter().flat_map(|w| w.match_ups.iter()) {
            tally.record_home(m.home);
        }
        tally
    }

    /// Home games recorded for `team`.
    #[inline]
    pub fn get(&self, team: Team) -> usize {
        self.counts[team.index()]
    }

    /// Records one home game for `team`.
    #[inline]
    pub fn record_home(&mut self, team: Team) {
        self.counts[team.index()] += 1;
    }

    /// Moves one home game from `from` to `to`.
    pub(crate) fn transfer(&mut self, from: Team, to: Team) {
        self.counts[from.index()] = self.counts[from.index()].saturating_sub(1);
        self.counts[to.index()] += 1;
    }

    /// Picks home and away for a game between `a` and `b` and records it.
    ///
    /// The team with fewer home games hosts; ties go to `a`.
    pub fn assign(&mut self, a: Team, b: Team) -> (Team, Team) {
        let (home, away) = if self.get(a) <= self.get(b) { (a, b) } else { (b, a) };
        self.record_home(home);
        (home, away)
    }

    /// Teams whose count differs from `target`, with their counts.
    pub fn off_target(&self, target: usize) -> Vec<(Team, usize)> {
        Team::ALL
            .iter()
            .map(|&t| (t, self.get(t)))
            .filter(|&(_, count)| count != target)
            .collect()
    }

    /// Whether every team has exactly `target` home games.
    pub fn is_balanced(&self, target: usize) -> bool {
        self.counts.iter().all(|&c| c == target)
    }

    /// Total home games recorded.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

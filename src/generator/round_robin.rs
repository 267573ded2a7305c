//! Single round robin via the circle method (weeks 1–11).
//!
//! # Algorithm
//!
//! Teams are laid out in canonical order on twelve positions. Position 0 is
//! fixed; each round, the team at position 1 moves to position 11 and
//! positions 2..=11 shift down by one. Position 0 plays position 1 and
//! position `i` plays its mirror `13 - i` (for `i` in 2..=7), giving six
//! games per round and every pair exactly once over eleven rounds.
//!
//! Home/away within a pair goes to the team with fewer home games so far;
//! ties go to the first team of the pair.
//!
//! # Reference
//! Kirkman (1847); de Werra (1981), "Scheduling in sports"

use super::HomeTally;
use crate::models::{LeagueConfig, MatchUp, Team, Week, TEAM_COUNT};

/// Number of round-robin weeks.
pub const ROUND_ROBIN_WEEKS: usize = TEAM_COUNT - 1;

/// Position pairs played each round.
const PAIR_SLOTS: [(usize, usize); TEAM_COUNT / 2] =
    [(0, 1), (11, 2), (10, 3), (9, 4), (8, 5), (7, 6)];

/// Builds weeks 1–11 starting from `tally`.
///
/// Never fails. Divisional and rivalry flags are computed against `config`
/// after each pair is chosen; they play no part in the pairing itself.
pub fn round_robin(config: &LeagueConfig, mut tally: HomeTally) -> (Vec<Week>, HomeTally) {
    let mut positions: [Team; TEAM_COUNT] = Team::ALL;
    let mut weeks = Vec::with_capacity(ROUND_ROBIN_WEEKS);

    for _ in 0..ROUND_ROBIN_WEEKS {
        let match_ups = PAIR_SLOTS
            .iter()
            .map(|&(i, j)| {
                let (home, away) = tally.assign(positions[i], positions[j]);
                MatchUp::new(home, away, config)
            })
            .collect();
        weeks.push(Week::new(match_ups));

        positions[1..].rotate_left(1);
    }

    (weeks, tally)
}

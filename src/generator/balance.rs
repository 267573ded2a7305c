//! Home/away repair over the full season.
//!
//! # Algorithm
//!
//! Scan weeks in order, slots in order, for a game whose home team hosts
//! more than seven games while its away team hosts fewer than seven, and
//! swap home and away on it. Repeat until no such game exists or the
//! iteration cap is reached. Swaps never move a game or change who plays
//! whom, so pairings, adjacency, and flags are untouched.

use tracing::debug;

use super::HomeTally;
use crate::models::Week;

/// Home (and away) games per team per season.
pub const HOME_GAMES_PER_TEAM: usize = 7;

/// Iteration cap for the repair loop.
pub const MAX_BALANCE_ITERATIONS: usize = 200;

/// Flips home/away labels until every team hosts `target` games or the cap
/// is hit.
///
/// `tally` must hold the home counts of `weeks`. Returns the updated tally;
/// hitting the cap is not an error here, callers check the result.
pub fn balance_home_away(
    weeks: &mut [Week],
    mut tally: HomeTally,
    target: usize,
    max_iterations: usize,
) -> HomeTally {
    let mut flips = 0;

    for _ in 0..max_iterations {
        let candidate = weeks.iter().enumerate().find_map(|(w, week)| {
            week.match_ups
                .iter()
                .position(|m| tally.get(m.home) > target && tally.get(m.away) < target)
                .map(|slot| (w, slot))
        });
        let Some((w, slot)) = candidate else {
            break;
        };

        let game = &mut weeks[w].match_ups[slot];
        tally.transfer(game.home, game.away);
        *game = game.flipped();
        flips += 1;
    }

    debug_assert_eq!(tally, HomeTally::from_weeks(weeks));
    debug!(flips, balanced = tally.is_balanced(target), "home/away repair finished");
    tally
}

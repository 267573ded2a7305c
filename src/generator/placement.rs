//! Second-round placement (weeks 12–14).
//!
//! Places the 18 extra games (three intra-division pairs per division plus
//! the six rivalry pairs) into three weeks of six.
//!
//! # Algorithm
//!
//! A placement attempt walks a candidate ordering of the extra games once
//! per week, taking every game that is not yet placed, whose teams are both
//! free this week, and whose pair was not played the week before (week 11
//! for week 12). A week that cannot reach six games abandons the attempt.
//!
//! Attempts are driven by a [`PlacementPolicy`]: several tiers of bounded
//! attempts, each attempt with a freshly shuffled copy of the natural
//! ordering. The very first attempt of each round may use the natural
//! ordering unshuffled. Randomized restarts converge quickly in practice;
//! running out of attempts is a reported error, never a short season.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::HomeTally;
use crate::error::{Result, ScheduleError};
use crate::models::{LeagueConfig, MatchUp, Pair, Team, Week, MATCH_UPS_PER_WEEK};

/// Weeks filled by the placer.
pub const SECOND_ROUND_WEEKS: usize = 3;

/// Attempts per tier.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 150;

/// Tiers per round.
pub const PLACEMENT_TIERS: usize = 3;

/// Rounds of the whole tier sequence before giving up.
pub const MAX_PLACEMENT_RETRIES: usize = 3;

/// Source of candidate orderings.
///
/// `shuffle` receives a fresh copy of the natural ordering (indices into
/// the extra-game list) on every attempt.
pub trait Shuffle {
    /// Reorders `order` in place.
    fn shuffle(&mut self, order: &mut [usize]);
}

/// Uniform random orderings from an [`Rng`].
#[derive(Debug, Clone)]
pub struct RngShuffle<R> {
    rng: R,
}

impl<R: Rng> RngShuffle<R> {
    /// Wraps a random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Shuffle for RngShuffle<R> {
    fn shuffle(&mut self, order: &mut [usize]) {
        order.shuffle(&mut self.rng);
    }
}

/// Always the natural ordering reversed.
///
/// A fixed worst case: rivalry games come first, fill week 12 and leave
/// weeks 13–14 unable to hold all divisional rematches. Useful for
/// exercising the exhaustion path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseOrder;

impl Shuffle for ReverseOrder {
    fn shuffle(&mut self, order: &mut [usize]) {
        order.reverse();
    }
}

/// Attempt budget for the placer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPolicy {
    /// Attempts per tier.
    pub attempts_per_tier: usize,
    /// Tiers per round.
    pub tiers: usize,
    /// Rounds of the tier sequence.
    pub rounds: usize,
    /// Whether the first attempt of each round uses the natural ordering.
    pub natural_first: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            attempts_per_tier: MAX_PLACEMENT_ATTEMPTS,
            tiers: PLACEMENT_TIERS,
            rounds: MAX_PLACEMENT_RETRIES,
            natural_first: true,
        }
    }
}

impl PlacementPolicy {
    /// Total attempts before the placer gives up.
    pub fn total_attempts(&self) -> usize {
        self.attempts_per_tier * self.tiers * self.rounds
    }
}

/// A game that must be played a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraGame {
    /// First team; hosts on a tally tie.
    pub first: Team,
    /// Second team.
    pub second: Team,
}

impl ExtraGame {
    /// The unordered pair.
    pub fn pair(&self) -> Pair {
        Pair::new(self.first, self.second)
    }
}

/// The 18 extra games in natural order.
///
/// Divisional pairs come first, division by division in `(0,1) (0,2) (1,2)`
/// member order, followed by the rivalry pairs in configuration order.
pub fn extra_games(config: &LeagueConfig) -> Vec<ExtraGame> {
    let divisional = config.divisions().iter().flat_map(|d| {
        let [a, b, c] = *d.teams();
        [(a, b), (a, c), (b, c)]
    });
    let rivalry = config.rivalry_pairs().iter().map(|r| (r.a, r.b));

    divisional
        .chain(rivalry)
        .map(|(first, second)| ExtraGame { first, second })
        .collect()
}

/// Places the extra games into weeks 12–14.
///
/// `boundary` holds the pairs of week 11. Returns the three weeks and the
/// tally extended with their home games.
///
/// # Errors
/// [`ScheduleError::PlacementExhausted`] when every attempt of every tier
/// and round fails.
pub fn place_second_round<S: Shuffle + ?Sized>(
    config: &LeagueConfig,
    boundary: &HashSet<Pair>,
    tally: HomeTally,
    shuffle: &mut S,
    policy: &PlacementPolicy,
) -> Result<(Vec<Week>, HomeTally)> {
    let games = extra_games(config);
    let natural: Vec<usize> = (0..games.len()).collect();

    for round in 0..policy.rounds {
        for tier in 0..policy.tiers {
            for attempt in 0..policy.attempts_per_tier {
                let mut order = natural.clone();
                let use_natural = policy.natural_first && tier == 0 && attempt == 0;
                if !use_natural {
                    shuffle.shuffle(&mut order);
                }

                if let Some(placed) = try_placement(config, &games, &order, boundary, tally) {
                    debug!(round, tier, attempt, "placed weeks 12–14");
                    return Ok(placed);
                }
            }
            debug!(round, tier, "placement tier exhausted");
        }
    }

    Err(ScheduleError::PlacementExhausted {
        attempts: policy.total_attempts(),
    })
}

/// One placement attempt over a fixed candidate ordering.
fn try_placement(
    config: &LeagueConfig,
    games: &[ExtraGame],
    order: &[usize],
    boundary: &HashSet<Pair>,
    mut tally: HomeTally,
) -> Option<(Vec<Week>, HomeTally)> {
    let mut placed = vec![false; games.len()];
    let mut weeks: Vec<Week> = Vec::with_capacity(SECOND_ROUND_WEEKS);

    for _ in 0..SECOND_ROUND_WEEKS {
        let previous = weeks.last().map(Week::pairs);
        let previous = previous.as_ref().unwrap_or(boundary);

        let mut used: HashSet<Team> = HashSet::new();
        let mut match_ups = Vec::with_capacity(MATCH_UPS_PER_WEEK);

        for &idx in order {
            if match_ups.len() == MATCH_UPS_PER_WEEK {
                break;
            }
            let game = games[idx];
            if placed[idx]
                || used.contains(&game.first)
                || used.contains(&game.second)
                || previous.contains(&game.pair())
            {
                continue;
            }

            let (home, away) = tally.assign(game.first, game.second);
            placed[idx] = true;
            used.insert(game.first);
            used.insert(game.second);
            match_ups.push(MatchUp::new(home, away, config));
        }

        if match_ups.len() < MATCH_UPS_PER_WEEK {
            return None;
        }
        weeks.push(Week::new(match_ups));
    }

    Some((weeks, tally))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::round_robin::round_robin;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn week_eleven(config: &LeagueConfig) -> (HashSet<Pair>, HomeTally) {
        let (weeks, tally) = round_robin(config, HomeTally::new());
        (weeks.last().map(Week::pairs).unwrap_or_default(), tally)
    }

    #[test]
    fn test_extra_games_natural_order() {
        use Team::*;
        let games = extra_games(&LeagueConfig::default());
        assert_eq!(games.len(), 18);
        assert_eq!(games[0], ExtraGame { first: A, second: B });
        assert_eq!(games[1], ExtraGame { first: A, second: C });
        assert_eq!(games[2], ExtraGame { first: B, second: C });
        assert_eq!(games[12], ExtraGame { first: A, second: D });
        assert_eq!(games[17], ExtraGame { first: I, second: L });
    }

    #[test]
    fn test_place_default_config() {
        let config = LeagueConfig::default();
        let (boundary, tally) = week_eleven(&config);
        let mut shuffle = RngShuffle::new(SmallRng::seed_from_u64(42));
        let (weeks, after) = place_second_round(
            &config,
            &boundary,
            tally,
            &mut shuffle,
            &PlacementPolicy::default(),
        )
        .unwrap();

        assert_eq!(weeks.len(), SECOND_ROUND_WEEKS);
        assert_eq!(after.total(), tally.total() + 18);

        let mut counts: HashMap<Pair, usize> = HashMap::new();
        for week in &weeks {
            assert_eq!(week.len(), 6);
            let teams: HashSet<Team> = week.team_slots().collect();
            assert_eq!(teams.len(), 12);
            for m in &week.match_ups {
                *counts.entry(m.pair()).or_insert(0) += 1;
            }
        }
        for game in extra_games(&config) {
            assert_eq!(counts.get(&game.pair()), Some(&1));
        }
    }

    #[test]
    fn test_no_back_to_back_with_boundary() {
        let config = LeagueConfig::default();
        let (boundary, tally) = week_eleven(&config);
        for seed in 0..20 {
            let mut shuffle = RngShuffle::new(SmallRng::seed_from_u64(seed));
            let (weeks, _) = place_second_round(
                &config,
                &boundary,
                tally,
                &mut shuffle,
                &PlacementPolicy::default(),
            )
            .unwrap();
            let mut previous = boundary.clone();
            for week in &weeks {
                let pairs = week.pairs();
                assert!(pairs.is_disjoint(&previous));
                previous = pairs;
            }
        }
    }

    #[test]
    fn test_reverse_order_exhausts() {
        let config = LeagueConfig::default();
        let (boundary, tally) = week_eleven(&config);
        let policy = PlacementPolicy {
            natural_first: false,
            ..PlacementPolicy::default()
        };
        let err = place_second_round(&config, &boundary, tally, &mut ReverseOrder, &policy)
            .unwrap_err();
        match err {
            ScheduleError::PlacementExhausted { attempts } => {
                assert_eq!(attempts, 150 * 3 * 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_boundary_blocks_pair() {
        use Team::*;
        let config = LeagueConfig::default();
        let games = extra_games(&config);
        let natural: Vec<usize> = (0..games.len()).collect();

        // Without a boundary the natural ordering opens week 12 with A-B.
        let (weeks, _) =
            try_placement(&config, &games, &natural, &HashSet::new(), HomeTally::new()).unwrap();
        assert!(weeks[0].pairs().contains(&Pair::new(A, B)));

        // Blocking A-B leaves B and F without a partner in week 12.
        let boundary: HashSet<Pair> = [Pair::new(A, B)].into_iter().collect();
        assert!(try_placement(&config, &games, &natural, &boundary, HomeTally::new()).is_none());
    }

    /// Counts calls; leaves the ordering untouched.
    #[derive(Default)]
    struct CountingShuffle {
        calls: usize,
    }

    impl Shuffle for CountingShuffle {
        fn shuffle(&mut self, _order: &mut [usize]) {
            self.calls += 1;
        }
    }

    /// A boundary holding every extra game, so no attempt can succeed.
    fn blocking_boundary(config: &LeagueConfig) -> HashSet<Pair> {
        extra_games(config).iter().map(ExtraGame::pair).collect()
    }

    #[test]
    fn test_natural_order_succeeds_without_shuffling() {
        let config = LeagueConfig::default();
        let mut shuffle = CountingShuffle::default();
        let result = place_second_round(
            &config,
            &HashSet::new(),
            HomeTally::new(),
            &mut shuffle,
            &PlacementPolicy::default(),
        );
        assert!(result.is_ok());
        assert_eq!(shuffle.calls, 0);
    }

    #[test]
    fn test_only_first_attempt_of_each_round_is_unshuffled() {
        let config = LeagueConfig::default();
        let boundary = blocking_boundary(&config);

        let policy = PlacementPolicy::default();
        let mut shuffle = CountingShuffle::default();
        let err = place_second_round(&config, &boundary, HomeTally::new(), &mut shuffle, &policy)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::PlacementExhausted { attempts: 1350 }));
        assert_eq!(shuffle.calls, policy.total_attempts() - policy.rounds);

        // One round, two attempts per tier: tiers 2 and 3 shuffle from
        // their first attempt.
        let small = PlacementPolicy {
            attempts_per_tier: 2,
            tiers: 3,
            rounds: 1,
            natural_first: true,
        };
        let mut shuffle = CountingShuffle::default();
        let _ = place_second_round(&config, &boundary, HomeTally::new(), &mut shuffle, &small);
        assert_eq!(shuffle.calls, 5);

        let mut shuffle = CountingShuffle::default();
        let shuffled_only = PlacementPolicy {
            natural_first: false,
            ..small
        };
        let _ = place_second_round(&config, &boundary, HomeTally::new(), &mut shuffle, &shuffled_only);
        assert_eq!(shuffle.calls, 6);
    }

    #[test]
    fn test_policy_total_attempts() {
        assert_eq!(PlacementPolicy::default().total_attempts(), 1350);
    }
}

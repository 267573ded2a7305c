//! Season schedule generation.
//!
//! # Pipeline
//!
//! 1. [`round_robin`]: weeks 1–11, every pair once (circle method).
//! 2. [`place_second_round`]: weeks 12–14, the 12 divisional and 6 rivalry
//!    rematches, with week 11 as the no-repeat boundary.
//! 3. [`balance_home_away`]: flip home/away until every team hosts 7.
//! 4. Post-conditions: 7 home games per team, 84 games in total.
//!
//! A [`HomeTally`] value is threaded from stage to stage.
//!
//! # Usage
//!
//! ```
//! use u_season::generator::generate_schedule;
//! use u_season::models::LeagueConfig;
//!
//! let schedule = generate_schedule(&LeagueConfig::default()).unwrap();
//! assert_eq!(schedule.week_count(), 14);
//! assert_eq!(schedule.match_up_count(), 84);
//! ```
//!
//! # References
//!
//! - de Werra (1981), "Scheduling in sports"
//! - Kendall et al. (2010), "Scheduling in sports: An annotated bibliography"

mod balance;
mod placement;
mod round_robin;
mod tally;

pub use balance::{balance_home_away, HOME_GAMES_PER_TEAM, MAX_BALANCE_ITERATIONS};
pub use placement::{
    extra_games, place_second_round, ExtraGame, PlacementPolicy, ReverseOrder, RngShuffle,
    Shuffle, MAX_PLACEMENT_ATTEMPTS, MAX_PLACEMENT_RETRIES, PLACEMENT_TIERS, SECOND_ROUND_WEEKS,
};
pub use round_robin::{round_robin, ROUND_ROBIN_WEEKS};
pub use tally::HomeTally;

use rand::rngs::{SmallRng, ThreadRng};
use rand::SeedableRng;

use crate::error::{Result, ScheduleError};
use crate::models::{LeagueConfig, Schedule, Week, SEASON_MATCH_UPS};

/// Tunables for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions<S> {
    /// Candidate ordering source for the placer.
    pub shuffle: S,
    /// Placement attempt budget.
    pub policy: PlacementPolicy,
    /// Iteration cap for home/away repair.
    pub balance_iterations: usize,
}

impl GenerateOptions<RngShuffle<ThreadRng>> {
    /// Thread-local randomness, default budgets.
    pub fn new() -> Self {
        Self {
            shuffle: RngShuffle::new(rand::rng()),
            policy: PlacementPolicy::default(),
            balance_iterations: MAX_BALANCE_ITERATIONS,
        }
    }
}

impl Default for GenerateOptions<RngShuffle<ThreadRng>> {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerateOptions<RngShuffle<SmallRng>> {
    /// Reproducible randomness from a seed, default budgets.
    pub fn seeded(seed: u64) -> Self {
        Self {
            shuffle: RngShuffle::new(SmallRng::seed_from_u64(seed)),
            policy: PlacementPolicy::default(),
            balance_iterations: MAX_BALANCE_ITERATIONS,
        }
    }
}

impl<S: Shuffle> GenerateOptions<S> {
    /// Replaces the ordering source.
    ///
    /// An injected source drives every placement attempt, including the
    /// first one that would otherwise use the natural ordering.
    pub fn with_shuffle<T: Shuffle>(self, shuffle: T) -> GenerateOptions<T> {
        GenerateOptions {
            shuffle,
            policy: PlacementPolicy {
                natural_first: false,
                ..self.policy
            },
            balance_iterations: self.balance_iterations,
        }
    }

    /// Sets the placement budget.
    pub fn with_policy(mut self, policy: PlacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the home/away repair iteration cap.
    pub fn with_balance_iterations(mut self, iterations: usize) -> Self {
        self.balance_iterations = iterations;
        self
    }
}

/// Generates a season with thread-local randomness.
///
/// # Errors
/// - [`ScheduleError::PlacementExhausted`] if weeks 12–14 could not be placed
/// - [`ScheduleError::Unbalanced`] if home/away repair fell short
/// - [`ScheduleError::MatchupCount`] if the result is not 84 games
pub fn generate_schedule(config: &LeagueConfig) -> Result<Schedule> {
    generate_schedule_with(config, &mut GenerateOptions::new())
}

/// Generates a season with explicit options.
pub fn generate_schedule_with<S: Shuffle>(
    config: &LeagueConfig,
    options: &mut GenerateOptions<S>,
) -> Result<Schedule> {
    let (mut weeks, tally) = round_robin(config, HomeTally::new());

    let boundary = weeks.last().map(Week::pairs).unwrap_or_default();
    let (second_round, tally) = place_second_round(
        config,
        &boundary,
        tally,
        &mut options.shuffle,
        &options.policy,
    )?;
    weeks.extend(second_round);

    let tally = balance_home_away(
        &mut weeks,
        tally,
        HOME_GAMES_PER_TEAM,
        options.balance_iterations,
    );
    let home_games = tally.off_target(HOME_GAMES_PER_TEAM);
    if !home_games.is_empty() {
        return Err(ScheduleError::Unbalanced { home_games });
    }

    let schedule = Schedule::from_weeks(weeks);
    let found = schedule.match_up_count();
    if found != SEASON_MATCH_UPS {
        return Err(ScheduleError::MatchupCount { found });
    }

    Ok(schedule)
}

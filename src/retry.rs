//! Retry wrapper around schedule generation.
//!
//! Generation is randomized and may fail (placement exhaustion, imperfect
//! home/away repair). The wrapper runs attempts one after another, each
//! with a perturbed configuration:
//!
//! | Attempt | Configuration |
//! |---------|---------------|
//! | 0 | Divisions and rivalry pairing as given |
//! | odd | Team order shuffled within each division, computed rivalries |
//! | even | Divisions as given, random rivalry matching |
//!
//! Callers holding only a [`DivisionAssignment`] get computed rivalries on
//! attempt 0; callers with a full [`LeagueConfig`] keep their pairing there.
//!
//! Between attempts an [`AttemptPolicy`] decides whether to go on and how
//! to pause. The pause is the only suspension point; attempts never
//! overlap and share nothing but the base configuration. There is no
//! cancellation: a caller that loses interest drops the future.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::{Result, ScheduleError};
use crate::generator::generate_schedule;
use crate::models::{DivisionAssignment, LeagueConfig, Schedule};

/// Attempt budget of the default policy.
pub const MAX_GENERATION_RETRIES: usize = 150;

/// How to suspend before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pause {
    /// Retry immediately.
    None,
    /// Yield once to the async scheduler.
    #[default]
    Yield,
    /// Sleep for a fixed duration.
    Sleep(Duration),
}

impl Pause {
    async fn wait(self) {
        match self {
            Pause::None => {}
            Pause::Yield => tokio::task::yield_now().await,
            Pause::Sleep(duration) => tokio::time::sleep(duration).await,
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDecision {
    /// Pause, then run another attempt.
    Retry(Pause),
    /// Stop and report failure.
    GiveUp,
}

/// Decides, after each failed attempt, whether to keep going.
pub trait AttemptPolicy {
    /// Called with the zero-based index of the attempt that just failed.
    fn after_failure(&self, attempt: usize) -> AttemptDecision;
}

/// A fixed number of attempts with the same pause between each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedAttempts {
    /// Maximum attempts, including the first.
    pub max_attempts: usize,
    /// Pause between attempts.
    pub pause: Pause,
}

impl BoundedAttempts {
    /// `max_attempts` attempts, yielding between them.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            pause: Pause::Yield,
        }
    }

    /// Sets the pause.
    pub fn with_pause(mut self, pause: Pause) -> Self {
        self.pause = pause;
        self
    }
}

impl Default for BoundedAttempts {
    fn default() -> Self {
        Self::new(MAX_GENERATION_RETRIES)
    }
}

impl AttemptPolicy for BoundedAttempts {
    fn after_failure(&self, attempt: usize) -> AttemptDecision {
        if attempt + 1 < self.max_attempts {
            AttemptDecision::Retry(self.pause)
        } else {
            AttemptDecision::GiveUp
        }
    }
}

/// Generates a season from `assignment` with the default policy.
///
/// # Errors
/// [`ScheduleError::InvalidConfig`] at once for an incomplete or malformed
/// assignment; otherwise the last attempt's error, or
/// [`ScheduleError::RetriesExhausted`] if no attempt recorded one.
pub async fn generate_schedule_with_retry(assignment: &DivisionAssignment) -> Result<Schedule> {
    generate_schedule_with_policy(assignment, &BoundedAttempts::default()).await
}

/// Generates a season from `assignment`, retrying as `policy` allows.
pub async fn generate_schedule_with_policy<P: AttemptPolicy + ?Sized>(
    assignment: &DivisionAssignment,
    policy: &P,
) -> Result<Schedule> {
    assignment.validate().map_err(ScheduleError::InvalidConfig)?;
    let config = assignment.to_league_config()?;
    retry_generation(&config, policy, generate_schedule).await
}

/// Generates a season from a full configuration with the default policy.
///
/// The first attempt uses `config` exactly, rivalry pairing included.
pub async fn generate_league_with_retry(config: &LeagueConfig) -> Result<Schedule> {
    generate_league_with_policy(config, &BoundedAttempts::default()).await
}

/// Generates a season from a full configuration, retrying as `policy` allows.
pub async fn generate_league_with_policy<P: AttemptPolicy + ?Sized>(
    config: &LeagueConfig,
    policy: &P,
) -> Result<Schedule> {
    retry_generation(config, policy, generate_schedule).await
}

/// Runs `generate` on perturbations of `base` until one yields a
/// structurally valid season or `policy` gives up.
///
/// `generate` is the single-attempt engine, normally
/// [`generate_schedule`]; any closure over
/// [`generate_schedule_with`](crate::generator::generate_schedule_with)
/// works too.
pub async fn retry_generation<P, F>(base: &LeagueConfig, policy: &P, mut generate: F) -> Result<Schedule>
where
    P: AttemptPolicy + ?Sized,
    F: FnMut(&LeagueConfig) -> Result<Schedule>,
{
    let mut rng = StdRng::from_os_rng();
    let mut last_error: Option<ScheduleError> = None;
    let mut attempt = 0;

    loop {
        let outcome = attempt_config(base, attempt, &mut rng).and_then(|config| generate(&config));

        match outcome {
            Ok(schedule) if schedule.is_structurally_valid() => {
                info!(attempt = attempt + 1, "schedule generated");
                return Ok(schedule);
            }
            Ok(schedule) => {
                debug!(
                    attempt = attempt + 1,
                    weeks = schedule.week_count(),
                    "discarding malformed schedule"
                );
            }
            Err(err) => {
                debug!(attempt = attempt + 1, error = %err, "generation attempt failed");
                last_error = Some(err);
            }
        }

        match policy.after_failure(attempt) {
            AttemptDecision::Retry(pause) => pause.wait().await,
            AttemptDecision::GiveUp => break,
        }
        attempt += 1;
    }

    let attempts = attempt + 1;
    warn!(attempts, "schedule generation gave up");
    Err(last_error.unwrap_or(ScheduleError::RetriesExhausted { attempts }))
}

/// Configuration for the given attempt index.
fn attempt_config(base: &LeagueConfig, attempt: usize, rng: &mut StdRng) -> Result<LeagueConfig> {
    if attempt == 0 {
        Ok(base.clone())
    } else if attempt % 2 == 1 {
        DivisionAssignment::from(base)
            .shuffled_team_order(rng)
            .to_league_config()
    } else {
        LeagueConfig::with_random_rivalries(base.divisions().to_vec(), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_schedule_with, GenerateOptions, ReverseOrder};
    use crate::models::{compute_rivalry_pairs, Pair, RivalryPair, Team};
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use Team::*;

    fn default_assignment() -> DivisionAssignment {
        DivisionAssignment::from(&LeagueConfig::default())
    }

    /// Default divisions with a rivalry pairing the computation never picks.
    fn crossed_rivals() -> LeagueConfig {
        let base = LeagueConfig::default();
        let rivals = [(A, E), (B, F), (C, D), (G, K), (H, L), (I, J)]
            .into_iter()
            .map(|(a, b)| RivalryPair::new(a, b))
            .collect();
        LeagueConfig::new(base.divisions().to_vec(), rivals).unwrap()
    }

    fn rival_set(pairs: &[RivalryPair]) -> BTreeSet<Pair> {
        pairs.iter().map(RivalryPair::pair).collect()
    }

    /// Counts decisions and never allows a retry.
    struct CountingGiveUp {
        calls: Cell<usize>,
    }

    impl AttemptPolicy for CountingGiveUp {
        fn after_failure(&self, _attempt: usize) -> AttemptDecision {
            self.calls.set(self.calls.get() + 1);
            AttemptDecision::GiveUp
        }
    }

    #[test]
    fn test_bounded_attempts_decisions() {
        let policy = BoundedAttempts::new(3).with_pause(Pause::None);
        assert_eq!(policy.after_failure(0), AttemptDecision::Retry(Pause::None));
        assert_eq!(policy.after_failure(1), AttemptDecision::Retry(Pause::None));
        assert_eq!(policy.after_failure(2), AttemptDecision::GiveUp);
        assert_eq!(BoundedAttempts::default().max_attempts, 150);
    }

    #[test]
    fn test_attempt_configs_keep_divisions() {
        let base = LeagueConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        for attempt in 0..6 {
            let config = attempt_config(&base, attempt, &mut rng).unwrap();
            for (expected, actual) in base.divisions().iter().zip(config.divisions()) {
                let mut expected = expected.teams().to_vec();
                let mut actual = actual.teams().to_vec();
                expected.sort();
                actual.sort();
                assert_eq!(expected, actual);
            }
        }
    }

    #[test]
    fn test_attempt_zero_keeps_configured_rivals() {
        let base = crossed_rivals();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(attempt_config(&base, 0, &mut rng).unwrap(), base);
    }

    #[test]
    fn test_odd_attempts_compute_rivals_even_attempts_draw_them() {
        let base = crossed_rivals();
        let computed = rival_set(&compute_rivalry_pairs(base.divisions()));
        let mut rng = StdRng::seed_from_u64(11);

        let mut even_differs = false;
        for attempt in 1..=20 {
            let config = attempt_config(&base, attempt, &mut rng).unwrap();
            if attempt % 2 == 1 {
                assert_eq!(
                    config.rivalry_pairs(),
                    compute_rivalry_pairs(config.divisions()).as_slice()
                );
            } else {
                assert_eq!(config.divisions(), base.divisions());
                even_differs |= rival_set(config.rivalry_pairs()) != computed;
            }
        }
        assert!(even_differs);
    }

    #[tokio::test]
    async fn test_configured_rivals_meet_twice() {
        let config = crossed_rivals();
        let policy = BoundedAttempts::new(1);
        let mut produced = None;
        for _ in 0..50 {
            match generate_league_with_policy(&config, &policy).await {
                Ok(schedule) => {
                    produced = Some(schedule);
                    break;
                }
                Err(err) => assert!(err.is_retryable(), "{err}"),
            }
        }
        let schedule = produced.unwrap();
        for r in config.rivalry_pairs() {
            assert_eq!(schedule.meetings(r.a, r.b), 2, "{}", r.pair());
        }
        assert_eq!(schedule.meetings(A, D), 1);
    }

    #[tokio::test]
    async fn test_retry_default_divisions() {
        let policy = BoundedAttempts::default().with_pause(Pause::None);
        let schedule = generate_schedule_with_policy(&default_assignment(), &policy)
            .await
            .unwrap();
        assert!(schedule.is_structurally_valid());
        assert_eq!(schedule.match_up_count(), 84);
    }

    #[tokio::test]
    async fn test_retry_with_yield() {
        let schedule = generate_schedule_with_retry(&default_assignment()).await.unwrap();
        assert_eq!(schedule.week_count(), 14);
    }

    #[tokio::test]
    async fn test_invalid_assignment_fails_before_attempts() {
        let assignment = DivisionAssignment::new(vec![
            vec![A, B],
            vec![C, D, E],
            vec![F, G, H],
            vec![I, J, K],
        ]);
        let policy = CountingGiveUp { calls: Cell::new(0) };
        let err = generate_schedule_with_policy(&assignment, &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
        assert_eq!(policy.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_reverse_order_engine_exhausts() {
        // Attempt 0 runs the default league, which reverse ordering can
        // never place.
        let policy = BoundedAttempts::new(1).with_pause(Pause::None);
        let err = retry_generation(&LeagueConfig::default(), &policy, |config| {
            generate_schedule_with(config, &mut GenerateOptions::new().with_shuffle(ReverseOrder))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ScheduleError::PlacementExhausted { .. }));
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let policy = BoundedAttempts::new(2).with_pause(Pause::None);
        let mut calls = 0;
        let err = retry_generation(&LeagueConfig::default(), &policy, |_| {
            calls += 1;
            if calls == 1 {
                Err(ScheduleError::PlacementExhausted { attempts: 1350 })
            } else {
                Err(ScheduleError::MatchupCount { found: 83 })
            }
        })
        .await
        .unwrap_err();
        assert_eq!(calls, 2);
        assert!(matches!(err, ScheduleError::MatchupCount { found: 83 }));
    }

    #[tokio::test]
    async fn test_malformed_schedules_exhaust_retries() {
        let policy = BoundedAttempts::new(3).with_pause(Pause::None);
        let mut calls = 0;
        let err = retry_generation(&LeagueConfig::default(), &policy, |_| {
            calls += 1;
            Ok(Schedule::default())
        })
        .await
        .unwrap_err();
        assert_eq!(calls, 3);
        assert!(matches!(err, ScheduleError::RetriesExhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_sleep_pause() {
        let policy = BoundedAttempts::new(2).with_pause(Pause::Sleep(Duration::from_millis(1)));
        let result = generate_schedule_with_policy(&default_assignment(), &policy).await;
        assert!(result.is_ok());
    }
}

//! Season-level properties of generated schedules.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use u_season::audit::{SeasonAudit, ViolationType};
use u_season::config::LeagueFile;
use u_season::generator::{
    generate_schedule, generate_schedule_with, GenerateOptions, ReverseOrder, ROUND_ROBIN_WEEKS,
};
use u_season::models::{DivisionAssignment, LeagueConfig, Pair, Team};
use u_season::retry::{
    generate_league_with_policy, generate_schedule_with_policy, BoundedAttempts, Pause,
};
use u_season::ScheduleError;

#[test]
fn test_default_config_shape() {
    let schedule = generate_schedule(&LeagueConfig::default()).unwrap();
    assert_eq!(schedule.week_count(), 14);
    assert_eq!(schedule.match_up_count(), 84);
    for week in schedule.weeks() {
        assert_eq!(week.len(), 6);
        let teams: HashSet<Team> = week.team_slots().collect();
        assert_eq!(teams.len(), 12);
    }
}

#[test]
fn test_reverse_ordering_reports_placement_failure() {
    let mut options = GenerateOptions::new().with_shuffle(ReverseOrder);
    let err = generate_schedule_with(&LeagueConfig::default(), &mut options).unwrap_err();
    assert!(matches!(err, ScheduleError::PlacementExhausted { .. }));
    assert!(err.to_string().contains("weeks 12–14"));
    assert!(err.is_retryable());
}

#[test]
fn test_hundred_runs_without_violations() {
    let config = LeagueConfig::default();
    for run in 0..100 {
        let schedule = generate_schedule(&config).unwrap();
        let audit = SeasonAudit::calculate(&schedule, &config);
        assert!(audit.is_valid(), "run {run}: {:?}", audit.violations);
    }
}

#[test]
fn test_meeting_counts() {
    let config = LeagueConfig::default();
    let schedule = generate_schedule_with(&config, &mut GenerateOptions::seeded(21)).unwrap();
    for pair in Pair::all() {
        let (a, b) = (pair.lo(), pair.hi());
        let expected = if config.is_divisional(a, b) || config.is_rivalry(a, b) {
            2
        } else {
            1
        };
        assert_eq!(schedule.meetings(a, b), expected, "{pair}");
    }
}

#[test]
fn test_flags_follow_config() {
    let config = LeagueConfig::default();
    let schedule = generate_schedule(&config).unwrap();
    for m in schedule.match_ups() {
        assert_eq!(m.is_divisional, config.is_divisional(m.home, m.away));
        assert_eq!(m.is_rivalry, config.is_rivalry(m.home, m.away));
    }
    let rivalry_games = schedule.match_ups().filter(|m| m.is_rivalry).count();
    let divisional_games = schedule.match_ups().filter(|m| m.is_divisional).count();
    assert_eq!(rivalry_games, 12);
    assert_eq!(divisional_games, 24);
}

#[test]
fn test_rematches_follow_round_robin() {
    let schedule = generate_schedule(&LeagueConfig::default()).unwrap();
    let first_round: HashSet<Pair> = schedule.weeks()[..ROUND_ROBIN_WEEKS]
        .iter()
        .flat_map(|w| w.pairs())
        .collect();
    assert_eq!(first_round.len(), 66);
    for week in &schedule.weeks()[ROUND_ROBIN_WEEKS..] {
        for m in &week.match_ups {
            assert!(m.is_divisional || m.is_rivalry);
        }
    }
}

#[test]
fn test_random_divisions_seeded_runs_audit_clean() {
    // Some random partitions cannot be balanced in one attempt; every
    // schedule that is returned must still pass the audit.
    let mut produced = 0;
    for seed in 0..40 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = DivisionAssignment::random(&mut rng).to_league_config().unwrap();
        match generate_schedule_with(&config, &mut GenerateOptions::seeded(seed)) {
            Ok(schedule) => {
                produced += 1;
                let audit = SeasonAudit::calculate(&schedule, &config);
                assert!(audit.is_valid(), "seed {seed}: {:?}", audit.violations);
            }
            Err(err) => assert!(err.is_retryable(), "seed {seed}: {err}"),
        }
    }
    assert!(produced > 0);
}

#[tokio::test]
async fn test_retry_wrapper_fifty_trials() {
    let assignment = DivisionAssignment::from(&LeagueConfig::default());
    let policy = BoundedAttempts::default().with_pause(Pause::None);
    for trial in 0..50 {
        let schedule = generate_schedule_with_policy(&assignment, &policy)
            .await
            .unwrap_or_else(|e| panic!("trial {trial}: {e}"));
        assert_eq!(schedule.week_count(), 14);
        assert_eq!(schedule.match_up_count(), 84);
    }
}

#[tokio::test]
async fn test_retry_wrapper_random_divisions() {
    let policy = BoundedAttempts::default().with_pause(Pause::None);
    for seed in 0..10 {
        let assignment = DivisionAssignment::random(&mut SmallRng::seed_from_u64(seed));
        let schedule = generate_schedule_with_policy(&assignment, &policy)
            .await
            .unwrap();
        // Divisions never change between attempts, so divisional flags can
        // be checked against the assignment directly.
        let divisions = assignment.to_divisions().unwrap();
        for m in schedule.match_ups() {
            let same = divisions
                .iter()
                .any(|d| d.contains(m.home) && d.contains(m.away));
            assert_eq!(m.is_divisional, same);
        }
        for team in Team::ALL {
            assert_eq!(schedule.home_games(team), 7);
        }
    }
}

#[tokio::test]
async fn test_two_team_division_rejected_before_generation() {
    use Team::*;
    let assignment = DivisionAssignment::new(vec![
        vec![A, B],
        vec![C, D, E],
        vec![F, G, H],
        vec![I, J, K, L],
    ]);
    assert!(!assignment.is_complete());
    let err = generate_schedule_with_policy(&assignment, &BoundedAttempts::new(1))
        .await
        .unwrap_err();
    match err {
        ScheduleError::InvalidConfig(errors) => assert!(!errors.is_empty()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_audit_flags_missing_rivalry_games_for_other_config() {
    // Audited against a configuration it was not built for, a season shows
    // rivalry and flag violations.
    use Team::*;
    let schedule = generate_schedule(&LeagueConfig::default()).unwrap();
    let other = LeagueConfig::with_computed_rivalries(vec![
        u_season::models::Division::new(A, E, I),
        u_season::models::Division::new(B, F, J),
        u_season::models::Division::new(C, G, K),
        u_season::models::Division::new(D, H, L),
    ])
    .unwrap();
    let audit = SeasonAudit::calculate(&schedule, &other);
    assert!(!audit.is_valid());
    assert!(!audit.violations_of(ViolationType::FlagMismatch).is_empty());
}

#[tokio::test]
async fn test_league_file_rivalries_drive_first_attempt() {
    let file = LeagueFile::from_toml_str(
        r#"
rivalries = [["A", "E"], ["B", "F"], ["C", "D"], ["G", "K"], ["H", "L"], ["I", "J"]]

[[divisions]]
teams = ["A", "B", "C"]
[[divisions]]
teams = ["D", "E", "F"]
[[divisions]]
teams = ["G", "H", "I"]
[[divisions]]
teams = ["J", "K", "L"]
"#,
    )
    .unwrap();
    let config = file.league_config().unwrap();

    // A single attempt can only use the configured pairing.
    let policy = BoundedAttempts::new(1).with_pause(Pause::None);
    let mut schedule = None;
    for _ in 0..50 {
        if let Ok(s) = generate_league_with_policy(&config, &policy).await {
            schedule = Some(s);
            break;
        }
    }
    let schedule = schedule.unwrap();
    assert_eq!(schedule.meetings(Team::A, Team::E), 2);
    assert_eq!(schedule.meetings(Team::A, Team::D), 1);
    assert!(SeasonAudit::calculate(&schedule, &config).is_valid());
}

//! Season audit: checks a schedule against every season invariant.
//!
//! Computes per-team home/away counts and per-pair meeting counts, and
//! lists every violated rule.
//!
//! # Rules
//!
//! | Rule | Requirement |
//! |------|-------------|
//! | Shape | 14 weeks, 6 games each |
//! | One game per week | Each team appears once per week |
//! | Coverage | Every pair meets at least once, at most twice |
//! | Divisional rematch | Division mates meet exactly twice |
//! | Rivalry rematch | Rivals meet exactly twice |
//! | Home/away | 7 home and 7 away per team |
//! | Rivalry game | Each team has a rivalry game outside its division |
//! | No back-to-back | No pair plays in consecutive weeks |
//! | Flags | `is_divisional` / `is_rivalry` match the configuration |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::generator::HOME_GAMES_PER_TEAM;
use crate::models::{LeagueConfig, Pair, Schedule, Team, MATCH_UPS_PER_WEEK, WEEK_COUNT};

/// A broken season rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that was broken.
    pub kind: ViolationType,
    /// Human-readable description.
    pub message: String,
}

/// Classification of season rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Not exactly 14 weeks.
    WeekCount,
    /// A week without exactly 6 games.
    WeekSize,
    /// A team plays twice in one week.
    DoubleBooked,
    /// A pair never meets.
    PairMissing,
    /// A pair meets more than twice.
    PairOverplayed,
    /// Division mates do not meet exactly twice.
    DivisionalRematchMissing,
    /// Rivals do not meet exactly twice.
    RivalryRematchMissing,
    /// A team does not have 7 home and 7 away games.
    HomeAwayImbalance,
    /// A team has no rivalry game.
    MissingRivalryGame,
    /// A pair plays in consecutive weeks.
    BackToBack,
    /// A game's flags disagree with the configuration.
    FlagMismatch,
}

impl Violation {
    fn new(kind: ViolationType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of auditing a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonAudit {
    /// Home games per team.
    pub home_games: BTreeMap<Team, usize>,
    /// Away games per team.
    pub away_games: BTreeMap<Team, usize>,
    /// Meetings per unordered pair (all 66 pairs present).
    pub meetings: BTreeMap<Pair, usize>,
    /// Every broken rule.
    pub violations: Vec<Violation>,
}

impl SeasonAudit {
    /// Audits `schedule` against `config`.
    pub fn calculate(schedule: &Schedule, config: &LeagueConfig) -> Self {
        let mut violations = Vec::new();
        let mut home_games: BTreeMap<Team, usize> = Team::ALL.iter().map(|&t| (t, 0)).collect();
        let mut away_games = home_games.clone();
        let mut meetings: BTreeMap<Pair, usize> = Pair::all().map(|p| (p, 0)).collect();

        if schedule.week_count() != WEEK_COUNT {
            violations.push(Violation::new(
                ViolationType::WeekCount,
                format!("Expected {WEEK_COUNT} weeks, got {}", schedule.week_count()),
            ));
        }

        for (w, week) in schedule.weeks().iter().enumerate() {
            if week.len() != MATCH_UPS_PER_WEEK {
                violations.push(Violation::new(
                    ViolationType::WeekSize,
                    format!("Week {} has {} games", w + 1, week.len()),
                ));
            }

            let mut seen = HashSet::new();
            for team in week.team_slots() {
                if !seen.insert(team) {
                    violations.push(Violation::new(
                        ViolationType::DoubleBooked,
                        format!("Team {team} plays twice in week {}", w + 1),
                    ));
                }
            }

            for m in &week.match_ups {
                *home_games.entry(m.home).or_insert(0) += 1;
                *away_games.entry(m.away).or_insert(0) += 1;
                *meetings.entry(m.pair()).or_insert(0) += 1;

                let divisional = config.is_divisional(m.home, m.away);
                let rivalry = config.is_rivalry(m.home, m.away);
                if m.is_divisional != divisional || m.is_rivalry != rivalry {
                    violations.push(Violation::new(
                        ViolationType::FlagMismatch,
                        format!("Week {} game {} has wrong flags", w + 1, m.pair()),
                    ));
                }
            }
        }

        for (&pair, &count) in &meetings {
            let (a, b) = (pair.lo(), pair.hi());
            if count == 0 {
                violations.push(Violation::new(
                    ViolationType::PairMissing,
                    format!("{pair} never meet"),
                ));
            } else if count > 2 {
                violations.push(Violation::new(
                    ViolationType::PairOverplayed,
                    format!("{pair} meet {count} times"),
                ));
            }
            if config.is_divisional(a, b) && count != 2 {
                violations.push(Violation::new(
                    ViolationType::DivisionalRematchMissing,
                    format!("Division mates {pair} meet {count} times"),
                ));
            }
            if config.is_rivalry(a, b) && count != 2 {
                violations.push(Violation::new(
                    ViolationType::RivalryRematchMissing,
                    format!("Rivals {pair} meet {count} times"),
                ));
            }
        }

        for team in Team::ALL {
            let home = home_games.get(&team).copied().unwrap_or(0);
            let away = away_games.get(&team).copied().unwrap_or(0);
            if home != HOME_GAMES_PER_TEAM || away != HOME_GAMES_PER_TEAM {
                violations.push(Violation::new(
                    ViolationType::HomeAwayImbalance,
                    format!("Team {team} has {home} home and {away} away games"),
                ));
            }

            let division = config.division_of(team);
            let has_rivalry_game = schedule.match_ups().any(|m| {
                m.is_rivalry && m.opponent_of(team).is_some_and(|o| !division.contains(o))
            });
            if !has_rivalry_game {
                violations.push(Violation::new(
                    ViolationType::MissingRivalryGame,
                    format!("Team {team} has no rivalry game"),
                ));
            }
        }

        for (w, pair) in schedule.weeks().windows(2).enumerate() {
            let repeated: Vec<Pair> = pair[0].pairs().intersection(&pair[1].pairs()).copied().collect();
            for p in repeated {
                violations.push(Violation::new(
                    ViolationType::BackToBack,
                    format!("{p} meet in weeks {} and {}", w + 1, w + 2),
                ));
            }
        }

        Self {
            home_games,
            away_games,
            meetings,
            violations,
        }
    }

    /// Whether the season breaks no rule.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of one kind.
    pub fn violations_of(&self, kind: ViolationType) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }
}

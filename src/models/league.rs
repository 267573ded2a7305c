//! League structure: divisions, rivalry pairs, and the validated configuration.
//!
//! A [`LeagueConfig`] is the only input the schedule generator needs. It is
//! built once per generation request and never mutated afterwards. Building
//! one from external input (e.g. an interactively edited
//! [`DivisionAssignment`](super::DivisionAssignment)) validates that the
//! divisions partition the league and that the rivalry pairs form a perfect
//! cross-division matching.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Pair, Team, TEAM_COUNT};
use crate::error::{Result, ScheduleError};
use crate::validation::validate_league;

/// Number of divisions in the league.
pub const DIVISION_COUNT: usize = 4;

/// Number of teams per division.
pub const DIVISION_SIZE: usize = 3;

/// A division: exactly three teams that meet each other twice per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Division {
    teams: [Team; DIVISION_SIZE],
}

impl Division {
    /// Creates a division from three teams.
    ///
    /// Distinctness is checked when the division becomes part of a
    /// [`LeagueConfig`].
    pub fn new(a: Team, b: Team, c: Team) -> Self {
        Self { teams: [a, b, c] }
    }

    /// Member teams in assignment order.
    pub fn teams(&self) -> &[Team; DIVISION_SIZE] {
        &self.teams
    }

    /// Whether `team` belongs to this division.
    pub fn contains(&self, team: Team) -> bool {
        self.teams.contains(&team)
    }

    /// The three intra-division pairs: (0,1), (0,2), (1,2).
    pub fn pairs(&self) -> [Pair; 3] {
        let [a, b, c] = self.teams;
        [Pair::new(a, b), Pair::new(a, c), Pair::new(b, c)]
    }
}

impl TryFrom<&[Team]> for Division {
    type Error = ScheduleError;

    fn try_from(teams: &[Team]) -> Result<Self> {
        match teams {
            [a, b, c] => Ok(Division::new(*a, *b, *c)),
            _ => Err(ScheduleError::invalid(
                crate::validation::ValidationErrorKind::DivisionSize,
                format!(
                    "Division must have {DIVISION_SIZE} teams, got {}",
                    teams.len()
                ),
            )),
        }
    }
}

/// Two teams from different divisions that meet twice per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RivalryPair {
    /// First team.
    pub a: Team,
    /// Second team.
    pub b: Team,
}

impl RivalryPair {
    /// Creates a rivalry pair.
    pub fn new(a: Team, b: Team) -> Self {
        Self { a, b }
    }

    /// The unordered pair.
    pub fn pair(&self) -> Pair {
        Pair::new(self.a, self.b)
    }
}

/// Validated league configuration.
///
/// # Invariants
/// - Four divisions of three teams partition all twelve teams.
/// - Rivalry pairs are a perfect matching of all twelve teams, and no pair
///   lies within a single division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueConfig {
    divisions: Vec<Division>,
    rivalry_pairs: Vec<RivalryPair>,
    #[serde(skip)]
    division_of: [usize; TEAM_COUNT],
}

impl LeagueConfig {
    /// Builds a configuration, failing with every detected problem.
    pub fn new(divisions: Vec<Division>, rivalry_pairs: Vec<RivalryPair>) -> Result<Self> {
        validate_league(&divisions, &rivalry_pairs).map_err(ScheduleError::InvalidConfig)?;

        let division_of = division_lookup(&divisions);
        Ok(Self {
            divisions,
            rivalry_pairs,
            division_of,
        })
    }

    /// Builds a configuration whose rivalries are computed by
    /// [`compute_rivalry_pairs`].
    pub fn with_computed_rivalries(divisions: Vec<Division>) -> Result<Self> {
        let rivalry_pairs = compute_rivalry_pairs(&divisions);
        Self::new(divisions, rivalry_pairs)
    }

    /// Builds a configuration with a random cross-division rivalry matching.
    pub fn with_random_rivalries<R: Rng + ?Sized>(
        divisions: Vec<Division>,
        rng: &mut R,
    ) -> Result<Self> {
        let rivalry_pairs = random_rivalry_pairs(&divisions, rng);
        Self::new(divisions, rivalry_pairs)
    }

    /// The four divisions, in configuration order.
    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    /// The six rivalry pairs, in configuration order.
    pub fn rivalry_pairs(&self) -> &[RivalryPair] {
        &self.rivalry_pairs
    }

    /// Index of the division containing `team`.
    #[inline]
    pub fn division_index(&self, team: Team) -> usize {
        self.division_of[team.index()]
    }

    /// The division containing `team`.
    pub fn division_of(&self, team: Team) -> &Division {
        &self.divisions[self.division_index(team)]
    }

    /// Whether both teams share a division.
    #[inline]
    pub fn is_divisional(&self, a: Team, b: Team) -> bool {
        self.division_index(a) == self.division_index(b)
    }

    /// Whether the pair is a rivalry pair and not divisional.
    ///
    /// Divisional status always takes precedence.
    pub fn is_rivalry(&self, a: Team, b: Team) -> bool {
        let pair = Pair::new(a, b);
        !self.is_divisional(a, b) && self.rivalry_pairs.iter().any(|r| r.pair() == pair)
    }

    /// The rival of `team`.
    pub fn rival_of(&self, team: Team) -> Option<Team> {
        self.rivalry_pairs.iter().find_map(|r| {
            if r.a == team {
                Some(r.b)
            } else if r.b == team {
                Some(r.a)
            } else {
                None
            }
        })
    }
}

impl Default for LeagueConfig {
    /// Divisions `[A,B,C] [D,E,F] [G,H,I] [J,K,L]`, rivalries
    /// `A-D B-E C-F G-J H-K I-L`.
    fn default() -> Self {
        use Team::*;
        let divisions = vec![
            Division::new(A, B, C),
            Division::new(D, E, F),
            Division::new(G, H, I),
            Division::new(J, K, L),
        ];
        let rivalry_pairs = vec![
            RivalryPair::new(A, D),
            RivalryPair::new(B, E),
            RivalryPair::new(C, F),
            RivalryPair::new(G, J),
            RivalryPair::new(H, K),
            RivalryPair::new(I, L),
        ];
        let division_of = division_lookup(&divisions);
        Self {
            divisions,
            rivalry_pairs,
            division_of,
        }
    }
}

fn division_lookup(divisions: &[Division]) -> [usize; TEAM_COUNT] {
    let mut division_of = [0usize; TEAM_COUNT];
    for (i, division) in divisions.iter().enumerate() {
        for team in division.teams() {
            division_of[team.index()] = i;
        }
    }
    division_of
}

/// Computes one cross-division rival per team, deterministically.
///
/// Teams are visited in canonical order; each unmatched team takes the
/// first free team of the earliest other division, backtracking only when
/// that choice would leave some team without a partner. For the default
/// divisions this yields `A-D B-E C-F G-J H-K I-L`.
///
/// Returns a partial matching only when `divisions` is not a valid
/// partition, which [`LeagueConfig::new`] then rejects.
pub fn compute_rivalry_pairs(divisions: &[Division]) -> Vec<RivalryPair> {
    let partners: Vec<Team> = divisions.iter().flat_map(|d| d.teams().iter().copied()).collect();
    match_rivals(divisions, &Team::ALL, &partners)
}

/// Draws a random cross-division perfect matching.
pub fn random_rivalry_pairs<R: Rng + ?Sized>(divisions: &[Division], rng: &mut R) -> Vec<RivalryPair> {
    let mut order: Vec<Team> = Team::ALL.to_vec();
    order.shuffle(rng);
    let mut partners = order.clone();
    partners.shuffle(rng);
    match_rivals(divisions, &order, &partners)
}

fn match_rivals(divisions: &[Division], order: &[Team], partners: &[Team]) -> Vec<RivalryPair> {
    let mut division_of: [Option<usize>; TEAM_COUNT] = [None; TEAM_COUNT];
    for (i, division) in divisions.iter().enumerate() {
        for team in division.teams() {
            division_of[team.index()] = Some(i);
        }
    }

    let mut used = [false; TEAM_COUNT];
    let mut pairs = Vec::with_capacity(TEAM_COUNT / 2);
    if extend_matching(&division_of, order, partners, &mut used, &mut pairs) {
        return pairs;
    }

    // No perfect matching: fall back to the greedy partial one.
    used = [false; TEAM_COUNT];
    pairs.clear();
    for &team in order {
        let Some(own) = division_of[team.index()] else {
            continue;
        };
        if used[team.index()] {
            continue;
        }
        if let Some(&other) = partners.iter().find(|p| {
            !used[p.index()] && division_of[p.index()].is_some_and(|d| d != own)
        }) {
            used[team.index()] = true;
            used[other.index()] = true;
            pairs.push(RivalryPair::new(team, other));
        }
    }
    pairs
}

fn extend_matching(
    division_of: &[Option<usize>; TEAM_COUNT],
    order: &[Team],
    partners: &[Team],
    used: &mut [bool; TEAM_COUNT],
    pairs: &mut Vec<RivalryPair>,
) -> bool {
    let next = order
        .iter()
        .copied()
        .find(|t| !used[t.index()] && division_of[t.index()].is_some());
    let Some(team) = next else {
        return pairs.len() * 2 == TEAM_COUNT;
    };
    let Some(own) = division_of[team.index()] else {
        return false;
    };

    used[team.index()] = true;
    for &other in partners {
        let eligible = !used[other.index()] && division_of[other.index()].is_some_and(|d| d != own);
        if !eligible {
            continue;
        }
        used[other.index()] = true;
        pairs.push(RivalryPair::new(team, other));
        if extend_matching(division_of, order, partners, used, pairs) {
            return true;
        }
        pairs.pop();
        used[other.index()] = false;
    }
    used[team.index()] = false;
    false
}

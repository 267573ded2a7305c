//! Team identifiers and unordered team pairs.
//!
//! The league is fixed at twelve teams, identified by the letters `A`–`L`.
//! Teams carry no attributes beyond identity; display names live outside
//! the engine (see [`TeamNames`](crate::config::TeamNames)).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of teams in the league.
pub const TEAM_COUNT: usize = 12;

/// One of the twelve league teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
}

impl Team {
    /// All teams in canonical order.
    pub const ALL: [Team; TEAM_COUNT] = [
        Team::A,
        Team::B,
        Team::C,
        Team::D,
        Team::E,
        Team::F,
        Team::G,
        Team::H,
        Team::I,
        Team::J,
        Team::K,
        Team::L,
    ];

    /// Position of this team in [`Team::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter code.
    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Error returned when a string does not name a team.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown team '{0}' (expected a letter A-L)")]
pub struct ParseTeamError(pub String);

impl FromStr for Team {
    type Err = ParseTeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                let upper = c.to_ascii_uppercase();
                Team::ALL
                    .iter()
                    .copied()
                    .find(|t| t.letter() == upper)
                    .ok_or_else(|| ParseTeamError(s.to_string()))
            }
            _ => Err(ParseTeamError(s.to_string())),
        }
    }
}

/// An unordered pair of two distinct teams.
///
/// Normalised so that `lo < hi`; `Pair::new(a, b) == Pair::new(b, a)`.
/// Serialised as `"A-B"` so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pair {
    lo: Team,
    hi: Team,
}

impl Pair {
    /// Creates a normalised pair.
    pub fn new(a: Team, b: Team) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The lower team (canonical order).
    pub fn lo(&self) -> Team {
        self.lo
    }

    /// The higher team (canonical order).
    pub fn hi(&self) -> Team {
        self.hi
    }

    /// Whether `team` is one of the two.
    pub fn contains(&self, team: Team) -> bool {
        self.lo == team || self.hi == team
    }

    /// All 66 unordered pairs of the league, in canonical order.
    pub fn all() -> impl Iterator<Item = Pair> {
        Team::ALL.iter().enumerate().flat_map(|(i, &a)| {
            Team::ALL[i + 1..].iter().map(move |&b| Pair::new(a, b))
        })
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

impl From<Pair> for String {
    fn from(pair: Pair) -> Self {
        pair.to_string()
    }
}

impl TryFrom<String> for Pair {
    type Error = ParseTeamError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (a, b) = s.split_once('-').ok_or_else(|| ParseTeamError(s.clone()))?;
        Ok(Pair::new(a.parse()?, b.parse()?))
    }
}

//! League files and team display names.
//!
//! A league file is TOML:
//!
//! ```toml
//! rivalries = [["A", "D"], ["B", "E"], ["C", "F"], ["G", "J"], ["H", "K"], ["I", "L"]]
//!
//! [teams]
//! A = "Anchors"
//! B = "Bison"
//!
//! [[divisions]]
//! name = "North"
//! teams = ["A", "B", "C"]
//! ```
//!
//! `rivalries` is optional; when absent, rivals are computed from the
//! divisions. The `[teams]` table only changes how teams are printed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::ScheduleError;
use crate::models::{DivisionAssignment, LeagueConfig, ParseTeamError, RivalryPair, Team};

/// Errors raised while loading a league file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read league file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse league file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("league file names {0}")]
    UnknownTeam(#[from] ParseTeamError),

    #[error(transparent)]
    Invalid(#[from] ScheduleError),
}

/// Display names for teams. Purely cosmetic; the engine only sees letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamNames {
    names: BTreeMap<Team, String>,
}

impl TeamNames {
    /// No custom names: every team prints as its letter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name of one team.
    pub fn with_name(mut self, team: Team, name: impl Into<String>) -> Self {
        self.names.insert(team, name.into());
        self
    }

    /// Display name of `team`, falling back to its letter.
    pub fn name_of(&self, team: Team) -> String {
        self.names
            .get(&team)
            .cloned()
            .unwrap_or_else(|| team.to_string())
    }

    /// Number of teams with a custom name.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One `[[divisions]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub teams: Vec<Team>,
}

/// A parsed league file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueFile {
    #[serde(default)]
    pub teams: BTreeMap<String, String>,
    #[serde(default)]
    pub divisions: Vec<DivisionEntry>,
    #[serde(default)]
    pub rivalries: Option<Vec<[Team; 2]>>,
}

impl LeagueFile {
    /// Reads and parses a league file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses league file content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Display names from the `[teams]` table.
    pub fn team_names(&self) -> Result<TeamNames, ConfigError> {
        self.teams
            .iter()
            .try_fold(TeamNames::new(), |names, (key, name)| {
                Ok(names.with_name(key.parse::<Team>()?, name.clone()))
            })
    }

    /// Division names in file order, `Division N` where unnamed.
    pub fn division_names(&self) -> Vec<String> {
        self.divisions
            .iter()
            .enumerate()
            .map(|(i, d)| d.name.clone().unwrap_or_else(|| format!("Division {}", i + 1)))
            .collect()
    }

    /// The divisions as an editor-style assignment (not yet validated).
    pub fn division_assignment(&self) -> DivisionAssignment {
        DivisionAssignment::new(self.divisions.iter().map(|d| d.teams.clone()).collect())
    }

    /// Validated league configuration.
    ///
    /// Uses the listed rivalries when present, otherwise computes them.
    pub fn league_config(&self) -> Result<LeagueConfig, ConfigError> {
        let divisions = self.division_assignment().to_divisions()?;
        let config = match &self.rivalries {
            Some(pairs) => LeagueConfig::new(
                divisions,
                pairs.iter().map(|[a, b]| RivalryPair::new(*a, *b)).collect(),
            )?,
            None => LeagueConfig::with_computed_rivalries(divisions)?,
        };
        Ok(config)
    }
}

//! Error types for schedule generation.

use thiserror::Error;

use crate::models::Team;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Errors raised by configuration and schedule generation.
#[derive(Debug, Clone, Error)]
pub enum ScheduleError {
    /// The league configuration or division assignment is malformed.
    #[error("Invalid league configuration: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// Every placement tier ran out of attempts.
    #[error("Could not find valid placement for weeks 12–14 after {attempts} attempts; retry with a different team order")]
    PlacementExhausted { attempts: usize },

    /// Home/away repair left some team without seven home games.
    #[error("Home/away balance not reached: {}", describe_home_games(.home_games))]
    Unbalanced { home_games: Vec<(Team, usize)> },

    /// Final match-up count check failed.
    #[error("Schedule generation produced {found} matchups instead of 84 (14 weeks × 6)")]
    MatchupCount { found: usize },

    /// The retry wrapper used its whole budget without recording an error.
    #[error("Schedule generation failed after {attempts} attempts; try regenerating with different divisions")]
    RetriesExhausted { attempts: usize },
}

impl ScheduleError {
    pub(crate) fn invalid(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self::InvalidConfig(vec![ValidationError::new(kind, message)])
    }

    /// Whether another attempt with a perturbed configuration may succeed.
    ///
    /// Malformed input never becomes valid by retrying.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_home_games(home_games: &[(Team, usize)]) -> String {
    home_games
        .iter()
        .map(|(team, count)| format!("{team}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

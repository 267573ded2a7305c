//! Input validation for league configurations.
//!
//! Checks structural integrity of division assignments and rivalry
//! pairings before any generation work runs. Detects:
//! - Wrong number of divisions or wrong division sizes
//! - Teams assigned twice or not at all
//! - Rivalry pairings that are not a perfect cross-division matching
//!
//! Every problem is reported, not just the first.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Division, RivalryPair, Team, DIVISION_COUNT, DIVISION_SIZE, TEAM_COUNT};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Not exactly four divisions.
    DivisionCount,
    /// A division does not hold exactly three teams.
    DivisionSize,
    /// A team is assigned more than once.
    DuplicateTeam,
    /// A team is not assigned to any division.
    MissingTeam,
    /// Not exactly six rivalry pairs.
    RivalryCount,
    /// A rivalry pair lies inside one division.
    RivalryWithinDivision,
    /// A team appears in more than one rivalry pair.
    DuplicateRivalryTeam,
    /// A team has no rival.
    UnmatchedTeam,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a (possibly incomplete) division assignment.
///
/// Checks:
/// 1. Exactly four slots
/// 2. Every slot holds exactly three teams
/// 3. No team appears twice
/// 4. Every team appears
pub fn validate_assignment(slots: &[Vec<Team>]) -> ValidationResult {
    let mut errors = Vec::new();
    let groups: Vec<&[Team]> = slots.iter().map(Vec::as_slice).collect();
    check_partition(&groups, &mut errors);
    finish(errors)
}

/// Validates divisions and rivalry pairs together.
///
/// Checks the division partition (see [`validate_assignment`]) and that:
/// 5. There are exactly six rivalry pairs
/// 6. No rivalry pair lies within a division
/// 7. Every team appears in exactly one rivalry pair
pub fn validate_league(divisions: &[Division], rivalries: &[RivalryPair]) -> ValidationResult {
    let mut errors = Vec::new();
    let groups: Vec<&[Team]> = divisions.iter().map(|d| &d.teams()[..]).collect();
    check_partition(&groups, &mut errors);

    if rivalries.len() != TEAM_COUNT / 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::RivalryCount,
            format!(
                "Expected {} rivalry pairs, got {}",
                TEAM_COUNT / 2,
                rivalries.len()
            ),
        ));
    }

    let mut matched = HashSet::new();
    for r in rivalries {
        if divisions.iter().any(|d| d.contains(r.a) && d.contains(r.b)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RivalryWithinDivision,
                format!("Rivalry {}-{} is within one division", r.a, r.b),
            ));
        }
        for team in [r.a, r.b] {
            if !matched.insert(team) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateRivalryTeam,
                    format!("Team {team} appears in more than one rivalry"),
                ));
            }
        }
    }

    for team in Team::ALL {
        if !matched.contains(&team) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnmatchedTeam,
                format!("Team {team} has no rival"),
            ));
        }
    }

    finish(errors)
}

fn check_partition(groups: &[&[Team]], errors: &mut Vec<ValidationError>) {
    if groups.len() != DIVISION_COUNT {
        errors.push(ValidationError::new(
            ValidationErrorKind::DivisionCount,
            format!(
                "Expected {DIVISION_COUNT} divisions, got {}",
                groups.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for (i, group) in groups.iter().enumerate() {
        if group.len() != DIVISION_SIZE {
            errors.push(ValidationError::new(
                ValidationErrorKind::DivisionSize,
                format!(
                    "Division {} has {} teams, expected {DIVISION_SIZE}",
                    i + 1,
                    group.len()
                ),
            ));
        }
        for &team in group.iter() {
            if !seen.insert(team) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateTeam,
                    format!("Team {team} is assigned more than once"),
                ));
            }
        }
    }

    for team in Team::ALL {
        if !seen.contains(&team) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingTeam,
                format!("Team {team} is not assigned to a division"),
            ));
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

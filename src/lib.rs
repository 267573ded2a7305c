//! Season schedule generation for a twelve-team, four-division league.
//!
//! Produces a 14-week regular season in which every pair of teams meets
//! at least once, division mates and designated cross-division rivals
//! meet twice, no pair meets in consecutive weeks, and every team plays
//! seven home and seven away games.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `Division`, `RivalryPair`,
//!   `LeagueConfig`, `DivisionAssignment`, `MatchUp`, `Week`, `Schedule`
//! - **`validation`**: Configuration integrity checks (partition, rivalry matching)
//! - **`generator`**: Round robin, second-round placement, home/away repair
//! - **`retry`**: Async wrapper that retries generation with perturbed configurations
//! - **`audit`**: Season-level rule checks on a finished schedule
//! - **`config`**: TOML league files and team display names
//!
//! # Example
//!
//! ```
//! use u_season::audit::SeasonAudit;
//! use u_season::generator::generate_schedule;
//! use u_season::models::LeagueConfig;
//!
//! let config = LeagueConfig::default();
//! let schedule = generate_schedule(&config).unwrap();
//! assert!(SeasonAudit::calculate(&schedule, &config).is_valid());
//! ```
//!
//! # References
//!
//! - de Werra (1981), "Scheduling in sports"
//! - Rasmussen & Trick (2008), "Round robin scheduling: a survey"

pub mod audit;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod retry;
pub mod validation;

pub use error::{Result, ScheduleError};

//! Season scheduling domain models.
//!
//! Provides the data types the generator consumes and produces.
//!
//! | Type | Role |
//! |------|------|
//! | `Team` | One of twelve identifiers `A`–`L` |
//! | `Division` | Three teams that meet twice |
//! | `RivalryPair` | Cross-division pair that meets twice |
//! | `LeagueConfig` | Validated divisions + rivalries (generator input) |
//! | `DivisionAssignment` | Possibly incomplete editor input |
//! | `MatchUp` / `Week` / `Schedule` | Generator output |

mod assignment;
mod league;
mod matchup;
mod schedule;
mod team;

pub use assignment::DivisionAssignment;
pub use league::{
    compute_rivalry_pairs, random_rivalry_pairs, Division, LeagueConfig, RivalryPair,
    DIVISION_COUNT, DIVISION_SIZE,
};
pub use matchup::MatchUp;
pub use schedule::{Schedule, Week, MATCH_UPS_PER_WEEK, SEASON_MATCH_UPS, WEEK_COUNT};
pub use team::{Pair, ParseTeamError, Team, TEAM_COUNT};

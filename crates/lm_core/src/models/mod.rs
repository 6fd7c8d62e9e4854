//! Match data model: rosters, formations, events, snapshots.

pub mod events;
pub mod player;
pub mod snapshot;
pub mod team;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use events::{EventKind, MatchEvent};
pub use player::{MovementHint, Player, PlayerRef, Role, TeamSide};
pub use snapshot::{MatchSnapshot, PlayerSnapshot};
pub use team::{FormationShape, Team};

/// Identifier of a single simulated match.
pub type MatchId = Uuid;

/// Match lifecycle status.
///
/// Transitions are owned by the engine's state machine:
/// `NotStarted -> InProgress -> (GoalScored <-> InProgress)* -> Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    GoalScored,
    Ended,
}

impl MatchStatus {
    /// Whether the simulation advances the game clock in this status.
    pub fn clock_runs(&self) -> bool {
        matches!(self, MatchStatus::InProgress | MatchStatus::GoalScored)
    }
}

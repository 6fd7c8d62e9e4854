//! Published match snapshot.
//!
//! Periodic, read-only view of one match for external consumers
//! (transport, commentary, the tactics advisor). Everything is plain
//! data; publishing a snapshot never exposes engine internals.

use serde::{Deserialize, Serialize};

use super::player::{PlayerRef, TeamSide};
use super::{MatchId, MatchStatus};
use crate::engine::geometry::Position;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_ref: PlayerRef,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub status: MatchStatus,
    pub ball: Position,
    pub ball_velocity: (f32, f32),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possession: Option<PlayerRef>,
    /// All 22 players, home ordinals 0-10 then away ordinals 0-10.
    pub players: Vec<PlayerSnapshot>,
    pub home_name: String,
    pub away_name: String,
    /// (home, away)
    pub score: (u32, u32),
    pub clock_min: f32,
    pub simulation_step: u64,
}

impl MatchSnapshot {
    pub fn player(&self, player_ref: PlayerRef) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.player_ref == player_ref)
    }

    pub fn side_players(&self, side: TeamSide) -> impl Iterator<Item = &PlayerSnapshot> {
        self.players.iter().filter(move |p| p.player_ref.side == side)
    }
}

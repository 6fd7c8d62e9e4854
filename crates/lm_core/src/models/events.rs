use serde::{Deserialize, Serialize};

use super::player::{PlayerRef, TeamSide};
use crate::engine::geometry::Position;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<TeamSide>,
    /// Primary actor (scorer, passer, tackler, keeper).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerRef>,
    /// Secondary participant (pass receiver, tackled carrier).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PlayerRef>,
    /// Ball position when the event occurred.
    pub position: Position,
    /// Engine-confirmed: simulation step x tick duration, never wall clock.
    pub timestamp_ms: u64,
    /// Compressed game clock, in minutes.
    pub clock_min: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    GameStart,
    GameEnd,
    Goal,
    Shot,
    Pass,
    Save,
    Tackle,
    PossessionLost,
    StateUpdate,
}

impl MatchEvent {
    fn base(kind: EventKind, position: Position, timestamp_ms: u64, clock_min: f32) -> Self {
        Self {
            kind,
            side: None,
            player: None,
            target: None,
            position,
            timestamp_ms,
            clock_min,
        }
    }

    pub fn game_start(position: Position, timestamp_ms: u64, clock_min: f32) -> Self {
        Self::base(EventKind::GameStart, position, timestamp_ms, clock_min)
    }

    pub fn game_end(position: Position, timestamp_ms: u64, clock_min: f32) -> Self {
        Self::base(EventKind::GameEnd, position, timestamp_ms, clock_min)
    }

    /// Scorer is best-effort attribution: the nearest attacking player to
    /// the ball when the line was crossed.
    pub fn goal(
        side: TeamSide,
        scorer: Option<PlayerRef>,
        position: Position,
        timestamp_ms: u64,
        clock_min: f32,
    ) -> Self {
        Self {
            side: Some(side),
            player: scorer,
            ..Self::base(EventKind::Goal, position, timestamp_ms, clock_min)
        }
    }

    pub fn shot(
        shooter: PlayerRef,
        position: Position,
        timestamp_ms: u64,
        clock_min: f32,
    ) -> Self {
        Self {
            side: Some(shooter.side),
            player: Some(shooter),
            ..Self::base(EventKind::Shot, position, timestamp_ms, clock_min)
        }
    }

    pub fn pass(
        passer: PlayerRef,
        receiver: PlayerRef,
        position: Position,
        timestamp_ms: u64,
        clock_min: f32,
    ) -> Self {
        Self {
            side: Some(passer.side),
            player: Some(passer),
            target: Some(receiver),
            ..Self::base(EventKind::Pass, position, timestamp_ms, clock_min)
        }
    }

    pub fn save(keeper: PlayerRef, position: Position, timestamp_ms: u64, clock_min: f32) -> Self {
        Self {
            side: Some(keeper.side),
            player: Some(keeper),
            ..Self::base(EventKind::Save, position, timestamp_ms, clock_min)
        }
    }

    pub fn tackle(
        tackler: PlayerRef,
        carrier: PlayerRef,
        position: Position,
        timestamp_ms: u64,
        clock_min: f32,
    ) -> Self {
        Self {
            side: Some(tackler.side),
            player: Some(tackler),
            target: Some(carrier),
            ..Self::base(EventKind::Tackle, position, timestamp_ms, clock_min)
        }
    }

    pub fn possession_lost(
        carrier: PlayerRef,
        position: Position,
        timestamp_ms: u64,
        clock_min: f32,
    ) -> Self {
        Self {
            side: Some(carrier.side),
            player: Some(carrier),
            ..Self::base(EventKind::PossessionLost, position, timestamp_ms, clock_min)
        }
    }

    pub fn state_update(position: Position, timestamp_ms: u64, clock_min: f32) -> Self {
        Self::base(EventKind::StateUpdate, position, timestamp_ms, clock_min)
    }
}

//! # lm_core - Live Football Match Simulation Engine
//!
//! Deterministic, tick-driven simulation of a two-team football match:
//! role-aware player movement, ball physics, probabilistic event
//! resolution (passes, shots, tackles, saves, goals) and a per-match
//! state machine from kickoff to full time.
//!
//! ## Features
//! - 100% deterministic per match (same seed + same commands = same result)
//! - Fixed-step ticks with a compressed game clock
//! - Full state capture/restore for durable persistence
//!
//! The engine is synchronous and single-writer by construction: one
//! `MatchEngine` value owns all state for one match and is only ever
//! mutated through `tick()` and the command methods. Hosting (tick
//! scheduling, command queues, advisor refresh) lives in `lm_host`.

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;
pub mod models;

pub use engine::config::Tuning;
pub use engine::geometry::Position;
pub use engine::record::MatchStateRecord;
pub use engine::{Ball, MatchEngine};
pub use error::{MatchError, Result};
pub use models::events::{EventKind, MatchEvent};
pub use models::player::{MovementHint, Player, PlayerRef, Role, TeamSide};
pub use models::snapshot::{MatchSnapshot, PlayerSnapshot};
pub use models::team::{FormationShape, Team};
pub use models::{MatchId, MatchStatus};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Match Simulation Engine
//!
//! Owns the complete mutable state of one match and advances it in
//! fixed discrete ticks. One tick runs, in order:
//!
//! 1. cooldown pruning / advisor-hint aging
//! 2. non-playing state handling (celebration countdown, kickoff reset)
//! 3. movement planning for every non-carrier player (formation pull,
//!    forward bias, ball interaction, pressing, avoidance, jitter,
//!    advisor hint blend), keeper positioning, carrier movement
//! 4. ball resolution (pickup, tackles, shots, passes, goal-line check)
//! 5. full-time check against the compressed clock
//!
//! The engine is strictly single-writer: hosts serialize ticks and
//! commands onto one owning task. All randomness flows through one
//! seeded `ChaCha8Rng`, so a match is reproducible from its seed and
//! command sequence, and `to_record()`/`from_record()` restore a match
//! mid-flight (RNG word position included).
//!
//! ## Sub-modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `ball` | Ball state, friction integration |
//! | `config` | Tuning knobs with standard defaults |
//! | `formation` | Per-shape base position tables, formation reset |
//! | `geometry` | Normalized field coordinates |
//! | `keeper` | Goalkeeper box, tracking, dives, saves |
//! | `movement` | Outfield force-blend planner |
//! | `possessor` | Ball-carrier movement |
//! | `record` | Serializable full-state capture/restore |
//! | `resolver` | Possession transfer, tackles, shots, passes, goals |
//! | `state` | Lifecycle transitions and celebration protocol |

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod config;
pub mod constants;
pub mod formation;
pub mod geometry;
pub mod record;

mod ball;
mod keeper;
mod movement;
mod possessor;
mod resolver;
mod state;

pub use ball::Ball;

use crate::error::{MatchError, Result};
use crate::models::events::MatchEvent;
use crate::models::player::{MovementHint, Player, PlayerRef, TeamSide, SQUAD_SIZE};
use crate::models::snapshot::{MatchSnapshot, PlayerSnapshot};
use crate::models::team::{FormationShape, Team};
use crate::models::{MatchId, MatchStatus};
use config::Tuning;
use constants::{ball as ball_const, clock, movement as move_const};
use geometry::Position;

/// The home player handed the ball at the opening kickoff.
const KICKOFF_ORDINAL: u8 = 6;

pub struct MatchEngine {
    id: MatchId,
    status: MatchStatus,
    home: Team,
    away: Team,
    home_shape: FormationShape,
    away_shape: FormationShape,
    /// Mirrored base-position maps, rebuilt on shape change or reset.
    home_layout: [Position; 11],
    away_layout: [Position; 11],
    ball: Ball,
    possession: Option<PlayerRef>,
    /// Strictly increasing, every tick in every state.
    simulation_step: u64,
    /// Compressed game clock, minutes.
    clock_min: f32,
    kickoff_wallclock: DateTime<Utc>,
    last_scoring_side: Option<TeamSide>,
    celebration_ticks_remaining: u32,
    /// Per-player suppression: step until which tackle participation is blocked.
    tackle_cooldowns: HashMap<PlayerRef, u64>,
    last_goal_step: Option<u64>,
    /// Advisor hint cache; read synchronously by the planner, never awaited.
    hints: HashMap<PlayerRef, MovementHint>,
    pending_events: Vec<MatchEvent>,
    rng: ChaCha8Rng,
    rng_seed: u64,
    tuning: Tuning,
}

impl MatchEngine {
    pub fn new(id: MatchId, home_name: &str, away_name: &str, seed: u64) -> Result<MatchEngine> {
        let mut engine = MatchEngine {
            id,
            status: MatchStatus::NotStarted,
            home: build_team(TeamSide::Home, home_name),
            away: build_team(TeamSide::Away, away_name),
            home_shape: FormationShape::F442,
            away_shape: FormationShape::F442,
            home_layout: [Position::center(); 11],
            away_layout: [Position::center(); 11],
            ball: Ball::at_center(),
            possession: Some(PlayerRef::new(TeamSide::Home, KICKOFF_ORDINAL)),
            simulation_step: 0,
            clock_min: 0.0,
            kickoff_wallclock: Utc::now(),
            last_scoring_side: None,
            celebration_ticks_remaining: 0,
            tackle_cooldowns: HashMap::new(),
            last_goal_step: None,
            hints: HashMap::new(),
            pending_events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            rng_seed: seed,
            tuning: Tuning::default(),
        };
        for team in [&engine.home, &engine.away] {
            team.validate().map_err(|_| MatchError::InvalidTeamSize {
                expected: SQUAD_SIZE as usize,
                found: team.players.len(),
            })?;
        }
        engine.rebuild_layouts();
        let (home_shape, away_shape) = (engine.home_shape, engine.away_shape);
        formation::reset_team_to_formation(&mut engine.home, home_shape, &mut engine.rng);
        formation::reset_team_to_formation(&mut engine.away, away_shape, &mut engine.rng);
        Ok(engine)
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> MatchEngine {
        self.tuning = tuning;
        self
    }

    /// Advance the simulation one tick.
    ///
    /// Infallible today, but hosts treat any error as tick-local: log
    /// and proceed to the next interval, never retry.
    pub fn tick(&mut self) -> Result<()> {
        self.simulation_step += 1;
        self.prune_tackle_cooldowns();
        self.age_hints();

        match self.status {
            MatchStatus::NotStarted | MatchStatus::Ended => return Ok(()),
            MatchStatus::GoalScored => {
                self.clock_min += clock::GAME_MIN_PER_TICK;
                self.tick_celebration();
                return Ok(());
            }
            MatchStatus::InProgress => {}
        }

        self.clock_min += clock::GAME_MIN_PER_TICK;
        self.plan_and_move_players();
        self.resolve_ball();

        if self.clock_min >= self.tuning.full_time_min {
            self.finish();
        }
        Ok(())
    }

    /// Manual velocity injection (demo/debug): the ball comes loose and
    /// is sent off in a random direction.
    pub fn kick_ball(&mut self) -> Result<()> {
        if self.status == MatchStatus::Ended {
            return Err(MatchError::InvalidTransition { from: self.status, command: "kick_ball" });
        }
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = self.rng.gen_range(ball_const::KICK_SPEED_MIN..=ball_const::KICK_SPEED_MAX);
        self.possession = None;
        self.ball.kick(angle.cos() * speed, angle.sin() * speed);
        Ok(())
    }

    /// Swap a side's formation shape and rebuild its base-position map.
    pub fn set_formation(&mut self, side: TeamSide, shape: FormationShape) {
        match side {
            TeamSide::Home => self.home_shape = shape,
            TeamSide::Away => self.away_shape = shape,
        }
        self.rebuild_layouts();
    }

    /// Install advisor movement hints for one side, replacing that
    /// side's previous batch. Invalid refs are dropped with a warning;
    /// values are clamped so a hint can never out-run the planner.
    pub fn apply_hints(&mut self, side: TeamSide, hints: &HashMap<PlayerRef, (f32, f32)>) {
        self.hints.retain(|r, _| r.side != side);
        for (player_ref, (dx, dy)) in hints {
            if !player_ref.is_valid() || player_ref.side != side {
                log::warn!("match {}: ignoring hint for invalid player {}", self.id, player_ref);
                continue;
            }
            self.hints.insert(
                *player_ref,
                MovementHint {
                    dx: dx.clamp(-move_const::HINT_CLAMP, move_const::HINT_CLAMP),
                    dy: dy.clamp(-move_const::HINT_CLAMP, move_const::HINT_CLAMP),
                    age_ticks: 0,
                },
            );
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.id,
            status: self.status,
            ball: self.ball.position,
            ball_velocity: self.ball.velocity,
            possession: self.possession,
            players: self
                .home
                .players
                .iter()
                .chain(self.away.players.iter())
                .map(|p| PlayerSnapshot { player_ref: p.player_ref, position: p.position })
                .collect(),
            home_name: self.home.name.clone(),
            away_name: self.away.name.clone(),
            score: (self.home.score, self.away.score),
            clock_min: self.clock_min,
            simulation_step: self.simulation_step,
        }
    }

    /// Take all events emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===========================================
    // Accessors
    // ===========================================

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn clock_min(&self) -> f32 {
        self.clock_min
    }

    pub fn simulation_step(&self) -> u64 {
        self.simulation_step
    }

    pub fn score(&self) -> (u32, u32) {
        (self.home.score, self.away.score)
    }

    pub fn possession(&self) -> Option<PlayerRef> {
        self.possession
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn shape(&self, side: TeamSide) -> FormationShape {
        match side {
            TeamSide::Home => self.home_shape,
            TeamSide::Away => self.away_shape,
        }
    }

    pub fn kickoff_wallclock(&self) -> DateTime<Utc> {
        self.kickoff_wallclock
    }

    // ===========================================
    // Internal helpers shared by the sub-modules
    // ===========================================

    fn rebuild_layouts(&mut self) {
        for ordinal in 0..SQUAD_SIZE {
            self.home_layout[ordinal as usize] =
                formation::base_position(self.home_shape, PlayerRef::new(TeamSide::Home, ordinal));
            self.away_layout[ordinal as usize] =
                formation::base_position(self.away_shape, PlayerRef::new(TeamSide::Away, ordinal));
        }
    }

    pub(crate) fn base_for(&self, player_ref: PlayerRef) -> Position {
        let layout = match player_ref.side {
            TeamSide::Home => &self.home_layout,
            TeamSide::Away => &self.away_layout,
        };
        layout[player_ref.ordinal as usize % SQUAD_SIZE as usize]
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    fn all_positions(&self) -> Vec<(PlayerRef, Position)> {
        self.home
            .players
            .iter()
            .chain(self.away.players.iter())
            .map(|p| (p.player_ref, p.position))
            .collect()
    }

    fn player_position(&self, player_ref: PlayerRef) -> Option<Position> {
        self.team(player_ref.side).player(player_ref.ordinal).map(|p| p.position)
    }

    fn set_player_position(&mut self, player_ref: PlayerRef, position: Position) {
        match self.team_mut(player_ref.side).player_mut(player_ref.ordinal) {
            Some(player) => player.position = position,
            // A malformed ref skips the player for this tick, never aborts it.
            None => log::warn!("skipping position update for unknown player {}", player_ref),
        }
    }

    fn emit(&mut self, event: MatchEvent) {
        self.pending_events.push(event);
    }

    /// Engine-confirmed event timestamp: step count x tick interval.
    fn timestamp_ms(&self) -> u64 {
        self.simulation_step * clock::TICK_MS
    }

    fn prune_tackle_cooldowns(&mut self) {
        let step = self.simulation_step;
        self.tackle_cooldowns.retain(|_, expiry| *expiry > step);
    }

    fn age_hints(&mut self) {
        for hint in self.hints.values_mut() {
            hint.age_ticks = hint.age_ticks.saturating_add(1);
        }
    }
}

fn build_team(side: TeamSide, name: &str) -> Team {
    Team {
        side,
        name: name.to_string(),
        score: 0,
        players: (0..SQUAD_SIZE)
            .map(|ordinal| Player {
                player_ref: PlayerRef::new(side, ordinal),
                position: Position::center(),
            })
            .collect(),
    }
}

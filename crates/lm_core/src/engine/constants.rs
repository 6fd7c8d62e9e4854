//! Simulation constants.
//!
//! Probability-based mechanics over normalized field coordinates; all
//! distances are fractions of the goal-to-goal axis, all per-tick
//! magnitudes assume the fixed tick interval below.

/// Field geometry (normalized unit square)
pub mod field {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;
    /// Center X coordinate
    pub const CENTER_X: f32 = 0.5;
    /// Center Y coordinate
    pub const CENTER_Y: f32 = 0.5;
    /// Half-width of the goal mouth along y
    pub const GOAL_MOUTH_HALF_WIDTH: f32 = 0.07;
    /// A ball within this margin of a goal line counts as across it
    pub const GOAL_LINE_MARGIN: f32 = 0.005;
    /// Boundary between the thirds of the pitch, in team-view progress
    pub const OWN_THIRD: f32 = 0.33;
    pub const FINAL_THIRD: f32 = 0.66;
}

/// Tick cadence and the compressed game clock
pub mod clock {
    /// Wall-clock tick interval (ms)
    pub const TICK_MS: u64 = 100;
    /// Compression ratio: 1 real minute = 90 game minutes,
    /// so one 100ms tick advances the game clock by 0.15 minutes.
    pub const GAME_MIN_PER_TICK: f32 = 0.15;
    /// Full time (game minutes)
    pub const FULL_TIME_MIN: f32 = 90.0;
    /// Snapshots are published every N ticks
    pub const SNAPSHOT_EVERY_TICKS: u64 = 2;
}

/// Ball physics
pub mod ball {
    /// Per-tick velocity retention while the ball rolls free (~5% decay)
    pub const FRICTION_RETAIN: f32 = 0.95;
    /// Speed below which a loose ball stops
    pub const STOP_SPEED: f32 = 0.0005;
    /// A player within this radius of a loose ball takes possession
    pub const CONTROL_RADIUS: f32 = 0.015;
    /// Manual kick speed range (KickBall command)
    pub const KICK_SPEED_MIN: f32 = 0.010;
    pub const KICK_SPEED_MAX: f32 = 0.030;
}

/// Outfield movement planner weights
pub mod movement {
    /// Hard cap on per-tick displacement magnitude
    pub const MAX_STEP: f32 = 0.008;
    /// Fraction of the offset to base position recovered per tick
    pub const FORMATION_PULL: f32 = 0.05;
    /// Formation pull scaling: forwards hold shape when not attacking,
    /// defenders are allowed forward drift when attacking
    pub const FORWARD_OFF_BALL_SCALE: f32 = 1.5;
    pub const DEFENDER_ATTACKING_SCALE: f32 = 0.5;
    /// Constant push toward the attacking goal while in possession
    pub const FORWARD_BIAS_FWD: f32 = 0.0035;
    pub const FORWARD_BIAS_MID: f32 = 0.0022;
    pub const FORWARD_BIAS_DEF: f32 = 0.0010;
    /// Supporting-run behavior around the possessor
    pub const SUPPORT_RADIUS: f32 = 0.25;
    pub const SUPPORT_PULL: f32 = 0.03;
    pub const SUPPORT_BEHIND_OFFSET: f32 = 0.03;
    pub const SUPPORT_LATERAL_OFFSET: f32 = 0.10;
    /// Forwards drift into space ahead of the carrier
    pub const RUN_AHEAD_OFFSET: f32 = 0.12;
    pub const RUN_AHEAD_PULL: f32 = 0.02;
    /// Loose-ball chase: only the nearest N per team commit
    pub const CHASE_COUNT: usize = 3;
    pub const CHASE_GAIN: f32 = 0.0008;
    pub const CHASE_SOFTEN: f32 = 0.05;
    pub const CHASE_CAP: f32 = 0.006;
    /// Pressing (opponent possession)
    pub const PRESS_PULL: f32 = 0.005;
    pub const PRESS_CHANCE: f32 = 0.5;
    /// Pressing is rarer deep in opponent territory
    pub const PRESS_CHANCE_DEEP: f32 = 0.2;
    /// Teammate avoidance
    pub const AVOID_RADIUS: f32 = 0.03;
    pub const AVOID_GAIN: f32 = 0.00004;
    pub const AVOID_CAP: f32 = 0.003;
    /// Naturalism jitter
    pub const JITTER: f32 = 0.0012;
    pub const JITTER_PHASE_AMP: f32 = 0.0008;
    pub const JITTER_PHASE_STEP: f32 = 0.05;
    pub const KEEPER_JITTER_SCALE: f32 = 0.4;
    /// Advisor hints: per-axis clamp, residual formation pull, staleness.
    /// The clamp keeps a max hint below the residual formation pull's
    /// reach, bounding how far a hint can drag a player off-role.
    pub const HINT_CLAMP: f32 = 0.004;
    pub const HINT_FORMATION_SCALE: f32 = 0.25;
    pub const HINT_STALE_TICKS: u32 = 20;
    pub const HINT_STALE_JITTER: f32 = 0.0010;
}

/// Goalkeeper behavior
pub mod keeper {
    /// Depth of the keeper's operating box from the own goal line
    pub const BOX_DEPTH: f32 = 0.12;
    /// Half-width of the keeper's lateral band
    pub const BOX_HALF_WIDTH: f32 = 0.20;
    /// Hold depth when the ball is in the own half
    pub const HOLD_DEPTH: f32 = 0.03;
    /// Advanced depth when the ball is in the far half
    pub const ADVANCE_DEPTH: f32 = 0.08;
    pub const X_DAMP: f32 = 0.15;
    pub const Y_DAMP: f32 = 0.20;
    /// Lateral tracking band (clamped ball y)
    pub const TRACK_HALF_WIDTH: f32 = 0.15;
    /// Dive trigger: ball within this radius, moving goalward
    pub const DIVE_RADIUS: f32 = 0.12;
    pub const DIVE_CHANCE: f32 = 0.35;
    pub const DIVE_STEP: f32 = 0.02;
    /// Minimum goalward ball speed to consider a dive
    pub const GOALWARD_SPEED: f32 = 0.004;
    /// Post-dive distance under which the keeper claims the ball
    pub const SAVE_RADIUS: f32 = 0.02;
}

/// Ball-carrier movement
pub mod carrier {
    pub const DRIVE_FWD: f32 = 0.0060;
    pub const DRIVE_MID: f32 = 0.0045;
    pub const DRIVE_DEF: f32 = 0.0030;
    pub const DRIVE_GK: f32 = 0.0020;
    /// Look-ahead collision cone
    pub const LOOKAHEAD_DIST: f32 = 0.06;
    pub const LOOKAHEAD_HALF_WIDTH: f32 = 0.04;
    pub const EVADE_STEP: f32 = 0.004;
    pub const BLOCKED_SLOWDOWN: f32 = 0.5;
    /// Near the goal, drive toward the mouth's y-center
    pub const GOAL_APPROACH_DIST: f32 = 0.30;
    pub const SHOOTING_ZONE_PROGRESS: f32 = 0.75;
    pub const GOAL_CENTER_PULL: f32 = 0.08;
    pub const GOAL_PUSH_SCALE: f32 = 1.3;
}

/// Tackling
pub mod tackle {
    pub const RADIUS: f32 = 0.03;
    pub const BASE_CHANCE: f32 = 0.25;
    /// Concurrent attempts per tick
    pub const MAX_ATTEMPTS: usize = 2;
    /// Per-player suppression window after an attempt (ticks)
    pub const COOLDOWN_TICKS: u64 = 15;
    pub const BONUS_DEFENDER: f32 = 1.3;
    pub const BONUS_MIDFIELDER: f32 = 1.0;
    pub const BONUS_FORWARD: f32 = 0.7;
    pub const BONUS_KEEPER: f32 = 0.5;
    /// Impulse given to the ball when a tackle knocks it loose
    pub const IMPULSE_MIN: f32 = 0.010;
    pub const IMPULSE_MAX: f32 = 0.020;
}

/// Shooting
pub mod shooting {
    /// Distance to the opponent goal under which the carrier shoots
    pub const RANGE: f32 = 0.20;
    pub const SCORE_CHANCE: f32 = 0.08;
    /// Launch speed of an on-target shot
    pub const ON_TARGET_SPEED: f32 = 0.060;
    /// Launch speed of a miss
    pub const MISS_SPEED: f32 = 0.040;
    /// On-target shots aim within this half-band of the mouth center
    pub const TARGET_SPREAD: f32 = 0.05;
    /// Misses spray at least this far outside the mouth center
    pub const MISS_SPREAD_MIN: f32 = 0.09;
    pub const MISS_SPREAD_MAX: f32 = 0.25;
}

/// Passing
pub mod passing {
    pub const RANGE: f32 = 0.35;
    pub const BASE_MID: f32 = 0.18;
    pub const BASE_DEF: f32 = 0.12;
    /// Defenders clear their own third much more readily
    pub const BASE_DEF_OWN_THIRD: f32 = 0.25;
    pub const BASE_FWD: f32 = 0.10;
    pub const BASE_GK: f32 = 0.35;
    /// An opponent inside this radius counts as pressure
    pub const PRESSURE_RADIUS: f32 = 0.06;
    pub const PRESSURE_BONUS: f32 = 0.15;
    /// Midfielders may find forwards slightly behind their own line
    pub const BEHIND_SLACK: f32 = 0.05;
    /// Chance to cough the ball up when no pass target exists
    pub const DROP_CHANCE: f32 = 0.02;
    pub const CLEAR_SPEED: f32 = 0.012;
}

/// Goal celebration and de-duplication
pub mod celebration {
    /// Frozen ticks after a goal before the kickoff reset
    pub const TICKS: u32 = 20;
    /// Minimum spacing between two recognized goals (ticks)
    pub const GOAL_COOLDOWN_TICKS: u64 = 30;
}

/// Formation reset
pub mod formation {
    /// Uniform jitter applied around base positions on reset
    pub const RESET_JITTER: f32 = 0.02;
    /// Reset keeps every player inside the own half by this margin
    pub const HALF_MARGIN: f32 = 0.01;
}

//! Engine tuning.
//!
//! The knobs that shape match outcomes, gathered into one struct so
//! hosts and tests can override them without touching the constant
//! tables. `Default` reproduces the standard balance.

use serde::{Deserialize, Serialize};

use super::constants::{celebration, clock, passing, shooting, tackle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub tackle_base_chance: f32,
    pub tackle_radius: f32,
    pub tackle_cooldown_ticks: u64,
    pub tackle_max_attempts: usize,
    pub shot_range: f32,
    pub shot_score_chance: f32,
    pub pass_drop_chance: f32,
    pub celebration_ticks: u32,
    pub goal_cooldown_ticks: u64,
    pub full_time_min: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tackle_base_chance: tackle::BASE_CHANCE,
            tackle_radius: tackle::RADIUS,
            tackle_cooldown_ticks: tackle::COOLDOWN_TICKS,
            tackle_max_attempts: tackle::MAX_ATTEMPTS,
            shot_range: shooting::RANGE,
            shot_score_chance: shooting::SCORE_CHANCE,
            pass_drop_chance: passing::DROP_CHANCE,
            celebration_ticks: celebration::TICKS,
            goal_cooldown_ticks: celebration::GOAL_COOLDOWN_TICKS,
            full_time_min: clock::FULL_TIME_MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let t = Tuning::default();
        assert_eq!(t.tackle_base_chance, tackle::BASE_CHANCE);
        assert_eq!(t.celebration_ticks, celebration::TICKS);
        assert_eq!(t.full_time_min, clock::FULL_TIME_MIN);
    }
}

//! Ball-carrier movement.
//!
//! The carrier drives toward the attacking goal at a role-dependent
//! rate, swerves around opponents spotted in a short look-ahead cone,
//! and squares up toward the goal mouth once inside shooting range.
//! The ball is snapped to the carrier after the move.

use rand::Rng;

use super::constants::{carrier, movement as mv};
use super::geometry::{cap_magnitude, Position};
use super::MatchEngine;
use crate::models::player::{PlayerRef, Role};

impl MatchEngine {
    pub(crate) fn move_carrier(&mut self, carrier_ref: PlayerRef) {
        let Some(pos) = self.player_position(carrier_ref) else {
            log::warn!("skipping carrier move for unknown player {}", carrier_ref);
            return;
        };
        let side = carrier_ref.side;
        let sign = side.attack_sign();
        let drive = match carrier_ref.role() {
            Role::Forward => carrier::DRIVE_FWD,
            Role::Midfielder => carrier::DRIVE_MID,
            Role::Defender => carrier::DRIVE_DEF,
            Role::Goalkeeper => carrier::DRIVE_GK,
        };
        let mut dx = sign * drive;
        let mut dy = 0.0f32;

        // Look-ahead: opponents in the cone force lateral evasion and
        // slow the dribble.
        let mut blocked = false;
        for (other_ref, other_pos) in self.all_positions() {
            if other_ref.side == side {
                continue;
            }
            let ahead = (other_pos.x - pos.x) * sign;
            if ahead > 0.0
                && ahead < carrier::LOOKAHEAD_DIST
                && (other_pos.y - pos.y).abs() < carrier::LOOKAHEAD_HALF_WIDTH
            {
                blocked = true;
                dy += if other_pos.y >= pos.y { -carrier::EVADE_STEP } else { carrier::EVADE_STEP };
            }
        }
        if blocked {
            dx *= carrier::BLOCKED_SLOWDOWN;
        }

        // Close to goal (or inside the wide shooting zone): cut toward
        // the mouth's center and push harder.
        let goal = Position::new(side.opponent_goal_x(), 0.5);
        if pos.distance(goal) < carrier::GOAL_APPROACH_DIST
            || side.progress(pos.x) > carrier::SHOOTING_ZONE_PROGRESS
        {
            dy += (0.5 - pos.y) * carrier::GOAL_CENTER_PULL;
            dx *= carrier::GOAL_PUSH_SCALE;
        }

        dx += self.rng.gen_range(-mv::JITTER..=mv::JITTER) * 0.5;
        dy += self.rng.gen_range(-mv::JITTER..=mv::JITTER) * 0.5;

        let (dx, dy) = cap_magnitude(dx, dy, mv::MAX_STEP);
        let new_pos = pos.offset(dx, dy);
        self.set_player_position(carrier_ref, new_pos);
        self.ball.position = new_pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::TeamSide;
    use uuid::Uuid;

    fn new_engine(seed: u64) -> MatchEngine {
        MatchEngine::new(Uuid::new_v4(), "Red", "Blue", seed).unwrap()
    }

    #[test]
    fn test_carrier_advances_toward_opponent_goal() {
        let mut engine = new_engine(31);
        let carrier_ref = PlayerRef::new(TeamSide::Home, 9);
        engine.possession = Some(carrier_ref);
        engine.set_player_position(carrier_ref, Position::new(0.40, 0.50));
        let before = engine.player_position(carrier_ref).unwrap();
        for _ in 0..20 {
            engine.move_carrier(carrier_ref);
        }
        let after = engine.player_position(carrier_ref).unwrap();
        assert!(after.x > before.x, "home carrier moved backwards");
        assert_eq!(engine.ball.position, after, "ball must follow the carrier");
    }

    #[test]
    fn test_away_carrier_advances_toward_home_goal() {
        let mut engine = new_engine(32);
        let carrier_ref = PlayerRef::new(TeamSide::Away, 9);
        engine.possession = Some(carrier_ref);
        engine.set_player_position(carrier_ref, Position::new(0.60, 0.50));
        let before = engine.player_position(carrier_ref).unwrap();
        for _ in 0..20 {
            engine.move_carrier(carrier_ref);
        }
        let after = engine.player_position(carrier_ref).unwrap();
        assert!(after.x < before.x);
    }

    #[test]
    fn test_blocked_carrier_evades_laterally() {
        let mut engine = new_engine(33);
        let carrier_ref = PlayerRef::new(TeamSide::Home, 9);
        let blocker_ref = PlayerRef::new(TeamSide::Away, 2);
        engine.possession = Some(carrier_ref);
        engine.set_player_position(carrier_ref, Position::new(0.50, 0.50));
        // Blocker dead ahead, slightly above the carrier's line.
        engine.set_player_position(blocker_ref, Position::new(0.53, 0.51));
        let before = engine.player_position(carrier_ref).unwrap();
        engine.move_carrier(carrier_ref);
        let after = engine.player_position(carrier_ref).unwrap();
        assert!(after.y < before.y, "carrier should swerve away from the blocker");
    }
}

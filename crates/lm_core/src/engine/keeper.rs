//! Goalkeeper behavior.
//!
//! Keepers never join the outfield force blend: they hold a small box
//! at the own goal, advance a step when the ball is far, damp-track
//! the ball's y inside the goal band, and occasionally dive at a ball
//! that is close and moving goalward. A dive landing within the save
//! radius claims the ball.

use rand::Rng;

use super::constants::{keeper as gk, movement as mv};
use super::geometry::{direction, Position};
use super::MatchEngine;
use crate::models::events::MatchEvent;
use crate::models::player::{PlayerRef, TeamSide};

impl MatchEngine {
    pub(crate) fn update_keeper(&mut self, side: TeamSide) {
        let keeper_ref = PlayerRef::new(side, 0);
        let Some(pos) = self.player_position(keeper_ref) else {
            log::warn!("skipping keeper update, no roster slot for {}", keeper_ref);
            return;
        };
        let ball_pos = self.ball.position;
        let (ball_vx, _) = self.ball.velocity;
        let own_goal_x = side.own_goal_x();
        let sign = side.attack_sign();

        // Hold the line with the ball in the own half, step out otherwise.
        let depth = if side.progress(ball_pos.x) < 0.5 { gk::HOLD_DEPTH } else { gk::ADVANCE_DEPTH };
        let x_target = own_goal_x + sign * depth;
        let mut nx = pos.x + (x_target - pos.x) * gk::X_DAMP;

        let y_target =
            ball_pos.y.clamp(0.5 - gk::TRACK_HALF_WIDTH, 0.5 + gk::TRACK_HALF_WIDTH);
        let mut ny = pos.y + (y_target - pos.y) * gk::Y_DAMP;

        let jitter = mv::JITTER * mv::KEEPER_JITTER_SCALE;
        nx += self.rng.gen_range(-jitter..=jitter);
        ny += self.rng.gen_range(-jitter..=jitter);

        // Dive at a nearby goalward ball.
        if self.possession.is_none() {
            let dist = pos.distance(ball_pos);
            let goalward = match side {
                TeamSide::Home => ball_vx < -gk::GOALWARD_SPEED,
                TeamSide::Away => ball_vx > gk::GOALWARD_SPEED,
            };
            if dist < gk::DIVE_RADIUS && goalward && self.rng.gen::<f32>() < gk::DIVE_CHANCE {
                let (ux, uy) = direction(Position::new(nx, ny), ball_pos);
                nx += ux * gk::DIVE_STEP;
                ny += uy * gk::DIVE_STEP;
                if Position::new(nx, ny).distance(ball_pos) < gk::SAVE_RADIUS {
                    self.possession = Some(keeper_ref);
                    self.ball.velocity = (0.0, 0.0);
                    let (ts, clock) = (self.timestamp_ms(), self.clock_min);
                    self.emit(MatchEvent::save(keeper_ref, ball_pos, ts, clock));
                }
            }
        }

        // Keepers stay inside their box.
        let (x_lo, x_hi) = match side {
            TeamSide::Home => (0.0, gk::BOX_DEPTH),
            TeamSide::Away => (1.0 - gk::BOX_DEPTH, 1.0),
        };
        let clamped = Position::new(
            nx.clamp(x_lo, x_hi),
            ny.clamp(0.5 - gk::BOX_HALF_WIDTH, 0.5 + gk::BOX_HALF_WIDTH),
        );
        self.set_player_position(keeper_ref, clamped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;
    use uuid::Uuid;

    fn new_engine(seed: u64) -> MatchEngine {
        MatchEngine::new(Uuid::new_v4(), "Red", "Blue", seed).unwrap()
    }

    #[test]
    fn test_keeper_never_leaves_box() {
        let mut engine = new_engine(21);
        engine.start().unwrap();
        engine.kick_ball().unwrap();
        let mut prev_holder = engine.possession;
        for _ in 0..400 {
            engine.tick().unwrap();
            let holder = engine.possession;
            if engine.status() != MatchStatus::InProgress {
                break;
            }
            for side in [TeamSide::Home, TeamSide::Away] {
                let keeper_ref = PlayerRef::new(side, 0);
                if holder == Some(keeper_ref) || prev_holder == Some(keeper_ref) {
                    continue; // carrying (or just stripped): box rule suspended this tick
                }
                let pos = engine.player_position(keeper_ref).unwrap();
                match side {
                    TeamSide::Home => assert!(pos.x <= gk::BOX_DEPTH + 1e-5),
                    TeamSide::Away => assert!(pos.x >= 1.0 - gk::BOX_DEPTH - 1e-5),
                }
                assert!((pos.y - 0.5).abs() <= gk::BOX_HALF_WIDTH + 1e-5);
            }
            prev_holder = holder;
        }
    }

    #[test]
    fn test_keeper_tracks_ball_y() {
        let mut engine = new_engine(4);
        engine.status = MatchStatus::InProgress;
        engine.possession = None;
        // Park a stationary ball high on the home side; no goalward
        // motion, so the keeper just shuffles across.
        engine.ball.position = Position::new(0.25, 0.68);
        engine.ball.velocity = (0.0, 0.0);
        for _ in 0..80 {
            engine.update_keeper(TeamSide::Home);
        }
        let pos = engine.player_position(PlayerRef::new(TeamSide::Home, 0)).unwrap();
        assert!(pos.y > 0.6, "keeper did not track ball y: {:?}", pos);
    }

    #[test]
    fn test_save_claims_ball_and_zeroes_velocity() {
        let mut engine = new_engine(9);
        engine.status = MatchStatus::InProgress;
        engine.possession = None;
        let keeper_ref = PlayerRef::new(TeamSide::Home, 0);
        // Ball right on top of the keeper, rolling at goal: some dive
        // within a few ticks must end inside the save radius.
        let mut saved = false;
        for _ in 0..100 {
            let keeper_pos = engine.player_position(keeper_ref).unwrap();
            engine.ball.position = Position::new(keeper_pos.x + 0.01, keeper_pos.y);
            engine.ball.velocity = (-0.01, 0.0);
            engine.update_keeper(TeamSide::Home);
            if engine.possession == Some(keeper_ref) {
                saved = true;
                break;
            }
        }
        assert!(saved, "keeper never completed a save");
        assert_eq!(engine.ball.velocity, (0.0, 0.0));
        let events = engine.drain_events();
        assert!(events.iter().any(|e| e.kind == crate::models::EventKind::Save));
    }
}

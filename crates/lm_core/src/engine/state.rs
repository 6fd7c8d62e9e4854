//! Match lifecycle transitions.
//!
//! NotStarted -> InProgress -> (GoalScored <-> InProgress)* -> Ended.
//! The goal celebration freezes all movement for a fixed tick count,
//! then restarts play: ball to the center spot, kickoff possession to
//! a random player of the conceding side, both teams reset onto their
//! current formations.

use rand::Rng;

use super::formation;
use super::geometry::Position;
use super::MatchEngine;
use crate::error::{MatchError, Result};
use crate::models::events::MatchEvent;
use crate::models::player::{PlayerRef, TeamSide, SQUAD_SIZE};
use crate::models::MatchStatus;

impl MatchEngine {
    pub fn start(&mut self) -> Result<()> {
        if self.status != MatchStatus::NotStarted {
            return Err(MatchError::InvalidTransition { from: self.status, command: "start" });
        }
        self.status = MatchStatus::InProgress;
        let (ts, clock) = (self.timestamp_ms(), self.clock_min);
        let ball_pos = self.ball.position;
        self.emit(MatchEvent::game_start(ball_pos, ts, clock));
        Ok(())
    }

    pub fn end(&mut self) -> Result<()> {
        if self.status == MatchStatus::Ended {
            return Err(MatchError::InvalidTransition { from: self.status, command: "end" });
        }
        self.finish();
        Ok(())
    }

    /// Terminal transition, shared by the end command and the
    /// full-time clock check.
    pub(crate) fn finish(&mut self) {
        self.status = MatchStatus::Ended;
        let (ts, clock) = (self.timestamp_ms(), self.clock_min);
        let ball_pos = self.ball.position;
        self.emit(MatchEvent::game_end(ball_pos, ts, clock));
    }

    /// One frozen celebration tick; restarts play when the countdown
    /// reaches zero.
    pub(crate) fn tick_celebration(&mut self) {
        if self.celebration_ticks_remaining > 0 {
            self.celebration_ticks_remaining -= 1;
        }
        if self.celebration_ticks_remaining == 0 {
            self.restart_after_goal();
        }
    }

    fn restart_after_goal(&mut self) {
        self.ball.position = Position::center();
        self.ball.velocity = (0.0, 0.0);

        let conceding =
            self.last_scoring_side.map(|s| s.opponent()).unwrap_or(TeamSide::Home);
        let kickoff_ordinal = self.rng.gen_range(1..SQUAD_SIZE);
        self.possession = Some(PlayerRef::new(conceding, kickoff_ordinal));

        let (home_shape, away_shape) = (self.home_shape, self.away_shape);
        formation::reset_team_to_formation(&mut self.home, home_shape, &mut self.rng);
        formation::reset_team_to_formation(&mut self.away, away_shape, &mut self.rng);

        self.status = MatchStatus::InProgress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;
    use uuid::Uuid;

    fn new_engine(seed: u64) -> MatchEngine {
        MatchEngine::new(Uuid::new_v4(), "Red", "Blue", seed).unwrap()
    }

    #[test]
    fn test_start_only_from_not_started() {
        let mut engine = new_engine(1);
        engine.start().unwrap();
        assert_eq!(engine.status(), MatchStatus::InProgress);
        assert!(engine.start().is_err());
        let events = engine.drain_events();
        assert_eq!(events.iter().filter(|e| e.kind == EventKind::GameStart).count(), 1);
    }

    #[test]
    fn test_end_is_terminal() {
        let mut engine = new_engine(2);
        engine.start().unwrap();
        engine.end().unwrap();
        assert_eq!(engine.status(), MatchStatus::Ended);
        assert!(engine.end().is_err());
        // Ticks still count but nothing moves.
        let before = engine.snapshot();
        engine.tick().unwrap();
        let after = engine.snapshot();
        assert_eq!(after.simulation_step, before.simulation_step + 1);
        assert_eq!(after.ball, before.ball);
    }

    #[test]
    fn test_celebration_sequence_and_kickoff_reset() {
        let mut engine = new_engine(3);
        engine.status = MatchStatus::InProgress;
        engine.possession = None;
        // Home scores into the away goal.
        engine.ball.position = Position::new(1.0, 0.5);
        engine.ball.velocity = (0.0, 0.0);
        engine.resolve_ball();
        assert_eq!(engine.status(), MatchStatus::GoalScored);

        // Frozen for exactly `celebration_ticks` ticks.
        let frozen_ball = engine.ball.position;
        for tick in 0..engine.tuning.celebration_ticks {
            assert_eq!(
                engine.status(),
                MatchStatus::GoalScored,
                "status flipped early at celebration tick {}",
                tick
            );
            engine.tick().unwrap();
            if tick + 1 < engine.tuning.celebration_ticks {
                assert_eq!(engine.ball.position, frozen_ball, "ball moved during celebration");
            }
        }

        // Kickoff reset: ball centered and still, conceding side restarts.
        assert_eq!(engine.status(), MatchStatus::InProgress);
        assert_eq!(engine.ball.position, Position::center());
        assert_eq!(engine.ball.velocity, (0.0, 0.0));
        let holder = engine.possession.unwrap();
        assert_eq!(holder.side, TeamSide::Away, "kickoff goes to the conceding side");

        // Both teams are back near their formation bases.
        for player in engine.team(TeamSide::Home).players.iter() {
            let base = engine.base_for(player.player_ref);
            assert!(player.position.distance(base) < 0.05);
        }
    }
}

//! Tactics advisor seam.
//!
//! The advisor is an external, best-effort collaborator (heuristic or
//! LLM-backed): it may be slow, may fail, may return nothing. The
//! trait is synchronous and is only ever invoked from the blocking
//! pool by the per-match refresh task, never from the tick loop, so
//! advisor latency can never stall a tick.
//!
//! Failure contract: `suggest_formation` returning `None` keeps the
//! previous shape; an empty `suggest_movements` map means the planner
//! falls back to rule-based movement.

use std::collections::HashMap;

use lm_core::{FormationShape, MatchSnapshot, PlayerRef, Role, TeamSide};

pub trait TacticsAdvisor: Send + Sync {
    fn suggest_formation(&self, snapshot: &MatchSnapshot, side: TeamSide) -> Option<FormationShape>;

    fn suggest_movements(
        &self,
        snapshot: &MatchSnapshot,
        side: TeamSide,
        has_possession: bool,
    ) -> HashMap<PlayerRef, (f32, f32)>;
}

/// Advisor that never suggests anything; the engine's rule-based
/// movement runs alone. Useful for tests and headless runs.
pub struct NullAdvisor;

impl TacticsAdvisor for NullAdvisor {
    fn suggest_formation(&self, _: &MatchSnapshot, _: TeamSide) -> Option<FormationShape> {
        None
    }

    fn suggest_movements(
        &self,
        _: &MatchSnapshot,
        _: TeamSide,
        _: bool,
    ) -> HashMap<PlayerRef, (f32, f32)> {
        HashMap::new()
    }
}

/// Built-in rule-of-thumb advisor.
///
/// Movement: midfielders drift toward the ball when defending,
/// forwards push up when attacking. Formation: chase the game when two
/// goals down late, park the bus when two up.
pub struct HeuristicAdvisor;

/// Suggested vectors are small nudges; the engine clamps them again on
/// arrival.
const NUDGE: f32 = 0.004;

impl TacticsAdvisor for HeuristicAdvisor {
    fn suggest_formation(&self, snapshot: &MatchSnapshot, side: TeamSide) -> Option<FormationShape> {
        let (home, away) = snapshot.score;
        let diff = match side {
            TeamSide::Home => home as i32 - away as i32,
            TeamSide::Away => away as i32 - home as i32,
        };
        if snapshot.clock_min > 60.0 && diff <= -2 {
            Some(FormationShape::F343)
        } else if diff >= 2 {
            Some(FormationShape::F532)
        } else {
            None
        }
    }

    fn suggest_movements(
        &self,
        snapshot: &MatchSnapshot,
        side: TeamSide,
        has_possession: bool,
    ) -> HashMap<PlayerRef, (f32, f32)> {
        let ball = snapshot.ball;
        let sign = side.attack_sign();
        snapshot
            .side_players(side)
            .filter(|p| !p.player_ref.is_goalkeeper())
            .filter_map(|p| {
                let hint = match (p.player_ref.role(), has_possession) {
                    (Role::Forward, true) => (sign * NUDGE, 0.0),
                    (Role::Midfielder, false) => {
                        let dx = (ball.x - p.position.x).clamp(-NUDGE, NUDGE);
                        let dy = (ball.y - p.position.y).clamp(-NUDGE, NUDGE);
                        (dx, dy)
                    }
                    _ => return None,
                };
                Some((p.player_ref, hint))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_core::MatchEngine;
    use uuid::Uuid;

    fn snapshot() -> MatchSnapshot {
        MatchEngine::new(Uuid::new_v4(), "Red", "Blue", 5).unwrap().snapshot()
    }

    #[test]
    fn test_null_advisor_suggests_nothing() {
        let snap = snapshot();
        assert!(NullAdvisor.suggest_formation(&snap, TeamSide::Home).is_none());
        assert!(NullAdvisor.suggest_movements(&snap, TeamSide::Home, true).is_empty());
    }

    #[test]
    fn test_heuristic_hints_are_bounded_and_off_keeper() {
        let snap = snapshot();
        for has_possession in [true, false] {
            let hints = HeuristicAdvisor.suggest_movements(&snap, TeamSide::Away, has_possession);
            for (player_ref, (dx, dy)) in hints {
                assert!(!player_ref.is_goalkeeper());
                assert!(dx.abs() <= NUDGE + 1e-6);
                assert!(dy.abs() <= NUDGE + 1e-6);
            }
        }
    }

    #[test]
    fn test_heuristic_chases_the_game_when_trailing_late() {
        let mut snap = snapshot();
        snap.clock_min = 75.0;
        snap.score = (0, 2);
        assert_eq!(
            HeuristicAdvisor.suggest_formation(&snap, TeamSide::Home),
            Some(FormationShape::F343)
        );
        assert_eq!(
            HeuristicAdvisor.suggest_formation(&snap, TeamSide::Away),
            Some(FormationShape::F532)
        );
    }
}

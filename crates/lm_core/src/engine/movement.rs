//! Outfield movement planner.
//!
//! Each tick every non-carrier outfield player gets a displacement
//! blended from formation adherence, possession-aware forward bias,
//! ball/possessor interaction, opponent pressing, teammate avoidance,
//! naturalism jitter and (when present) the advisor hint. All new
//! positions are computed from one snapshot and applied as a batch so
//! iteration order cannot bias the result.

use std::collections::HashMap;

use rand::Rng;

use super::constants::{field, movement as mv};
use super::geometry::{cap_magnitude, direction, Position};
use super::MatchEngine;
use crate::models::player::{PlayerRef, Role, TeamSide};

impl MatchEngine {
    /// Move all players for one tick: outfield batch, then keepers,
    /// then the ball carrier (which also drags the ball along).
    pub(crate) fn plan_and_move_players(&mut self) {
        let positions = self.all_positions();
        let ball_pos = self.ball.position;
        let possession = self.possession;
        let possession_side = possession.map(|r| r.side);
        let possessor_pos = possession.and_then(|r| self.player_position(r));

        let chase_ranks = if possession.is_none() {
            chase_ranks(&positions, ball_pos)
        } else {
            HashMap::new()
        };

        let mut moved: Vec<(PlayerRef, Position)> = Vec::with_capacity(positions.len());
        for (player_ref, pos) in &positions {
            if possession == Some(*player_ref) || player_ref.is_goalkeeper() {
                continue;
            }
            let (dx, dy) = self.outfield_displacement(
                *player_ref,
                *pos,
                ball_pos,
                possession_side,
                possessor_pos,
                &positions,
                &chase_ranks,
            );
            let (dx, dy) = cap_magnitude(dx, dy, mv::MAX_STEP);
            moved.push((*player_ref, pos.offset(dx, dy)));
        }
        for (player_ref, new_pos) in moved {
            self.set_player_position(player_ref, new_pos);
        }

        for side in [TeamSide::Home, TeamSide::Away] {
            if possession == Some(PlayerRef::new(side, 0)) {
                continue; // carrier rule covers a keeper on the ball
            }
            self.update_keeper(side);
        }

        if let Some(carrier) = self.possession {
            self.move_carrier(carrier);
        }
    }

    fn outfield_displacement(
        &mut self,
        player_ref: PlayerRef,
        pos: Position,
        ball_pos: Position,
        possession_side: Option<TeamSide>,
        possessor_pos: Option<Position>,
        positions: &[(PlayerRef, Position)],
        chase_ranks: &HashMap<PlayerRef, usize>,
    ) -> (f32, f32) {
        let role = player_ref.role();
        let side = player_ref.side;
        let sign = side.attack_sign();
        let attacking = possession_side == Some(side);

        // (1) Formation adherence. Forwards hold shape harder off the
        // ball; defenders are allowed forward drift while attacking.
        let base = self.base_for(player_ref);
        let mut pull = mv::FORMATION_PULL;
        if !attacking && role == Role::Forward {
            pull *= mv::FORWARD_OFF_BALL_SCALE;
        }
        if attacking && role == Role::Defender {
            pull *= mv::DEFENDER_ATTACKING_SCALE;
        }
        let form = ((base.x - pos.x) * pull, (base.y - pos.y) * pull);

        // (2) Forward bias while the team holds the ball.
        let mut fwd = (0.0f32, 0.0f32);
        if attacking {
            let mag = match role {
                Role::Forward => mv::FORWARD_BIAS_FWD,
                Role::Midfielder => mv::FORWARD_BIAS_MID,
                Role::Defender => mv::FORWARD_BIAS_DEF,
                Role::Goalkeeper => 0.0,
            };
            fwd.0 = sign * mag;
        }

        // (3) Ball / possessor interaction.
        let mut ball_term = (0.0f32, 0.0f32);
        match possession_side {
            Some(ps) if ps == side => {
                if let Some(pp) = possessor_pos {
                    if role != Role::Forward && pos.distance(ball_pos) < mv::SUPPORT_RADIUS {
                        // Offer a passing lane just behind and beside the carrier.
                        let lane_y = if pos.y < pp.y {
                            pp.y - mv::SUPPORT_LATERAL_OFFSET
                        } else {
                            pp.y + mv::SUPPORT_LATERAL_OFFSET
                        };
                        let target =
                            Position::new(pp.x - sign * mv::SUPPORT_BEHIND_OFFSET, lane_y);
                        ball_term = (
                            (target.x - pos.x) * mv::SUPPORT_PULL,
                            (target.y - pos.y) * mv::SUPPORT_PULL,
                        );
                    } else if role == Role::Forward {
                        // Stretch into the space ahead of the carrier.
                        let target = Position::new(pp.x + sign * mv::RUN_AHEAD_OFFSET, pos.y);
                        ball_term = (
                            (target.x - pos.x) * mv::RUN_AHEAD_PULL,
                            (target.y - pos.y) * mv::RUN_AHEAD_PULL,
                        );
                    }
                }
            }
            None => {
                // Loose ball: only the closest few commit to the chase.
                if chase_ranks.get(&player_ref).is_some_and(|rank| *rank < mv::CHASE_COUNT) {
                    let dist = pos.distance(ball_pos);
                    let ball_progress = side.progress(ball_pos.x);
                    let relevance = match role {
                        Role::Defender if ball_progress < field::OWN_THIRD => 1.2,
                        Role::Forward if ball_progress > field::FINAL_THIRD => 1.2,
                        Role::Midfielder => 1.1,
                        _ => 0.8,
                    };
                    let mag =
                        (mv::CHASE_GAIN / (dist + mv::CHASE_SOFTEN)).min(mv::CHASE_CAP) * relevance;
                    let (ux, uy) = direction(pos, ball_pos);
                    ball_term = (ux * mag, uy * mag);
                }
            }
            _ => {}
        }

        // (4) Pressing the opposing carrier. Rare when the ball sits
        // deep in opponent territory.
        let mut press = (0.0f32, 0.0f32);
        if let (Some(ps), Some(pp)) = (possession_side, possessor_pos) {
            if ps != side && matches!(role, Role::Defender | Role::Midfielder) {
                let carrier_progress = side.progress(pp.x);
                let chance = if carrier_progress > field::FINAL_THIRD {
                    mv::PRESS_CHANCE_DEEP
                } else {
                    mv::PRESS_CHANCE
                };
                if self.rng.gen::<f32>() < chance {
                    let (ux, uy) = direction(pos, pp);
                    press = (ux * mv::PRESS_PULL, uy * mv::PRESS_PULL);
                }
            }
        }

        // (5) Teammate avoidance.
        let mut avoid = (0.0f32, 0.0f32);
        for (other_ref, other_pos) in positions {
            if *other_ref == player_ref || other_ref.side != side {
                continue;
            }
            let dist = pos.distance(*other_pos);
            if dist < mv::AVOID_RADIUS && dist > f32::EPSILON {
                let mag = (mv::AVOID_GAIN / (dist + 0.001)).min(mv::AVOID_CAP);
                let (ux, uy) = direction(*other_pos, pos);
                avoid.0 += ux * mag;
                avoid.1 += uy * mag;
            }
        }
        let avoid = cap_magnitude(avoid.0, avoid.1, mv::AVOID_CAP);

        // (6) Naturalism jitter: bounded random plus a per-player phase.
        let phase = self.simulation_step as f32 * mv::JITTER_PHASE_STEP
            + player_ref.ordinal as f32 * 0.7
            + if side == TeamSide::Home { 0.0 } else { 1.3 };
        let mut jx = self.rng.gen_range(-mv::JITTER..=mv::JITTER)
            + phase.sin() * mv::JITTER_PHASE_AMP;
        let mut jy = self.rng.gen_range(-mv::JITTER..=mv::JITTER)
            + phase.cos() * mv::JITTER_PHASE_AMP;

        // (7) Advisor hint: replaces (1)-(3) with a reduced formation
        // pull kept, so a hint cannot pull a player far off-role.
        if let Some(hint) = self.hints.get(&player_ref).copied() {
            if hint.age_ticks > mv::HINT_STALE_TICKS {
                jx += self.rng.gen_range(-mv::HINT_STALE_JITTER..=mv::HINT_STALE_JITTER);
                jy += self.rng.gen_range(-mv::HINT_STALE_JITTER..=mv::HINT_STALE_JITTER);
            }
            return (
                hint.dx + form.0 * mv::HINT_FORMATION_SCALE + press.0 + avoid.0 + jx,
                hint.dy + form.1 * mv::HINT_FORMATION_SCALE + press.1 + avoid.1 + jy,
            );
        }

        (
            form.0 + fwd.0 + ball_term.0 + press.0 + avoid.0 + jx,
            form.1 + fwd.1 + ball_term.1 + press.1 + avoid.1 + jy,
        )
    }
}

/// Per-team ranking of outfield players by distance to a loose ball.
fn chase_ranks(
    positions: &[(PlayerRef, Position)],
    ball_pos: Position,
) -> HashMap<PlayerRef, usize> {
    let mut ranks = HashMap::new();
    for side in [TeamSide::Home, TeamSide::Away] {
        let mut by_dist: Vec<(PlayerRef, f32)> = positions
            .iter()
            .filter(|(r, _)| r.side == side && !r.is_goalkeeper())
            .map(|(r, p)| (*r, p.distance(ball_pos)))
            .collect();
        by_dist.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (rank, (player_ref, _)) in by_dist.into_iter().enumerate() {
            ranks.insert(player_ref, rank);
        }
    }
    ranks
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
    fn test_chase_ranks_orders_by_distance_per_team() {
        let engine = new_engine(1);
        let positions = engine.all_positions();
        let ranks = chase_ranks(&positions, engine.ball().position);
        // 10 outfield players ranked per side, keepers excluded.
        assert_eq!(ranks.len(), 20);
        for side in [TeamSide::Home, TeamSide::Away] {
            assert!(!ranks.contains_key(&PlayerRef::new(side, 0)));
            let mut side_ranks: Vec<usize> =
                ranks.iter().filter(|(r, _)| r.side == side).map(|(_, rank)| *rank).collect();
            side_ranks.sort_unstable();
            assert_eq!(side_ranks, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_displacement_capped_per_tick() {
        let mut engine = new_engine(77);
        engine.start().unwrap();
        for _ in 0..50 {
            let before = engine.all_positions();
            engine.tick().unwrap();
            if engine.status() != MatchStatus::InProgress {
                break;
            }
            for (player_ref, old_pos) in before {
                if player_ref.is_goalkeeper() {
                    continue; // the dive step has its own, larger bound
                }
                let new_pos = engine.player_position(player_ref).unwrap();
                // Carrier shares the same cap; clamping at the field
                // edge only shortens the step.
                assert!(
                    old_pos.distance(new_pos) <= mv::MAX_STEP + 1e-5,
                    "{} moved too far in one tick",
                    player_ref
                );
            }
        }
    }

    #[test]
    fn test_hint_bounds_drift_from_base() {
        // A constant max hint pushing a defender upfield must not drag
        // him past the reduced formation pull's equilibrium.
        let mut engine = new_engine(13);
        engine.start().unwrap();
        let target = PlayerRef::new(TeamSide::Home, 2);
        let mut hints = HashMap::new();
        hints.insert(target, (mv::HINT_CLAMP, 0.0f32));
        for _ in 0..400 {
            engine.apply_hints(TeamSide::Home, &hints);
            engine.tick().unwrap();
        }
        let base = engine.base_for(target);
        let pos = engine.player_position(target).unwrap();
        // The residual formation pull balances a max hint at offset
        // HINT_CLAMP / (FORMATION_PULL * HINT_FORMATION_SCALE); allow
        // headroom for the pressing/avoidance/jitter terms.
        let max_drift = mv::HINT_CLAMP / (mv::FORMATION_PULL * mv::HINT_FORMATION_SCALE) + 0.30;
        assert!(
            (pos.x - base.x).abs() < max_drift,
            "hint dragged player {} from base {:?} to {:?}",
            target,
            base,
            pos
        );
    }
}

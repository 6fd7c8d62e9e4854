//! Per-tick ball and possession resolution.
//!
//! Single authority for who has the ball and what they do with it:
//! loose-ball pickup, tackle contests, shot/pass/retain decisions and
//! the goal-line check. The goal-line check is the only path that can
//! award a goal; shot resolution merely launches the ball at (or past)
//! the mouth.

use rand::Rng;

use super::constants::{field, passing, shooting, tackle};
use super::geometry::{direction, in_goal_mouth, Position};
use super::MatchEngine;
use crate::models::events::MatchEvent;
use crate::models::player::{PlayerRef, Role, TeamSide, SQUAD_SIZE};
use crate::models::MatchStatus;

impl MatchEngine {
    pub(crate) fn resolve_ball(&mut self) {
        match self.possession {
            None => {
                self.ball.integrate();
                self.try_pickup();
            }
            Some(carrier_ref) => {
                if let Some(pos) = self.player_position(carrier_ref) {
                    self.ball.position = pos;
                    self.ball.velocity = (0.0, 0.0);
                }
                let keeps = self.resolve_tackles(carrier_ref);
                if keeps && self.possession == Some(carrier_ref) {
                    self.resolve_carrier_action(carrier_ref);
                }
            }
        }
        self.check_goal_line();
    }

    /// First player within the control radius takes a loose ball.
    /// Scan order is deterministic: home ordinals 0-10, then away.
    fn try_pickup(&mut self) {
        for side in [TeamSide::Home, TeamSide::Away] {
            for ordinal in 0..SQUAD_SIZE {
                let player_ref = PlayerRef::new(side, ordinal);
                let Some(pos) = self.player_position(player_ref) else { continue };
                if pos.distance(self.ball.position) <= super::constants::ball::CONTROL_RADIUS {
                    self.possession = Some(player_ref);
                    self.ball.position = pos;
                    self.ball.velocity = (0.0, 0.0);
                    return;
                }
            }
        }
    }

    // ===========================================
    // Tackle contest
    // ===========================================

    fn on_tackle_cooldown(&self, player_ref: PlayerRef) -> bool {
        self.tackle_cooldowns
            .get(&player_ref)
            .is_some_and(|expiry| *expiry > self.simulation_step)
    }

    fn arm_tackle_cooldown(&mut self, player_ref: PlayerRef) {
        let expiry = self.simulation_step + self.tuning.tackle_cooldown_ticks;
        self.tackle_cooldowns.insert(player_ref, expiry);
    }

    /// Returns false when a tackle knocked the ball loose.
    fn resolve_tackles(&mut self, carrier_ref: PlayerRef) -> bool {
        let Some(carrier_pos) = self.player_position(carrier_ref) else { return true };
        if self.on_tackle_cooldown(carrier_ref) {
            return true;
        }
        let radius = self.tuning.tackle_radius;
        let mut candidates: Vec<(PlayerRef, f32)> = self
            .all_positions()
            .into_iter()
            .filter(|(r, _)| r.side != carrier_ref.side && !self.on_tackle_cooldown(*r))
            .map(|(r, p)| (r, p.distance(carrier_pos)))
            .filter(|(_, dist)| *dist <= radius)
            .collect();
        // Defenders first, then midfielders, forwards, keepers; closer wins ties.
        candidates.sort_by(|a, b| {
            a.0.role()
                .tackle_priority()
                .cmp(&b.0.role().tackle_priority())
                .then(a.1.total_cmp(&b.1))
        });
        candidates.truncate(self.tuning.tackle_max_attempts);

        for (tackler_ref, dist) in candidates {
            // Both participants cool down whatever the outcome; this is
            // what stops tackle spam on consecutive ticks.
            self.arm_tackle_cooldown(tackler_ref);
            self.arm_tackle_cooldown(carrier_ref);

            let bonus = match tackler_ref.role() {
                Role::Defender => tackle::BONUS_DEFENDER,
                Role::Midfielder => tackle::BONUS_MIDFIELDER,
                Role::Forward => tackle::BONUS_FORWARD,
                Role::Goalkeeper => tackle::BONUS_KEEPER,
            };
            let chance = self.tuning.tackle_base_chance * bonus * (1.0 - dist / radius);
            if self.rng.gen::<f32>() < chance {
                self.possession = None;
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                let speed = self.rng.gen_range(tackle::IMPULSE_MIN..=tackle::IMPULSE_MAX);
                self.ball.velocity = (angle.cos() * speed, angle.sin() * speed);
                let (ts, clock) = (self.timestamp_ms(), self.clock_min);
                self.emit(MatchEvent::tackle(tackler_ref, carrier_ref, carrier_pos, ts, clock));
                return false;
            }
        }
        true
    }

    // ===========================================
    // Carrier decision: shoot, pass, retain
    // ===========================================

    fn resolve_carrier_action(&mut self, carrier_ref: PlayerRef) {
        let Some(pos) = self.player_position(carrier_ref) else { return };
        let side = carrier_ref.side;
        let goal = Position::new(side.opponent_goal_x(), field::CENTER_Y);

        if pos.distance(goal) <= self.tuning.shot_range {
            self.take_shot(carrier_ref, pos, goal);
            return;
        }

        let progress = side.progress(pos.x);
        let mut chance = match carrier_ref.role() {
            Role::Midfielder => passing::BASE_MID,
            Role::Defender if progress < field::OWN_THIRD => passing::BASE_DEF_OWN_THIRD,
            Role::Defender => passing::BASE_DEF,
            Role::Forward => passing::BASE_FWD,
            Role::Goalkeeper => passing::BASE_GK,
        };
        let under_pressure = self
            .all_positions()
            .iter()
            .any(|(r, p)| r.side != side && p.distance(pos) <= passing::PRESSURE_RADIUS);
        if under_pressure {
            chance += passing::PRESSURE_BONUS;
        }

        let targets = self.pass_targets(carrier_ref, pos);
        if !targets.is_empty() {
            if self.rng.gen::<f32>() < chance {
                let receiver = targets[self.rng.gen_range(0..targets.len())];
                self.possession = Some(receiver);
                if let Some(receiver_pos) = self.player_position(receiver) {
                    self.ball.position = receiver_pos;
                }
                let (ts, clock) = (self.timestamp_ms(), self.clock_min);
                self.emit(MatchEvent::pass(carrier_ref, receiver, pos, ts, clock));
            }
        } else if self.rng.gen::<f32>() < self.tuning.pass_drop_chance {
            // No outlet at all: cough it up with a clearing ball.
            self.possession = None;
            let vy = self.rng.gen_range(-0.004..=0.004);
            self.ball.velocity = (side.attack_sign() * passing::CLEAR_SPEED, vy);
            let (ts, clock) = (self.timestamp_ms(), self.clock_min);
            self.emit(MatchEvent::possession_lost(carrier_ref, pos, ts, clock));
        }
    }

    fn take_shot(&mut self, shooter_ref: PlayerRef, pos: Position, goal: Position) {
        self.possession = None;
        if self.rng.gen::<f32>() < self.tuning.shot_score_chance {
            // On target: launch at a point inside the mouth and let the
            // goal-line check score it.
            let aim_y = field::CENTER_Y
                + self.rng.gen_range(-shooting::TARGET_SPREAD..=shooting::TARGET_SPREAD);
            let (ux, uy) = direction(pos, Position::new(goal.x, aim_y));
            self.ball.velocity = (ux * shooting::ON_TARGET_SPEED, uy * shooting::ON_TARGET_SPEED);
        } else {
            let spread =
                self.rng.gen_range(shooting::MISS_SPREAD_MIN..=shooting::MISS_SPREAD_MAX);
            let wide_y = if self.rng.gen::<bool>() {
                field::CENTER_Y + spread
            } else {
                field::CENTER_Y - spread
            };
            let (ux, uy) = direction(pos, Position::new(goal.x, wide_y));
            self.ball.velocity = (ux * shooting::MISS_SPEED, uy * shooting::MISS_SPEED);
            let (ts, clock) = (self.timestamp_ms(), self.clock_min);
            self.emit(MatchEvent::shot(shooter_ref, pos, ts, clock));
        }
    }

    /// Teammates in passing range that are further from the own goal
    /// than the passer; midfielders may hit forwards slightly behind.
    fn pass_targets(&self, carrier_ref: PlayerRef, pos: Position) -> Vec<PlayerRef> {
        let side = carrier_ref.side;
        let passer_progress = side.progress(pos.x);
        self.team(side)
            .players
            .iter()
            .filter(|p| p.player_ref != carrier_ref)
            .filter(|p| p.position.distance(pos) <= passing::RANGE)
            .filter(|p| {
                let slack = if carrier_ref.role() == Role::Midfielder
                    && p.player_ref.role() == Role::Forward
                {
                    passing::BEHIND_SLACK
                } else {
                    0.0
                };
                side.progress(p.position.x) > passer_progress - slack
            })
            .map(|p| p.player_ref)
            .collect()
    }

    // ===========================================
    // Goal detection (single path)
    // ===========================================

    fn check_goal_line(&mut self) {
        if self.status != MatchStatus::InProgress {
            return;
        }
        let ball_pos = self.ball.position;
        let scorer_side = if ball_pos.x <= field::MIN + field::GOAL_LINE_MARGIN
            && in_goal_mouth(ball_pos.y)
        {
            Some(TeamSide::Away) // across the home goal line
        } else if ball_pos.x >= field::MAX - field::GOAL_LINE_MARGIN && in_goal_mouth(ball_pos.y) {
            Some(TeamSide::Home)
        } else {
            None
        };
        let Some(side) = scorer_side else { return };

        if let Some(last) = self.last_goal_step {
            if self.simulation_step < last + self.tuning.goal_cooldown_ticks {
                log::debug!(
                    "match {}: goal detection skipped inside cooldown window (step {})",
                    self.id,
                    self.simulation_step
                );
                return;
            }
        }
        self.award_goal(side);
    }

    fn award_goal(&mut self, side: TeamSide) {
        let mouth = Position::new(
            side.opponent_goal_x(),
            self.ball.position.y.clamp(
                field::CENTER_Y - field::GOAL_MOUTH_HALF_WIDTH,
                field::CENTER_Y + field::GOAL_MOUTH_HALF_WIDTH,
            ),
        );
        let scorer = self.nearest_attacker(side, mouth);
        self.team_mut(side).score += 1;
        self.ball.position = mouth;
        self.ball.velocity = (0.0, 0.0);
        self.possession = None;
        self.status = MatchStatus::GoalScored;
        self.last_scoring_side = Some(side);
        self.last_goal_step = Some(self.simulation_step);
        self.celebration_ticks_remaining = self.tuning.celebration_ticks;
        let (ts, clock) = (self.timestamp_ms(), self.clock_min);
        self.emit(MatchEvent::goal(side, scorer, mouth, ts, clock));
    }

    /// Best-effort scorer attribution: nearest attacking player.
    fn nearest_attacker(&self, side: TeamSide, pos: Position) -> Option<PlayerRef> {
        self.team(side)
            .players
            .iter()
            .min_by(|a, b| a.position.distance(pos).total_cmp(&b.position.distance(pos)))
            .map(|p| p.player_ref)
    }
}

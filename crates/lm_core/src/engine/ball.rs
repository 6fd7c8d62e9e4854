//! Ball state and loose-ball physics.

use serde::{Deserialize, Serialize};

use super::constants::ball;
use super::geometry::Position;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub position: Position,
    /// Per-tick displacement while loose; zeroed when possessed.
    pub velocity: (f32, f32),
}

impl Ball {
    pub fn at_center() -> Ball {
        Ball { position: Position::center(), velocity: (0.0, 0.0) }
    }

    pub fn speed(&self) -> f32 {
        let (vx, vy) = self.velocity;
        (vx * vx + vy * vy).sqrt()
    }

    /// Advance a loose ball one tick: move by velocity, apply friction
    /// decay, stop below the threshold. Position stays on the field.
    pub(crate) fn integrate(&mut self) {
        if self.speed() < ball::STOP_SPEED {
            self.velocity = (0.0, 0.0);
            return;
        }
        let (vx, vy) = self.velocity;
        self.position = self.position.offset(vx, vy);
        self.velocity = (vx * ball::FRICTION_RETAIN, vy * ball::FRICTION_RETAIN);
    }

    pub(crate) fn kick(&mut self, vx: f32, vy: f32) {
        self.velocity = (vx, vy);
    }
}

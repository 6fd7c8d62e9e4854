//! Field geometry.
//!
//! All simulation coordinates are normalized to the unit square:
//! x runs goal-to-goal (0 = home goal line, 1 = away goal line),
//! y across the width (0.5 = center). (0.0, 0.5) is the home goal
//! mouth, (1.0, 0.5) the away goal mouth.

use serde::{Deserialize, Serialize};

use super::constants::field;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Construct a position, clamped to the field.
    pub fn new(x: f32, y: f32) -> Position {
        Position { x, y }.clamped()
    }

    pub fn center() -> Position {
        Position { x: field::CENTER_X, y: field::CENTER_Y }
    }

    pub fn clamped(self) -> Position {
        Position { x: self.x.clamp(field::MIN, field::MAX), y: self.y.clamp(field::MIN, field::MAX) }
    }

    pub fn distance(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Apply a displacement and clamp back onto the field.
    pub fn offset(self, dx: f32, dy: f32) -> Position {
        Position { x: self.x + dx, y: self.y + dy }.clamped()
    }

    pub fn in_bounds(&self) -> bool {
        (field::MIN..=field::MAX).contains(&self.x) && (field::MIN..=field::MAX).contains(&self.y)
    }
}

/// Unit direction from `from` toward `to`; zero vector when coincident.
pub fn direction(from: Position, to: Position) -> (f32, f32) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len > f32::EPSILON {
        (dx / len, dy / len)
    } else {
        (0.0, 0.0)
    }
}

/// Scale a displacement down to `max_len` when it exceeds it.
pub fn cap_magnitude(dx: f32, dy: f32, max_len: f32) -> (f32, f32) {
    let len = (dx * dx + dy * dy).sqrt();
    if len > max_len && len > f32::EPSILON {
        let scale = max_len / len;
        (dx * scale, dy * scale)
    } else {
        (dx, dy)
    }
}

/// Whether a y coordinate lies inside the goal-mouth band.
pub fn in_goal_mouth(y: f32) -> bool {
    (y - field::CENTER_Y).abs() <= field::GOAL_MOUTH_HALF_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_to_field() {
        let p = Position::new(-0.3, 1.7);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 1.0);
        assert!(p.in_bounds());
    }

    #[test]
    fn test_offset_stays_in_bounds() {
        let p = Position::new(0.98, 0.02).offset(0.1, -0.1);
        assert!(p.in_bounds());
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_cap_magnitude() {
        let (dx, dy) = cap_magnitude(0.3, 0.4, 0.1);
        let len = (dx * dx + dy * dy).sqrt();
        assert!((len - 0.1).abs() < 1e-6);

        // Under the cap: unchanged
        let (dx, dy) = cap_magnitude(0.001, 0.002, 0.1);
        assert_eq!((dx, dy), (0.001, 0.002));
    }

    #[test]
    fn test_goal_mouth_band() {
        assert!(in_goal_mouth(0.5));
        assert!(in_goal_mouth(0.5 + field::GOAL_MOUTH_HALF_WIDTH));
        assert!(!in_goal_mouth(0.5 + field::GOAL_MOUTH_HALF_WIDTH + 0.01));
        assert!(!in_goal_mouth(0.2));
    }
}

//! Formation base positions.
//!
//! Each shape defines an explicit per-ordinal base position table,
//! home-oriented (x toward the away goal); the away side mirrors
//! x -> 1 - x. Ordinal role bands are structural (0 keeper, 1-4
//! defenders, 5-7 midfielders, 8-10 forwards), so shapes that need a
//! different defensive/midfield count repurpose ordinals into wide or
//! wingback slots in their own table.
//!
//! Coordinates are normalized: x = 0 own goal line, y = 0.5 center.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::constants::formation;
use super::geometry::Position;
use crate::models::player::{TeamSide, SQUAD_SIZE};
use crate::models::team::{FormationShape, Team};
use crate::models::PlayerRef;

/// Home-oriented base positions for a shape, indexed by ordinal.
pub fn base_layout(shape: FormationShape) -> [Position; 11] {
    match shape {
        FormationShape::F442 => layout_442(),
        FormationShape::F433 => layout_433(),
        FormationShape::F4231 => layout_4231(),
        FormationShape::F352 => layout_352(),
        FormationShape::F343 => layout_343(),
        FormationShape::F532 => layout_532(),
    }
}

/// Base position for one player; the away side mirrors the x axis.
pub fn base_position(shape: FormationShape, player_ref: PlayerRef) -> Position {
    let home = base_layout(shape)[player_ref.ordinal as usize % SQUAD_SIZE as usize];
    match player_ref.side {
        TeamSide::Home => home,
        TeamSide::Away => Position::new(1.0 - home.x, home.y),
    }
}

/// Snap every player to its base position plus small jitter, clamped to
/// the team's own half and the field. Used at kickoff and after goals.
pub fn reset_team_to_formation(team: &mut Team, shape: FormationShape, rng: &mut ChaCha8Rng) {
    let side = team.side;
    for player in team.players.iter_mut() {
        let base = base_position(shape, player.player_ref);
        let jx = rng.gen_range(-formation::RESET_JITTER..=formation::RESET_JITTER);
        let jy = rng.gen_range(-formation::RESET_JITTER..=formation::RESET_JITTER);
        let x = match side {
            TeamSide::Home => (base.x + jx).clamp(formation::HALF_MARGIN, 0.5 - formation::HALF_MARGIN),
            TeamSide::Away => (base.x + jx).clamp(0.5 + formation::HALF_MARGIN, 1.0 - formation::HALF_MARGIN),
        };
        player.position = Position::new(x, base.y + jy);
    }
}

fn p(x: f32, y: f32) -> Position {
    Position::new(x, y)
}

/// 4-4-2: ordinal 8 drops into the right-mid slot, 9/10 pair up front.
fn layout_442() -> [Position; 11] {
    [
        p(0.05, 0.50), // GK
        p(0.22, 0.16), // LB
        p(0.18, 0.38), // LCB
        p(0.18, 0.62), // RCB
        p(0.22, 0.84), // RB
        p(0.48, 0.15), // LM
        p(0.45, 0.38), // LCM
        p(0.45, 0.62), // RCM
        p(0.48, 0.85), // RM
        p(0.76, 0.36), // LF
        p(0.76, 0.64), // RF
    ]
}

/// 4-3-3: the natural fit for the ordinal role bands.
fn layout_433() -> [Position; 11] {
    [
        p(0.05, 0.50), // GK
        p(0.22, 0.16), // LB
        p(0.18, 0.38), // LCB
        p(0.18, 0.62), // RCB
        p(0.22, 0.84), // RB
        p(0.45, 0.30), // LCM
        p(0.42, 0.50), // CM
        p(0.45, 0.70), // RCM
        p(0.75, 0.14), // LW
        p(0.80, 0.50), // ST
        p(0.75, 0.86), // RW
    ]
}

/// 4-2-3-1: double pivot, attacking trio behind a lone striker.
fn layout_4231() -> [Position; 11] {
    [
        p(0.05, 0.50), // GK
        p(0.22, 0.16), // LB
        p(0.18, 0.38), // LCB
        p(0.18, 0.62), // RCB
        p(0.22, 0.84), // RB
        p(0.38, 0.38), // LDM
        p(0.38, 0.62), // RDM
        p(0.60, 0.50), // CAM
        p(0.62, 0.20), // LAM
        p(0.80, 0.50), // ST
        p(0.62, 0.80), // RAM
    ]
}

/// 3-5-2: back three; ordinals 4 and 8 become the wingbacks.
fn layout_352() -> [Position; 11] {
    [
        p(0.05, 0.50), // GK
        p(0.18, 0.28), // LCB
        p(0.16, 0.50), // CB
        p(0.18, 0.72), // RCB
        p(0.42, 0.10), // LWB
        p(0.40, 0.32), // LCM
        p(0.38, 0.50), // CM
        p(0.40, 0.68), // RCM
        p(0.42, 0.90), // RWB
        p(0.76, 0.38), // LF
        p(0.76, 0.62), // RF
    ]
}

/// 3-4-3: back three; ordinals 4 and 7 hold the wide-mid slots.
fn layout_343() -> [Position; 11] {
    [
        p(0.05, 0.50), // GK
        p(0.18, 0.28), // LCB
        p(0.16, 0.50), // CB
        p(0.18, 0.72), // RCB
        p(0.45, 0.12), // LM
        p(0.42, 0.38), // LCM
        p(0.42, 0.62), // RCM
        p(0.45, 0.88), // RM
        p(0.75, 0.18), // LW
        p(0.80, 0.50), // ST
        p(0.75, 0.82), // RW
    ]
}

/// 5-3-2: ordinal 5 drops into the right-wingback slot.
fn layout_532() -> [Position; 11] {
    [
        p(0.05, 0.50), // GK
        p(0.25, 0.10), // LWB
        p(0.18, 0.30), // LCB
        p(0.16, 0.50), // CB
        p(0.18, 0.70), // RCB
        p(0.25, 0.90), // RWB
        p(0.42, 0.38), // LCM
        p(0.42, 0.62), // RCM
        p(0.48, 0.50), // CM
        p(0.75, 0.38), // LF
        p(0.75, 0.62), // RF
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::Player;
    use rand::SeedableRng;

    #[test]
    fn test_all_shapes_have_11_positions_in_bounds() {
        for shape in FormationShape::ALL {
            let layout = base_layout(shape);
            assert_eq!(layout.len(), 11, "{} layout incomplete", shape.code());
            for (ordinal, pos) in layout.iter().enumerate() {
                assert!(pos.in_bounds(), "{} ordinal {} out of bounds", shape.code(), ordinal);
                // Home base positions stay in the home half.
                assert!(pos.x < 0.5, "{} ordinal {} base not in own half", shape.code(), ordinal);
            }
        }
    }

    #[test]
    fn test_goalkeeper_pinned_to_goal_mouth() {
        for shape in FormationShape::ALL {
            let home_gk = base_position(shape, PlayerRef::new(TeamSide::Home, 0));
            let away_gk = base_position(shape, PlayerRef::new(TeamSide::Away, 0));
            assert_eq!((home_gk.x, home_gk.y), (0.05, 0.5));
            assert_eq!((away_gk.x, away_gk.y), (0.95, 0.5));
        }
    }

    #[test]
    fn test_away_mirrors_x() {
        for shape in FormationShape::ALL {
            for ordinal in 0..SQUAD_SIZE {
                let home = base_position(shape, PlayerRef::new(TeamSide::Home, ordinal));
                let away = base_position(shape, PlayerRef::new(TeamSide::Away, ordinal));
                assert!((away.x - (1.0 - home.x)).abs() < 1e-6);
                assert_eq!(away.y, home.y);
            }
        }
    }

    fn test_team(side: TeamSide) -> Team {
        Team {
            side,
            name: "Test".to_string(),
            score: 0,
            players: (0..SQUAD_SIZE)
                .map(|ordinal| Player {
                    player_ref: PlayerRef::new(side, ordinal),
                    position: Position::center(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_reset_lands_within_jitter_of_base() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for shape in FormationShape::ALL {
            for side in [TeamSide::Home, TeamSide::Away] {
                let mut team = test_team(side);
                reset_team_to_formation(&mut team, shape, &mut rng);
                for player in &team.players {
                    let base = base_position(shape, player.player_ref);
                    // Clamping to the own half can only reduce the offset.
                    assert!(
                        (player.position.x - base.x).abs() <= formation::RESET_JITTER + 1e-6,
                        "{} {} x drifted",
                        shape.code(),
                        player.player_ref
                    );
                    assert!((player.position.y - base.y).abs() <= formation::RESET_JITTER + 1e-6);
                    // And every player ends in the own half.
                    match side {
                        TeamSide::Home => assert!(player.position.x < 0.5),
                        TeamSide::Away => assert!(player.position.x > 0.5),
                    }
                }
            }
        }
    }
}

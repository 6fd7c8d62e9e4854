use serde::{Deserialize, Serialize};

use crate::engine::geometry::Position;

/// Number of players per side.
pub const SQUAD_SIZE: u8 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// Sign of this side's attacking direction along the x axis.
    ///
    /// Home attacks toward x=1, Away toward x=0.
    pub fn attack_sign(&self) -> f32 {
        match self {
            TeamSide::Home => 1.0,
            TeamSide::Away => -1.0,
        }
    }

    /// X coordinate of the goal line this side defends.
    pub fn own_goal_x(&self) -> f32 {
        match self {
            TeamSide::Home => 0.0,
            TeamSide::Away => 1.0,
        }
    }

    /// X coordinate of the goal line this side attacks.
    pub fn opponent_goal_x(&self) -> f32 {
        self.opponent().own_goal_x()
    }

    /// Distance covered toward the opponent goal, 0 at the own goal line.
    pub fn progress(&self, x: f32) -> f32 {
        match self {
            TeamSide::Home => x,
            TeamSide::Away => 1.0 - x,
        }
    }
}

/// Role band derived from the squad ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Role {
    pub fn from_ordinal(ordinal: u8) -> Role {
        match ordinal {
            0 => Role::Goalkeeper,
            1..=4 => Role::Defender,
            5..=7 => Role::Midfielder,
            _ => Role::Forward,
        }
    }

    /// Ranking used when ordering tackle candidates: defenders first,
    /// keepers last.
    pub fn tackle_priority(&self) -> u8 {
        match self {
            Role::Defender => 0,
            Role::Midfielder => 1,
            Role::Forward => 2,
            Role::Goalkeeper => 3,
        }
    }
}

/// Structural player identity: side + squad ordinal (0 = goalkeeper,
/// 1-4 defenders, 5-7 midfielders, 8-10 forwards).
///
/// Constructed once at roster creation; never parsed from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub side: TeamSide,
    pub ordinal: u8,
}

impl PlayerRef {
    pub fn new(side: TeamSide, ordinal: u8) -> PlayerRef {
        PlayerRef { side, ordinal }
    }

    pub fn role(&self) -> Role {
        Role::from_ordinal(self.ordinal)
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.ordinal == 0
    }

    /// Refs arriving from outside (advisor hints, restored state) must be
    /// checked before use; a bad ordinal is skipped, never panicked on.
    pub fn is_valid(&self) -> bool {
        self.ordinal < SQUAD_SIZE
    }
}

impl std::fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = match self.side {
            TeamSide::Home => "H",
            TeamSide::Away => "A",
        };
        write!(f, "{}{}", side, self.ordinal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_ref: PlayerRef,
    pub position: Position,
}

/// Ephemeral advisor movement suggestion for one player.
///
/// `age_ticks` counts ticks since the hint was cached; stale hints get
/// extra jitter in the planner instead of being trusted verbatim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovementHint {
    pub dx: f32,
    pub dy: f32,
    #[serde(default)]
    pub age_ticks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_bands() {
        assert_eq!(Role::from_ordinal(0), Role::Goalkeeper);
        assert_eq!(Role::from_ordinal(1), Role::Defender);
        assert_eq!(Role::from_ordinal(4), Role::Defender);
        assert_eq!(Role::from_ordinal(5), Role::Midfielder);
        assert_eq!(Role::from_ordinal(7), Role::Midfielder);
        assert_eq!(Role::from_ordinal(8), Role::Forward);
        assert_eq!(Role::from_ordinal(10), Role::Forward);
    }

    #[test]
    fn test_attack_direction() {
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
        assert_eq!(TeamSide::Home.opponent_goal_x(), 1.0);
        assert_eq!(TeamSide::Away.opponent_goal_x(), 0.0);
        assert!(TeamSide::Home.progress(0.8) > TeamSide::Home.progress(0.2));
        assert!(TeamSide::Away.progress(0.2) > TeamSide::Away.progress(0.8));
    }

    #[test]
    fn test_ref_validity() {
        assert!(PlayerRef::new(TeamSide::Home, 10).is_valid());
        assert!(!PlayerRef::new(TeamSide::Home, 11).is_valid());
    }
}

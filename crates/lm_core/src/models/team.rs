use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerRef, TeamSide, SQUAD_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub side: TeamSide,
    pub name: String,
    /// Monotonic: only ever incremented by the goal-line check.
    pub score: u32,
    pub players: Vec<Player>, // 11 players, indexed by ordinal
}

/// Supported formation shapes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormationShape {
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-2-3-1")]
    F4231,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "5-3-2")]
    F532,
}

impl FormationShape {
    pub const ALL: [FormationShape; 6] = [
        FormationShape::F442,
        FormationShape::F433,
        FormationShape::F4231,
        FormationShape::F352,
        FormationShape::F343,
        FormationShape::F532,
    ];

    /// Canonical formation code string (e.g., "4-3-3").
    pub fn code(&self) -> &'static str {
        match self {
            FormationShape::F442 => "4-4-2",
            FormationShape::F433 => "4-3-3",
            FormationShape::F4231 => "4-2-3-1",
            FormationShape::F352 => "3-5-2",
            FormationShape::F343 => "3-4-3",
            FormationShape::F532 => "5-3-2",
        }
    }
}

impl Team {
    pub fn player(&self, ordinal: u8) -> Option<&Player> {
        self.players.get(ordinal as usize)
    }

    pub fn player_mut(&mut self, ordinal: u8) -> Option<&mut Player> {
        self.players.get_mut(ordinal as usize)
    }

    pub fn contains(&self, player_ref: PlayerRef) -> bool {
        player_ref.side == self.side && (player_ref.ordinal as usize) < self.players.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.players.len() != SQUAD_SIZE as usize {
            return Err(format!(
                "Team must have exactly {} players, found {}",
                SQUAD_SIZE,
                self.players.len()
            ));
        }
        for (idx, player) in self.players.iter().enumerate() {
            if player.player_ref.side != self.side || player.player_ref.ordinal as usize != idx {
                return Err(format!(
                    "Roster slot {} holds mismatched ref {}",
                    idx, player.player_ref
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_codes() {
        for shape in FormationShape::ALL {
            assert!(shape.code().contains('-'));
        }
        let json = serde_json::to_string(&FormationShape::F4231).unwrap();
        assert_eq!(json, "\"4-2-3-1\"");
    }
}

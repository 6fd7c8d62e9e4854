use std::fmt;

use crate::models::MatchStatus;

#[derive(Debug)]
pub enum MatchError {
    InvalidTransition { from: MatchStatus, command: &'static str },
    InvalidTeamSize { expected: usize, found: usize },
    UnknownPlayer(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchError::InvalidTransition { from, command } => {
                write!(f, "Invalid transition: cannot {} while {:?}", command, from)
            }
            MatchError::InvalidTeamSize { expected, found } => {
                write!(f, "Invalid team size: expected {}, found {}", expected, found)
            }
            MatchError::UnknownPlayer(player) => {
                write!(f, "Unknown player: {}", player)
            }
            MatchError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            MatchError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MatchError {}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            MatchError::DeserializationError(err.to_string())
        } else {
            MatchError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

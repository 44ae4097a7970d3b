//! Error types shared across the game crate

use thiserror::Error;

use crate::player::PlayerId;
use crate::role::RoleId;

/// Fatal state errors raised by player and timer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player {name} ({id}) is dead already")]
    PlayerAlreadyDead { id: PlayerId, name: String },

    #[error("the timer has already been terminated")]
    TimerFinished,
}

/// Errors raised while assigning roles to players
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("{players} players cannot fill {essential} essential roles")]
    NotEnoughPlayers { players: usize, essential: usize },

    #[error("role {0} is not part of the catalog")]
    UnknownRole(RoleId),

    #[error("player {0} appears more than once in the preferences")]
    DuplicatePlayer(PlayerId),
}

/// Errors raised while building a role catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("role pool '{0}' has no members")]
    EmptyPool(String),

    #[error("role pool '{pool}' gives '{member}' a zero weight")]
    ZeroWeight { pool: String, member: String },

    #[error("role pool '{0}' has weights summing past u32::MAX")]
    WeightOverflow(String),

    #[error("role pool '{pool}' contains another pool '{member}'")]
    NestedPool { pool: String, member: String },

    #[error("role {0} is not part of the catalog")]
    UnknownRole(RoleId),

    #[error("catalog has no default role")]
    MissingDefaultRole,

    #[error("default role '{0}' must be a concrete role")]
    PoolAsDefault(String),
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected 'key = value', got '{text}'")]
    Parse { line: usize, text: String },

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid value '{value}' for setting '{key}'")]
    InvalidValue { key: String, value: String },
}

pub type GameResult<T> = Result<T, GameError>;

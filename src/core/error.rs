//! Error types for data loading and rejected player commands.

use thiserror::Error;

/// Errors that can occur when loading weapon, enemy or arena data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A data file did not name a known weapon or archetype.
    #[error("Unknown definition '{name}' in '{path}'")]
    UnknownDefinition { name: String, path: String },
}

/// A player command that was refused. These are expected conditions:
/// the caller logs them and nothing in the world changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandRejected {
    #[error("weapon is locked")]
    WeaponLocked,

    #[error("weapon is already equipped")]
    AlreadyEquipped,

    #[error("no weapon bound to slot {0}")]
    UnknownSlot(u8),

    #[error("weapon is reloading")]
    Reloading,

    #[error("magazine already full")]
    MagazineFull,

    #[error("no reserve ammo")]
    ReserveEmpty,

    #[error("magazine empty")]
    EmptyMagazine,

    #[error("weapon not ready to fire")]
    FireRateLimited,

    #[error("trigger already held")]
    AlreadyFiring,

    #[error("player is down")]
    PlayerDown,
}

//! Crate-wide error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("name already taken: {0}")]
    NameTaken(String),

    #[error("clan not found: {0}")]
    ClanNotFound(String),

    #[error("area not found: {0}")]
    AreaNotFound(String),

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("area {to} is not reachable from {from}")]
    NotReachable { from: String, to: String },

    #[error("group {group} is already in area {area}")]
    GroupAlreadyInArea { group: String, area: String },

    #[error("clan {clan} already owns a group named {group}")]
    GroupNameTakenInClan { clan: String, group: String },

    #[error("{0} cannot perform this operation on itself")]
    SelfOperation(String),

    #[error("group {0} is too small to divide")]
    CannotDivide(String),

    #[error("clans {left} and {right} own groups with the same name")]
    ClanNamesCollide { left: String, right: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

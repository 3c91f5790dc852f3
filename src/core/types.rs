//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Stable key of a group in the world arena.
///
/// Ids are handed out by the arena and never reused; clans and areas store
/// ids rather than copies, so every holder observes the same group state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Terrain kind of an area. Fixed at creation, it selects the arrival policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaKind {
    Plain,
    Mountain,
    River,
}

impl std::fmt::Display for AreaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaKind::Plain => write!(f, "plain"),
            AreaKind::Mountain => write!(f, "mountain"),
            AreaKind::River => write!(f, "river"),
        }
    }
}

/// Outcome of a fight, from the initiating group's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightOutcome {
    Won,
    Lost,
    Draw,
}

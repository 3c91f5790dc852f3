//! Wildmarch - a migration simulation of clans, groups, and areas
//!
//! Groups of people belong to clans and occupy areas. Moving a group into an
//! area triggers the terrain's arrival policy: plains absorb or split
//! arrivals, mountains are ruled by the strongest and settle challenges by
//! combat, rivers open trade between friendly neighbors. [`World`] ties the
//! registries together and is the entry point for every command.

pub mod arena;
pub mod area;
pub mod clan;
pub mod core;
pub mod events;
pub mod group;
pub mod output;
pub mod scenario;
pub mod world;

pub use crate::arena::GroupArena;
pub use crate::area::Area;
pub use crate::clan::Clan;
pub use crate::core::error::{Result, SimError};
pub use crate::core::types::{AreaKind, FightOutcome, GroupId};
pub use crate::events::{Event, EventKind, EventLog};
pub use crate::group::Group;
pub use crate::output::WorldSnapshot;
pub use crate::world::World;

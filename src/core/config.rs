//! Simulation constants
//!
//! The numeric rules of the simulation are collected here so the arithmetic
//! in `group` and `area` reads without magic numbers.

/// Tools granted per adult when a group is founded.
pub const TOOLS_PER_ADULT: u32 = 4;

/// Food granted per adult when a group is founded.
pub const FOOD_PER_ADULT: u32 = 3;

/// Food granted per child when a group is founded.
pub const FOOD_PER_CHILD: u32 = 2;

/// Morale of a freshly founded group, before it joins a clan.
///
/// Joining a first clan raises morale by 10% (floor), so a default group
/// enters its clan at 77.
pub const STARTING_MORALE: u32 = 70;

/// Morale is always kept within [0, MAX_MORALE].
pub const MAX_MORALE: u32 = 100;

/// Both groups need at least this much morale for a union to go through.
pub const UNITE_MORALE_FLOOR: u32 = 70;

/// Groups of this size or larger are split in two when arriving at a plain.
pub const PLAIN_SPLIT_SIZE: u32 = 10;

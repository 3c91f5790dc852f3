//! Rendering and snapshots
//!
//! Text rendering for the print commands plus a serde-friendly snapshot of
//! the whole world. Snapshot collections are sorted by name so two runs of
//! the same scenario serialize identically.

use serde::{Deserialize, Serialize};

use crate::arena::GroupArena;
use crate::area::Area;
use crate::clan::Clan;
use crate::core::types::AreaKind;
use crate::group::Group;
use crate::world::World;

/// Labeled field dump of a group, ending with its current area.
pub fn render_group(group: &Group, area_name: &str) -> String {
    format!(
        "Group's name: {}\n\
         Group's clan: {}\n\
         Group's children: {}\n\
         Group's adults: {}\n\
         Group's tools: {}\n\
         Group's food: {}\n\
         Group's morale: {}\n\
         Group's current area: {}\n",
        group.name(),
        group.clan().unwrap_or(""),
        group.children(),
        group.adults(),
        group.tools(),
        group.food(),
        group.morale(),
        area_name,
    )
}

/// Clan header followed by its living groups, strongest first.
pub fn render_clan(clan: &Clan, arena: &GroupArena) -> String {
    let mut out = format!("Clan's name: {}\nClan's groups:\n", clan.name());
    for id in clan.roster_strongest_first(arena) {
        out.push_str(arena[id].name());
        out.push('\n');
    }
    out
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub clan: Option<String>,
    pub children: u32,
    pub adults: u32,
    pub tools: u32,
    pub food: u32,
    pub morale: u32,
    pub power: u64,
}

impl GroupSnapshot {
    fn capture(group: &Group) -> Self {
        Self {
            name: group.name().to_string(),
            clan: group.clan().map(str::to_string),
            children: group.children(),
            adults: group.adults(),
            tools: group.tools(),
            food: group.food(),
            morale: group.morale(),
            power: group.power(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClanSnapshot {
    pub name: String,
    pub friends: Vec<String>,
    /// Living groups, strongest first.
    pub groups: Vec<GroupSnapshot>,
}

impl ClanSnapshot {
    fn capture(clan: &Clan, arena: &GroupArena) -> Self {
        let mut friends: Vec<String> = clan.friends().iter().cloned().collect();
        friends.sort();
        let groups = clan
            .roster_strongest_first(arena)
            .into_iter()
            .map(|id| GroupSnapshot::capture(&arena[id]))
            .collect();
        Self { name: clan.name().to_string(), friends, groups }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub name: String,
    pub kind: AreaKind,
    pub reachable: Vec<String>,
    /// Names of groups present, in arrival order.
    pub present: Vec<String>,
    pub ruler: Option<String>,
}

impl AreaSnapshot {
    fn capture(area: &Area, arena: &GroupArena) -> Self {
        let mut reachable: Vec<String> = area.reachable().iter().cloned().collect();
        reachable.sort();
        let present = area
            .present()
            .iter()
            .map(|&id| arena[id].name().to_string())
            .collect();
        let ruler = area.ruler().map(|id| arena[id].name().to_string());
        Self {
            name: area.name().to_string(),
            kind: area.kind(),
            reachable,
            present,
            ruler,
        }
    }
}

/// Full, deterministic view of a world at one instant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub clans: Vec<ClanSnapshot>,
    pub areas: Vec<AreaSnapshot>,
    pub event_count: usize,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let arena = world.arena();
        let mut clans: Vec<ClanSnapshot> =
            world.clans().map(|c| ClanSnapshot::capture(c, arena)).collect();
        clans.sort_by(|a, b| a.name.cmp(&b.name));
        let mut areas: Vec<AreaSnapshot> =
            world.areas().map(|a| AreaSnapshot::capture(a, arena)).collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        Self { clans, areas, event_count: world.events().len() }
    }

    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

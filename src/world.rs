//! World - the top-level orchestrator
//!
//! Owns the clan and area registries plus the group arena, and mediates
//! every cross-entity command. Name uniqueness is enforced here, before any
//! entity is touched, so failed commands leave the world unchanged.

use std::collections::HashMap;

use crate::arena::GroupArena;
use crate::area::Area;
use crate::clan::Clan;
use crate::core::error::{Result, SimError};
use crate::core::types::{AreaKind, GroupId};
use crate::events::{EventKind, EventLog};
use crate::group::Group;
use crate::output::{render_clan, render_group, WorldSnapshot};

#[derive(Debug, Default)]
pub struct World {
    groups: GroupArena,
    clans: HashMap<String, Clan>,
    areas: HashMap<String, Area>,
    events: EventLog,
    /// Count of commands accepted so far; stamps every event.
    command: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty clan.
    pub fn add_clan(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument("clan name is empty".into()));
        }
        if self.clans.contains_key(name) {
            return Err(SimError::NameTaken(name.to_string()));
        }
        self.command += 1;
        tracing::debug!(clan = name, "clan registered");
        self.clans.insert(name.to_string(), Clan::new(name)?);
        Ok(())
    }

    /// Register a new area of the given terrain kind. The kind never changes.
    pub fn add_area(&mut self, name: &str, kind: AreaKind) -> Result<()> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument("area name is empty".into()));
        }
        if self.areas.contains_key(name) {
            return Err(SimError::NameTaken(name.to_string()));
        }
        self.command += 1;
        tracing::debug!(area = name, %kind, "area registered");
        self.areas.insert(name.to_string(), Area::new(name, kind)?);
        Ok(())
    }

    /// Found a group with default resourcing, hand it to `clan`, and run the
    /// arrival policy of `area`.
    pub fn add_group(
        &mut self,
        name: &str,
        clan: &str,
        children: u32,
        adults: u32,
        area: &str,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument("group name is empty".into()));
        }
        if children + adults == 0 {
            return Err(SimError::InvalidArgument(format!(
                "group {name} would have no people"
            )));
        }
        if self.group_name_exists(name) {
            return Err(SimError::NameTaken(name.to_string()));
        }
        if !self.clans.contains_key(clan) {
            return Err(SimError::ClanNotFound(clan.to_string()));
        }
        if !self.areas.contains_key(area) {
            return Err(SimError::AreaNotFound(area.to_string()));
        }
        self.command += 1;
        let id = self.groups.insert(Group::found(name, children, adults)?);
        let owner = self
            .clans
            .get_mut(clan)
            .ok_or_else(|| SimError::ClanNotFound(clan.to_string()))?;
        owner.add_group(id, &mut self.groups)?;
        self.events.record(
            self.command,
            EventKind::GroupFounded {
                group: id,
                clan: clan.to_string(),
                area: area.to_string(),
            },
        );
        let destination = self
            .areas
            .get_mut(area)
            .ok_or_else(|| SimError::AreaNotFound(area.to_string()))?;
        destination.group_arrive(
            name,
            clan,
            &mut self.clans,
            &mut self.groups,
            self.command,
            &mut self.events,
        )?;
        tracing::debug!(group = name, clan, area, "group founded");
        Ok(())
    }

    /// Add a directed edge `from -> to` to the reachability graph.
    pub fn make_reachable(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.areas.contains_key(to) {
            return Err(SimError::AreaNotFound(to.to_string()));
        }
        let source = self
            .areas
            .get_mut(from)
            .ok_or_else(|| SimError::AreaNotFound(from.to_string()))?;
        self.command += 1;
        source.add_reachable(to);
        Ok(())
    }

    /// Move a group from its current area to `destination`, running the
    /// destination's full arrival policy.
    pub fn move_group(&mut self, name: &str, destination: &str) -> Result<()> {
        let clan = self
            .clan_of_group(name)
            .ok_or_else(|| SimError::GroupNotFound(name.to_string()))?
            .to_string();
        if !self.areas.contains_key(destination) {
            return Err(SimError::AreaNotFound(destination.to_string()));
        }
        if self.areas[destination].contains_group(name, &self.groups) {
            return Err(SimError::GroupAlreadyInArea {
                group: name.to_string(),
                area: destination.to_string(),
            });
        }
        let source = self
            .area_of_group(name)
            .ok_or_else(|| SimError::GroupNotFound(name.to_string()))?
            .to_string();
        if !self.areas[&source].is_reachable(destination) {
            return Err(SimError::NotReachable {
                from: source,
                to: destination.to_string(),
            });
        }
        self.command += 1;
        let origin = self
            .areas
            .get_mut(&source)
            .ok_or_else(|| SimError::AreaNotFound(source.clone()))?;
        origin.group_leave(name, &self.groups, self.command, &mut self.events)?;
        let target = self
            .areas
            .get_mut(destination)
            .ok_or_else(|| SimError::AreaNotFound(destination.to_string()))?;
        target.group_arrive(
            name,
            &clan,
            &mut self.clans,
            &mut self.groups,
            self.command,
            &mut self.events,
        )?;
        tracing::debug!(group = name, from = %source, to = destination, "group moved");
        Ok(())
    }

    /// Record a symmetric friendship between two clans.
    pub fn make_friends(&mut self, clan1: &str, clan2: &str) -> Result<()> {
        if !self.clans.contains_key(clan1) {
            return Err(SimError::ClanNotFound(clan1.to_string()));
        }
        if !self.clans.contains_key(clan2) {
            return Err(SimError::ClanNotFound(clan2.to_string()));
        }
        self.command += 1;
        if clan1 != clan2 {
            // Two mutable handles into one map: take the first out briefly.
            let mut first = self
                .clans
                .remove(clan1)
                .ok_or_else(|| SimError::ClanNotFound(clan1.to_string()))?;
            if let Some(second) = self.clans.get_mut(clan2) {
                first.make_friend(second);
            }
            self.clans.insert(first.name().to_string(), first);
            self.events.record(
                self.command,
                EventKind::FriendshipFormed { left: clan1.to_string(), right: clan2.to_string() },
            );
        }
        Ok(())
    }

    /// Unite two clans under a new name, then re-establish friendship with
    /// every clan either of the originals was friends with.
    pub fn unite_clans(&mut self, clan1: &str, clan2: &str, new_name: &str) -> Result<()> {
        if new_name.is_empty() {
            return Err(SimError::InvalidArgument("clan name is empty".into()));
        }
        if self.clans.contains_key(new_name) {
            return Err(SimError::NameTaken(new_name.to_string()));
        }
        if !self.clans.contains_key(clan1) {
            return Err(SimError::ClanNotFound(clan1.to_string()));
        }
        if !self.clans.contains_key(clan2) {
            return Err(SimError::ClanNotFound(clan2.to_string()));
        }
        if clan1 == clan2 {
            return Err(SimError::SelfOperation(clan1.to_string()));
        }
        let mut merged = self
            .clans
            .remove(clan1)
            .ok_or_else(|| SimError::ClanNotFound(clan1.to_string()))?;
        let mut absorbed = self
            .clans
            .remove(clan2)
            .ok_or_else(|| SimError::ClanNotFound(clan2.to_string()))?;
        if let Err(err) = merged.unite(&mut absorbed, new_name, &mut self.groups) {
            // All-or-nothing: put both back untouched.
            self.clans.insert(merged.name().to_string(), merged);
            self.clans.insert(absorbed.name().to_string(), absorbed);
            return Err(err);
        }
        self.command += 1;
        // Friends of defunct names are stale now; re-link the survivors.
        merged.retain_friends(|f| self.clans.contains_key(f));
        for friend in merged.friends().iter().cloned().collect::<Vec<_>>() {
            if let Some(other) = self.clans.get_mut(&friend) {
                other.insert_friend(new_name);
            }
        }
        self.clans.insert(new_name.to_string(), merged);
        self.events.record(
            self.command,
            EventKind::ClansUnited {
                merged: clan1.to_string(),
                absorbed: clan2.to_string(),
                new_name: new_name.to_string(),
            },
        );
        tracing::info!(from1 = clan1, from2 = clan2, to = new_name, "clans united");
        Ok(())
    }

    /// Labeled field dump of a group plus its current area.
    pub fn print_group(&self, name: &str) -> Result<String> {
        let (_, group) = self
            .group_by_name(name)
            .ok_or_else(|| SimError::GroupNotFound(name.to_string()))?;
        let area = self
            .area_of_group(name)
            .ok_or_else(|| SimError::GroupNotFound(name.to_string()))?;
        Ok(render_group(group, area))
    }

    /// Clan header plus its group names strongest-first.
    pub fn print_clan(&self, name: &str) -> Result<String> {
        let clan = self
            .clans
            .get(name)
            .ok_or_else(|| SimError::ClanNotFound(name.to_string()))?;
        Ok(render_clan(clan, &self.groups))
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn clan(&self, name: &str) -> Option<&Clan> {
        self.clans.get(name)
    }

    pub fn area(&self, name: &str) -> Option<&Area> {
        self.areas.get(name)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn clans(&self) -> impl Iterator<Item = &Clan> {
        self.clans.values()
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }

    pub fn arena(&self) -> &GroupArena {
        &self.groups
    }

    /// Names of all living, clan-owned groups.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .clans
            .values()
            .flat_map(|c| c.group_ids())
            .filter(|&id| !self.groups[id].is_empty())
            .map(|id| self.groups[id].name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn group_by_name(&self, name: &str) -> Option<(GroupId, &Group)> {
        self.clans.values().find_map(|c| {
            let id = c.group_id(name)?;
            Some((id, &self.groups[id]))
        })
    }

    fn group_name_exists(&self, name: &str) -> bool {
        self.clans.values().any(|c| c.contains(name))
    }

    fn clan_of_group(&self, name: &str) -> Option<&str> {
        self.clans
            .values()
            .find(|c| c.contains(name))
            .map(|c| c.name())
    }

    /// Name of the area whose presence list holds the group.
    pub fn area_of_group(&self, name: &str) -> Option<&str> {
        self.areas
            .values()
            .find(|a| a.contains_group(name, &self.groups))
            .map(|a| a.name())
    }
}

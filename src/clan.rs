//! Clan - the owning collection of groups plus a friendship relation
//!
//! A clan is the single canonical owner of its groups; every other holder
//! (area presence lists, a mountain's ruler slot) aliases them by id.
//! Friendship between clans is symmetric and matters on rivers, where only
//! friendly groups trade.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::arena::GroupArena;
use crate::core::error::{Result, SimError};
use crate::core::types::GroupId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clan {
    name: String,
    groups: HashMap<String, GroupId>,
    friends: HashSet<String>,
}

impl Clan {
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument("clan name is empty".into()));
        }
        Ok(Self {
            name: name.to_string(),
            groups: HashMap::new(),
            friends: HashSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, group_name: &str) -> bool {
        self.groups.contains_key(group_name)
    }

    pub fn group_id(&self, group_name: &str) -> Option<GroupId> {
        self.groups.get(group_name).copied()
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.values().copied()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total population across every owned group.
    pub fn total_size(&self, arena: &GroupArena) -> u32 {
        self.groups.values().map(|&id| arena[id].size()).sum()
    }

    /// Take ownership of an already-stored group.
    ///
    /// The group is re-parented through the clan-change morale rule. Fails
    /// when the group is empty or its name is already taken in this clan.
    pub fn add_group(&mut self, id: GroupId, arena: &mut GroupArena) -> Result<()> {
        let group = &arena[id];
        if group.is_empty() {
            return Err(SimError::InvalidArgument(format!(
                "cannot add an empty group to clan {}",
                self.name
            )));
        }
        if self.groups.contains_key(group.name()) {
            return Err(SimError::GroupNameTakenInClan {
                clan: self.name.clone(),
                group: group.name().to_string(),
            });
        }
        arena[id].change_clan(&self.name);
        self.groups.insert(arena[id].name().to_string(), id);
        Ok(())
    }

    /// Absorb `other` under a new name.
    ///
    /// All-or-nothing: fails without touching either clan when the name is
    /// empty or any group name exists in both clans. On success this clan is
    /// renamed, every group of both clans is re-parented to the new name
    /// (a morale no-op for groups already carrying it), `other` is left with
    /// no groups, and the friend sets are merged.
    pub fn unite(&mut self, other: &mut Clan, new_name: &str, arena: &mut GroupArena) -> Result<()> {
        if new_name.is_empty() {
            return Err(SimError::InvalidArgument("clan name is empty".into()));
        }
        if self.name == other.name {
            return Err(SimError::SelfOperation(self.name.clone()));
        }
        if self.groups.keys().any(|name| other.groups.contains_key(name)) {
            return Err(SimError::ClanNamesCollide {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }
        self.name = new_name.to_string();
        for &id in self.groups.values() {
            arena[id].change_clan(new_name);
        }
        for (name, id) in other.groups.drain() {
            if arena[id].is_empty() {
                continue;
            }
            arena[id].change_clan(new_name);
            self.groups.insert(name, id);
        }
        self.friends.extend(other.friends.drain());
        self.friends.remove(&self.name);
        Ok(())
    }

    /// Record a symmetric friendship. A clan befriending itself is a no-op.
    pub fn make_friend(&mut self, other: &mut Clan) {
        if self.name == other.name {
            return;
        }
        self.friends.insert(other.name.clone());
        other.friends.insert(self.name.clone());
    }

    /// Every clan is a friend of itself.
    pub fn is_friend(&self, clan_name: &str) -> bool {
        self.name == clan_name || self.friends.contains(clan_name)
    }

    pub fn friends(&self) -> &HashSet<String> {
        &self.friends
    }

    pub(crate) fn insert_friend(&mut self, clan_name: &str) {
        if clan_name != self.name {
            self.friends.insert(clan_name.to_string());
        }
    }

    pub(crate) fn retain_friends(&mut self, keep: impl Fn(&str) -> bool) {
        self.friends.retain(|f| keep(f));
    }

    /// Rebuild the name index from current group state, dropping emptied
    /// groups and picking up renames after a union of groups.
    pub fn refresh(&mut self, arena: &GroupArena) {
        let ids: Vec<GroupId> = self.groups.drain().map(|(_, id)| id).collect();
        for id in ids {
            let group = &arena[id];
            if !group.is_empty() {
                self.groups.insert(group.name().to_string(), id);
            }
        }
    }

    /// Owned groups strongest-first, emptied groups skipped.
    pub fn roster_strongest_first(&self, arena: &GroupArena) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self
            .groups
            .values()
            .copied()
            .filter(|&id| !arena[id].is_empty())
            .collect();
        ids.sort_by(|&a, &b| arena[b].strength_cmp(&arena[a]));
        ids
    }
}

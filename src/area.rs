//! Area - a terrain node with a directed reachability set and a presence list
//!
//! The three terrain kinds are a closed set, so arrival policy is dispatched
//! statically over an enum: plains rebalance population (unite small
//! arrivals, split large ones), mountains settle precedence by combat, and
//! rivers open with a trade. Presence lists hold arena ids only; the clan
//! stays the single owner of every group.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::arena::GroupArena;
use crate::clan::Clan;
use crate::core::config::PLAIN_SPLIT_SIZE;
use crate::core::error::{Result, SimError};
use crate::core::types::{AreaKind, FightOutcome, GroupId};
use crate::events::{EventKind, EventLog};

/// Terrain-specific state. Only mountains carry extra state (the ruler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Terrain {
    Plain,
    Mountain { ruler: Option<GroupId> },
    River,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    name: String,
    reachable: HashSet<String>,
    present: Vec<GroupId>,
    terrain: Terrain,
}

impl Area {
    pub fn new(name: &str, kind: AreaKind) -> Result<Self> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument("area name is empty".into()));
        }
        let terrain = match kind {
            AreaKind::Plain => Terrain::Plain,
            AreaKind::Mountain => Terrain::Mountain { ruler: None },
            AreaKind::River => Terrain::River,
        };
        Ok(Self {
            name: name.to_string(),
            reachable: HashSet::new(),
            present: Vec::new(),
            terrain,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AreaKind {
        match self.terrain {
            Terrain::Plain => AreaKind::Plain,
            Terrain::Mountain { .. } => AreaKind::Mountain,
            Terrain::River => AreaKind::River,
        }
    }

    /// Insert a directed edge towards `area_name`. The reverse direction is
    /// a separate edge.
    pub fn add_reachable(&mut self, area_name: &str) {
        self.reachable.insert(area_name.to_string());
    }

    /// An area is always reachable from itself.
    pub fn is_reachable(&self, area_name: &str) -> bool {
        self.name == area_name || self.reachable.contains(area_name)
    }

    pub fn reachable(&self) -> &HashSet<String> {
        &self.reachable
    }

    pub fn present(&self) -> &[GroupId] {
        &self.present
    }

    pub fn contains_group(&self, group_name: &str, arena: &GroupArena) -> bool {
        self.present.iter().any(|&id| arena[id].name() == group_name)
    }

    /// Current mountain ruler; `None` for other terrain.
    pub fn ruler(&self) -> Option<GroupId> {
        match self.terrain {
            Terrain::Mountain { ruler } => ruler,
            _ => None,
        }
    }

    /// Run the terrain's arrival policy for a clan-owned group.
    ///
    /// Validates that the clan exists and owns the group and that no group
    /// of that name is already present here, then hands off to the terrain.
    pub fn group_arrive(
        &mut self,
        group_name: &str,
        clan_name: &str,
        clans: &mut HashMap<String, Clan>,
        arena: &mut GroupArena,
        command: u64,
        log: &mut EventLog,
    ) -> Result<()> {
        let clan = clans
            .get(clan_name)
            .ok_or_else(|| SimError::ClanNotFound(clan_name.to_string()))?;
        let id = clan
            .group_id(group_name)
            .ok_or_else(|| SimError::GroupNotFound(group_name.to_string()))?;
        if self.contains_group(group_name, arena) {
            return Err(SimError::GroupAlreadyInArea {
                group: group_name.to_string(),
                area: self.name.clone(),
            });
        }
        match self.terrain {
            Terrain::Plain => self.arrive_plain(id, clan_name, clans, arena, command, log),
            Terrain::Mountain { .. } => {
                self.arrive_mountain(id, clan_name, clans, arena, command, log)
            }
            Terrain::River => self.arrive_river(id, clan_name, clans, arena, command, log),
        }
    }

    /// Remove the named group from the presence list.
    ///
    /// On mountains, a departing ruler is succeeded by the strongest
    /// non-empty group of the same clan, falling back to the strongest
    /// non-empty group of any clan, or no ruler at all.
    pub fn group_leave(
        &mut self,
        group_name: &str,
        arena: &GroupArena,
        command: u64,
        log: &mut EventLog,
    ) -> Result<()> {
        let idx = self
            .present
            .iter()
            .position(|&id| arena[id].name() == group_name)
            .ok_or_else(|| SimError::GroupNotFound(group_name.to_string()))?;
        let id = self.present.remove(idx);
        log.record(
            command,
            EventKind::GroupDeparted { group: id, area: self.name.clone() },
        );
        if self.ruler() == Some(id) {
            let successor = self.pick_successor(arena[id].clan(), arena);
            self.set_ruler(successor);
            log.record(
                command,
                EventKind::RulerChanged { area: self.name.clone(), ruler: successor },
            );
        }
        Ok(())
    }

    fn arrive_plain(
        &mut self,
        id: GroupId,
        clan_name: &str,
        clans: &mut HashMap<String, Clan>,
        arena: &mut GroupArena,
        command: u64,
        log: &mut EventLog,
    ) -> Result<()> {
        let clan = clans
            .get(clan_name)
            .ok_or_else(|| SimError::ClanNotFound(clan_name.to_string()))?;
        let third = clan.total_size(arena).div_ceil(3);
        let size = arena[id].size();
        if size < third {
            // Small arrivals fold into the strongest same-clan group present,
            // trying weaker hosts until a union fits under the cap.
            let mut hosts: Vec<GroupId> = self
                .present
                .iter()
                .copied()
                .filter(|&g| arena[g].clan() == Some(clan_name) && !arena[g].is_empty())
                .collect();
            hosts.sort_by(|&a, &b| arena[b].strength_cmp(&arena[a]));
            for host in hosts {
                let (host_group, incoming) = arena.pair_mut(host, id)?;
                if host_group.unite(incoming, third) {
                    tracing::debug!(area = %self.name, "arriving group absorbed on the plain");
                    log.record(
                        command,
                        EventKind::GroupsUnited {
                            survivor: host,
                            absorbed: id,
                            area: self.name.clone(),
                        },
                    );
                    let clan = clans
                        .get_mut(clan_name)
                        .ok_or_else(|| SimError::ClanNotFound(clan_name.to_string()))?;
                    clan.refresh(arena);
                    return Ok(());
                }
            }
            self.admit(id, command, log);
        } else if size < PLAIN_SPLIT_SIZE {
            self.admit(id, command, log);
        } else {
            let fresh = next_split_name(arena[id].name(), clans);
            let offshoot = arena[id].divide(&fresh)?;
            let offshoot_id = arena.insert(offshoot);
            let clan = clans
                .get_mut(clan_name)
                .ok_or_else(|| SimError::ClanNotFound(clan_name.to_string()))?;
            clan.add_group(offshoot_id, arena)?;
            log.record(
                command,
                EventKind::GroupDivided {
                    original: id,
                    offshoot: offshoot_id,
                    area: self.name.clone(),
                },
            );
            self.admit(id, command, log);
            self.admit(offshoot_id, command, log);
        }
        Ok(())
    }

    fn arrive_mountain(
        &mut self,
        id: GroupId,
        clan_name: &str,
        clans: &mut HashMap<String, Clan>,
        arena: &mut GroupArena,
        command: u64,
        log: &mut EventLog,
    ) -> Result<()> {
        match self.ruler() {
            None => {
                self.admit(id, command, log);
                self.crown(Some(id), command, log);
            }
            Some(incumbent) if arena[incumbent].clan() == Some(clan_name) => {
                if arena[id].is_stronger(&arena[incumbent]) {
                    self.crown(Some(id), command, log);
                }
                self.admit(id, command, log);
            }
            Some(incumbent) => {
                let (challenger, ruler) = arena.pair_mut(id, incumbent)?;
                match challenger.fight(ruler)? {
                    FightOutcome::Won => {
                        tracing::info!(
                            area = %self.name,
                            winner = %arena[id].name(),
                            "challenger took the mountain"
                        );
                        log.record(
                            command,
                            EventKind::FightResolved {
                                winner: id,
                                loser: incumbent,
                                area: self.name.clone(),
                            },
                        );
                        self.admit(id, command, log);
                        self.crown(Some(id), command, log);
                        self.purge_emptied(clans, arena);
                    }
                    FightOutcome::Lost => {
                        log.record(
                            command,
                            EventKind::FightResolved {
                                winner: incumbent,
                                loser: id,
                                area: self.name.clone(),
                            },
                        );
                        self.purge_emptied(clans, arena);
                        if !arena[id].is_empty() {
                            self.admit(id, command, log);
                        }
                    }
                    FightOutcome::Draw => {
                        log.record(
                            command,
                            EventKind::FightDrawn {
                                challenger: id,
                                ruler: incumbent,
                                area: self.name.clone(),
                            },
                        );
                        self.admit(id, command, log);
                    }
                }
            }
        }
        Ok(())
    }

    fn arrive_river(
        &mut self,
        id: GroupId,
        clan_name: &str,
        clans: &mut HashMap<String, Clan>,
        arena: &mut GroupArena,
        command: u64,
        log: &mut EventLog,
    ) -> Result<()> {
        let mut partners: Vec<GroupId> = self
            .present
            .iter()
            .copied()
            .filter(|&g| !arena[g].is_empty())
            .collect();
        partners.sort_by(|&a, &b| arena[b].strength_cmp(&arena[a]));
        let clan = clans
            .get(clan_name)
            .ok_or_else(|| SimError::ClanNotFound(clan_name.to_string()))?;
        for partner in partners {
            let friendly = match arena[partner].clan() {
                Some(partner_clan) => clan.is_friend(partner_clan),
                None => false,
            };
            if !friendly {
                continue;
            }
            let (arriver, host) = arena.pair_mut(id, partner)?;
            let amount = arriver.trade(host);
            if amount > 0 {
                log.record(
                    command,
                    EventKind::TradeCompleted {
                        left: id,
                        right: partner,
                        amount,
                        area: self.name.clone(),
                    },
                );
                break;
            }
        }
        self.admit(id, command, log);
        Ok(())
    }

    fn admit(&mut self, id: GroupId, command: u64, log: &mut EventLog) {
        self.present.push(id);
        log.record(
            command,
            EventKind::GroupArrived { group: id, area: self.name.clone() },
        );
    }

    fn crown(&mut self, ruler: Option<GroupId>, command: u64, log: &mut EventLog) {
        self.set_ruler(ruler);
        log.record(
            command,
            EventKind::RulerChanged { area: self.name.clone(), ruler },
        );
    }

    fn set_ruler(&mut self, new_ruler: Option<GroupId>) {
        if let Terrain::Mountain { ruler } = &mut self.terrain {
            *ruler = new_ruler;
        }
    }

    /// Strongest non-empty group of `clan`, else strongest non-empty group
    /// of any clan, else none.
    fn pick_successor(&self, clan: Option<&str>, arena: &GroupArena) -> Option<GroupId> {
        let mut live: Vec<GroupId> = self
            .present
            .iter()
            .copied()
            .filter(|&g| !arena[g].is_empty())
            .collect();
        live.sort_by(|&a, &b| arena[b].strength_cmp(&arena[a]));
        live.iter()
            .copied()
            .find(|&g| arena[g].clan() == clan)
            .or_else(|| live.first().copied())
    }

    /// Drop emptied groups from the presence list and from every clan.
    fn purge_emptied(&mut self, clans: &mut HashMap<String, Clan>, arena: &GroupArena) {
        self.present.retain(|&g| !arena[g].is_empty());
        for clan in clans.values_mut() {
            clan.refresh(arena);
        }
    }
}

/// First `<base>_2`, `<base>_3`, ... not used by any group in any clan.
fn next_split_name(base: &str, clans: &HashMap<String, Clan>) -> String {
    let mut index = 2;
    loop {
        let candidate = format!("{base}_{index}");
        if !clans.values().any(|c| c.contains(&candidate)) {
            return candidate;
        }
        index += 1;
    }
}

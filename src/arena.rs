//! Canonical group storage
//!
//! All groups live in one arena and are addressed by stable [`GroupId`]s.
//! Clans and areas hold ids, never copies, so a mutation performed through
//! one holder is observable through every other. Emptied groups keep their
//! slot as a tombstone; ids are never reused.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::GroupId;
use crate::group::Group;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GroupArena {
    slots: Vec<Group>,
}

impl GroupArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a group and hand back its permanent id.
    pub fn insert(&mut self, group: Group) -> GroupId {
        let id = GroupId(self.slots.len() as u32);
        self.slots.push(group);
        id
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.slots.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.slots.get_mut(id.0 as usize)
    }

    /// Borrow two distinct groups mutably, for pairwise operations.
    ///
    /// Refuses to pair a group with itself; this is where the "no fighting,
    /// trading, or uniting with yourself" rule is enforced.
    pub fn pair_mut(&mut self, a: GroupId, b: GroupId) -> Result<(&mut Group, &mut Group)> {
        if a == b {
            let name = self
                .get(a)
                .map(|g| g.name().to_string())
                .unwrap_or_else(|| format!("group #{}", a.0));
            return Err(SimError::SelfOperation(name));
        }
        let (i, j) = (a.0 as usize, b.0 as usize);
        if i < j {
            let (left, right) = self.slots.split_at_mut(j);
            Ok((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.slots.split_at_mut(i);
            Ok((&mut right[0], &mut left[j]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId(i as u32), g))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Index<GroupId> for GroupArena {
    type Output = Group;

    fn index(&self, id: GroupId) -> &Group {
        &self.slots[id.0 as usize]
    }
}

impl IndexMut<GroupId> for GroupArena {
    fn index_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.slots[id.0 as usize]
    }
}

//! Event log of state-changing outcomes
//!
//! Every command that successfully mutates the world records what happened,
//! so a run leaves behind an inspectable history.

use serde::{Deserialize, Serialize};

use crate::core::types::GroupId;

/// One recorded outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    /// Sequence number of the world command that produced this event.
    pub command: u64,
    pub kind: EventKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EventKind {
    GroupFounded { group: GroupId, clan: String, area: String },
    GroupArrived { group: GroupId, area: String },
    GroupDeparted { group: GroupId, area: String },
    FightResolved { winner: GroupId, loser: GroupId, area: String },
    FightDrawn { challenger: GroupId, ruler: GroupId, area: String },
    TradeCompleted { left: GroupId, right: GroupId, amount: u32, area: String },
    GroupsUnited { survivor: GroupId, absorbed: GroupId, area: String },
    GroupDivided { original: GroupId, offshoot: GroupId, area: String },
    RulerChanged { area: String, ruler: Option<GroupId> },
    ClansUnited { merged: String, absorbed: String, new_name: String },
    FriendshipFormed { left: String, right: String },
}

/// Append-only history of events.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, command: u64, kind: EventKind) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(Event { id, command, kind });
        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_group(&self, group: GroupId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind.involves(group))
    }

    pub fn count_matching(&self, pred: impl Fn(&EventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }
}

impl EventKind {
    fn involves(&self, id: GroupId) -> bool {
        match *self {
            EventKind::GroupFounded { group, .. }
            | EventKind::GroupArrived { group, .. }
            | EventKind::GroupDeparted { group, .. } => group == id,
            EventKind::FightResolved { winner, loser, .. } => winner == id || loser == id,
            EventKind::FightDrawn { challenger, ruler, .. } => challenger == id || ruler == id,
            EventKind::TradeCompleted { left, right, .. } => left == id || right == id,
            EventKind::GroupsUnited { survivor, absorbed, .. } => {
                survivor == id || absorbed == id
            }
            EventKind::GroupDivided { original, offshoot, .. } => {
                original == id || offshoot == id
            }
            EventKind::RulerChanged { ruler, .. } => ruler == Some(id),
            EventKind::ClansUnited { .. } | EventKind::FriendshipFormed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_assigns_increasing_ids() {
        let mut log = EventLog::new();
        let a = log.record(
            1,
            EventKind::GroupArrived { group: GroupId(0), area: "plain".into() },
        );
        let b = log.record(
            2,
            EventKind::GroupDeparted { group: GroupId(0), area: "plain".into() },
        );
        assert!(b > a);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_events_for_group_filters_participants() {
        let mut log = EventLog::new();
        log.record(
            1,
            EventKind::FightResolved {
                winner: GroupId(0),
                loser: GroupId(1),
                area: "ridge".into(),
            },
        );
        log.record(
            2,
            EventKind::GroupArrived { group: GroupId(2), area: "ford".into() },
        );
        assert_eq!(log.events_for_group(GroupId(1)).count(), 1);
        assert_eq!(log.events_for_group(GroupId(2)).count(), 1);
        assert_eq!(log.events_for_group(GroupId(9)).count(), 0);
    }
}

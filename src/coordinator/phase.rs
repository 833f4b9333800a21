use crate::engine::{NavigationId, NavigationStart};
use crate::history::HistoryStore;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Programmatic {
    Push,
    Replace,
}

/// Where the coordinator is within one navigation cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// A navigation we did not issue has started; its entry is appended once it ends.
    Observing {
        navigation_id: NavigationId,
        state: Option<Value>,
    },
    /// Replaying an entry that is already in the log.
    ReplayInFlight { target: usize },
    ProgrammaticInFlight(Programmatic),
}

impl Phase {
    /// Whether the coordinator itself is driving the active navigation.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Phase::ReplayInFlight { .. } | Phase::ProgrammaticInFlight(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Replay of the entry at `index`.
    Restored { index: usize },
    /// A restoration request for an id this process does not know.
    Unresolved { navigation_id: NavigationId },
    New,
}

pub fn classify(start: &NavigationStart, store: &HistoryStore) -> Classification {
    match &start.restored_state {
        Some(restored) => store
            .find(|entry| entry.id == restored.navigation_id)
            .map(|(index, _)| Classification::Restored { index })
            .unwrap_or(Classification::Unresolved {
                navigation_id: restored.navigation_id,
            }),
        None => Classification::New,
    }
}

//! Registry of live matches.

use dashmap::DashMap;

use lm_core::MatchId;

use crate::actor::MatchHandle;

/// Handles to every running match. Matches remove themselves when
/// their actor stops.
#[derive(Default)]
pub struct MatchRegistry {
    matches: DashMap<MatchId, MatchHandle>,
}

impl MatchRegistry {
    pub fn new() -> MatchRegistry {
        MatchRegistry { matches: DashMap::new() }
    }

    pub fn get(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches.get(&id).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, handle: MatchHandle) {
        self.matches.insert(handle.id, handle);
    }

    pub fn remove(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches.remove(&id).map(|(_, handle)| handle)
    }

    pub fn active_matches(&self) -> usize {
        self.matches.len()
    }
}

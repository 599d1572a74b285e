//! Identifier → display-name cache fed by live rosters.

use std::collections::HashMap;

use parking_lot::RwLock;

use waypoint_core::{PlayerId, PlayerName, RosterEntry};

/// Last observed display name per player, for the current session only.
#[derive(Debug, Default)]
pub struct IdentityCache {
    names: RwLock<HashMap<PlayerId, PlayerName>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.names.write().clear();
    }

    /// Upsert every roster entry; the latest observation of an id wins.
    pub fn observe_roster<'a>(&self, roster: impl IntoIterator<Item = &'a RosterEntry>) {
        let mut names = self.names.write();
        for entry in roster {
            names.insert(entry.id, entry.name.clone());
        }
    }

    pub fn lookup_name(&self, id: &PlayerId) -> Option<PlayerName> {
        self.names.read().get(id).cloned()
    }

    /// Reverse lookup by display name.
    ///
    /// If several cached ids share `name`, which one is returned is unspecified.
    pub fn lookup_id(&self, name: &PlayerName) -> Option<PlayerId> {
        let names = self.names.read();
        let inverted: HashMap<&PlayerName, &PlayerId> =
            names.iter().map(|(id, n)| (n, id)).collect();
        inverted.get(name).map(|id| **id)
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }

    /// Copy of the current entries, sorted by name.
    pub fn snapshot(&self) -> Vec<RosterEntry> {
        let mut entries: Vec<RosterEntry> = self
            .names
            .read()
            .iter()
            .map(|(id, name)| RosterEntry::new(*id, name.clone()))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        entries
    }
}

//! Name resolution across the live world and the identity cache.

use std::sync::Arc;

use waypoint_core::{NameRule, PlayerId, PlayerName, PlayerReference, RosterEntry};

use crate::cache::IdentityCache;

/// Players present in the currently loaded session world.
pub trait LiveWorld {
    fn player_name(&self, id: &PlayerId) -> Option<PlayerName>;
}

/// A point-in-time copy of a session roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }
}

impl FromIterator<RosterEntry> for Roster {
    fn from_iter<I: IntoIterator<Item = RosterEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl LiveWorld for Roster {
    fn player_name(&self, id: &PlayerId) -> Option<PlayerName> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.name.clone())
    }
}

/// Resolves names for identifiers and identifiers for names.
///
/// The live world is authoritative when a player is present in it; the cache
/// remembers players seen earlier in the session.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    cache: Arc<IdentityCache>,
}

impl IdentityResolver {
    pub fn new(cache: Arc<IdentityCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<IdentityCache> {
        &self.cache
    }

    pub fn resolve_name(
        &self,
        id: Option<&PlayerId>,
        live: Option<&dyn LiveWorld>,
    ) -> Option<PlayerName> {
        let id = id?;
        live.and_then(|world| world.player_name(id))
            .or_else(|| self.cache.lookup_name(id))
    }

    /// A reference for `name` carrying whatever id the cache knows for it.
    ///
    /// Only the cache is consulted; the live world is not scanned.
    pub fn resolve_from_name(&self, name: impl Into<PlayerName>) -> PlayerReference {
        let name = name.into();
        PlayerReference {
            id: self.cache.lookup_id(&name),
            name: NameRule::Fixed(name),
        }
    }

    /// The display name a reference stands for right now.
    pub fn display_name(
        &self,
        reference: &PlayerReference,
        live: Option<&dyn LiveWorld>,
    ) -> Option<PlayerName> {
        match &reference.name {
            NameRule::Fixed(name) => Some(name.clone()),
            NameRule::ResolveFromId => self.resolve_name(reference.id.as_ref(), live),
        }
    }

    /// Fix a reference's name to its current resolution so it encodes with a username.
    ///
    /// References whose name cannot be resolved are returned unchanged.
    pub fn pin(&self, reference: &PlayerReference, live: Option<&dyn LiveWorld>) -> PlayerReference {
        match self.display_name(reference, live) {
            Some(name) => PlayerReference {
                id: reference.id,
                name: NameRule::Fixed(name),
            },
            None => reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn pid() -> PlayerId {
        PlayerId::from(Uuid::new_v4())
    }

    fn resolver_with(entries: &[RosterEntry]) -> IdentityResolver {
        let cache = Arc::new(IdentityCache::new());
        cache.observe_roster(entries);
        IdentityResolver::new(cache)
    }

    #[rstest]
    #[case("live_and_cached", true, true, Some("Live"))]
    #[case("cached_only", false, true, Some("Cached"))]
    #[case("live_only", true, false, Some("Live"))]
    #[case("neither", false, false, None)]
    fn resolve_name_precedence(
        #[case] label: &str,
        #[case] live: bool,
        #[case] cached: bool,
        #[case] expected: Option<&str>,
    ) {
        let x = pid();
        let cache_entries = if cached {
            vec![RosterEntry::new(x, "Cached")]
        } else {
            vec![]
        };
        let resolver = resolver_with(&cache_entries);
        let world = if live {
            Roster::new(vec![RosterEntry::new(x, "Live")])
        } else {
            Roster::new(vec![RosterEntry::new(pid(), "Stranger")])
        };

        let got = resolver.resolve_name(Some(&x), Some(&world));
        assert_eq!(got, expected.map(PlayerName::from), "[{label}]");
    }

    #[test]
    fn resolve_name_without_world_uses_cache() {
        let x = pid();
        let resolver = resolver_with(&[RosterEntry::new(x, "Cached")]);
        assert_eq!(
            resolver.resolve_name(Some(&x), None),
            Some(PlayerName::from("Cached"))
        );
    }

    #[test]
    fn resolve_name_of_absent_id_is_absent() {
        let x = pid();
        let resolver = resolver_with(&[RosterEntry::new(x, "Cached")]);
        let world = Roster::new(vec![RosterEntry::new(x, "Live")]);
        assert_eq!(resolver.resolve_name(None, Some(&world)), None);
    }

    #[test]
    fn resolve_from_name_uses_cache_only() {
        let cached = pid();
        let resolver = resolver_with(&[RosterEntry::new(cached, "Alice")]);

        let alice = resolver.resolve_from_name("Alice");
        assert_eq!(alice.id, Some(cached));
        assert_eq!(alice.fixed_name(), Some(&PlayerName::from("Alice")));

        let bob = resolver.resolve_from_name("Bob");
        assert_eq!(bob.id, None);
        assert_eq!(bob.fixed_name(), Some(&PlayerName::from("Bob")));
    }

    #[test]
    fn display_name_follows_rule() {
        let x = pid();
        let resolver = resolver_with(&[RosterEntry::new(x, "Cached")]);

        let fixed = PlayerReference::with_name(x, "Nickname");
        assert_eq!(
            resolver.display_name(&fixed, None),
            Some(PlayerName::from("Nickname"))
        );

        let lazy = PlayerReference::from_id(x);
        assert_eq!(
            resolver.display_name(&lazy, None),
            Some(PlayerName::from("Cached"))
        );

        resolver.cache().clear();
        assert_eq!(resolver.display_name(&lazy, None), None);
    }

    #[test]
    fn pin_fixes_current_name() {
        let x = pid();
        let resolver = resolver_with(&[]);
        let world = Roster::new(vec![RosterEntry::new(x, "Live")]);

        let pinned = resolver.pin(&PlayerReference::from_id(x), Some(&world));
        assert_eq!(pinned.fixed_name(), Some(&PlayerName::from("Live")));
        assert_eq!(pinned.id, Some(x));

        let unresolved = resolver.pin(&PlayerReference::from_id(pid()), None);
        assert_eq!(unresolved.name, NameRule::ResolveFromId);
    }
}

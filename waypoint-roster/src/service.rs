//! Owned identity state: one cache, its resolver, and its session watcher.

use std::sync::Arc;

use tokio::sync::broadcast;

use waypoint_core::WaypointConfig;

use crate::cache::IdentityCache;
use crate::resolver::IdentityResolver;
use crate::session::{SessionEvent, SessionWatcher, Subscription, TrackedServers};

/// Identity state for one client process.
///
/// Created empty; fed by the session event stream passed to [`Self::start`];
/// read through [`Self::resolver`].
#[derive(Debug, Clone)]
pub struct IdentityService {
    cache: Arc<IdentityCache>,
    resolver: IdentityResolver,
    watcher: Arc<SessionWatcher>,
}

impl IdentityService {
    pub fn new(tracked: TrackedServers) -> Self {
        let cache = Arc::new(IdentityCache::new());
        Self {
            resolver: IdentityResolver::new(cache.clone()),
            watcher: Arc::new(SessionWatcher::new(cache.clone(), tracked)),
            cache,
        }
    }

    pub fn from_config(config: &WaypointConfig) -> Self {
        Self::new(TrackedServers::from_config(config))
    }

    /// Subscribe the cache to `events`. See [`SessionWatcher::subscribe`].
    pub fn start(&self, events: broadcast::Receiver<SessionEvent>) -> Subscription {
        self.watcher.clone().subscribe(events)
    }

    pub fn cache(&self) -> &Arc<IdentityCache> {
        &self.cache
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub fn watcher(&self) -> &SessionWatcher {
        &self.watcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Roster;
    use uuid::Uuid;
    use waypoint_core::{PlayerId, PlayerName, PlayerReference, RosterEntry};

    #[tokio::test]
    async fn events_flow_through_to_resolver() {
        let service = IdentityService::from_config(&WaypointConfig::default());
        let (tx, rx) = broadcast::channel(8);
        let subscription = service.start(rx);

        let x = PlayerId::from(Uuid::new_v4());
        tx.send(SessionEvent::Joined).expect("send join");
        tx.send(SessionEvent::Tick {
            server: Some("play.mccisland.net".to_string()),
            roster: Roster::new(vec![RosterEntry::new(x, "Alice")]),
        })
        .expect("send tick");
        subscription.unsubscribe().await.expect("unsubscribe");

        let resolver = service.resolver();
        assert_eq!(
            resolver.resolve_name(Some(&x), None),
            Some(PlayerName::from("Alice"))
        );
        assert_eq!(
            resolver.resolve_from_name("Alice"),
            PlayerReference::from_id(x)
        );
    }

    #[test]
    fn disconnect_tick_clears_cached_names() {
        let service = IdentityService::from_config(&WaypointConfig::default());
        let x = PlayerId::from(Uuid::new_v4());
        service.watcher().on_tick(
            Some("mccisland.net"),
            &Roster::new(vec![RosterEntry::new(x, "Alice")]),
        );
        assert_eq!(service.cache().len(), 1);

        service.watcher().on_tick(None, &Roster::default());
        assert_eq!(service.resolver().resolve_name(Some(&x), None), None);
    }
}

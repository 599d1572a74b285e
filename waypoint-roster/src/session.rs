//! Session lifecycle handling for the identity cache.
//!
//! - `Joined` → clear the cache
//! - `Tick` on a tracked server → merge the live roster into the cache
//! - `Tick` anywhere else (or while disconnected) → clear the cache

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use waypoint_core::WaypointConfig;

use crate::cache::IdentityCache;
use crate::error::RosterError;
use crate::resolver::Roster;

/// A notification from the session the client is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A fresh join to a world.
    Joined,
    /// One step of the session's update loop.
    Tick {
        /// Host of the connected server, `None` when not connected to one.
        server: Option<String>,
        roster: Roster,
    },
}

/// Server hosts whose sessions feed the identity cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedServers {
    hosts: Vec<String>,
}

impl TrackedServers {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts.into_iter().map(|h| normalize_host(h.as_ref())).collect(),
        }
    }

    pub fn from_config(config: &WaypointConfig) -> Self {
        Self::new(&config.tracked_servers)
    }

    /// True if `host` is a tracked host or a subdomain of one. A `:port` suffix is ignored.
    pub fn is_tracked(&self, host: &str) -> bool {
        let host = normalize_host(host);
        self.hosts.iter().any(|tracked| {
            host == *tracked
                || host
                    .strip_suffix(tracked.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// Applies session events to an [`IdentityCache`].
#[derive(Debug)]
pub struct SessionWatcher {
    cache: Arc<IdentityCache>,
    tracked: TrackedServers,
}

impl SessionWatcher {
    pub fn new(cache: Arc<IdentityCache>, tracked: TrackedServers) -> Self {
        Self { cache, tracked }
    }

    pub fn on_joined(&self) {
        self.cache.clear();
        tracing::debug!("session joined, identity cache cleared");
    }

    pub fn on_tick(&self, server: Option<&str>, roster: &Roster) {
        match server {
            Some(host) if self.tracked.is_tracked(host) => self.cache.observe_roster(roster.iter()),
            _ => self.cache.clear(),
        }
    }

    pub fn handle(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Joined => self.on_joined(),
            SessionEvent::Tick { server, roster } => self.on_tick(server.as_deref(), roster),
        }
    }

    /// Apply every event from `events` on a spawned task until the returned
    /// [`Subscription`] is unsubscribed or dropped, or the sender side closes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(self: Arc<Self>, mut events: broadcast::Receiver<SessionEvent>) -> Subscription {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        self.drain_queued(&mut events);
                        break;
                    }
                    event = events.recv() => match event {
                        Ok(event) => self.handle(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "session listener lagged behind event stream");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("session listener stopped");
        });
        Subscription {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Apply the events queued at shutdown, and none sent after it.
    fn drain_queued(&self, events: &mut broadcast::Receiver<SessionEvent>) {
        let mut remaining = events.len();
        while remaining > 0 {
            match events.try_recv() {
                Ok(event) => {
                    self.handle(&event);
                    remaining -= 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session listener lagged behind event stream");
                    remaining = events.len();
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

/// Handle on a running session listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct Subscription {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Whether the listener task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the listener and wait for it.
    ///
    /// Events queued when the stop is seen are still applied; later ones are not.
    pub async fn unsubscribe(mut self) -> Result<(), RosterError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;
    use uuid::Uuid;
    use waypoint_core::{PlayerId, PlayerName, RosterEntry};

    fn pid() -> PlayerId {
        PlayerId::from(Uuid::new_v4())
    }

    fn watcher() -> (Arc<IdentityCache>, Arc<SessionWatcher>) {
        let cache = Arc::new(IdentityCache::new());
        let watcher = Arc::new(SessionWatcher::new(
            cache.clone(),
            TrackedServers::new(["mccisland.net"]),
        ));
        (cache, watcher)
    }

    fn tick(server: Option<&str>, entries: Vec<RosterEntry>) -> SessionEvent {
        SessionEvent::Tick {
            server: server.map(str::to_string),
            roster: Roster::new(entries),
        }
    }

    #[rstest]
    #[case("mccisland.net", true)]
    #[case("play.mccisland.net", true)]
    #[case("PLAY.MCCISLAND.NET.", true)]
    #[case("play.mccisland.net:25565", true)]
    #[case("notmccisland.net", false)]
    #[case("mccisland.net.evil.com", false)]
    #[case("localhost", false)]
    fn tracked_host_matching(#[case] host: &str, #[case] tracked: bool) {
        let servers = TrackedServers::new(["mccisland.net"]);
        assert_eq!(servers.is_tracked(host), tracked, "host {host}");
    }

    #[test]
    fn tracked_servers_from_config_defaults() {
        let servers = TrackedServers::from_config(&WaypointConfig::default());
        assert!(servers.is_tracked("play.mccisland.net"));
    }

    #[test]
    fn tick_on_tracked_server_populates_cache() {
        let (cache, watcher) = watcher();
        let x = pid();
        watcher.handle(&tick(Some("play.mccisland.net"), vec![RosterEntry::new(x, "Alice")]));
        assert_eq!(cache.lookup_name(&x), Some(PlayerName::from("Alice")));
    }

    #[test]
    fn tick_while_disconnected_clears_cache() {
        let (cache, watcher) = watcher();
        let x = pid();
        watcher.handle(&tick(Some("mccisland.net"), vec![RosterEntry::new(x, "Alice")]));
        assert!(!cache.is_empty());

        watcher.handle(&tick(None, vec![]));
        assert!(cache.is_empty());
        assert_eq!(cache.lookup_name(&x), None);
    }

    #[test]
    fn tick_on_untracked_server_clears_instead_of_observing() {
        let (cache, watcher) = watcher();
        let (x, y) = (pid(), pid());
        watcher.handle(&tick(Some("mccisland.net"), vec![RosterEntry::new(x, "Alice")]));
        watcher.handle(&tick(Some("example.org"), vec![RosterEntry::new(y, "Eve")]));
        assert!(cache.is_empty());
    }

    #[test]
    fn join_clears_cache() {
        let (cache, watcher) = watcher();
        watcher.handle(&tick(Some("mccisland.net"), vec![RosterEntry::new(pid(), "Alice")]));
        watcher.handle(&SessionEvent::Joined);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn subscription_applies_queued_events_before_stopping() {
        let (cache, watcher) = watcher();
        let (tx, rx) = broadcast::channel(16);
        let subscription = watcher.subscribe(rx);

        let x = pid();
        tx.send(tick(Some("mccisland.net"), vec![RosterEntry::new(x, "Alice")]))
            .expect("send");
        tx.send(tick(Some("mccisland.net"), vec![RosterEntry::new(x, "Bob")]))
            .expect("send");
        subscription.unsubscribe().await.expect("unsubscribe");

        assert_eq!(cache.lookup_name(&x), Some(PlayerName::from("Bob")));
        assert_eq!(tx.receiver_count(), 0, "listener must release its receiver");
    }

    #[tokio::test]
    async fn unsubscribe_returns_while_producer_keeps_sending() {
        let (cache, watcher) = watcher();
        let (tx, rx) = broadcast::channel(64);
        let subscription = watcher.subscribe(rx);

        let x = pid();
        let producer = tokio::spawn(async move {
            while tx
                .send(tick(Some("mccisland.net"), vec![RosterEntry::new(x, "Alice")]))
                .is_ok()
            {
                tokio::task::yield_now().await;
            }
        });
        tokio::task::yield_now().await;

        tokio::time::timeout(Duration::from_secs(5), subscription.unsubscribe())
            .await
            .expect("unsubscribe finished while events kept arriving")
            .expect("unsubscribe");
        tokio::time::timeout(Duration::from_secs(5), producer)
            .await
            .expect("producer stops once the listener is gone")
            .expect("producer task");
        assert_eq!(cache.lookup_name(&x), Some(PlayerName::from("Alice")));
    }

    #[tokio::test]
    async fn subscription_ends_when_sender_closes() {
        let (cache, watcher) = watcher();
        let (tx, rx) = broadcast::channel(4);
        let subscription = watcher.subscribe(rx);

        tx.send(tick(Some("mccisland.net"), vec![RosterEntry::new(pid(), "Alice")]))
            .expect("send");
        drop(tx);

        subscription.unsubscribe().await.expect("unsubscribe");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn lagged_listener_keeps_latest_state() {
        let (cache, watcher) = watcher();
        let (tx, rx) = broadcast::channel(1);
        let subscription = watcher.subscribe(rx);

        let x = pid();
        for name in ["A", "B", "C"] {
            tx.send(tick(Some("mccisland.net"), vec![RosterEntry::new(x, name)]))
                .expect("send");
        }
        subscription.unsubscribe().await.expect("unsubscribe");

        assert_eq!(cache.lookup_name(&x), Some(PlayerName::from("C")));
    }
}

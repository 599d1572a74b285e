//! Session identity tracking: the identifier ↔ display-name cache, name
//! resolution over the live world and the cache, and the session listener
//! that keeps the cache current.

mod error;

pub mod cache;
pub mod resolver;
pub mod service;
pub mod session;

pub use cache::IdentityCache;
pub use error::RosterError;
pub use resolver::{IdentityResolver, LiveWorld, Roster};
pub use service::IdentityService;
pub use session::{SessionEvent, SessionWatcher, Subscription, TrackedServers};

//! Waypoint core library — identifiers, player references, run timelines.
//!
//! - [`types`] — identifier and name newtypes
//! - [`player`] — [`PlayerReference`] and its record form
//! - [`runs`] — the run timeline registry
//! - [`suggest`] — completion candidates
//! - [`config`] — `~/.waypoint/config.yaml` and path conventions
//! - [`error`] — [`RunLoadError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod player;
pub mod runs;
pub mod suggest;
pub mod timeline;
pub mod types;

pub use config::WaypointConfig;
pub use error::{ConfigError, RunLoadError};
pub use player::{NameRule, PlayerReference};
pub use runs::{ReloadReport, RunOutcome, RunRegistry, TimelineRegistry};
pub use suggest::{Suggestions, SuggestionsBuilder};
pub use timeline::{PositionTimeline, TimedPosition};
pub use types::{PlayerId, PlayerName, RosterEntry, RunId};

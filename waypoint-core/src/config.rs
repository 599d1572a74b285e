//! Configuration and path conventions.
//!
//! # Storage layout
//!
//! ```text
//! ~/.waypoint/
//!   config.yaml                      (optional)
//!   game_instances/
//!     <game_id>/
//!       runs/
//!         <run uuid>.json            (one file per recorded run)
//! ```
//!
//! # API pattern
//!
//! Every function that touches the home directory has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const WAYPOINT_DIR: &str = ".waypoint";
pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_GAME_ID: &str = "parkour_warrior_dojo";
pub const DEFAULT_TRACKED_SERVER: &str = "mccisland.net";

/// Extension of run record files.
pub const RUN_FILE_EXTENSION: &str = "json";

/// Contents of `~/.waypoint/config.yaml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    /// Game whose runs are loaded.
    pub game_id: String,
    /// Overrides the derived runs directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_dir: Option<PathBuf>,
    /// Server hosts whose sessions feed the identity cache.
    pub tracked_servers: Vec<String>,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            game_id: DEFAULT_GAME_ID.to_string(),
            runs_dir: None,
            tracked_servers: vec![DEFAULT_TRACKED_SERVER.to_string()],
        }
    }
}

impl WaypointConfig {
    /// The directory run files are read from.
    pub fn runs_dir_at(&self, home: &Path) -> PathBuf {
        match &self.runs_dir {
            Some(dir) => dir.clone(),
            None => runs_dir_at(home, &self.game_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.waypoint/`
pub fn waypoint_root(home: &Path) -> PathBuf {
    home.join(WAYPOINT_DIR)
}

/// `<home>/.waypoint/config.yaml`
pub fn config_path_at(home: &Path) -> PathBuf {
    waypoint_root(home).join(CONFIG_FILE)
}

/// `<home>/.waypoint/game_instances/<game_id>/runs/` — pure, no I/O.
pub fn runs_dir_at(home: &Path, game_id: &str) -> PathBuf {
    waypoint_root(home)
        .join("game_instances")
        .join(game_id)
        .join("runs")
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load the config file under `home`, or defaults if it does not exist.
pub fn load_at(home: &Path) -> Result<WaypointConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(WaypointConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<WaypointConfig, ConfigError> {
    load_at(&home()?)
}

pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

//! Timeline registry: recorded runs loaded from a directory of run files.
//!
//! Each `<run uuid>.json` file holds a JSON object whose `position_timeline`
//! field is the recorded payload. [`TimelineRegistry::reload`] rebuilds the
//! whole index from the directory and swaps it in at once, so readers always
//! see either the previous index or the new one, never a mix.

use std::collections::HashMap;
use std::future::Ready;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::{WaypointConfig, RUN_FILE_EXTENSION};
use crate::error::RunLoadError;
use crate::suggest::{Suggestions, SuggestionsBuilder};
use crate::timeline::PositionTimeline;
use crate::types::RunId;

/// Field of a run document holding the timeline payload.
pub const TIMELINE_FIELD: &str = "position_timeline";

/// Run id → decoded record, as of the last completed reload.
pub type TimelineIndex<T> = HashMap<RunId, Arc<T>>;

/// Registry of position timelines.
pub type RunRegistry = TimelineRegistry<PositionTimeline>;

// ---------------------------------------------------------------------------
// Reload report
// ---------------------------------------------------------------------------

/// Result of loading one run file.
#[derive(Debug)]
pub enum RunOutcome {
    Loaded { id: RunId, path: PathBuf },
    Failed(RunLoadError),
}

/// Per-file outcomes of one reload, in file-name order.
#[derive(Debug)]
pub struct ReloadReport {
    pub outcomes: Vec<RunOutcome>,
    pub completed_at: DateTime<Utc>,
}

impl ReloadReport {
    /// Number of run files loaded successfully.
    pub fn loaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RunOutcome::Loaded { .. }))
            .count()
    }

    pub fn loaded_ids(&self) -> impl Iterator<Item = &RunId> {
        self.outcomes.iter().filter_map(|o| match o {
            RunOutcome::Loaded { id, .. } => Some(id),
            RunOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunLoadError> {
        self.outcomes.iter().filter_map(|o| match o {
            RunOutcome::Failed(err) => Some(err),
            RunOutcome::Loaded { .. } => None,
        })
    }

    /// Log every failed file at error level.
    pub fn log_failures(&self) {
        for err in self.failures() {
            tracing::error!(
                path = %err.path().display(),
                error = %err,
                "could not parse run file",
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// In-memory index of run timelines backed by a run directory.
///
/// `T` is the decoded payload; the registry never looks inside it.
pub struct TimelineRegistry<T> {
    dir: PathBuf,
    index: ArcSwap<TimelineIndex<T>>,
}

impl<T: DeserializeOwned> TimelineRegistry<T> {
    /// An empty registry over `dir`. Nothing is read until [`Self::reload`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            index: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// An empty registry over the runs directory `config` selects under `home`.
    pub fn for_config(home: &Path, config: &WaypointConfig) -> Self {
        Self::new(config.runs_dir_at(home))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run files in the registry directory.
    pub fn list_run_files(&self) -> Vec<PathBuf> {
        list_run_files(&self.dir)
    }

    /// Rebuild the index from the run directory.
    ///
    /// Files that fail to load are reported and left out; they never stop the
    /// rest of the directory from loading.
    pub fn reload(&self) -> ReloadReport {
        let mut index = HashMap::new();
        let mut outcomes = Vec::new();

        for path in self.list_run_files() {
            match load_run::<T>(&path) {
                Ok((id, record)) => {
                    index.insert(id, Arc::new(record));
                    outcomes.push(RunOutcome::Loaded { id, path });
                }
                Err(err) => outcomes.push(RunOutcome::Failed(err)),
            }
        }

        let indexed = index.len();
        self.index.store(Arc::new(index));

        let report = ReloadReport {
            outcomes,
            completed_at: Utc::now(),
        };
        tracing::debug!(
            dir = %self.dir.display(),
            loaded = report.loaded(),
            indexed,
            failed = report.failures().count(),
            "reloaded run timelines",
        );
        report
    }

    /// The timeline for `id`, if it was loaded by the last reload.
    pub fn get(&self, id: &RunId) -> Option<Arc<T>> {
        self.index.load().get(id).cloned()
    }

    pub fn contains(&self, id: &RunId) -> bool {
        self.index.load().contains_key(id)
    }

    /// Every indexed run id, sorted.
    pub fn ids(&self) -> Vec<RunId> {
        let mut ids: Vec<RunId> = self.index.load().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.index.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.load().is_empty()
    }

    /// Offer every indexed run id to `builder` as a completion candidate.
    pub fn suggest_runs(&self, mut builder: SuggestionsBuilder) -> Ready<Suggestions> {
        for id in self.index.load().keys() {
            builder.suggest(id.to_string());
        }
        builder.build_future()
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

/// Non-recursive listing of `*.json` files in `dir`, sorted by path.
/// Symlinks count when they point at a regular file.
///
/// A missing or unreadable directory lists as empty.
pub fn list_run_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "run directory not readable");
            return vec![];
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some(RUN_FILE_EXTENSION))
        .collect();
    files.sort();
    files
}

/// Decode one run file into its id and payload.
pub fn load_run<T: DeserializeOwned>(path: &Path) -> Result<(RunId, T), RunLoadError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let id = RunId::parse(stem).map_err(|source| RunLoadError::InvalidId {
        path: path.to_path_buf(),
        source,
    })?;
    // Only the lowercase hyphenated spelling names a run file.
    if id.to_string() != stem {
        return Err(RunLoadError::NonCanonicalId {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| RunLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Map<String, Value> =
        serde_json::from_str(&text).map_err(|source| RunLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let timeline = match document.remove(TIMELINE_FIELD) {
        Some(value @ Value::Object(_)) => value,
        _ => {
            return Err(RunLoadError::MissingTimeline {
                path: path.to_path_buf(),
            })
        }
    };
    let record = serde_json::from_value(timeline).map_err(|source| RunLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((id, record))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

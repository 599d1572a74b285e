//! Recorded position timeline payload.
//!
//! The registry treats this as an opaque record: it is only ever decoded from
//! the `position_timeline` field of a run file and handed back to callers.

use serde::{Deserialize, Serialize};

/// A single sampled position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPosition {
    /// Tick offset from the start of the run.
    pub tick: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
}

/// A recorded sequence of positions over time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionTimeline {
    #[serde(default)]
    pub positions: Vec<TimedPosition>,
}

impl PositionTimeline {
    /// Number of ticks covered, from the first to the last sample.
    pub fn duration_ticks(&self) -> u64 {
        match (self.positions.first(), self.positions.last()) {
            (Some(first), Some(last)) => last.tick.saturating_sub(first.tick),
            _ => 0,
        }
    }
}

//! Run reports: a finished chart plus how it was produced.
//!
//! Saved as JSON so a chart can be reviewed, printed, or fed back in for a
//! single-room repair later.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seating_kernel::{Arrangement, EngineConfig, RoomId, SeatingOutcome, conflicted_rooms};

/// One seating run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Start time
    pub started_at: DateTime<Utc>,
    /// End time (or time of the last manual repair)
    pub ended_at: DateTime<Utc>,
    /// Random seed, if the run was reproducible
    pub seed: Option<u64>,
    /// Whether pairs were kept within one gender code
    pub segregate: bool,
    /// People seated
    pub people: usize,
    /// Seats available across all rooms
    pub seats: usize,
    /// Whether the chart is free of blocking conflicts
    pub resolved: bool,
    /// Full builds performed
    pub full_attempts: usize,
    /// Repair passes performed
    pub repair_passes: usize,
    /// Manual single-room repairs applied after the run
    #[serde(default)]
    pub manual_repairs: usize,
    /// Rooms still holding blocking conflicts
    pub conflicted_rooms: BTreeSet<RoomId>,
    /// Warning shown to the user when unresolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Engine settings used for the run
    pub config: EngineConfig,
    /// The chart itself
    pub arrangement: Arrangement,
}

impl RunReport {
    /// Capture a finished engine run.
    pub fn from_outcome(
        outcome: SeatingOutcome,
        started_at: DateTime<Utc>,
        seed: Option<u64>,
        segregate: bool,
        seats: usize,
        config: &EngineConfig,
    ) -> Self {
        Self {
            started_at,
            ended_at: Utc::now(),
            seed,
            segregate,
            people: outcome.arrangement.seated_count(),
            seats,
            resolved: outcome.is_resolved(),
            full_attempts: outcome.full_attempts,
            repair_passes: outcome.repair_passes,
            manual_repairs: 0,
            warning: outcome.warning(),
            conflicted_rooms: outcome.conflicted_rooms,
            config: config.clone(),
            arrangement: outcome.arrangement,
        }
    }

    /// Replace the chart after a manual repair and re-check conflicts.
    pub fn apply_repair(&mut self, arrangement: Arrangement) {
        self.conflicted_rooms = conflicted_rooms(&arrangement, self.segregate);
        self.resolved = self.conflicted_rooms.is_empty();
        if self.resolved {
            self.warning = None;
        }
        self.arrangement = arrangement;
        self.manual_repairs += 1;
        self.ended_at = Utc::now();
    }

    /// Run duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }

    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report {}", path.display()))?;
        let report = serde_json::from_str(&json)?;
        Ok(report)
    }
}

//! Progress reporting and cooperative cancellation.
//!
//! Observers are purely observational: they see phase boundaries but
//! cannot change what the engine computes. The only influence they have is
//! [`ProgressObserver::is_cancelled`], checked at the top of every retry loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Starting,
    /// Full build from a fresh shuffle (1-based attempt)
    Building { attempt: usize },
    /// Conflict check (1-based pass within the attempt)
    CheckingConflicts { attempt: usize, pass: usize },
    /// Room-local repair of the flagged rooms
    Repairing { attempt: usize, rooms: usize },
    Resolved,
    Exhausted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Resolved | Phase::Exhausted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Starting => write!(f, "Starting"),
            Phase::Building { attempt } => write!(f, "Building arrangement (attempt {attempt})"),
            Phase::CheckingConflicts { attempt, pass } => {
                write!(f, "Checking conflicts (attempt {attempt}, pass {pass})")
            }
            Phase::Repairing { attempt, rooms } => {
                write!(f, "Repairing {rooms} room(s) (attempt {attempt})")
            }
            Phase::Resolved => write!(f, "Resolved"),
            Phase::Exhausted => write!(f, "Retries exhausted"),
        }
    }
}

/// One progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub phase: Phase,
    /// Human-readable phase label
    pub label: String,
    /// Completion estimate, 0 to 100
    pub percent: u8,
}

impl Progress {
    pub fn new(phase: Phase, percent: u8) -> Self {
        Self {
            phase,
            label: phase.to_string(),
            percent: percent.min(100),
        }
    }
}

/// Receives progress events from the orchestrator.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &Progress);

    /// Return true to stop the run at the next phase boundary.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&mut self, _progress: &Progress) {}
}

/// Records every event, optionally cancelling after a fixed number of them.
#[derive(Debug, Default, Clone)]
pub struct ProgressLog {
    pub events: Vec<Progress>,
    cancel_after: Option<usize>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation once `events` events have been seen.
    pub fn cancel_after(events: usize) -> Self {
        Self {
            events: Vec::new(),
            cancel_after: Some(events),
        }
    }

    pub fn last(&self) -> Option<&Progress> {
        self.events.last()
    }
}

impl ProgressObserver for ProgressLog {
    fn on_progress(&mut self, progress: &Progress) {
        self.events.push(progress.clone());
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after.is_some_and(|n| self.events.len() >= n)
    }
}

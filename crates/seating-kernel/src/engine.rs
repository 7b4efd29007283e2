//! The retry orchestrator: build, check, repair, rebuild.
//!
//! ## Usage
//!
//! ```ignore
//! use seating_kernel::{EngineConfig, SeatingEngine};
//!
//! let engine = SeatingEngine::new(EngineConfig::default())?;
//! let outcome = engine.arrange(&people, &rooms, false)?;
//!
//! if let Some(warning) = outcome.warning() {
//!     eprintln!("{warning}");
//! }
//! ```
//!
//! ## State machine
//!
//! `Building -> CheckingConflicts -> Repairing -> (repeat) -> Resolved | Exhausted`
//!
//! Each full attempt builds from a fresh shuffle, then alternates conflict
//! checks with room-local repair of only the flagged rooms. When the repair
//! passes run out the attempt is discarded and the next one rebuilds from
//! scratch, which redistributes cohorts across rooms. After the last attempt
//! the latest chart is returned with its conflicted rooms.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::build::{build_arrangement, check_inputs};
use crate::config::EngineConfig;
use crate::conflict::conflicted_rooms;
use crate::error::SeatingError;
use crate::model::{Arrangement, Person, Room, RoomId};
use crate::progress::{NoopObserver, Phase, Progress, ProgressObserver};
use crate::repair::{reseat_room, rerandomize_room};

/// Result of a full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingOutcome {
    /// The final chart (conflict-free unless `conflicted_rooms` is non-empty)
    pub arrangement: Arrangement,
    /// Rooms still holding a blocking desk conflict
    pub conflicted_rooms: BTreeSet<RoomId>,
    /// Full builds performed
    pub full_attempts: usize,
    /// Repair passes performed across all attempts
    pub repair_passes: usize,
}

impl SeatingOutcome {
    pub fn is_resolved(&self) -> bool {
        self.conflicted_rooms.is_empty()
    }

    /// Soft warning for a usable chart that still has conflicts.
    pub fn warning(&self) -> Option<String> {
        if self.is_resolved() {
            return None;
        }
        let rooms: Vec<&str> = self.conflicted_rooms.iter().map(String::as_str).collect();
        Some(format!(
            "Could not resolve all seating conflicts after {} full attempt(s); rooms with remaining conflicts: {}",
            self.full_attempts,
            rooms.join(", ")
        ))
    }
}

/// Entry point for seating runs and interactive single-room repairs.
#[derive(Debug, Clone, Default)]
pub struct SeatingEngine {
    config: EngineConfig,
}

impl SeatingEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self, SeatingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seat everyone with a thread-local RNG and no progress reporting.
    pub fn arrange(
        &self,
        people: &[Person],
        rooms: &[Room],
        segregate: bool,
    ) -> Result<SeatingOutcome, SeatingError> {
        self.arrange_with(people, rooms, segregate, &mut rand::rng(), &mut NoopObserver)
    }

    /// Seat everyone, drawing randomness from `rng` and reporting to `observer`.
    ///
    /// Input errors abort before anything is built. Cancellation is checked
    /// at the top of every attempt and every conflict pass.
    pub fn arrange_with<R, O>(
        &self,
        people: &[Person],
        rooms: &[Room],
        segregate: bool,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<SeatingOutcome, SeatingError>
    where
        R: Rng + ?Sized,
        O: ProgressObserver + ?Sized,
    {
        check_inputs(people, rooms)?;

        let attempts = self.config.retry.max_full_attempts;
        let passes = self.config.retry.max_repair_passes;
        let percent = |attempt: usize, pass: usize| {
            let steps = attempts * (passes + 1);
            ((attempt * (passes + 1) + pass) * 100 / steps).min(99) as u8
        };

        info!(
            people = people.len(),
            rooms = rooms.len(),
            segregate,
            attempts,
            passes,
            "Starting seating arrangement"
        );
        observer.on_progress(&Progress::new(Phase::Starting, 0));

        let mut repair_passes = 0;
        let mut latest: Option<(Arrangement, BTreeSet<RoomId>)> = None;

        for attempt in 0..attempts {
            ensure_running(observer)?;
            observer.on_progress(&Progress::new(
                Phase::Building {
                    attempt: attempt + 1,
                },
                percent(attempt, 0),
            ));

            let mut arrangement = build_arrangement(people, rooms, segregate, &self.config, rng)?;
            let mut flagged = BTreeSet::new();

            for pass in 0..=passes {
                ensure_running(observer)?;
                observer.on_progress(&Progress::new(
                    Phase::CheckingConflicts {
                        attempt: attempt + 1,
                        pass: pass + 1,
                    },
                    percent(attempt, pass),
                ));

                flagged = conflicted_rooms(&arrangement, segregate);
                if flagged.is_empty() {
                    observer.on_progress(&Progress::new(Phase::Resolved, 100));
                    info!(
                        attempts = attempt + 1,
                        repair_passes, "Seating resolved without conflicts"
                    );
                    return Ok(SeatingOutcome {
                        arrangement,
                        conflicted_rooms: flagged,
                        full_attempts: attempt + 1,
                        repair_passes,
                    });
                }
                if pass == passes {
                    break;
                }

                observer.on_progress(&Progress::new(
                    Phase::Repairing {
                        attempt: attempt + 1,
                        rooms: flagged.len(),
                    },
                    percent(attempt, pass),
                ));
                for room_id in &flagged {
                    reseat_room(&mut arrangement, room_id, rooms, segregate, &self.config, rng)?;
                }
                repair_passes += 1;
                debug!(
                    attempt = attempt + 1,
                    pass = pass + 1,
                    rooms = flagged.len(),
                    "Repaired conflicting rooms"
                );
            }

            debug!(
                attempt = attempt + 1,
                remaining = flagged.len(),
                "Repair passes exhausted, rebuilding"
            );
            latest = Some((arrangement, flagged));
        }

        let Some((arrangement, flagged)) = latest else {
            return Err(SeatingError::InvalidConfig(
                "retry.max_full_attempts must be at least 1".to_string(),
            ));
        };

        observer.on_progress(&Progress::new(Phase::Exhausted, 100));
        warn!(
            attempts,
            repair_passes,
            rooms = ?flagged,
            "Retries exhausted with unresolved conflicts"
        );

        Ok(SeatingOutcome {
            arrangement,
            conflicted_rooms: flagged,
            full_attempts: attempts,
            repair_passes,
        })
    }

    /// Reshuffle a single room with a thread-local RNG.
    pub fn rerandomize_room(
        &self,
        arrangement: &Arrangement,
        room_id: &str,
        rooms: &[Room],
        segregate: bool,
    ) -> Result<Arrangement, SeatingError> {
        self.rerandomize_room_with(arrangement, room_id, rooms, segregate, &mut rand::rng())
    }

    pub fn rerandomize_room_with<R: Rng + ?Sized>(
        &self,
        arrangement: &Arrangement,
        room_id: &str,
        rooms: &[Room],
        segregate: bool,
        rng: &mut R,
    ) -> Result<Arrangement, SeatingError> {
        rerandomize_room(arrangement, room_id, rooms, segregate, &self.config, rng)
    }
}

fn ensure_running<O: ProgressObserver + ?Sized>(observer: &O) -> Result<(), SeatingError> {
    if observer.is_cancelled() {
        return Err(SeatingError::Cancelled);
    }
    Ok(())
}

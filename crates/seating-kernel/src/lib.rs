//! Seating Kernel: diversity-driven desk pairing across classrooms.
//!
//! This crate assigns people to two-seat desks spread over several rooms.
//! Each desk should mix cohorts, groups and surnames; the engine gets there
//! with a shuffle followed by greedy pair scoring under slot-scarcity
//! pressure, then detects the rooms that still hold conflicting desks and
//! repairs them locally, falling back to full rebuilds.
//!
//! ## Pipeline
//!
//! 1. [`build::build_arrangement`] lays out `ceil(capacity / 2)` desks per
//!    room and fills them layer by layer.
//! 2. [`conflict::conflicted_rooms`] flags rooms with blocking desk conflicts.
//! 3. [`repair::rerandomize_room`] reshuffles one room in place.
//! 4. [`SeatingEngine`] wraps the three in bounded retry loops and reports
//!    progress to a [`ProgressObserver`].

pub mod build;
pub mod cohort;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
mod filler;
mod grid;
pub mod model;
pub mod progress;
pub mod repair;
pub mod scoring;

pub use build::build_arrangement;
pub use cohort::cohort;
pub use config::{EngineConfig, RetryConfig, ScoringConfig};
pub use conflict::{DeskConflict, conflicted_rooms, desk_conflicts};
pub use engine::{SeatingEngine, SeatingOutcome};
pub use error::SeatingError;
pub use model::{Arrangement, Desk, Person, PersonId, Room, RoomId};
pub use progress::{NoopObserver, Phase, Progress, ProgressLog, ProgressObserver};
pub use repair::rerandomize_room;
pub use scoring::score_pair;

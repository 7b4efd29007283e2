//! Seating Planner - rosters, demo data and output around the seating kernel.
//!
//! The kernel only knows people, rooms and desks. This crate handles the
//! parts a school office touches:
//!
//! - **Rosters**: loose JSON exports cleaned into validated people and rooms
//! - **Demo data**: seeded roster generation for trying the engine out
//! - **Output**: a printable chart and a per-group placement list
//! - **Reports**: saved runs that can be reloaded for single-room repairs

pub mod generator;
pub mod render;
pub mod report;
pub mod roster;

pub use generator::{RosterGenerator, RosterGeneratorConfig};
pub use render::{ChartView, Placement, PlacementList, placements};
pub use report::RunReport;
pub use roster::{LoadReport, Roster, RosterFile};

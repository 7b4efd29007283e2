//! Conflict detection over a finished arrangement.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Arrangement, Desk, RoomId};

/// Something wrong with the pair seated at one desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeskConflict {
    /// Both occupants come from the same group
    SameGroup,
    /// Different groups, same cohort
    SameCohort,
    /// Same last name. Shown to users, never flags a room
    SameLastName,
    /// Different gender codes while segregating
    MixedGender,
}

impl DeskConflict {
    /// Whether this conflict makes the room need repair.
    pub fn is_blocking(self) -> bool {
        !matches!(self, DeskConflict::SameLastName)
    }

    pub fn label(self) -> &'static str {
        match self {
            DeskConflict::SameGroup => "same group",
            DeskConflict::SameCohort => "same cohort",
            DeskConflict::SameLastName => "same last name",
            DeskConflict::MixedGender => "mixed gender",
        }
    }
}

impl fmt::Display for DeskConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// List the conflicts at one desk. Desks with fewer than two occupants have none.
pub fn desk_conflicts(desk: &Desk, segregate: bool) -> Vec<DeskConflict> {
    let Some((a, b)) = desk.pair() else {
        return Vec::new();
    };

    let mut conflicts = Vec::new();
    if a.group == b.group {
        conflicts.push(DeskConflict::SameGroup);
    } else if a.cohort() == b.cohort() {
        conflicts.push(DeskConflict::SameCohort);
    }
    if a.last_name == b.last_name {
        conflicts.push(DeskConflict::SameLastName);
    }
    if segregate && a.gender_code() != b.gender_code() {
        conflicts.push(DeskConflict::MixedGender);
    }
    conflicts
}

/// True if any desk in the list has a blocking conflict.
pub fn has_blocking_conflict(desks: &[Desk], segregate: bool) -> bool {
    desks.iter().any(|desk| {
        desk_conflicts(desk, segregate)
            .into_iter()
            .any(DeskConflict::is_blocking)
    })
}

/// Rooms holding at least one desk with a blocking conflict.
pub fn conflicted_rooms(arrangement: &Arrangement, segregate: bool) -> BTreeSet<RoomId> {
    arrangement
        .iter()
        .filter(|(_, desks)| has_blocking_conflict(desks, segregate))
        .map(|(room_id, _)| room_id.clone())
        .collect()
}

//! Model types: the people, rooms and desks the engine reads and produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cohort::cohort;

/// Opaque identifier for a person.
pub type PersonId = String;

/// Opaque identifier for a room.
pub type RoomId = String;

/// A person to be seated.
///
/// Owned by the caller; the engine only clones occupants into desks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    /// Origin group label, e.g. "7A"
    #[serde(alias = "class")]
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Person {
    /// Create a person with only the required fields set.
    pub fn new(
        id: impl Into<PersonId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            group: group.into(),
            external_id: None,
            secondary_id: None,
            gender: None,
            language: None,
            variant: None,
        }
    }

    /// Builder-style gender setter.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Cohort derived from the group label.
    pub fn cohort(&self) -> &str {
        cohort(&self.group)
    }

    /// Single upper-case gender letter, if one is recorded.
    pub fn gender_code(&self) -> Option<char> {
        self.gender
            .as_deref()
            .and_then(|g| g.trim().chars().next())
            .map(|c| c.to_ascii_uppercase())
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A classroom with a fixed number of seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: usize,
    /// Up to two supervisor labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supervisors: Vec<String>,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            supervisors: Vec::new(),
        }
    }

    /// Number of two-seat desks the room holds.
    pub fn desk_count(&self) -> usize {
        self.capacity.div_ceil(2)
    }
}

/// A two-seat desk. Slot order is kept stable for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desk {
    pub id: String,
    pub seats: [Option<Person>; 2],
}

impl Desk {
    /// Empty desk with the conventional `<room>-desk-<index>` id.
    pub fn empty(room_id: &str, index: usize) -> Self {
        Self {
            id: desk_id(room_id, index),
            seats: [None, None],
        }
    }

    /// Occupants in slot order, skipping empty slots.
    pub fn occupants(&self) -> impl Iterator<Item = &Person> {
        self.seats.iter().flatten()
    }

    pub fn occupied(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Both occupants when the desk is full.
    pub fn pair(&self) -> Option<(&Person, &Person)> {
        match &self.seats {
            [Some(a), Some(b)] => Some((a, b)),
            _ => None,
        }
    }
}

pub(crate) fn desk_id(room_id: &str, index: usize) -> String {
    format!("{room_id}-desk-{index}")
}

/// The seating chart: each room's ordered desk list.
///
/// Rebuilt wholesale by the builder; one room at a time by repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arrangement {
    rooms: BTreeMap<RoomId, Vec<Desk>>,
}

impl Arrangement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desks of a room, if the room is part of the arrangement.
    pub fn desks(&self, room_id: &str) -> Option<&[Desk]> {
        self.rooms.get(room_id).map(Vec::as_slice)
    }

    /// Install or replace a room's desk list.
    pub fn set_room(&mut self, room_id: impl Into<RoomId>, desks: Vec<Desk>) {
        self.rooms.insert(room_id.into(), desks);
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Rooms and their desks, ordered by room id.
    pub fn iter(&self) -> impl Iterator<Item = (&RoomId, &[Desk])> {
        self.rooms.iter().map(|(id, desks)| (id, desks.as_slice()))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Everyone seated in the given room.
    pub fn room_occupants(&self, room_id: &str) -> Vec<&Person> {
        self.rooms
            .get(room_id)
            .map(|desks| desks.iter().flat_map(Desk::occupants).collect())
            .unwrap_or_default()
    }

    /// Everyone seated anywhere, room by room.
    pub fn occupants(&self) -> impl Iterator<Item = &Person> {
        self.rooms.values().flatten().flat_map(Desk::occupants)
    }

    pub fn seated_count(&self) -> usize {
        self.rooms.values().flatten().map(Desk::occupied).sum()
    }
}

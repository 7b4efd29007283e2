//! Roster files: people and rooms as they arrive from a spreadsheet export.
//!
//! Raw rows are loose (blank cells, duplicates, missing ids). Loading turns
//! them into clean [`Person`] and [`Room`] values and counts what was dropped.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use seating_kernel::{Person, Room};

/// Namespace UUID for deterministic person and room ids (v5).
pub const ID_NAMESPACE: Uuid = Uuid::from_bytes([
    0x3d, 0x51, 0x0e, 0x8a, 0x64, 0x2f, 0x4b, 0x17, 0x9c, 0x06, 0xa2, 0x7e, 0x5b, 0xd4, 0x18, 0xc3,
]);

/// Most supervisors a room keeps.
const MAX_SUPERVISORS: usize = 2;

/// One person row. Every cell may be missing or blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(alias = "class")]
    pub group: Option<String>,
    #[serde(alias = "student_id")]
    pub external_id: Option<String>,
    #[serde(alias = "school_id")]
    pub secondary_id: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub variant: Option<String>,
}

/// One room row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub capacity: usize,
    pub supervisors: Vec<String>,
    pub supervisor: Option<String>,
    pub supervisor2: Option<String>,
}

/// The on-disk roster format: `{ "people": [...], "rooms": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterFile {
    pub people: Vec<PersonRecord>,
    pub rooms: Vec<RoomRecord>,
}

/// What loading threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Person rows missing a first name, last name or group
    pub dropped_invalid: usize,
    /// Person rows repeating an earlier dedup key
    pub dropped_duplicates: usize,
    /// Room rows without a name or with zero capacity
    pub dropped_rooms: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// A validated roster, ready for the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub people: Vec<Person>,
    pub rooms: Vec<Room>,
    #[serde(skip)]
    pub report: LoadReport,
}

impl Roster {
    pub fn new(people: Vec<Person>, rooms: Vec<Room>) -> Self {
        Self {
            people,
            rooms,
            report: LoadReport::default(),
        }
    }

    /// Read and clean a roster JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read roster {}", path.display()))?;
        let roster = Self::from_json(&json)
            .with_context(|| format!("failed to parse roster {}", path.display()))?;

        info!(
            path = %path.display(),
            people = roster.people.len(),
            rooms = roster.rooms.len(),
            dropped_invalid = roster.report.dropped_invalid,
            dropped_duplicates = roster.report.dropped_duplicates,
            dropped_rooms = roster.report.dropped_rooms,
            "Loaded roster"
        );
        Ok(roster)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: RosterFile = serde_json::from_str(json)?;
        Ok(file.into_roster())
    }

    /// Write the roster in the same format [`Roster::load`] reads.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write roster {}", path.display()))?;
        Ok(())
    }

    pub fn total_seats(&self) -> usize {
        self.rooms.iter().map(|r| r.capacity).sum()
    }

    /// Head count per group label.
    pub fn group_summary(&self) -> BTreeMap<&str, usize> {
        let mut summary = BTreeMap::new();
        for person in &self.people {
            *summary.entry(person.group.as_str()).or_insert(0) += 1;
        }
        summary
    }

    /// True when both M and F codes are present, i.e. segregation matters.
    pub fn has_mixed_genders(&self) -> bool {
        let codes: HashSet<char> = self.people.iter().filter_map(Person::gender_code).collect();
        codes.contains(&'M') && codes.contains(&'F')
    }
}

impl RosterFile {
    /// Validate, dedupe and assign ids.
    pub fn into_roster(self) -> Roster {
        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        let mut people = Vec::with_capacity(self.people.len());

        for record in self.people {
            let Some(person) = record.into_person(&mut seen, &mut report) else {
                continue;
            };
            people.push(person);
        }

        let rooms: Vec<Room> = self
            .rooms
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let room = record.into_room(position);
                if room.is_none() {
                    report.dropped_rooms += 1;
                }
                room
            })
            .collect();

        if !report.is_clean() {
            debug!(?report, "Dropped roster rows");
        }

        Roster {
            people,
            rooms,
            report,
        }
    }
}

impl PersonRecord {
    fn into_person(self, seen: &mut HashSet<String>, report: &mut LoadReport) -> Option<Person> {
        let (Some(first), Some(last), Some(group)) = (
            non_blank(self.first_name),
            non_blank(self.last_name),
            non_blank(self.group),
        ) else {
            report.dropped_invalid += 1;
            return None;
        };

        let external_id = non_blank(self.external_id);
        let key = match &external_id {
            Some(id) => id.clone(),
            None => format!("{first}-{last}-{group}").to_lowercase(),
        };
        if !seen.insert(key.clone()) {
            report.dropped_duplicates += 1;
            return None;
        }

        let id = non_blank(self.id).unwrap_or_else(|| {
            Uuid::new_v5(&ID_NAMESPACE, format!("person:{key}").as_bytes()).to_string()
        });

        Some(Person {
            id,
            first_name: first,
            last_name: last,
            group,
            external_id,
            secondary_id: non_blank(self.secondary_id),
            gender: non_blank(self.gender),
            language: non_blank(self.language),
            variant: non_blank(self.variant),
        })
    }
}

impl RoomRecord {
    fn into_room(self, position: usize) -> Option<Room> {
        let name = non_blank(self.name)?;
        if self.capacity == 0 {
            return None;
        }

        let id = non_blank(self.id).unwrap_or_else(|| {
            Uuid::new_v5(&ID_NAMESPACE, format!("room:{name}:{position}").as_bytes()).to_string()
        });
        let supervisors = self
            .supervisors
            .into_iter()
            .map(Some)
            .chain([self.supervisor, self.supervisor2])
            .filter_map(non_blank)
            .take(MAX_SUPERVISORS)
            .collect();

        let mut room = Room::new(id, name, self.capacity);
        room.supervisors = supervisors;
        Some(room)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

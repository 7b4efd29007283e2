//! Demo roster generator.
//!
//! Generates random but seatable school rosters: rooms with capacities and
//! people spread over cohorts and sections.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use seating_kernel::{Person, Room};

use crate::roster::{ID_NAMESPACE, Roster};

const FIRST_NAMES: [&str; 24] = [
    "Aigerim", "Ben", "Chloe", "Daniyar", "Elena", "Farid", "Grace", "Hana", "Ivan", "Jamal",
    "Kira", "Liam", "Mira", "Nurlan", "Olga", "Pavel", "Quinn", "Rosa", "Sanzhar", "Tomiris",
    "Umar", "Vera", "Wei", "Yerlan",
];

const LAST_NAMES: [&str; 18] = [
    "Abenov", "Baker", "Chen", "Dzhaksybekov", "Evans", "Fischer", "Garcia", "Ivanova", "Kim",
    "Lee", "Muller", "Nazarbayev", "Okafor", "Park", "Rossi", "Smirnov", "Tanaka", "Zhumabekova",
];

const SECTIONS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Configuration for generating rosters.
#[derive(Debug, Clone)]
pub struct RosterGeneratorConfig {
    /// Number of rooms.
    pub num_rooms: usize,
    /// Room capacity range (min, max).
    pub room_capacity_range: (usize, usize),
    /// Cohorts (leading numbers of the group labels).
    pub cohorts: Vec<u8>,
    /// Sections per cohort, e.g. 2 for "7A" and "7B".
    pub sections_per_cohort: usize,
    /// Fraction of total seats to fill (0.0 to 1.0).
    pub fill_ratio: f64,
}

impl Default for RosterGeneratorConfig {
    fn default() -> Self {
        Self::school()
    }
}

impl RosterGeneratorConfig {
    /// A single small room, a couple of cohorts.
    pub fn small() -> Self {
        Self {
            num_rooms: 1,
            room_capacity_range: (12, 16),
            cohorts: vec![7, 8],
            sections_per_cohort: 2,
            fill_ratio: 0.75,
        }
    }

    /// A school exam day: several rooms, four cohorts, some spare seats.
    pub fn school() -> Self {
        Self {
            num_rooms: 5,
            room_capacity_range: (16, 30),
            cohorts: vec![7, 8, 9, 10],
            sections_per_cohort: 3,
            fill_ratio: 0.85,
        }
    }

    /// Every seat taken, few cohorts: hard to keep desks diverse.
    pub fn tight() -> Self {
        Self {
            num_rooms: 3,
            room_capacity_range: (20, 24),
            cohorts: vec![9, 10],
            sections_per_cohort: 2,
            fill_ratio: 1.0,
        }
    }

    /// Preset by name: small, school, tight.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "small" => Some(Self::small()),
            "school" => Some(Self::school()),
            "tight" => Some(Self::tight()),
            _ => None,
        }
    }
}

/// Generator for demo rosters.
pub struct RosterGenerator {
    config: RosterGeneratorConfig,
    rng: ChaCha8Rng,
    seed: u64,
}

impl RosterGenerator {
    /// Create a new generator with the given config and seed.
    pub fn new(config: RosterGeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generate a roster.
    pub fn generate(&mut self) -> Roster {
        let rooms = self.generate_rooms();
        let seats: usize = rooms.iter().map(|r| r.capacity).sum();
        let count = ((seats as f64 * self.config.fill_ratio.clamp(0.0, 1.0)) as usize).max(1);
        let people = self.generate_people(count.min(seats));

        Roster::new(people, rooms)
    }

    fn generate_rooms(&mut self) -> Vec<Room> {
        let (min_cap, max_cap) = self.config.room_capacity_range;
        let mut rooms = Vec::with_capacity(self.config.num_rooms);

        for i in 0..self.config.num_rooms {
            let id = self.stable_id(&format!("room:{i}"));
            let capacity = self.rng.random_range(min_cap..=max_cap.max(min_cap));
            let supervisor = format!(
                "{} {}",
                FIRST_NAMES.choose(&mut self.rng).unwrap_or(&"Staff"),
                LAST_NAMES.choose(&mut self.rng).unwrap_or(&"Member"),
            );

            let mut room = Room::new(id, format!("Room {}", 101 + i), capacity);
            room.supervisors = vec![supervisor];
            rooms.push(room);
        }

        rooms
    }

    fn generate_people(&mut self, count: usize) -> Vec<Person> {
        let groups: Vec<String> = self
            .config
            .cohorts
            .iter()
            .flat_map(|cohort| {
                SECTIONS
                    .iter()
                    .take(self.config.sections_per_cohort.max(1))
                    .map(move |section| format!("{cohort}{section}"))
            })
            .collect();

        let mut people = Vec::with_capacity(count);
        for i in 0..count {
            let group = groups
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_else(|| "1A".to_string());
            let first = *FIRST_NAMES.choose(&mut self.rng).unwrap_or(&"Alex");
            let last = *LAST_NAMES.choose(&mut self.rng).unwrap_or(&"Doe");
            let gender = if self.rng.random_bool(0.5) { "F" } else { "M" };

            let mut person = Person::new(self.stable_id(&format!("person:{i}")), first, last, group)
                .with_gender(gender);
            person.external_id = Some(format!("S{:05}", 10_000 + i));
            people.push(person);
        }

        people
    }

    /// Deterministic id: UUIDv5 of the seed and a local name.
    fn stable_id(&self, name: &str) -> String {
        Uuid::new_v5(&ID_NAMESPACE, format!("demo:{}:{}", self.seed, name).as_bytes()).to_string()
    }
}

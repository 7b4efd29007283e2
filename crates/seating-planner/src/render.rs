//! Text output: the room-by-room chart and the per-group placement list.

use std::collections::HashMap;
use std::fmt;

use seating_kernel::{Arrangement, Desk, Person, Room, desk_conflicts};

/// Room-by-room chart with conflict labels on each desk.
pub struct ChartView<'a> {
    arrangement: &'a Arrangement,
    rooms: &'a [Room],
    segregate: bool,
}

impl<'a> ChartView<'a> {
    pub fn new(arrangement: &'a Arrangement, rooms: &'a [Room], segregate: bool) -> Self {
        Self {
            arrangement,
            rooms,
            segregate,
        }
    }

    fn write_desk(&self, f: &mut fmt::Formatter<'_>, number: usize, desk: &Desk) -> fmt::Result {
        let seat = |slot: &Option<Person>| match slot {
            Some(p) => format!("{} ({})", p.full_name(), p.group),
            None => "[empty]".to_string(),
        };
        write!(f, "  Desk {number}: {} | {}", seat(&desk.seats[0]), seat(&desk.seats[1]))?;

        let labels: Vec<&str> = desk_conflicts(desk, self.segregate)
            .iter()
            .map(|c| c.label())
            .collect();
        if !labels.is_empty() {
            write!(f, "  [{}]", labels.join(", "))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ChartView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for room in self.rooms {
            let Some(desks) = self.arrangement.desks(&room.id) else {
                continue;
            };
            let seated: usize = desks.iter().map(Desk::occupied).sum();

            writeln!(
                f,
                "== {} ({seated}/{} seated) ==",
                room.name, room.capacity
            )?;
            if !room.supervisors.is_empty() {
                writeln!(f, "Supervisors: {}", room.supervisors.join(", "))?;
            }
            for (i, desk) in desks.iter().enumerate() {
                self.write_desk(f, i + 1, desk)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Where one person sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub group: String,
    pub last_name: String,
    pub first_name: String,
    pub room_name: String,
    /// 1-based desk number within the room
    pub desk: usize,
}

/// Placements grouped by origin group, for handing out to each class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementList {
    pub rows: Vec<Placement>,
}

/// Every seated person's room and desk, sorted by group, then last and
/// first name.
pub fn placements(arrangement: &Arrangement, rooms: &[Room]) -> PlacementList {
    let names: HashMap<&str, &str> = rooms
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();

    let mut rows: Vec<Placement> = arrangement
        .iter()
        .flat_map(|(room_id, desks)| {
            let room_name = names.get(room_id.as_str()).copied().unwrap_or(room_id.as_str());
            desks.iter().enumerate().flat_map(move |(i, desk)| {
                desk.occupants().map(move |p| Placement {
                    group: p.group.clone(),
                    last_name: p.last_name.clone(),
                    first_name: p.first_name.clone(),
                    room_name: room_name.to_string(),
                    desk: i + 1,
                })
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        (&a.group, &a.last_name, &a.first_name).cmp(&(&b.group, &b.last_name, &b.first_name))
    });
    PlacementList { rows }
}

impl fmt::Display for PlacementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current: Option<&str> = None;
        for row in &self.rows {
            if current != Some(row.group.as_str()) {
                if current.is_some() {
                    writeln!(f)?;
                }
                writeln!(f, "Group {}", row.group)?;
                current = Some(&row.group);
            }
            writeln!(
                f,
                "  {}, {}: {}, Desk {}",
                row.last_name, row.first_name, row.room_name, row.desk
            )?;
        }
        Ok(())
    }
}

//! Full-arrangement builder.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::SeatingError;
use crate::filler::seat_all;
use crate::grid::{RoomSeats, SeatGrid};
use crate::model::{Arrangement, Person, Room};

/// Reject inputs the engine cannot seat: no people, no rooms, or more people
/// than declared seats.
pub fn check_inputs(people: &[Person], rooms: &[Room]) -> Result<(), SeatingError> {
    if people.is_empty() {
        return Err(SeatingError::EmptyRoster);
    }
    if rooms.is_empty() {
        return Err(SeatingError::NoRooms);
    }
    let seats: usize = rooms.iter().map(|r| r.capacity).sum();
    if people.len() > seats {
        return Err(SeatingError::InsufficientCapacity {
            people: people.len(),
            seats,
        });
    }
    Ok(())
}

/// Build a complete arrangement from a fresh shuffle.
///
/// Every room gets `ceil(capacity / 2)` desks and every person is seated
/// exactly once. The result is not necessarily conflict-free.
pub fn build_arrangement<R: Rng + ?Sized>(
    people: &[Person],
    rooms: &[Room],
    segregate: bool,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Arrangement, SeatingError> {
    check_inputs(people, rooms)?;

    let mut order: Vec<usize> = (0..people.len()).collect();
    order.shuffle(rng);

    let mut grid = SeatGrid::new(
        rooms
            .iter()
            .map(|room| RoomSeats::new(room.id.clone(), room.capacity))
            .collect(),
    );

    seat_all(&mut grid, people, order, segregate, config, rng);
    debug!(
        people = people.len(),
        free_slots = grid.free_slots(),
        "Built arrangement"
    );

    let mut arrangement = Arrangement::new();
    for (room_id, desks) in grid.into_desks(people) {
        arrangement.set_room(room_id, desks);
    }
    Ok(arrangement)
}

//! Index-based working grid used while seating.
//!
//! People live in an immutable slice; desks hold indices into it until the
//! grid is turned into real [`Desk`]s.

use crate::model::{Desk, Person, RoomId, desk_id};

/// Two slots, each holding an index into the people slice.
pub(crate) type Seats = [Option<usize>; 2];

pub(crate) fn is_empty(seats: &Seats) -> bool {
    seats.iter().all(Option::is_none)
}

/// One room's desks. With an odd capacity the last desk has a single usable
/// slot (slot 0); slot 1 stays empty.
#[derive(Debug, Clone)]
pub(crate) struct RoomSeats {
    pub room_id: RoomId,
    pub desk_ids: Vec<String>,
    pub desks: Vec<Seats>,
    capacity: usize,
}

impl RoomSeats {
    /// `ceil(capacity / 2)` empty desks with conventional ids.
    pub fn new(room_id: RoomId, capacity: usize) -> Self {
        let desk_ids = (0..capacity.div_ceil(2))
            .map(|i| desk_id(&room_id, i))
            .collect();
        Self::with_desk_ids(room_id, desk_ids, capacity)
    }

    pub fn with_desk_ids(room_id: RoomId, desk_ids: Vec<String>, capacity: usize) -> Self {
        let desks = vec![[None, None]; desk_ids.len()];
        Self {
            room_id,
            desk_ids,
            desks,
            capacity,
        }
    }

    /// Usable slots at a desk: 2, or 1 for the half desk of an odd room.
    pub fn slots(&self, desk: usize) -> usize {
        if !self.capacity.is_multiple_of(2) && desk + 1 == self.desks.len() {
            1
        } else {
            2
        }
    }

    pub fn is_desk_full(&self, desk: usize) -> bool {
        self.desks[desk][..self.slots(desk)].iter().all(Option::is_some)
    }

    fn free_slots(&self) -> usize {
        (0..self.desks.len())
            .map(|d| self.desks[d][..self.slots(d)].iter().filter(|s| s.is_none()).count())
            .sum()
    }
}

/// The desks in scope for one seating run: every room for a build, a single
/// room for a repair.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeatGrid {
    pub rooms: Vec<RoomSeats>,
}

impl SeatGrid {
    pub fn new(rooms: Vec<RoomSeats>) -> Self {
        Self { rooms }
    }

    /// Desks nobody sits at yet; each is a seat someone can take alone.
    pub fn open_desks(&self) -> usize {
        self.rooms
            .iter()
            .flat_map(|r| r.desks.iter())
            .filter(|d| is_empty(d))
            .count()
    }

    /// Usable empty slots; the blocked half of an odd room's last desk is
    /// not counted.
    pub fn free_slots(&self) -> usize {
        self.rooms.iter().map(RoomSeats::free_slots).sum()
    }

    /// Number of desk layers (the longest room's desk count).
    pub fn depth(&self) -> usize {
        self.rooms.iter().map(|r| r.desks.len()).max().unwrap_or(0)
    }

    /// Materialize into `(room id, desks)` pairs, cloning occupants.
    pub fn into_desks(self, people: &[Person]) -> Vec<(RoomId, Vec<Desk>)> {
        self.rooms
            .into_iter()
            .map(|room| {
                let desks = room
                    .desk_ids
                    .into_iter()
                    .zip(room.desks)
                    .map(|(id, seats)| Desk {
                        id,
                        seats: seats.map(|slot| slot.map(|i| people[i].clone())),
                    })
                    .collect();
                (room.room_id, desks)
            })
            .collect()
    }
}

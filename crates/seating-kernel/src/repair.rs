//! Room-local repair: reshuffle one room and leave the rest alone.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::SeatingError;
use crate::filler::seat_all;
use crate::grid::{RoomSeats, SeatGrid};
use crate::model::{Arrangement, Person, Room};

/// Empty `room_id` and reseat the same people with the desk filler.
///
/// The room keeps its desk count and desk ids; only occupants move. Every
/// other room in the returned arrangement is identical to the input. A room
/// with nobody in it comes back unchanged.
pub fn rerandomize_room<R: Rng + ?Sized>(
    arrangement: &Arrangement,
    room_id: &str,
    rooms: &[Room],
    segregate: bool,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Arrangement, SeatingError> {
    let mut repaired = arrangement.clone();
    reseat_room(&mut repaired, room_id, rooms, segregate, config, rng)?;
    Ok(repaired)
}

/// In-place form of [`rerandomize_room`].
pub(crate) fn reseat_room<R: Rng + ?Sized>(
    arrangement: &mut Arrangement,
    room_id: &str,
    rooms: &[Room],
    segregate: bool,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<(), SeatingError> {
    let unknown = || SeatingError::UnknownRoom(room_id.to_string());
    let room = rooms.iter().find(|r| r.id == room_id).ok_or_else(unknown)?;
    let desks = arrangement.desks(room_id).ok_or_else(unknown)?;

    let mut people: Vec<Person> = desks.iter().flat_map(|d| d.occupants()).cloned().collect();
    if people.is_empty() {
        return Ok(());
    }
    people.shuffle(rng);

    let desk_ids = desks.iter().map(|d| d.id.clone()).collect();
    let mut grid = SeatGrid::new(vec![RoomSeats::with_desk_ids(
        room_id.to_string(),
        desk_ids,
        room.capacity,
    )]);
    seat_all(
        &mut grid,
        &people,
        (0..people.len()).collect(),
        segregate,
        config,
        rng,
    );
    debug!(room = room_id, people = people.len(), "Rerandomized room");

    for (id, desks) in grid.into_desks(&people) {
        arrangement.set_room(id, desks);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_arrangement;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (Vec<Person>, Vec<Room>) {
        let people = (0..14)
            .map(|i| {
                Person::new(
                    format!("p{i}"),
                    format!("F{i}"),
                    format!("L{i}"),
                    format!("{}A", 7 + i % 2),
                )
            })
            .collect();
        let rooms = vec![Room::new("r1", "Room 1", 8), Room::new("r2", "Room 2", 8)];
        (people, rooms)
    }

    #[test]
    fn test_only_target_room_changes() {
        let (people, rooms) = setup();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let before = build_arrangement(&people, &rooms, false, &config, &mut rng).unwrap();

        let after = rerandomize_room(&before, "r1", &rooms, false, &config, &mut rng).unwrap();

        assert_eq!(after.desks("r2"), before.desks("r2"));
        assert_eq!(after.desks("r1").unwrap().len(), before.desks("r1").unwrap().len());

        let ids = |a: &Arrangement| {
            let mut ids: Vec<String> = a.room_occupants("r1").iter().map(|p| p.id.clone()).collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&before), ids(&after));
    }

    #[test]
    fn test_repair_keeps_desk_ids() {
        let (people, rooms) = setup();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let before = build_arrangement(&people, &rooms, false, &config, &mut rng).unwrap();

        let after = rerandomize_room(&before, "r2", &rooms, false, &config, &mut rng).unwrap();

        let desk_ids = |a: &Arrangement| -> Vec<String> {
            a.desks("r2").unwrap().iter().map(|d| d.id.clone()).collect()
        };
        assert_eq!(desk_ids(&after), desk_ids(&before));
        assert_eq!(desk_ids(&after)[0], "r2-desk-0");
    }

    #[test]
    fn test_empty_room_is_unchanged() {
        let (_, rooms) = setup();
        let mut arrangement = Arrangement::new();
        arrangement.set_room("r1", vec![crate::model::Desk::empty("r1", 0)]);
        arrangement.set_room("r2", Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let after = rerandomize_room(
            &arrangement,
            "r1",
            &rooms,
            false,
            &EngineConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(after, arrangement);
    }

    #[test]
    fn test_unknown_room() {
        let (_, rooms) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = rerandomize_room(
            &Arrangement::new(),
            "nope",
            &rooms,
            false,
            &EngineConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, SeatingError::UnknownRoom("nope".to_string()));
    }
}

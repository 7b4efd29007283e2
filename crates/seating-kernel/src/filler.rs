//! Desk filling: greedy pair selection under slot-scarcity pressure.
//!
//! The pool is a list of indices into an immutable people slice. It is
//! pre-shuffled, so searching only its first `candidate_window` entries
//! still samples the whole roster fairly.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::grid::{SeatGrid, Seats};
use crate::model::Person;
use crate::scoring::{is_acceptable, score_pair};

/// How crowded the remaining seating is.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pressure {
    /// Unplaced people, including those queued in later passes
    pub pending: usize,
    /// Desks still completely empty in scope
    pub open_desks: usize,
}

impl Pressure {
    /// Not everyone left can get a desk of their own, so pairing is forced.
    pub fn is_scarce(&self) -> bool {
        self.pending > self.open_desks
    }
}

pub(crate) struct DeskFiller<'a> {
    people: &'a [Person],
    config: &'a EngineConfig,
    segregate: bool,
}

impl<'a> DeskFiller<'a> {
    pub fn new(people: &'a [Person], config: &'a EngineConfig, segregate: bool) -> Self {
        Self {
            people,
            config,
            segregate,
        }
    }

    /// Fill one desk with `slots` usable slots from the pool. Returns how
    /// many people were seated.
    pub fn fill(
        &self,
        seats: &mut Seats,
        slots: usize,
        neighbor: Option<&Seats>,
        pool: &mut Vec<usize>,
        pressure: Pressure,
    ) -> usize {
        if slots < 2 {
            return Self::fill_alone(seats, pool);
        }
        match *seats {
            [None, None] => self.fill_empty(seats, neighbor, pool, pressure),
            [Some(seated), None] => self.fill_partner(seats, 1, seated, neighbor, pool, pressure),
            [None, Some(seated)] => self.fill_partner(seats, 0, seated, neighbor, pool, pressure),
            [Some(_), Some(_)] => 0,
        }
    }

    /// True if `candidate` may sit next to `other` (an empty slot always allows it).
    pub fn can_share(&self, other: Option<usize>, candidate: usize) -> bool {
        match other {
            None => true,
            Some(o) => {
                !self.segregate
                    || self.people[o].gender_code() == self.people[candidate].gender_code()
            }
        }
    }

    fn neighbor_cohorts(&self, neighbor: Option<&Seats>) -> Vec<&'a str> {
        neighbor
            .into_iter()
            .flatten()
            .flatten()
            .map(|&i| self.people[i].cohort())
            .collect()
    }

    fn score(&self, a: usize, b: usize, cohorts: &[&str]) -> Option<u32> {
        score_pair(
            &self.people[a],
            &self.people[b],
            cohorts,
            self.segregate,
            &self.config.scoring,
        )
    }

    /// A pair is taken when it clears the bar, or regardless when seats are scarce.
    fn accepts(&self, score: u32, pressure: Pressure) -> bool {
        is_acceptable(Some(score), self.config.acceptance_bar) || pressure.is_scarce()
    }

    /// Single-slot desk: the next person in the queue takes it.
    fn fill_alone(seats: &mut Seats, pool: &mut Vec<usize>) -> usize {
        if seats[0].is_some() || pool.is_empty() {
            return 0;
        }
        seats[0] = Some(pool.remove(0));
        1
    }

    fn fill_empty(
        &self,
        seats: &mut Seats,
        neighbor: Option<&Seats>,
        pool: &mut Vec<usize>,
        pressure: Pressure,
    ) -> usize {
        match pool.len() {
            0 => return 0,
            1 => {
                seats[0] = Some(pool.remove(0));
                return 1;
            }
            _ => {}
        }

        let cohorts = self.neighbor_cohorts(neighbor);
        let window = pool.len().min(self.config.candidate_window);
        let mut best: Option<(usize, usize, u32)> = None;

        for i in 0..window {
            for j in (i + 1)..window {
                if let Some(score) = self.score(pool[i], pool[j], &cohorts)
                    && best.is_none_or(|(_, _, top)| score > top)
                {
                    best = Some((i, j, score));
                }
            }
        }

        match best {
            Some((i, j, score)) if self.accepts(score, pressure) => {
                // j > i, so removing j first keeps i valid
                let second = pool.remove(j);
                let first = pool.remove(i);
                *seats = [Some(first), Some(second)];
                2
            }
            Some((i, _, _)) => {
                seats[0] = Some(pool.remove(i));
                1
            }
            None => {
                seats[0] = Some(pool.remove(0));
                1
            }
        }
    }

    fn fill_partner(
        &self,
        seats: &mut Seats,
        slot: usize,
        seated: usize,
        neighbor: Option<&Seats>,
        pool: &mut Vec<usize>,
        pressure: Pressure,
    ) -> usize {
        let cohorts = self.neighbor_cohorts(neighbor);
        let window = pool.len().min(self.config.candidate_window);
        let mut best: Option<(usize, u32)> = None;

        for (i, &candidate) in pool.iter().enumerate().take(window) {
            if !self.can_share(Some(seated), candidate) {
                continue;
            }
            if let Some(score) = self.score(seated, candidate, &cohorts)
                && best.is_none_or(|(_, top)| score > top)
            {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) if self.accepts(score, pressure) => {
                seats[slot] = Some(pool.remove(i));
                1
            }
            _ => 0,
        }
    }
}

/// Seat everyone in `order` into the grid.
///
/// With `segregate` on, the queue is split by gender code and each sub-pool
/// gets its own layered pass, largest first. Whatever the layered passes
/// leave behind is swept into the remaining free slots.
pub(crate) fn seat_all<R: Rng + ?Sized>(
    grid: &mut SeatGrid,
    people: &[Person],
    order: Vec<usize>,
    segregate: bool,
    config: &EngineConfig,
    rng: &mut R,
) {
    let filler = DeskFiller::new(people, config, segregate);
    let pools = if segregate {
        split_by_gender(people, order)
    } else {
        vec![order]
    };

    let mut queued: usize = pools.iter().map(Vec::len).sum();
    let mut leftovers = Vec::new();

    for mut pool in pools {
        queued -= pool.len();
        fill_layers(grid, &mut pool, &filler, queued + leftovers.len(), rng);
        leftovers.append(&mut pool);
    }

    if !leftovers.is_empty() {
        debug!(leftovers = leftovers.len(), "Sweeping unplaced people");
        let forced = sweep_leftovers(grid, &mut leftovers, &filler);
        if segregate && forced > 0 {
            warn!(forced, "Seat scarcity forced mixed gender codes at some desks");
        }
    }

    if !leftovers.is_empty() {
        warn!(unplaced = leftovers.len(), "Ran out of seats while sweeping");
    }
}

/// Split a queue by gender code, keeping queue order inside each sub-pool.
/// Largest sub-pool first.
fn split_by_gender(people: &[Person], order: Vec<usize>) -> Vec<Vec<usize>> {
    let mut by_gender: BTreeMap<Option<char>, Vec<usize>> = BTreeMap::new();
    for i in order {
        by_gender.entry(people[i].gender_code()).or_default().push(i);
    }

    let mut pools: Vec<Vec<usize>> = by_gender.into_values().collect();
    pools.sort_by_key(|p| Reverse(p.len()));
    pools
}

/// Fill desks layer by layer: desk 0 of every room, then desk 1, and so on,
/// visiting rooms in a fresh random order per layer. Sweeps repeat while
/// they keep seating people, since half-filled desks get another chance.
fn fill_layers<R: Rng + ?Sized>(
    grid: &mut SeatGrid,
    pool: &mut Vec<usize>,
    filler: &DeskFiller<'_>,
    reserved: usize,
    rng: &mut R,
) {
    let depth = grid.depth();
    let mut room_order: Vec<usize> = (0..grid.rooms.len()).collect();

    while !pool.is_empty() {
        let mut placed = 0;

        for layer in 0..depth {
            room_order.shuffle(rng);

            for &r in &room_order {
                if pool.is_empty() {
                    return;
                }
                let pressure = Pressure {
                    pending: pool.len() + reserved,
                    open_desks: grid.open_desks(),
                };
                let room = &mut grid.rooms[r];
                if layer >= room.desks.len() || room.is_desk_full(layer) {
                    continue;
                }
                let slots = room.slots(layer);
                let (before, rest) = room.desks.split_at_mut(layer);
                placed += filler.fill(&mut rest[0], slots, before.last(), pool, pressure);
            }
        }

        if placed == 0 {
            break;
        }
    }
}

/// Place leftovers into any usable free slot in room order. The first pass honours
/// the gender filter; the second places whoever is still left. Returns the
/// number of people seated by the second pass.
fn sweep_leftovers(grid: &mut SeatGrid, pool: &mut Vec<usize>, filler: &DeskFiller<'_>) -> usize {
    let mut forced = 0;

    for strict in [true, false] {
        for room in &mut grid.rooms {
            for d in 0..room.desks.len() {
                let slots = room.slots(d);
                let seats = &mut room.desks[d];
                for slot in 0..slots {
                    if pool.is_empty() {
                        return forced;
                    }
                    if seats[slot].is_some() {
                        continue;
                    }
                    let other = seats[1 - slot];
                    let Some(pos) = pool
                        .iter()
                        .position(|&p| !strict || filler.can_share(other, p))
                    else {
                        continue;
                    };
                    seats[slot] = Some(pool.remove(pos));
                    if !strict {
                        forced += 1;
                    }
                }
            }
        }
    }

    forced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RoomSeats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn person(id: &str, last: &str, group: &str, gender: &str) -> Person {
        Person::new(id, "Test", last, group).with_gender(gender)
    }

    fn relaxed() -> Pressure {
        Pressure {
            pending: 0,
            open_desks: 100,
        }
    }

    fn scarce() -> Pressure {
        Pressure {
            pending: 100,
            open_desks: 0,
        }
    }

    #[test]
    fn test_single_person_sits_alone() {
        let people = vec![person("a", "Lee", "7A", "F")];
        let config = EngineConfig::default();
        let filler = DeskFiller::new(&people, &config, false);
        let mut seats = [None, None];
        let mut pool = vec![0];

        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, relaxed()), 1);
        assert_eq!(seats, [Some(0), None]);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_best_pair_is_chosen() {
        let people = vec![
            person("a", "Lee", "7A", "F"),
            person("b", "Kim", "7A", "F"),
            person("c", "Park", "8C", "M"),
        ];
        let config = EngineConfig::default();
        let filler = DeskFiller::new(&people, &config, false);
        let mut seats = [None, None];
        let mut pool = vec![0, 1, 2];

        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, relaxed()), 2);
        // a+c ties with b+c; the earlier pair wins
        assert_eq!(seats, [Some(0), Some(2)]);
        assert_eq!(pool, vec![1]);
    }

    #[test]
    fn test_poor_pair_sits_alone_without_scarcity() {
        let people = vec![person("a", "Lee", "7A", "F"), person("b", "Lee", "7A", "F")];
        let config = EngineConfig::default();
        let filler = DeskFiller::new(&people, &config, false);

        let mut seats = [None, None];
        let mut pool = vec![0, 1];
        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, relaxed()), 1);
        assert_eq!(seats, [Some(0), None]);

        let mut seats = [None, None];
        let mut pool = vec![0, 1];
        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, scarce()), 2);
        assert_eq!(seats, [Some(0), Some(1)]);
    }

    #[test]
    fn test_partner_search_respects_gender_filter() {
        let people = vec![
            person("a", "Lee", "7A", "F"),
            person("b", "Kim", "8B", "M"),
            person("c", "Park", "7A", "F"),
        ];
        let config = EngineConfig::default();
        let filler = DeskFiller::new(&people, &config, true);

        let mut seats = [Some(0), None];
        let mut pool = vec![1];
        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, scarce()), 0);
        assert_eq!(seats, [Some(0), None]);

        let mut pool = vec![1, 2];
        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, scarce()), 1);
        assert_eq!(seats, [Some(0), Some(2)]);
        assert_eq!(pool, vec![1]);
    }

    #[test]
    fn test_window_limits_search() {
        let mut people: Vec<Person> = (0..5)
            .map(|i| person(&format!("p{i}"), "Lee", "7A", "F"))
            .collect();
        people.push(person("x", "Kim", "9C", "F"));
        let config = EngineConfig {
            candidate_window: 2,
            ..Default::default()
        };
        let filler = DeskFiller::new(&people, &config, false);

        let mut seats = [Some(0), None];
        let mut pool = vec![1, 2, 3, 4, 5];
        // the strong partner at the back is outside the window
        assert_eq!(filler.fill(&mut seats, 2, None, &mut pool, relaxed()), 0);
    }

    #[test]
    fn test_seat_all_places_everyone() {
        let people: Vec<Person> = (0..9)
            .map(|i| person(&format!("p{i}"), &format!("L{i}"), &format!("{}A", 7 + i % 3), "F"))
            .collect();
        let config = EngineConfig::default();
        let mut grid = SeatGrid::new(vec![
            RoomSeats::new("a".to_string(), 4),
            RoomSeats::new("b".to_string(), 6),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        seat_all(&mut grid, &people, (0..9).collect(), false, &config, &mut rng);
        assert_eq!(grid.free_slots(), 1);
    }

    #[test]
    fn test_segregated_sweep_prefers_same_gender() {
        let people = vec![
            person("a", "Lee", "7A", "F"),
            person("b", "Kim", "7A", "M"),
            person("c", "Park", "7A", "F"),
            person("d", "Choi", "7A", "M"),
        ];
        let config = EngineConfig::default();
        let mut grid = SeatGrid::new(vec![RoomSeats::new("a".to_string(), 4)]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        seat_all(&mut grid, &people, vec![0, 1, 2, 3], true, &config, &mut rng);

        assert_eq!(grid.free_slots(), 0);
        for seats in &grid.rooms[0].desks {
            let [Some(x), Some(y)] = *seats else {
                panic!("desk not full: {seats:?}");
            };
            assert_eq!(people[x].gender_code(), people[y].gender_code());
        }
    }

    #[test]
    fn test_split_by_gender_largest_first() {
        let people = vec![
            person("a", "Lee", "7A", "F"),
            person("b", "Kim", "7A", "M"),
            person("c", "Park", "7A", "m"),
            person("d", "Choi", "7A", ""),
        ];
        let pools = split_by_gender(&people, vec![3, 2, 1, 0]);
        assert_eq!(pools, vec![vec![2, 1], vec![3], vec![0]]);
    }

    #[test]
    fn test_single_slot_desk_takes_one() {
        let people = vec![person("a", "Lee", "7A", "F"), person("b", "Kim", "9C", "M")];
        let config = EngineConfig::default();
        let filler = DeskFiller::new(&people, &config, false);
        let mut seats = [None, None];
        let mut pool = vec![0, 1];

        assert_eq!(filler.fill(&mut seats, 1, None, &mut pool, scarce()), 1);
        assert_eq!(seats, [Some(0), None]);
        assert_eq!(filler.fill(&mut seats, 1, None, &mut pool, scarce()), 0);
        assert_eq!(pool, vec![1]);
    }

    #[test]
    fn test_seat_all_respects_odd_capacity() {
        let people: Vec<Person> = (0..6)
            .map(|i| person(&format!("p{i}"), &format!("L{i}"), &format!("{}A", 7 + i), "F"))
            .collect();
        let config = EngineConfig::default();

        for seed in 0..50 {
            let mut grid = SeatGrid::new(vec![
                RoomSeats::new("a".to_string(), 3),
                RoomSeats::new("b".to_string(), 3),
            ]);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            seat_all(&mut grid, &people, (0..6).collect(), false, &config, &mut rng);

            assert_eq!(grid.free_slots(), 0, "seed {seed}");
            for room in &grid.rooms {
                assert_eq!(room.desks[1][1], None, "seed {seed}");
            }
        }
    }
}

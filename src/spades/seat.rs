//! Table position.

use std::fmt::Display;

use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};

/// The number of players at the table.
pub const PLAYER_COUNT: usize = 4;

/// Table position, as an index into the clockwise seating order. Seat 0 is the human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(u8);

impl Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

impl Distribution<Seat> for Standard {
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Seat {
        Seat(rng.gen_range(0..PLAYER_COUNT as u8))
    }
}

impl TryFrom<usize> for Seat {
    type Error = ();

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index < PLAYER_COUNT {
            Ok(Seat(index as u8))
        } else {
            Err(())
        }
    }
}

impl Seat {
    /// The human player's seat.
    pub const HUMAN: Seat = Seat(0);

    /// All table positions, in clockwise order.
    pub fn all_seats() -> &'static [Seat; PLAYER_COUNT] {
        static SEATS: [Seat; PLAYER_COUNT] = [Seat(0), Seat(1), Seat(2), Seat(3)];
        &SEATS
    }

    /// The next table position, in clockwise order.
    pub fn next(self) -> Seat {
        Seat((self.0 + 1) % PLAYER_COUNT as u8)
    }

    /// The next N table positions in clockwise order.
    pub fn next_n(mut self, n: usize) -> Vec<Seat> {
        let mut order = vec![];
        for _ in 0..n {
            self = self.next();
            order.push(self);
        }
        order
    }
}

/// Teams are not fixed by position: the bid winner and whoever holds the teammate card form
/// the bidding team, and the other two players defend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Bidding,
    Defending,
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Team::Bidding => "Bidding team",
            Team::Defending => "Defending team",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_next() {
        let seat = Seat::try_from(3usize).unwrap();
        assert_eq!(Seat::HUMAN, seat.next());
        let order: Vec<_> = [1usize, 2, 3, 0]
            .into_iter()
            .map(|i| Seat::try_from(i).unwrap())
            .collect();
        assert_eq!(order, Seat::HUMAN.next_n(4));
        assert!(Seat::try_from(4usize).is_err());
    }
}

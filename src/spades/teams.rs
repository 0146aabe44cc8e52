//! Hidden partnerships.
//!
//! The bid winner names a card they do not hold. Whoever holds it is their secret teammate for
//! the rest of the game.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Card, GameError, Seat, Team};

/// The team each seat belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMap(HashMap<Seat, Team>);

impl TeamMap {
    /// The team for the specified seat.
    pub fn team(&self, seat: Seat) -> Team {
        self.0.get(&seat).copied().unwrap_or(Team::Defending)
    }

    /// The seats on the specified team, in seat order.
    pub fn members(&self, team: Team) -> Vec<Seat> {
        let mut seats: Vec<_> = self
            .0
            .iter()
            .filter_map(|(&seat, &t)| if t == team { Some(seat) } else { None })
            .collect();
        seats.sort_unstable();
        seats
    }
}

/// Finds the seat holding the specified card.
pub fn find_holder(hands: &HashMap<Seat, Vec<Card>>, card: Card) -> Option<Seat> {
    Seat::all_seats()
        .iter()
        .copied()
        .find(|seat| hands.get(seat).is_some_and(|hand| hand.contains(&card)))
}

/// Assigns teams: the bidder and the holder of the teammate card form the bidding team, and
/// everyone else defends.
///
/// Fails if no player holds the teammate card.
pub fn assign_teams_by_teammate_card(
    hands: &HashMap<Seat, Vec<Card>>,
    bidder: Seat,
    teammate_card: Card,
) -> Result<TeamMap, GameError> {
    let holder =
        find_holder(hands, teammate_card).ok_or(GameError::NoTeammateHolder(teammate_card))?;
    let teams = Seat::all_seats()
        .iter()
        .map(|&seat| {
            let team = if seat == bidder || seat == holder {
                Team::Bidding
            } else {
                Team::Defending
            };
            (seat, team)
        })
        .collect();
    Ok(TeamMap(teams))
}

//! Trick

use std::fmt::Display;

use delegate::delegate;
use serde::{Deserialize, Serialize};

use super::card::total_points;
use super::{Card, Seat, Suit, PLAYER_COUNT};

/// A card played into a trick, along with the seat that played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCard {
    pub seat: Seat,
    pub card: Card,
}

impl TableCard {
    pub fn new(seat: Seat, card: Card) -> Self {
        Self { seat, card }
    }
}

/// Determines which card wins a (possibly partial) trick.
///
/// The highest trump wins, if any trump was played. Otherwise the highest card of the running
/// suit wins. Returns `None` only if no card of either suit was played, which cannot happen
/// once the lead card is on the table.
pub fn determine_winner(cards: &[TableCard], running: Suit, trump: Suit) -> Option<TableCard> {
    let best_of = |suit: Suit| {
        cards
            .iter()
            .filter(|tc| tc.card.suit == suit)
            .max_by_key(|tc| tc.card.rank_value())
            .copied()
    };
    best_of(trump).or_else(|| best_of(running))
}

/// A trick played during a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trick {
    /// The trump suit for this trick.
    pub trump: Suit,
    /// The cards that have been played into this trick, in play order.
    pub cards: Vec<TableCard>,
}

impl Display for Trick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, tc) in self.cards.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", tc.seat, tc.card)?;
        }
        write!(f, "]")
    }
}

impl Trick {
    delegate! {
        to self.cards {
            /// The number of cards played into this trick.
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
            pub fn iter(&self) -> std::slice::Iter<'_, TableCard>;
        }
    }

    /// Creates a new, empty trick.
    pub fn new(trump: Suit) -> Self {
        Self {
            trump,
            cards: Vec::with_capacity(PLAYER_COUNT),
        }
    }

    /// Every player has played a card.
    pub fn is_complete(&self) -> bool {
        self.len() == PLAYER_COUNT
    }

    /// The lead card, if any.
    pub fn lead(&self) -> Option<TableCard> {
        self.cards.first().copied()
    }

    /// The suit of the lead card.
    pub fn running_suit(&self) -> Option<Suit> {
        self.lead().map(|tc| tc.card.suit)
    }

    /// The card currently winning the trick.
    pub fn best(&self) -> Option<TableCard> {
        determine_winner(&self.cards, self.running_suit()?, self.trump)
    }

    /// Returns true if the trick is being won by a trump, and trump is not the running suit.
    pub fn is_cut(&self) -> bool {
        match (self.best(), self.running_suit()) {
            (Some(best), Some(running)) => is_cut(best.card, running, self.trump),
            _ => false,
        }
    }

    /// The total points of all cards in the trick.
    pub fn points(&self) -> u32 {
        total_points(self.cards.iter().map(|tc| &tc.card))
    }

    /// Validate that the player is following the running suit where possible.
    pub fn is_following_lead(&self, hand: &[Card], card: Card) -> bool {
        match self.running_suit() {
            Some(running) => card.suit == running || !hand.iter().any(|c| c.suit == running),
            None => true,
        }
    }

    /// Filters the hand down to the indices of playable cards.
    pub fn filter(&self, hand: &[Card]) -> Vec<usize> {
        (0..hand.len())
            .filter(|&i| self.is_following_lead(hand, hand[i]))
            .collect()
    }

    /// Plays a card into the trick.
    pub fn play(&mut self, seat: Seat, card: Card) {
        assert!(!self.is_complete());
        self.cards.push(TableCard::new(seat, card));
    }
}

/// A trick is cut when it is won by trump, and trump was not led.
pub fn is_cut(winner: Card, running: Suit, trump: Suit) -> bool {
    winner.suit == trump && trump != running
}

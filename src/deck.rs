//! A deck of cards.

use std::iter::FromIterator;

use rand::distributions::{Distribution, Standard};
use rand::seq::SliceRandom;
use rand::Rng;

/// The deck could not be split evenly between players.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot deal {len} cards evenly to {players} players")]
pub struct DealError {
    pub len: usize,
    pub players: usize,
}

/// A deck of cards.
#[derive(Debug, Clone)]
pub struct Deck<C> {
    cards: Vec<C>,
}

impl<C> Distribution<Deck<C>> for Standard
where
    Deck<C>: Default,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Deck<C> {
        let mut deck = Deck::default();
        deck.shuffle(rng);
        deck
    }
}

impl<C> FromIterator<C> for Deck<C> {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        let cards = iter.into_iter().collect();
        Self { cards }
    }
}

impl<C> Deck<C> {
    /// Returns the cards in deck order.
    pub fn cards(&self) -> &[C] {
        &self.cards
    }

    /// Shuffles the deck in place. This is a Fisher-Yates shuffle, so every permutation is
    /// equally likely.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals the whole deck round-robin into `players` hands, so that card `i` goes to hand
    /// `i % players`. Each hand is returned sorted.
    pub fn distribute(self, players: usize) -> Result<Vec<Vec<C>>, DealError>
    where
        C: Ord,
    {
        let len = self.cards.len();
        if players == 0 || len % players != 0 {
            return Err(DealError { len, players });
        }
        let mut hands: Vec<Vec<C>> = (0..players)
            .map(|_| Vec::with_capacity(len / players))
            .collect();
        for (i, card) in self.cards.into_iter().enumerate() {
            hands[i % players].push(card);
        }
        for hand in &mut hands {
            hand.sort_unstable();
        }
        Ok(hands)
    }
}

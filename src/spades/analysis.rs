//! Hand analysis.

use serde::Serialize;

use super::{Card, Suit};

/// The cards a hand holds in one suit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuitAnalysis {
    pub suit: Suit,
    /// Cards of this suit, in hand order.
    pub cards: Vec<Card>,
    /// Sum of the cards' points.
    pub points: u32,
}

/// Groups a hand by suit, in canonical suit order. Suits the hand is void in are included,
/// with no cards.
pub fn suit_analysis(hand: &[Card]) -> Vec<SuitAnalysis> {
    Suit::all_suits()
        .iter()
        .map(|&suit| {
            let cards: Vec<_> = hand.iter().copied().filter(|c| c.suit == suit).collect();
            SuitAnalysis {
                suit,
                points: cards.iter().map(|c| c.points()).sum(),
                cards,
            }
        })
        .collect()
}

/// Returns 1 if the hand's best card of `suit` outranks every card of that suit that hasn't
/// been seen yet, and 0 otherwise. A card is unseen if it is neither in `hand` nor in
/// `seen`. Returns 0 if the hand has no card of `suit`.
pub fn win_probability(hand: &[Card], seen: &[Card], suit: Suit) -> u8 {
    let Some(best) = hand
        .iter()
        .filter(|c| c.suit == suit)
        .map(|c| c.rank)
        .max()
    else {
        return 0;
    };
    let outranked = super::card::generate_deck()
        .into_iter()
        .filter(|c| c.suit == suit && c.rank > best)
        .any(|c| !hand.contains(&c) && !seen.contains(&c));
    u8::from(!outranked)
}

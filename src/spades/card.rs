//! Three of Spades deck.

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::{fmt::Display, str::FromStr};

use ansi_term::ANSIString;
use serde::{Deserialize, Serialize};

use crate::deck;
use crate::french::Color;
pub use crate::french::Suit;

/// Card rank. The 2, 4 and 6 are not part of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Three,
    Five,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Returns an array of all ranks, from lowest to highest.
    pub fn all_ranks() -> &'static [Rank; 10] {
        static RANKS: [Rank; 10] = [
            Rank::Three,
            Rank::Five,
            Rank::Seven,
            Rank::Eight,
            Rank::Nine,
            Rank::Ten,
            Rank::Jack,
            Rank::Queen,
            Rank::King,
            Rank::Ace,
        ];
        &RANKS
    }

    /// The number printed on the card. Aces are 1, court cards are 11 through 13.
    pub fn number(self) -> u8 {
        match self {
            Rank::Ace => 1,
            other => other.value(),
        }
    }

    /// The trick-taking strength of the rank. Aces are high.
    pub fn value(self) -> u8 {
        match self {
            Rank::Three => 3,
            Rank::Five => 5,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    /// Looks up a rank by the number printed on the card.
    pub fn from_number(number: u8) -> Option<Rank> {
        Rank::all_ranks().iter().copied().find(|r| r.number() == number)
    }

    fn to_abbr(self) -> char {
        match self {
            Rank::Three => '3',
            Rank::Five => '5',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c.to_ascii_uppercase() {
            '3' => Rank::Three,
            '5' => Rank::Five,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(()),
        })
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Ten => f.write_str("10"),
            other => write!(f, "{}", other.to_abbr()),
        }
    }
}

/// A card. Cards are ordered by [position value](Card::position_value), which is the order
/// used to sort hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    /// Card suit.
    pub suit: Suit,
    /// Card rank.
    pub rank: Rank,
}

impl Card {
    /// The three of spades.
    pub const CROWN_JEWEL: Card = Card {
        suit: Suit::Spade,
        rank: Rank::Three,
    };

    /// Creates a new [`Card`].
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Creates a card from its suit and printed number.
    pub fn from_number(suit: Suit, number: u8) -> Option<Self> {
        Rank::from_number(number).map(|rank| Self { suit, rank })
    }

    /// The trick-taking strength of the card within its suit.
    pub fn rank_value(self) -> u8 {
        self.rank.value()
    }

    /// The points this card is worth to whoever wins it in a trick.
    pub fn points(self) -> u32 {
        if self == Card::CROWN_JEWEL {
            return 30;
        }
        match self.rank {
            Rank::Ace | Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Five => 5,
            _ => 0,
        }
    }

    /// The key used to sort a hand: suits grouped, ascending rank within each suit.
    pub fn position_value(self) -> u16 {
        100 * u16::from(self.suit.index()) + u16::from(self.rank_value())
    }

    /// A short, stable identifier for the card, such as `"3S"` or `"TH"`.
    pub fn id(self) -> String {
        format!("{}{}", self.rank.to_abbr(), self.suit.to_abbr())
    }

    /// Returns a string representation of the card, decorated with ANSI color codes.
    pub fn to_ansi_string(self) -> ANSIString<'static> {
        use ansi_term::Colour::Red;
        match self.suit.color() {
            Color::Black => self.to_string().into(),
            Color::Red => Red.paint(self.to_string()),
        }
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position_value().cmp(&other.position_value())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Rank first, either as printed ("10", "1") or abbreviated ("T", "A"), then the suit.
        let s = s.trim();
        let (split, suit) = s.char_indices().last().ok_or(())?;
        let suit = Suit::try_from(suit)?;
        let rank = &s[..split];
        if !rank.is_empty() && rank.bytes().all(|b| b.is_ascii_digit()) {
            let number = rank.parse().map_err(|_| ())?;
            return Card::from_number(suit, number).ok_or(());
        }
        let mut chars = rank.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Card {
                suit,
                rank: Rank::try_from(c)?,
            }),
            _ => Err(()),
        }
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.id())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Card::from_str(&s).map_err(|()| serde::de::Error::custom("not a card"))
    }
}

/// A Three of Spades deck.
pub type Deck = deck::Deck<Card>;

impl Default for Deck {
    fn default() -> Self {
        generate_deck().into_iter().collect()
    }
}

/// Returns every card in the deck, in canonical order.
pub fn generate_deck() -> Vec<Card> {
    itertools::iproduct!(Suit::all_suits(), Rank::all_ranks())
        .map(|(&suit, &rank)| Card { suit, rank })
        .collect()
}

/// Sums the points of the given cards.
pub fn total_points<'a, I: IntoIterator<Item = &'a Card>>(cards: I) -> u32 {
    cards.into_iter().map(|c| c.points()).sum()
}

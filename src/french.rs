//! French-suited playing card suits.

use std::convert::TryFrom;
use std::fmt::Display;
use std::str::FromStr;

use ansi_term::ANSIString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Card suit. The declaration order is the canonical sort order for a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Heart,
    Club,
    Diamond,
}

impl Suit {
    /// Returns all suits, in canonical order.
    pub fn all_suits() -> &'static [Suit; 4] {
        static SUITS: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];
        &SUITS
    }

    /// The position of this suit in canonical order.
    pub fn index(self) -> u8 {
        match self {
            Suit::Spade => 0,
            Suit::Heart => 1,
            Suit::Club => 2,
            Suit::Diamond => 3,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Diamond | Suit::Heart => Color::Red,
            Suit::Club | Suit::Spade => Color::Black,
        }
    }

    /// Returns an abbreviated name for the suit.
    pub fn to_abbr(self) -> char {
        match self {
            Suit::Spade => 'S',
            Suit::Heart => 'H',
            Suit::Club => 'C',
            Suit::Diamond => 'D',
        }
    }

    /// Returns the suit symbol, decorated with ANSI color codes.
    pub fn to_ansi_string(self) -> ANSIString<'static> {
        use ansi_term::Colour::Red;
        match self.color() {
            Color::Black => self.to_string().into(),
            Color::Red => Red.paint(self.to_string()),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = match self {
            Suit::Club => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Spade => "♠",
        };
        f.write_str(sym)
    }
}

impl TryFrom<char> for Suit {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c {
            'S' | 's' | '♠' => Suit::Spade,
            'H' | 'h' | '♥' => Suit::Heart,
            'C' | 'c' | '♣' => Suit::Club,
            'D' | 'd' | '♦' => Suit::Diamond,
            _ => return Err(()),
        })
    }
}

impl FromStr for Suit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Suit::try_from(c),
            _ => match s.trim().to_ascii_lowercase().as_str() {
                "spade" | "spades" => Ok(Suit::Spade),
                "heart" | "hearts" => Ok(Suit::Heart),
                "club" | "clubs" => Ok(Suit::Club),
                "diamond" | "diamonds" => Ok(Suit::Diamond),
                _ => Err(()),
            },
        }
    }
}

//! Stages, actions & commands

use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Card, Deck, Seat, Suit};

/// The phase of the game. Stages only move forward, except that `Playing` and `RoundSummary`
/// alternate once per trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Init,
    DistributeCards,
    Bidding,
    BiddingComplete,
    TrumpSelection,
    TrumpSelectionComplete,
    Playing,
    RoundSummary,
    GameOver,
}

impl Stage {
    /// Stages that exist only to announce what just happened. They are left with
    /// [`Command::Proceed`].
    pub fn is_announcement(self) -> bool {
        matches!(
            self,
            Stage::DistributeCards | Stage::BiddingComplete | Stage::TrumpSelectionComplete
        )
    }
}

/// Types of actions that a player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// Raise the bid, or pass.
    Bid,
    /// Name trump and the teammate card, after winning the auction.
    SelectTrump,
    /// Play a card into the current trick.
    Play,
}

impl Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ActionType::Bid => "bid",
            ActionType::SelectTrump => "select trump",
            ActionType::Play => "play",
        })
    }
}

/// The action that the game's state machine expects to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectAction {
    /// The player expected to take the action.
    pub seat: Seat,
    /// The type of action.
    pub action: ActionType,
}

impl ExpectAction {
    /// Create a new [`ExpectAction`].
    pub fn new(seat: Seat, action: ActionType) -> Self {
        Self { seat, action }
    }
}

/// A state transition. Humans, bots and the scheduler all go through the same commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Deals `deck` and opens the game, with `starting` bidding and leading first.
    StartGame { deck: Vec<Card>, starting: Seat },
    /// Leaves an announcement stage.
    Proceed,
    /// Raises the current bid.
    PlaceBid { seat: Seat, amount: u32 },
    /// Drops out of the auction.
    PassBid { seat: Seat },
    /// Sets the current bidder's clock. At zero, the bidder passes.
    UpdateBidTimer { seconds: u32 },
    /// Names trump and the teammate card.
    SetBidAndTrump {
        trump: Suit,
        bidder: Seat,
        teammate: Card,
    },
    /// Plays the card at `index` in the player's hand.
    PlayCard { seat: Seat, index: usize },
    /// Clears the finished trick and starts the next one.
    StartNewRound,
}

impl Command {
    /// A [`Command::StartGame`] with a shuffled deck and a random starting player.
    pub fn start_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let deck: Deck = rng.gen();
        Command::StartGame {
            deck: deck.cards().to_vec(),
            starting: rng.gen(),
        }
    }
}

//! Error types

use super::{Card, Seat, Stage};
use crate::deck::DealError;

/// A command that the acting player may correct and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(Seat),

    #[error("{0} has already passed")]
    AlreadyPassed(Seat),

    /// The bid is below the current bid, off the increment, or over the ceiling.
    #[error("{seat} cannot bid {amount} over {current}")]
    IllegalBid {
        seat: Seat,
        amount: u32,
        current: u32,
    },

    #[error("{0} did not win the bidding")]
    NotBidWinner(Seat),

    /// The bid winner named a card from their own hand as the teammate card.
    #[error("{0} holds {1}, and cannot name it as the teammate card")]
    TeammateCardHeld(Seat, Card),

    #[error("{seat} has no card at index {index}")]
    CardIndexOutOfRange { seat: Seat, index: usize },

    /// The player must follow the running suit for this trick.
    #[error("{0} must follow {1}")]
    MustFollowSuit(Seat, Card),
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error("deck contains duplicate card")]
    DuplicateCard,
    #[error("no player holds teammate card {0}")]
    NoTeammateHolder(Card),
    #[error("command not allowed during {0:?}")]
    WrongStage(Stage),
    #[error("game over")]
    GameOver,
    #[error(transparent)]
    Player(#[from] PlayerError),
}

/// A bot failed to come up with a decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BotError {
    #[error("no cards in hand")]
    EmptyHand,
    #[error("no teammate card to choose from")]
    NoTeammateOptions,
    #[error("no card of {0} in hand")]
    MissingSuit(super::Suit),
    #[error("nothing to {0} right now")]
    NothingToDecide(super::ActionType),
}

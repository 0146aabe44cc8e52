//! Mechanics of the auction.
//!
//! Players bid in clockwise order, starting from the game's starting player. On their turn, a
//! player either raises the current bid or passes. A player who passes is out of the auction
//! for good. The auction ends when only one player has not passed, and that player wins the
//! contract at the current bid, even if nobody ever raised the opening bid.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{PlayerError, Seat, PLAYER_COUNT};

/// The opening bid.
pub const START_BID: u32 = 165;
/// The highest possible bid, which is also the number of points in the deck.
pub const MAX_BID: u32 = 250;
/// Bids at or above this amount must be raised in larger steps.
pub const HIGH_BID: u32 = 200;
/// Seconds a player has to act before they are passed automatically.
pub const BID_TIMER_SECS: u32 = 30;

/// The smallest legal raise over the current bid.
pub fn min_increment(current: u32) -> u32 {
    if current < HIGH_BID {
        5
    } else {
        10
    }
}

/// A bid placed during the auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub seat: Seat,
    pub bid: u32,
}

/// The state of the auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingState {
    /// The highest bid so far.
    pub current_bid: u32,
    /// The player whose turn it is. Never a member of `passed`.
    pub current_bidder: Seat,
    /// Players who have dropped out of the auction.
    pub passed: BTreeSet<Seat>,
    /// The player who won the auction, once it's over.
    pub winner: Option<Seat>,
    /// Every bid placed, in order.
    pub history: Vec<BidRecord>,
    /// Seconds remaining for the current bidder.
    pub timer: u32,
    /// The value the timer resets to on each turn.
    timer_length: u32,
}

impl BiddingState {
    /// Opens the auction, with `starting` bidding first.
    pub fn new(starting: Seat, timer_length: u32) -> Self {
        Self {
            current_bid: START_BID,
            current_bidder: starting,
            passed: BTreeSet::new(),
            winner: None,
            history: vec![],
            timer: timer_length,
            timer_length,
        }
    }

    /// The auction is over.
    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    /// The smallest legal raise over the current bid.
    pub fn min_increment(&self) -> u32 {
        min_increment(self.current_bid)
    }

    /// Returns true if `amount` is a legal raise over the current bid.
    pub fn is_legal_amount(&self, amount: u32) -> bool {
        amount > self.current_bid
            && amount <= MAX_BID
            && (amount - self.current_bid) % self.min_increment() == 0
    }

    /// Every legal raise over the current bid, in ascending order.
    pub fn legal_bids(&self) -> Vec<u32> {
        let step = self.min_increment();
        (1..)
            .map(|n| self.current_bid + n * step)
            .take_while(|&amount| amount <= MAX_BID)
            .collect()
    }

    fn check_turn(&self, seat: Seat) -> Result<(), PlayerError> {
        if self.passed.contains(&seat) {
            Err(PlayerError::AlreadyPassed(seat))
        } else if self.is_complete() || seat != self.current_bidder {
            Err(PlayerError::NotYourTurn(seat))
        } else {
            Ok(())
        }
    }

    /// Raises the current bid.
    pub fn place_bid(&mut self, seat: Seat, amount: u32) -> Result<(), PlayerError> {
        self.check_turn(seat)?;
        if !self.is_legal_amount(amount) {
            return Err(PlayerError::IllegalBid {
                seat,
                amount,
                current: self.current_bid,
            });
        }
        self.current_bid = amount;
        self.history.push(BidRecord { seat, bid: amount });
        self.advance();
        Ok(())
    }

    /// Drops out of the auction. Returns the winner, if this pass ended the auction.
    pub fn pass(&mut self, seat: Seat) -> Result<Option<Seat>, PlayerError> {
        self.check_turn(seat)?;
        self.passed.insert(seat);
        let active: Vec<_> = self.active().collect();
        if let [winner] = active[..] {
            self.winner = Some(winner);
            self.current_bidder = winner;
            self.timer = 0;
            Ok(Some(winner))
        } else {
            self.advance();
            Ok(None)
        }
    }

    /// Sets the number of seconds remaining on the current bidder's clock.
    pub fn set_timer(&mut self, seconds: u32) {
        self.timer = seconds.min(self.timer_length);
    }

    /// Players still in the auction, in seat order.
    fn active(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::all_seats()
            .iter()
            .copied()
            .filter(|seat| !self.passed.contains(seat))
    }

    /// Hands the turn to the next player clockwise who has not passed.
    fn advance(&mut self) {
        let next = self
            .current_bidder
            .next_n(PLAYER_COUNT)
            .into_iter()
            .find(|seat| !self.passed.contains(seat))
            .expect("at least one active bidder");
        self.current_bidder = next;
        self.timer = self.timer_length;
    }
}

//! Players.
//!
//! Every seat but the human's is played by a [`Bot`]. A bot makes each decision from the state
//! visible to its seat, and the scheduler turns that decision into the same [`Command`] a
//! human would issue.
//!
//! [`Command`]: super::Command

use std::fmt::Display;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{BotError, Card, Seat, Suit, TableCard};

mod console;
mod greedy;
mod random;
pub use console::Console;
pub use greedy::GreedyBot;
pub use random::RandomBot;

/// What a bot knows when it's their turn to play a card.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    /// The bot's hand.
    pub hand: &'a [Card],
    /// The suit of the lead card, or None if the bot is leading.
    pub running: Option<Suit>,
    pub trump: Suit,
    /// Cards played into this trick so far.
    pub table: &'a [TableCard],
    /// Every card played so far this game, including this trick.
    pub seen: &'a [Card],
}

/// What a bot knows when it's their turn to bid.
#[derive(Debug, Clone, Copy)]
pub struct BidContext<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub current_bid: u32,
    pub min_increment: u32,
    pub max_bid: u32,
}

impl BidContext<'_> {
    /// Returns true if raising by `increment` is a legal bid.
    pub fn can_raise_by(&self, increment: u32) -> bool {
        increment % self.min_increment == 0 && self.current_bid + increment <= self.max_bid
    }
}

/// What a bot knows when it has won the auction.
#[derive(Debug, Clone, Copy)]
pub struct TrumpContext<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    /// Cards that may be named as the teammate card.
    pub teammate_options: &'a [Card],
}

/// A bidding decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidAction {
    Bid(u32),
    Pass,
}

/// A decision-making policy for a bot.
pub trait Strategy {
    /// Chooses a card to lead a new trick.
    fn start_round(&mut self, ctx: &PlayContext) -> Result<usize, BotError>;

    /// Chooses a card of the running suit. Only called when the hand holds one.
    fn pick_running_suit(&mut self, ctx: &PlayContext, running: Suit) -> Result<usize, BotError>;

    /// Chooses any card, when the hand is void in the running suit: either trump in, or
    /// throw something away.
    fn to_cut_or_not_to_cut(&mut self, ctx: &PlayContext, running: Suit)
        -> Result<usize, BotError>;

    /// Raises the bid, or passes.
    fn bid_action(&mut self, ctx: &BidContext) -> BidAction;

    /// Names trump and the teammate card.
    fn choose_trump_and_teammate(&mut self, ctx: &TrumpContext) -> Result<(Suit, Card), BotError>;
}

/// Routes a card decision to the right [`Strategy`] method, based on whether a suit has been
/// led and whether the hand can follow it. Returns None if the hand is empty.
pub fn choose_card_index<S: Strategy + ?Sized>(
    strategy: &mut S,
    ctx: &PlayContext,
) -> Result<Option<usize>, BotError> {
    if ctx.hand.is_empty() {
        return Ok(None);
    }
    let index = match ctx.running {
        None => strategy.start_round(ctx)?,
        Some(running) if ctx.hand.iter().any(|c| c.suit == running) => {
            strategy.pick_running_suit(ctx, running)?
        }
        Some(running) => strategy.to_cut_or_not_to_cut(ctx, running)?,
    };
    Ok(Some(index))
}

/// The bots that may sit at the table.
#[derive(Debug)]
pub enum Bot {
    Random(RandomBot),
    Greedy(GreedyBot),
}

impl Display for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Bot::Random(_) => "RandomBot",
            Bot::Greedy(_) => "GreedyBot",
        })
    }
}

impl Bot {
    /// Picks one of the bot variants uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Bot::Random(RandomBot::new(StdRng::seed_from_u64(rng.gen())))
        } else {
            Bot::Greedy(GreedyBot::default())
        }
    }

    /// Chooses a card to play. See [`choose_card_index`].
    pub fn choose_card_index(&mut self, ctx: &PlayContext) -> Result<Option<usize>, BotError> {
        choose_card_index(self, ctx)
    }
}

impl Strategy for Bot {
    fn start_round(&mut self, ctx: &PlayContext) -> Result<usize, BotError> {
        match self {
            Bot::Random(bot) => bot.start_round(ctx),
            Bot::Greedy(bot) => bot.start_round(ctx),
        }
    }

    fn pick_running_suit(&mut self, ctx: &PlayContext, running: Suit) -> Result<usize, BotError> {
        match self {
            Bot::Random(bot) => bot.pick_running_suit(ctx, running),
            Bot::Greedy(bot) => bot.pick_running_suit(ctx, running),
        }
    }

    fn to_cut_or_not_to_cut(
        &mut self,
        ctx: &PlayContext,
        running: Suit,
    ) -> Result<usize, BotError> {
        match self {
            Bot::Random(bot) => bot.to_cut_or_not_to_cut(ctx, running),
            Bot::Greedy(bot) => bot.to_cut_or_not_to_cut(ctx, running),
        }
    }

    fn bid_action(&mut self, ctx: &BidContext) -> BidAction {
        match self {
            Bot::Random(bot) => bot.bid_action(ctx),
            Bot::Greedy(bot) => bot.bid_action(ctx),
        }
    }

    fn choose_trump_and_teammate(&mut self, ctx: &TrumpContext) -> Result<(Suit, Card), BotError> {
        match self {
            Bot::Random(bot) => bot.choose_trump_and_teammate(ctx),
            Bot::Greedy(bot) => bot.choose_trump_and_teammate(ctx),
        }
    }
}

/// Indices of the cards of `suit` in the hand.
fn indices_of(hand: &[Card], suit: Suit) -> Vec<usize> {
    (0..hand.len()).filter(|&i| hand[i].suit == suit).collect()
}

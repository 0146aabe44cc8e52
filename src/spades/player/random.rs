//! A bot that makes uniformly random legal choices.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{indices_of, BidAction, BidContext, PlayContext, Strategy, TrumpContext};
use crate::spades::{BotError, Card, Suit};

#[derive(Debug)]
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    fn pick(&mut self, indices: &[usize]) -> Result<usize, BotError> {
        indices.choose(&mut self.rng).copied().ok_or(BotError::EmptyHand)
    }
}

impl Strategy for RandomBot {
    fn start_round(&mut self, ctx: &PlayContext) -> Result<usize, BotError> {
        let all: Vec<_> = (0..ctx.hand.len()).collect();
        self.pick(&all)
    }

    fn pick_running_suit(&mut self, ctx: &PlayContext, running: Suit) -> Result<usize, BotError> {
        let following = indices_of(ctx.hand, running);
        if following.is_empty() {
            return Err(BotError::MissingSuit(running));
        }
        self.pick(&following)
    }

    fn to_cut_or_not_to_cut(
        &mut self,
        ctx: &PlayContext,
        _running: Suit,
    ) -> Result<usize, BotError> {
        self.start_round(ctx)
    }

    fn bid_action(&mut self, ctx: &BidContext) -> BidAction {
        if !ctx.can_raise_by(ctx.min_increment) || self.rng.gen_bool(0.5) {
            return BidAction::Pass;
        }
        let increment = if ctx.min_increment != 10 && ctx.can_raise_by(10) && self.rng.gen_bool(0.5)
        {
            10
        } else {
            ctx.min_increment
        };
        BidAction::Bid(ctx.current_bid + increment)
    }

    fn choose_trump_and_teammate(&mut self, ctx: &TrumpContext) -> Result<(Suit, Card), BotError> {
        let suits = Suit::all_suits();
        let trump = suits[self.rng.gen_range(0..suits.len())];
        let teammate = *ctx
            .teammate_options
            .choose(&mut self.rng)
            .ok_or(BotError::NoTeammateOptions)?;
        Ok((trump, teammate))
    }
}

//! Greedy bot
//!
//! Plays each trick on its own merits, with no lookahead: contest a trick when it can still be
//! won, and otherwise give away as few points as possible.

use std::cmp::Ordering;

use tracing::debug;

use super::{indices_of, BidAction, BidContext, PlayContext, Strategy, TrumpContext};
use crate::spades::card::Rank;
use crate::spades::trick::{determine_winner, is_cut};
use crate::spades::{win_probability, BotError, Card, Suit};

/// Hand strength at which the bot bids aggressively.
const STRONG_HAND: f64 = 8.0;
/// Hand strength at which the bot bids at all.
const FAIR_HAND: f64 = 5.0;
/// The bot stops bidding fair hands once the bid reaches this amount.
const FAIR_HAND_LIMIT: u32 = 200;

#[derive(Debug, Default)]
pub struct GreedyBot;

/// The index of the highest-ranked card among `indices`.
fn highest(hand: &[Card], indices: &[usize]) -> Option<usize> {
    indices.iter().copied().max_by_key(|&i| hand[i].rank)
}

/// The index of the card worth the fewest points among `indices`, preferring lower ranks.
fn cheapest(hand: &[Card], indices: &[usize]) -> Option<usize> {
    indices
        .iter()
        .copied()
        .min_by_key(|&i| (hand[i].points(), hand[i].rank))
}

/// Scores hand strength for bidding: one for each card of eight or above, plus bonuses for aces
/// and kings.
pub fn hand_strength(hand: &[Card]) -> f64 {
    hand.iter()
        .map(|c| {
            let high = if c.rank_value() >= 8 { 1.0 } else { 0.0 };
            let bonus = match c.rank {
                Rank::Ace => 2.0,
                Rank::King => 1.5,
                _ => 0.0,
            };
            high + bonus
        })
        .sum()
}

/// How valuable it is to have the specified rank held by a teammate.
fn base_teammate_score(rank: Rank) -> f64 {
    match rank {
        Rank::Ace => 0.8,
        Rank::King => 0.5,
        _ => {
            let steps_below_queen = Rank::all_ranks()
                .iter()
                .rev()
                .skip(2)
                .position(|&r| r == rank)
                .unwrap_or_default();
            0.15 - 0.015 * steps_below_queen as f64
        }
    }
}

/// A possible teammate card.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    card: Card,
    score: f64,
    /// Points in the bot's own hand, in this suit, that rank below the candidate.
    unwinnable: u32,
}

impl Candidate {
    fn compare(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.unwinnable.cmp(&other.unwinnable))
    }
}

/// Picks the trump suit: the longest suit, with ties broken by total rank.
fn choose_trump(hand: &[Card]) -> Suit {
    let strength = |suit: Suit| {
        let cards = hand.iter().filter(|c| c.suit == suit);
        let count = cards.clone().count();
        let ranks: u32 = cards.map(|c| u32::from(c.rank_value())).sum();
        (count, ranks)
    };
    Suit::all_suits()
        .iter()
        .copied()
        .rev()
        .max_by_key(|&s| strength(s))
        .expect("suits are non-empty")
}

/// The best teammate card in `suit`: the highest card the bot doesn't hold, among as many of
/// the suit's top ranks as the bot holds cards in that suit.
fn teammate_candidate(
    hand: &[Card],
    suit: Suit,
    trump: Suit,
    options: &[Card],
) -> Option<Candidate> {
    let held: Vec<_> = hand.iter().filter(|c| c.suit == suit).collect();
    let card = Rank::all_ranks()
        .iter()
        .rev()
        .take(held.len())
        .map(|&rank| Card::new(rank, suit))
        .find(|card| !hand.contains(card) && options.contains(card))?;

    let mut score = base_teammate_score(card.rank);
    if suit == trump {
        score *= 1.5;
    }
    if suit == Suit::Spade {
        score *= 1.6;
        if hand.contains(&Card::CROWN_JEWEL) {
            score *= 2.0;
        }
    }
    let unwinnable = held
        .iter()
        .filter(|c| c.rank < card.rank)
        .map(|c| c.points())
        .sum();
    Some(Candidate {
        card,
        score,
        unwinnable,
    })
}

impl Strategy for GreedyBot {
    fn start_round(&mut self, ctx: &PlayContext) -> Result<usize, BotError> {
        // Highest card, preferring one that can't be beaten in its suit.
        (0..ctx.hand.len())
            .max_by_key(|&i| {
                let card = ctx.hand[i];
                (card.rank, win_probability(ctx.hand, ctx.seen, card.suit))
            })
            .ok_or(BotError::EmptyHand)
    }

    fn pick_running_suit(&mut self, ctx: &PlayContext, running: Suit) -> Result<usize, BotError> {
        let following = indices_of(ctx.hand, running);
        let best = highest(ctx.hand, &following).ok_or(BotError::MissingSuit(running))?;
        let winning = determine_winner(ctx.table, running, ctx.trump);
        let fold = winning.is_some_and(|w| {
            is_cut(w.card, running, ctx.trump) || w.card.rank > ctx.hand[best].rank
        });
        if fold {
            debug!(card = %ctx.hand[best], "can't win, folding");
            Ok(cheapest(ctx.hand, &following).unwrap_or(best))
        } else {
            Ok(best)
        }
    }

    fn to_cut_or_not_to_cut(
        &mut self,
        ctx: &PlayContext,
        running: Suit,
    ) -> Result<usize, BotError> {
        let trumps = indices_of(ctx.hand, ctx.trump);
        let winning = determine_winner(ctx.table, running, ctx.trump);
        if let Some(best_trump) = highest(ctx.hand, &trumps) {
            let can_win = match winning {
                Some(w) if is_cut(w.card, running, ctx.trump) => {
                    ctx.hand[best_trump].rank > w.card.rank
                }
                _ => true,
            };
            if can_win {
                return Ok(best_trump);
            }
        }
        let all: Vec<_> = (0..ctx.hand.len()).collect();
        cheapest(ctx.hand, &all).ok_or(BotError::EmptyHand)
    }

    fn bid_action(&mut self, ctx: &BidContext) -> BidAction {
        let strength = hand_strength(ctx.hand);
        let increment = if strength >= STRONG_HAND {
            ctx.min_increment.max(10)
        } else if strength >= FAIR_HAND && ctx.current_bid < FAIR_HAND_LIMIT {
            ctx.min_increment
        } else {
            return BidAction::Pass;
        };
        debug!(seat = %ctx.seat, strength, increment, "hand strength");
        if ctx.can_raise_by(increment) {
            BidAction::Bid(ctx.current_bid + increment)
        } else {
            BidAction::Pass
        }
    }

    fn choose_trump_and_teammate(&mut self, ctx: &TrumpContext) -> Result<(Suit, Card), BotError> {
        if ctx.teammate_options.is_empty() {
            return Err(BotError::NoTeammateOptions);
        }
        let trump = choose_trump(ctx.hand);
        let best = Suit::all_suits()
            .iter()
            .filter_map(|&suit| teammate_candidate(ctx.hand, suit, trump, ctx.teammate_options))
            .max_by(|a, b| a.compare(b));
        let teammate = match best {
            Some(candidate) => candidate.card,
            // Every top card is already in hand: ask for the best trump still out.
            None => *ctx
                .teammate_options
                .iter()
                .max_by_key(|c| (c.suit == trump, c.rank))
                .expect("options are non-empty"),
        };
        debug!(seat = %ctx.seat, %trump, %teammate, "chose trump and teammate");
        Ok((trump, teammate))
    }
}

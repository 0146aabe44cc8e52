//! Simple console interactive player.

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use ansi_term::{ANSIString, ANSIStrings};
use anyhow::Context;

use crate::spades::{
    suit_analysis, ActionType, Card, Command, Event, ExpectAction, Game, PlayerError,
    PlayerState, Suit, TableCard, Trick,
};

pub struct Console {
    color: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(true)
    }
}

fn prompt<T: FromStr, S: Display>(prompt: S) -> anyhow::Result<T> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        let mut buffer = String::new();
        print!("{prompt}");
        stdout.flush().context("flush")?;
        if stdin.read_line(&mut buffer).context("read")? == 0 {
            anyhow::bail!("end of input");
        }
        let trimmed = buffer.trim();
        if !trimmed.is_empty() {
            if let Ok(obj) = T::from_str(trimmed) {
                return Ok(obj);
            }
            println!("Invalid input, try again");
        }
    }
}

/// A raise, or "pass".
enum BidChoice {
    Bid(u32),
    Pass,
}

impl FromStr for BidChoice {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pass") || s.eq_ignore_ascii_case("p") {
            Ok(BidChoice::Pass)
        } else {
            s.parse().map(BidChoice::Bid)
        }
    }
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format(&self, s: &ANSIStrings) -> String {
        if self.color {
            s.to_string()
        } else {
            ansi_term::unstyle(s)
        }
    }

    fn format_card(&self, card: Card) -> String {
        self.format(&ANSIStrings(&[card.to_ansi_string()]))
    }

    fn format_suit(&self, suit: Suit) -> String {
        self.format(&ANSIStrings(&[suit.to_ansi_string()]))
    }

    fn format_cards(&self, cards: &[Card]) -> String {
        let mut parts: Vec<ANSIString> = vec![];
        for (ii, card) in cards.iter().enumerate() {
            if ii > 0 {
                parts.push(", ".into());
            }
            parts.push(card.to_ansi_string());
        }
        self.format(&ANSIStrings(&parts))
    }

    /// The hand, numbered from 1. Cards that can't be played are dimmed.
    fn format_hand(&self, hand: &[Card], legal: &[usize]) -> String {
        let mut parts: Vec<ANSIString> = vec![];
        for (ii, card) in hand.iter().enumerate() {
            if ii > 0 {
                parts.push("  ".into());
            }
            let label = format!("{}:", ii + 1);
            if legal.contains(&ii) {
                parts.push(label.into());
                parts.push(card.to_ansi_string());
            } else {
                parts.push(ansi_term::Style::new().dimmed().paint(format!("{label}{card}")));
            }
        }
        self.format(&ANSIStrings(&parts))
    }

    fn format_table(&self, cards: &[TableCard]) -> String {
        let mut parts: Vec<ANSIString> = vec!["[".into()];
        for (i, tc) in cards.iter().enumerate() {
            if i != 0 {
                parts.push(", ".into());
            }
            parts.push(format!("{}: ", tc.seat).into());
            parts.push(tc.card.to_ansi_string());
        }
        parts.push("]".into());
        self.format(&ANSIStrings(&parts))
    }

    fn print_analysis(&self, hand: &[Card]) {
        let summary: Vec<_> = suit_analysis(hand)
            .into_iter()
            .filter(|a| !a.cards.is_empty())
            .map(|a| {
                format!(
                    "{} {} ({} pts)",
                    self.format_suit(a.suit),
                    a.cards.len(),
                    a.points
                )
            })
            .collect();
        println!("Suits: {}", summary.join(", "));
    }

    fn bid(&self, state: &PlayerState) -> anyhow::Result<Command> {
        let bidding = state.bidding.context("bidding is not open")?;
        println!("Hand: {}", self.format_cards(state.hand));
        self.print_analysis(state.hand);
        let leader = bidding
            .history
            .last()
            .map(|r| format!(" by {}", r.seat))
            .unwrap_or_default();
        println!(
            "Current bid: {}{leader} ({}s left)",
            bidding.current_bid, bidding.timer
        );
        let legal = bidding.legal_bids();
        let choice = match (legal.first(), legal.last()) {
            (Some(low), Some(high)) => {
                let step = bidding.min_increment();
                prompt::<BidChoice, _>(format!("Bid {low}..={high} by {step}, or pass? "))?
            }
            _ => {
                println!("The bid is at its ceiling.");
                BidChoice::Pass
            }
        };
        Ok(match choice {
            BidChoice::Bid(amount) => Command::PlaceBid {
                seat: state.seat,
                amount,
            },
            BidChoice::Pass => Command::PassBid { seat: state.seat },
        })
    }

    fn select_trump(&self, state: &PlayerState, options: &[Card]) -> anyhow::Result<Command> {
        println!("You won the bidding!");
        println!("Hand: {}", self.format_cards(state.hand));
        self.print_analysis(state.hand);
        let trump = prompt::<Suit, _>("Trump? ")?;
        let teammate = loop {
            let card = prompt::<Card, _>("Teammate card? ")?;
            if options.contains(&card) {
                break card;
            }
            println!("You hold {}, pick a card you don't have", self.format_card(card));
        };
        Ok(Command::SetBidAndTrump {
            trump,
            bidder: state.seat,
            teammate,
        })
    }

    fn play(&self, state: &PlayerState, legal: &[usize]) -> anyhow::Result<Command> {
        let leading = state.trick.map_or(true, Trick::is_empty);
        if let Some(trump) = state.trump() {
            let out: Vec<_> = state
                .played
                .iter()
                .copied()
                .filter(|c| c.suit == trump)
                .collect();
            println!(
                "Trump: {} (played: {})",
                self.format_suit(trump),
                self.format_cards(&out)
            );
        }
        if !state.table().is_empty() {
            println!("Table: {}", self.format_table(state.table()));
        }
        println!("Hand: {}", self.format_hand(state.hand, legal));
        let verb = if leading { "Lead" } else { "Follow" };
        let number = prompt::<usize, _>(format!("{verb}? "))?;
        Ok(Command::PlayCard {
            seat: state.seat,
            // Out of range numbers are rejected by the game, and asked for again.
            index: number.checked_sub(1).unwrap_or(usize::MAX),
        })
    }

    /// Asks the human for the expected action.
    pub fn take_action(&self, game: &Game, expect: ExpectAction) -> anyhow::Result<Command> {
        let state = game.player_state(expect.seat);
        match expect.action {
            ActionType::Bid => self.bid(&state),
            ActionType::SelectTrump => {
                self.select_trump(&state, &game.teammate_options(expect.seat))
            }
            ActionType::Play => {
                println!("Round {} of {}", game.round(), game.total_rounds());
                self.play(&state, &game.legal_card_indices(expect.seat))
            }
        }
    }

    pub fn notify(&self, state: &PlayerState, event: &Event) {
        match event {
            Event::Dealt { starting } => {
                println!("You are {}", state.seat);
                println!("{starting} starts");
                println!("Hand: {}", self.format_cards(state.hand));
            }
            Event::Bid(record) => println!("{}: Bid {}", record.seat, record.bid),
            Event::Pass { seat, timed_out } => {
                println!(
                    "{seat}: Pass{}",
                    if *timed_out { " (out of time)" } else { "" }
                );
            }
            Event::BiddingWon { seat, bid } => println!("{seat} won the bidding at {bid}"),
            Event::TrumpSelected(contract) => {
                println!(
                    "{}: Trump {}, teammate card {}",
                    contract.bidder,
                    self.format_suit(contract.trump),
                    self.format_card(contract.teammate_card)
                );
            }
            Event::CardPlayed(tc) => println!("{}: {}", tc.seat, self.format_card(tc.card)),
            Event::TeammateRevealed(seat) => {
                println!("{seat} is the bidder's teammate!");
                if let Some(team) = state.team {
                    println!("You are on the {team}");
                }
            }
            Event::Trick {
                trick,
                winner,
                points,
            } => {
                println!(
                    "Trick: {} -> {winner} (+{points}){}",
                    self.format_table(&trick.cards),
                    if trick.is_cut() { ", cut" } else { "" }
                );
            }
            Event::GameOver(outcome) => {
                println!("{outcome}");
                let bidding = [outcome.contract.bidder, outcome.teammate].contains(&state.seat);
                if bidding == outcome.made {
                    println!("You win!");
                } else {
                    println!("You lose.");
                }
            }
        }
    }

    pub fn handle_error(&self, err: PlayerError) -> bool {
        println!("Error: {err}");
        true
    }
}

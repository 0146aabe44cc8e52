//! The game of Three of Spades.

mod action;
mod analysis;
mod bidding;
mod card;
mod error;
mod game;
mod player;
mod seat;
mod table;
mod teams;
mod trick;
use self::action::{ActionType, Command, ExpectAction, Stage};
use self::analysis::{suit_analysis, win_probability};
use self::bidding::{BidRecord, BiddingState, BID_TIMER_SECS, MAX_BID};
use self::card::{Card, Deck, Suit};
use self::error::{BotError, GameError, PlayerError};
use self::game::{Contract, Game, GameOutcome, PlayerState};
use self::player::{BidAction, BidContext, Bot, Console, PlayContext, Strategy, TrumpContext};
use self::seat::{Seat, Team, PLAYER_COUNT};
use self::table::{Table, TableConfig};
use self::teams::TeamMap;
use self::trick::{TableCard, Trick};

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::args::Args;

/// An event that occurs during the game.
#[derive(Debug, Clone)]
pub enum Event {
    /// The cards were dealt.
    Dealt { starting: Seat },
    /// A player raised the bid.
    Bid(BidRecord),
    /// A player dropped out of the auction.
    Pass { seat: Seat, timed_out: bool },
    /// The auction is over.
    BiddingWon { seat: Seat, bid: u32 },
    /// The bid winner named trump and the teammate card.
    TrumpSelected(Contract),
    /// A card was played.
    CardPlayed(TableCard),
    /// The teammate card was played, revealing the teams.
    TeammateRevealed(Seat),
    /// The trick is over.
    Trick {
        trick: Trick,
        winner: Seat,
        points: u32,
    },
    /// The game is over.
    GameOver(GameOutcome),
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs a game against three bots with a simple command-line interface.
pub fn cli_main(args: &Args) -> anyhow::Result<()> {
    let console = Console::default();
    let config = TableConfig::from(args);
    let mut table = Table::new(config, rng_from_seed(args.seed));
    table.start()?;
    loop {
        while let Some(event) = table.pop_event() {
            console.notify(&table.game().player_state(Seat::HUMAN), &event);
        }
        if table.game().stage() == Stage::GameOver {
            break;
        }
        match table.awaiting_human() {
            Some(expect) => {
                let started = std::time::Instant::now();
                let command = console.take_action(table.game(), expect)?;
                table.advance(started.elapsed())?;
                match table.submit(command) {
                    Err(GameError::Player(err)) if console.handle_error(err.clone()) => continue,
                    Err(err) => return Err(err).context("fatal"),
                    Ok(()) => (),
                }
            }
            None => {
                let wait = table.time_to_next().context("game stalled")?;
                std::thread::sleep(wait);
                table.advance(wait)?;
            }
        }
    }
    if args.json {
        serde_json::to_writer(std::io::stderr(), &table.game().snapshot())?;
    }
    Ok(())
}

/// Runs games between four bots, without pacing, and prints a summary of each.
pub fn auto_main(args: &Args) -> anyhow::Result<()> {
    let mut config = TableConfig::from(args);
    config.humans.clear();
    let mut rng = rng_from_seed(args.seed);
    let mut made = 0;
    for n in 0..args.games {
        let mut table = Table::new(config.clone(), StdRng::seed_from_u64(rng.gen()));
        table.start()?;
        let outcome = table.run_to_completion()?;
        if outcome.made {
            made += 1;
        }
        println!("Game {}: {outcome}", n + 1);
        println!("  bots: {}", table.bot_names().join(", "));
        if args.json {
            println!("{}", serde_json::to_string(&table.game().snapshot())?);
        }
    }
    println!("Contracts made: {made}/{}", args.games);
    Ok(())
}

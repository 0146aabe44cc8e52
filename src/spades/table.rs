//! The table: a game, the bots seated at it, and the clock that paces them.
//!
//! Everything runs on one thread against a logical clock. Work that should happen later, such
//! as a bot's move or leaving an announcement stage, is stamped with the game's
//! [epoch](Game::epoch) when it is scheduled. If the game has moved on by the time the work
//! comes due, the work is dropped. The bidding countdown works the same way: each tick
//! lowers the current bidder's clock by a second, unless the bidding has changed since the
//! tick was scheduled.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    ActionType, BidAction, BidContext, Bot, BotError, Command, Event, ExpectAction, Game,
    GameError, GameOutcome, PlayContext, Seat, Stage, Strategy, Suit, TrumpContext,
    BID_TIMER_SECS, MAX_BID,
};
use crate::args::Args;

const TICK: Duration = Duration::from_secs(1);

/// Pacing and seating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// How long a bot takes to act.
    pub think_time: Duration,
    /// How long announcements and finished tricks stay on the table.
    pub announce_time: Duration,
    /// Seconds each bidder has to act before they're passed.
    pub bid_timer: u32,
    /// Seats played by humans. Every other seat gets a bot.
    pub humans: Vec<Seat>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            think_time: Duration::from_millis(800),
            announce_time: Duration::from_millis(1500),
            bid_timer: BID_TIMER_SECS,
            humans: vec![Seat::HUMAN],
        }
    }
}

impl From<&Args> for TableConfig {
    fn from(args: &Args) -> Self {
        let default = Self::default();
        Self {
            think_time: args
                .think_ms
                .map_or(default.think_time, Duration::from_millis),
            announce_time: args
                .announce_ms
                .map_or(default.announce_time, Duration::from_millis),
            bid_timer: args.bid_timer.unwrap_or(default.bid_timer),
            humans: default.humans,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Work {
    /// A bot takes the expected action.
    Act(ExpectAction),
    /// Leave an announcement stage.
    Proceed,
    /// Clear the finished trick.
    StartNewRound,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    epoch: u64,
    work: Work,
}

#[derive(Debug, Clone, Copy)]
struct BidClock {
    next_tick: Duration,
    epoch: u64,
}

/// A game in progress, with bots in every seat that isn't a human's.
#[derive(Debug)]
pub struct Table {
    game: Game,
    bots: HashMap<Seat, Bot>,
    config: TableConfig,
    rng: StdRng,
    now: Duration,
    pending: Option<Pending>,
    bid_clock: Option<BidClock>,
}

impl Table {
    pub fn new(config: TableConfig, rng: StdRng) -> Self {
        Self {
            game: Game::new(config.bid_timer),
            bots: HashMap::new(),
            config,
            rng,
            now: Duration::ZERO,
            pending: None,
            bid_clock: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn pop_event(&mut self) -> Option<Event> {
        self.game.pop_event()
    }

    /// Seats bots and deals a new game.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.bots = Seat::all_seats()
            .iter()
            .filter(|seat| !self.config.humans.contains(seat))
            .map(|&seat| (seat, Bot::random(&mut self.rng)))
            .collect();
        for (seat, bot) in &self.bots {
            debug!(%seat, %bot, "seated bot");
        }
        let command = Command::start_game(&mut self.rng);
        self.dispatch(command)
    }

    /// The player at each seat, in seat order.
    pub fn bot_names(&self) -> Vec<String> {
        Seat::all_seats()
            .iter()
            .map(|seat| {
                self.bots
                    .get(seat)
                    .map_or_else(|| "Human".to_string(), ToString::to_string)
            })
            .collect()
    }

    /// The action a human needs to take, if the game is waiting on one.
    pub fn awaiting_human(&self) -> Option<ExpectAction> {
        self.game
            .next_action()
            .filter(|expect| !self.bots.contains_key(&expect.seat))
    }

    /// Applies a command on behalf of a human.
    pub fn submit(&mut self, command: Command) -> Result<(), GameError> {
        self.dispatch(command)
    }

    /// How long until the next piece of scheduled work, if there is any.
    pub fn time_to_next(&self) -> Option<Duration> {
        self.next_due().map(|due| due.saturating_sub(self.now))
    }

    /// Moves the clock forward, running all the work that comes due on the way.
    pub fn advance(&mut self, dt: Duration) -> Result<(), GameError> {
        let target = self.now + dt;
        while let Some(due) = self.next_due().filter(|&due| due <= target) {
            self.now = self.now.max(due);
            self.fire_next()?;
        }
        self.now = target;
        Ok(())
    }

    /// Jumps the clock to the next piece of scheduled work and runs it. Returns how far the
    /// clock moved, or None if nothing is scheduled.
    pub fn step(&mut self) -> Result<Option<Duration>, GameError> {
        let Some(wait) = self.time_to_next() else {
            return Ok(None);
        };
        self.advance(wait)?;
        Ok(Some(wait))
    }

    /// Runs the game to the end without pacing. Fails if a human needs to act.
    pub fn run_to_completion(&mut self) -> anyhow::Result<GameOutcome> {
        while self.game.stage() != Stage::GameOver {
            if let Some(expect) = self.awaiting_human() {
                anyhow::bail!("waiting on {} to {}", expect.seat, expect.action);
            }
            self.step()?.context("game stalled")?;
        }
        self.game.outcome().context("finished game has no outcome")
    }

    fn dispatch(&mut self, command: Command) -> Result<(), GameError> {
        self.game.apply(command)?;
        self.reschedule();
        Ok(())
    }

    fn next_due(&self) -> Option<Duration> {
        let work = self.pending.map(|p| p.due);
        let tick = self.bid_clock.map(|c| c.next_tick);
        work.into_iter().chain(tick).min()
    }

    /// Drops work scheduled against an older epoch, and schedules whatever the game is
    /// waiting on now.
    fn reschedule(&mut self) {
        let epoch = self.game.epoch();
        if self.pending.is_some_and(|p| p.epoch != epoch) {
            self.pending = None;
        }
        if self.pending.is_none() {
            let stage = self.game.stage();
            let work = if stage.is_announcement() {
                Some((self.config.announce_time, Work::Proceed))
            } else if stage == Stage::RoundSummary {
                Some((self.config.announce_time, Work::StartNewRound))
            } else {
                self.game
                    .next_action()
                    .filter(|expect| self.bots.contains_key(&expect.seat))
                    .map(|expect| (self.config.think_time, Work::Act(expect)))
            };
            self.pending = work.map(|(delay, work)| Pending {
                due: self.now + delay,
                epoch,
                work,
            });
        }

        if self.game.stage() != Stage::Bidding {
            self.bid_clock = None;
        } else if self.bid_clock.map_or(true, |c| c.epoch != epoch) {
            self.bid_clock = Some(BidClock {
                next_tick: self.now + TICK,
                epoch,
            });
        }
    }

    fn fire_next(&mut self) -> Result<(), GameError> {
        let work = self.pending.map(|p| p.due);
        let tick = self.bid_clock.map(|c| c.next_tick);
        match (work, tick) {
            (Some(work), Some(tick)) if tick < work => self.tick(),
            (Some(_), _) => self.run_pending(),
            (None, Some(_)) => self.tick(),
            (None, None) => Ok(()),
        }
    }

    fn tick(&mut self) -> Result<(), GameError> {
        let Some(clock) = self.bid_clock.take() else {
            return Ok(());
        };
        let epoch = self.game.epoch();
        let timer = self
            .game
            .bidding()
            .filter(|_| clock.epoch == epoch && self.game.stage() == Stage::Bidding)
            .map(|bidding| bidding.timer);
        let Some(timer) = timer else {
            debug!("dropping stale bid clock tick");
            self.reschedule();
            return Ok(());
        };
        self.dispatch(Command::UpdateBidTimer {
            seconds: timer.saturating_sub(1),
        })?;
        if self.game.epoch() == epoch {
            self.bid_clock = Some(BidClock {
                next_tick: clock.next_tick + TICK,
                epoch,
            });
        }
        Ok(())
    }

    fn run_pending(&mut self) -> Result<(), GameError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        if pending.epoch != self.game.epoch() {
            debug!(work = ?pending.work, "dropping stale work");
            self.reschedule();
            return Ok(());
        }
        match pending.work {
            Work::Proceed => self.dispatch(Command::Proceed),
            Work::StartNewRound => self.dispatch(Command::StartNewRound),
            Work::Act(expect) => self.act(expect),
        }
    }

    /// Asks the bot for a decision, and plays it.
    fn act(&mut self, expect: ExpectAction) -> Result<(), GameError> {
        let decision = self.decide(expect);
        self.resolve(expect, decision)
    }

    /// Plays a bot's decision. If the bot failed, or the game rejects its decision, a random
    /// legal move is played instead.
    fn resolve(
        &mut self,
        expect: ExpectAction,
        decision: Result<Command, BotError>,
    ) -> Result<(), GameError> {
        match decision {
            Ok(command) => match self.dispatch(command.clone()) {
                Err(GameError::Player(err)) => {
                    warn!(seat = %expect.seat, ?command, %err, "bot made an illegal move");
                }
                result => return result,
            },
            Err(err) => warn!(seat = %expect.seat, %err, "bot failed to decide"),
        }
        match self.fallback(expect) {
            Some(command) => self.dispatch(command),
            None => {
                warn!(seat = %expect.seat, action = %expect.action, "no legal move");
                Ok(())
            }
        }
    }

    fn decide(&mut self, expect: ExpectAction) -> Result<Command, BotError> {
        let seat = expect.seat;
        let nothing = BotError::NothingToDecide(expect.action);
        let game = &self.game;
        let bot = self.bots.get_mut(&seat).ok_or(nothing.clone())?;
        let hand = game.hand(seat);
        let command = match expect.action {
            ActionType::Bid => {
                let bidding = game.bidding().ok_or(nothing)?;
                let ctx = BidContext {
                    seat,
                    hand,
                    current_bid: bidding.current_bid,
                    min_increment: bidding.min_increment(),
                    max_bid: MAX_BID,
                };
                match bot.bid_action(&ctx) {
                    BidAction::Bid(amount) => Command::PlaceBid { seat, amount },
                    BidAction::Pass => Command::PassBid { seat },
                }
            }
            ActionType::SelectTrump => {
                let options = game.teammate_options(seat);
                let ctx = TrumpContext {
                    seat,
                    hand,
                    teammate_options: &options,
                };
                let (trump, teammate) = bot.choose_trump_and_teammate(&ctx)?;
                Command::SetBidAndTrump {
                    trump,
                    bidder: seat,
                    teammate,
                }
            }
            ActionType::Play => {
                let trick = game.trick().ok_or(nothing)?;
                let seen = game.played_cards();
                let ctx = PlayContext {
                    hand,
                    running: trick.running_suit(),
                    trump: trick.trump,
                    table: &trick.cards,
                    seen: &seen,
                };
                let index = bot.choose_card_index(&ctx)?.ok_or(BotError::EmptyHand)?;
                Command::PlayCard { seat, index }
            }
        };
        debug!(%seat, %bot, ?command, "bot decision");
        Ok(command)
    }

    /// A uniformly random legal move for the expected action.
    fn fallback(&mut self, expect: ExpectAction) -> Option<Command> {
        let seat = expect.seat;
        match expect.action {
            ActionType::Bid => {
                let legal = self.game.bidding()?.legal_bids();
                if legal.is_empty() || self.rng.gen_bool(0.5) {
                    Some(Command::PassBid { seat })
                } else {
                    let amount = *legal.choose(&mut self.rng)?;
                    Some(Command::PlaceBid { seat, amount })
                }
            }
            ActionType::SelectTrump => {
                let options = self.game.teammate_options(seat);
                let teammate = *options.choose(&mut self.rng)?;
                let suits = Suit::all_suits();
                let trump = suits[self.rng.gen_range(0..suits.len())];
                Some(Command::SetBidAndTrump {
                    trump,
                    bidder: seat,
                    teammate,
                })
            }
            ActionType::Play => {
                let index = *self.game.legal_card_indices(seat).choose(&mut self.rng)?;
                Some(Command::PlayCard { seat, index })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use rand::SeedableRng;

    use super::*;
    use crate::spades::card::{generate_deck, total_points};
    use crate::spades::PlayerError;

    fn humans_only(bid_timer: u32) -> Table {
        let config = TableConfig {
            bid_timer,
            humans: Seat::all_seats().to_vec(),
            ..TableConfig::default()
        };
        let mut table = Table::new(config, StdRng::seed_from_u64(7));
        table.start().unwrap();
        table
    }

    fn drain(table: &mut Table) -> Vec<Event> {
        std::iter::from_fn(|| table.pop_event()).collect()
    }

    #[test]
    fn test_bot_games_complete() {
        let config = TableConfig {
            humans: vec![],
            ..TableConfig::default()
        };
        for seed in 0..20 {
            let mut table = Table::new(config.clone(), StdRng::seed_from_u64(seed));
            table.start().unwrap();
            let outcome = table.run_to_completion().unwrap();
            assert_eq!(Stage::GameOver, table.game().stage());
            assert_eq!(outcome.made, outcome.bidding_score >= outcome.contract.bid);
            assert_eq!(
                total_points(&generate_deck()),
                outcome.bidding_score + outcome.defending_score
            );
            assert_eq!(10, table.game().tricks().len());
            assert!(table.game().bidding().is_some_and(|b| b.is_complete()));
        }
    }

    #[test]
    fn test_run_to_completion_needs_bots() {
        let mut table = humans_only(BID_TIMER_SECS);
        assert!(table.run_to_completion().is_err());
    }

    #[test]
    fn test_announcements_are_paced() {
        let mut table = humans_only(BID_TIMER_SECS);
        assert_eq!(Stage::DistributeCards, table.game().stage());
        assert_eq!(None, table.awaiting_human());
        let announce = table.config.announce_time;
        table.advance(announce / 2).unwrap();
        assert_eq!(Stage::DistributeCards, table.game().stage());
        assert_eq!(Some(announce / 2), table.step().unwrap());
        assert_eq!(Stage::Bidding, table.game().stage());
        assert_matches!(
            table.awaiting_human(),
            Some(ExpectAction {
                action: ActionType::Bid,
                ..
            })
        );
    }

    #[test]
    fn test_bid_timer_passes_bidder() {
        let mut table = humans_only(3);
        table.step().unwrap();
        drain(&mut table);
        let bidder = table.game().bidding().unwrap().current_bidder;

        table.advance(Duration::from_secs(2)).unwrap();
        let bidding = table.game().bidding().unwrap();
        assert_eq!(1, bidding.timer);
        assert_eq!(bidder, bidding.current_bidder);

        table.advance(TICK).unwrap();
        let bidding = table.game().bidding().unwrap();
        assert!(bidding.passed.contains(&bidder));
        assert_eq!(bidder.next(), bidding.current_bidder);
        assert_eq!(3, bidding.timer);
        let events = drain(&mut table);
        assert_matches!(
            events.as_slice(),
            [Event::Pass { seat, timed_out: true }] if *seat == bidder
        );

        // The passed player answering late is turned away.
        assert_matches!(
            table.submit(Command::PlaceBid {
                seat: bidder,
                amount: 170
            }),
            Err(GameError::Player(PlayerError::AlreadyPassed(_)))
        );
    }

    #[test]
    fn test_stale_tick_is_dropped() {
        let mut table = humans_only(3);
        table.step().unwrap();
        let bidder = table.game().bidding().unwrap().current_bidder;

        table.advance(Duration::from_millis(500)).unwrap();
        table
            .submit(Command::PlaceBid {
                seat: bidder,
                amount: 170,
            })
            .unwrap();
        // The tick scheduled for the first bidder would have landed here.
        table.advance(Duration::from_millis(600)).unwrap();
        let bidding = table.game().bidding().unwrap();
        assert_eq!(bidder.next(), bidding.current_bidder);
        assert_eq!(3, bidding.timer);

        table.advance(Duration::from_millis(400)).unwrap();
        assert_eq!(2, table.game().bidding().unwrap().timer);
    }

    #[test]
    fn test_fallback_is_legal() {
        let mut table = humans_only(BID_TIMER_SECS);
        table.step().unwrap();
        while table.game().stage() != Stage::GameOver {
            match table.awaiting_human() {
                Some(expect) => {
                    let command = table.fallback(expect).unwrap();
                    table.submit(command).unwrap();
                }
                None => {
                    table.step().unwrap().unwrap();
                }
            }
        }
        assert!(table.game().outcome().is_some());
    }

    /// Plays legal moves for every seat until someone is expected to play a card.
    fn until_play(table: &mut Table) -> ExpectAction {
        table.step().unwrap();
        loop {
            match table.awaiting_human() {
                Some(expect) if expect.action == ActionType::Play => return expect,
                Some(expect) => {
                    let command = table.fallback(expect).unwrap();
                    table.submit(command).unwrap();
                }
                None => {
                    table.step().unwrap().unwrap();
                }
            }
        }
    }

    #[test]
    fn test_failed_bot_bids_legally() {
        let mut table = humans_only(BID_TIMER_SECS);
        table.step().unwrap();
        drain(&mut table);
        let expect = table.awaiting_human().unwrap();
        let epoch = table.game().epoch();

        // No bot sits here, so the decision fails.
        table.act(expect).unwrap();
        assert_ne!(epoch, table.game().epoch());
        let bidding = table.game().bidding().unwrap();
        assert_eq!(expect.seat.next(), bidding.current_bidder);
        let events = drain(&mut table);
        match events.as_slice() {
            [Event::Bid(record)] => assert_eq!(expect.seat, record.seat),
            [Event::Pass { seat, timed_out }] => {
                assert_eq!(expect.seat, *seat);
                assert!(!timed_out);
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn test_bot_error_plays_legal_card() {
        let mut table = humans_only(BID_TIMER_SECS);
        let expect = until_play(&mut table);
        drain(&mut table);
        let hand = table.game().hand(expect.seat).to_vec();

        table.resolve(expect, Err(BotError::EmptyHand)).unwrap();
        let events = drain(&mut table);
        assert_matches!(
            events.as_slice(),
            [Event::CardPlayed(tc)] if tc.seat == expect.seat && hand.contains(&tc.card)
        );
        assert_eq!(hand.len() - 1, table.game().hand(expect.seat).len());
    }

    #[test]
    fn test_rejected_bot_command_is_replaced() {
        let mut table = humans_only(BID_TIMER_SECS);
        table.step().unwrap();
        drain(&mut table);
        let expect = table.awaiting_human().unwrap();
        // Off the increment.
        let illegal = Command::PlaceBid {
            seat: expect.seat,
            amount: 167,
        };
        assert_matches!(
            table.game.clone().apply(illegal.clone()),
            Err(GameError::Player(PlayerError::IllegalBid { .. }))
        );
        table.resolve(expect, Ok(illegal)).unwrap();
        assert_eq!(
            expect.seat.next(),
            table.game().bidding().unwrap().current_bidder
        );
        assert_ne!(Some(expect), table.awaiting_human());

        let expect = until_play(&mut table);
        drain(&mut table);
        let hand = table.game().hand(expect.seat).to_vec();
        let illegal = Command::PlayCard {
            seat: expect.seat,
            index: hand.len(),
        };
        table.resolve(expect, Ok(illegal)).unwrap();
        let events = drain(&mut table);
        assert_matches!(
            events.as_slice(),
            [Event::CardPlayed(tc)] if tc.seat == expect.seat && hand.contains(&tc.card)
        );
    }

    #[test]
    fn test_bot_names() {
        let config = TableConfig::default();
        let mut table = Table::new(config, StdRng::seed_from_u64(1));
        table.start().unwrap();
        let names = table.bot_names();
        assert_eq!("Human", names[0]);
        assert!(names[1..]
            .iter()
            .all(|name| name == "RandomBot" || name == "GreedyBot"));
    }
}

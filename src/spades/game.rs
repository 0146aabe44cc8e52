//! Game management.
//!
//! A game is played with one deal. The players bid for the right to name trump and a secret
//! teammate, and then play out every card in their hands, one trick per round. The bidding team
//! wins if the points it captured reach the winning bid. Otherwise the defenders win.
//!
//! ## State management
//!
//! All state lives in [`Game`], and the only way to change it is [`Game::apply`]. A command is
//! validated in full before anything is modified, so a rejected command leaves the game exactly
//! as it was. The identity of the next player and the action they are expected to take is
//! always known, and may be obtained via [`next_action`](Game::next_action).
//!
//! ## Events
//!
//! Certain commands trigger events, such as the end of a trick. These events are stored in a
//! queue, which may be drained using [`pop_event`](Game::pop_event).

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::teams::assign_teams_by_teammate_card;
use super::{
    ActionType, BidRecord, BiddingState, Card, Command, Deck, Event, ExpectAction, GameError,
    PlayerError, Seat, Stage, Suit, TableCard, Team, TeamMap, Trick, BID_TIMER_SECS,
    PLAYER_COUNT,
};

/// The contract established by the winner of the auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub bidder: Seat,
    pub bid: u32,
    pub trump: Suit,
    pub teammate_card: Card,
}

impl Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} bid {}, trump {}, teammate card {}",
            self.bidder, self.bid, self.trump, self.teammate_card
        )
    }
}

/// The outcome of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub contract: Contract,
    pub teammate: Seat,
    pub bidding_score: u32,
    pub defending_score: u32,
    /// The bidding team reached its bid.
    pub made: bool,
    pub winner: Team,
}

impl Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = if self.made { "made" } else { "missed" };
        write!(
            f,
            "{} and {} {verb} {} with {} points; {} wins",
            self.contract.bidder,
            self.teammate,
            self.contract.bid,
            self.bidding_score,
            self.winner
        )
    }
}

impl GameOutcome {
    fn new(contract: Contract, teammate: Seat, bidding_score: u32, defending_score: u32) -> Self {
        let made = bidding_score >= contract.bid;
        Self {
            contract,
            teammate,
            bidding_score,
            defending_score,
            made,
            winner: if made { Team::Bidding } else { Team::Defending },
        }
    }
}

/// The state of a game.
#[derive(Debug, Clone)]
pub struct Game {
    stage: Stage,
    hands: HashMap<Seat, Vec<Card>>,
    scores: HashMap<Seat, u32>,
    team_scores: HashMap<Team, u32>,
    starting: Seat,
    bidding: Option<BiddingState>,
    contract: Option<Contract>,
    teams: Option<TeamMap>,
    teammate_revealed: bool,
    trick: Option<Trick>,
    tricks: Vec<Trick>,
    turn: Seat,
    round: u32,
    total_rounds: u32,
    round_winner: Option<Seat>,
    events: VecDeque<Event>,
    epoch: u64,
    timer_length: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(BID_TIMER_SECS)
    }
}

impl Game {
    /// Creates a game in the [`Stage::Init`] stage, with the specified bid timer length.
    pub fn new(timer_length: u32) -> Self {
        Self {
            stage: Stage::Init,
            hands: HashMap::new(),
            scores: HashMap::new(),
            team_scores: HashMap::new(),
            starting: Seat::HUMAN,
            bidding: None,
            contract: None,
            teams: None,
            teammate_revealed: false,
            trick: None,
            tricks: vec![],
            turn: Seat::HUMAN,
            round: 0,
            total_rounds: 0,
            round_winner: None,
            events: VecDeque::new(),
            epoch: 0,
            timer_length,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// A counter that changes on every transition, except a bid clock tick. Work scheduled
    /// against an older epoch is stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        self.hands.get(&seat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn score(&self, seat: Seat) -> u32 {
        self.scores.get(&seat).copied().unwrap_or_default()
    }

    pub fn team_score(&self, team: Team) -> u32 {
        self.team_scores.get(&team).copied().unwrap_or_default()
    }

    pub fn bidding(&self) -> Option<&BiddingState> {
        self.bidding.as_ref()
    }

    pub fn trick(&self) -> Option<&Trick> {
        self.trick.as_ref()
    }

    /// Completed tricks, oldest first.
    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Pops the oldest event from the queue of events.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Returns the next action that's required from a player, or None if the game is waiting
    /// on the scheduler (or is over).
    pub fn next_action(&self) -> Option<ExpectAction> {
        match self.stage {
            Stage::Bidding => self
                .bidding
                .as_ref()
                .map(|b| ExpectAction::new(b.current_bidder, ActionType::Bid)),
            Stage::TrumpSelection => self
                .bidding
                .as_ref()
                .and_then(|b| b.winner)
                .map(|seat| ExpectAction::new(seat, ActionType::SelectTrump)),
            Stage::Playing => Some(ExpectAction::new(self.turn, ActionType::Play)),
            _ => None,
        }
    }

    /// The team the specified seat plays for, as known to everyone at the table. Teams are
    /// revealed once the teammate card is played, or the game ends.
    pub fn revealed_team(&self, seat: Seat) -> Option<Team> {
        if self.teammate_revealed || self.stage == Stage::GameOver {
            self.teams.as_ref().map(|t| t.team(seat))
        } else {
            None
        }
    }

    /// Indices of the cards the specified seat may legally play right now.
    pub fn legal_card_indices(&self, seat: Seat) -> Vec<usize> {
        match &self.trick {
            Some(trick) if self.stage == Stage::Playing && self.turn == seat => {
                trick.filter(self.hand(seat))
            }
            _ => vec![],
        }
    }

    /// Cards the bid winner may name as the teammate card: every card they don't hold.
    pub fn teammate_options(&self, bidder: Seat) -> Vec<Card> {
        let hand = self.hand(bidder);
        let mut options: Vec<_> = self
            .hands
            .iter()
            .filter(|(&seat, _)| seat != bidder)
            .flat_map(|(_, cards)| cards.iter().copied())
            .filter(|card| !hand.contains(card))
            .collect();
        options.sort_unstable();
        options
    }

    /// Every card that has been played so far, in play order.
    pub fn played_cards(&self) -> Vec<Card> {
        self.tricks()
            .iter()
            .chain(self.trick.iter())
            .flat_map(|t| t.iter().map(|tc| tc.card))
            .collect()
    }

    /// The outcome of the game, if it is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.stage != Stage::GameOver {
            return None;
        }
        Some(GameOutcome::new(
            self.contract?,
            self.teammate()?,
            self.team_score(Team::Bidding),
            self.team_score(Team::Defending),
        ))
    }

    /// The holder of the teammate card, whether or not they've been revealed.
    fn teammate(&self) -> Option<Seat> {
        let bidder = self.contract?.bidder;
        self.teams
            .as_ref()?
            .members(Team::Bidding)
            .into_iter()
            .find(|&seat| seat != bidder)
    }

    /// Returns a bundle of state visible to the specified player.
    pub fn player_state(&self, seat: Seat) -> PlayerState<'_> {
        PlayerState {
            seat,
            hand: self.hand(seat),
            bidding: self.bidding.as_ref(),
            contract: self.contract,
            trick: self.trick.as_ref(),
            played: self.played_cards(),
            team: self.revealed_team(seat),
        }
    }

    /// Applies the specified command.
    pub fn apply(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::StartGame { deck, starting } => self.start_game(deck, starting),
            Command::Proceed => self.proceed(),
            Command::PlaceBid { seat, amount } => self.place_bid(seat, amount),
            Command::PassBid { seat } => self.pass_bid(seat, false),
            Command::UpdateBidTimer { seconds } => self.update_bid_timer(seconds),
            Command::SetBidAndTrump {
                trump,
                bidder,
                teammate,
            } => self.set_bid_and_trump(trump, bidder, teammate),
            Command::PlayCard { seat, index } => self.play_card(seat, index),
            Command::StartNewRound => self.start_new_round(),
        }
    }

    fn expect_stage(&self, stage: Stage) -> Result<(), GameError> {
        match self.stage {
            s if s == stage => Ok(()),
            Stage::GameOver => Err(GameError::GameOver),
            s => Err(GameError::WrongStage(s)),
        }
    }

    fn transition(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
        self.epoch += 1;
    }

    fn start_game(&mut self, cards: Vec<Card>, starting: Seat) -> Result<(), GameError> {
        if !matches!(self.stage, Stage::Init | Stage::GameOver) {
            return Err(GameError::WrongStage(self.stage));
        }
        let unique: HashSet<_> = cards.iter().collect();
        if unique.len() != cards.len() {
            return Err(GameError::DuplicateCard);
        }
        let deck: Deck = cards.into_iter().collect();
        let hands = deck.distribute(PLAYER_COUNT)?;
        let hand_size = hands.first().map(Vec::len).unwrap_or_default();

        *self = Self {
            epoch: self.epoch,
            ..Self::new(self.timer_length)
        };
        self.hands = Seat::all_seats().iter().copied().zip(hands).collect();
        self.scores = Seat::all_seats().iter().map(|&s| (s, 0)).collect();
        self.team_scores = [(Team::Bidding, 0), (Team::Defending, 0)].into();
        self.total_rounds = u32::try_from(hand_size).expect("hand fits in u32");
        self.starting = starting;
        self.turn = starting;
        info!(%starting, hand_size, "new game");
        self.events.push_back(Event::Dealt { starting });
        self.transition(Stage::DistributeCards);
        Ok(())
    }

    fn proceed(&mut self) -> Result<(), GameError> {
        match self.stage {
            Stage::DistributeCards => {
                self.bidding = Some(BiddingState::new(self.starting, self.timer_length));
                self.transition(Stage::Bidding);
            }
            Stage::BiddingComplete => self.transition(Stage::TrumpSelection),
            Stage::TrumpSelectionComplete => {
                let contract = self.contract.expect("contract is set before play");
                self.trick = Some(Trick::new(contract.trump));
                self.round = 1;
                self.turn = self.starting;
                self.transition(Stage::Playing);
            }
            Stage::GameOver => return Err(GameError::GameOver),
            stage => return Err(GameError::WrongStage(stage)),
        }
        Ok(())
    }

    fn bidding_mut(&mut self) -> &mut BiddingState {
        self.bidding.as_mut().expect("bidding is open")
    }

    fn place_bid(&mut self, seat: Seat, amount: u32) -> Result<(), GameError> {
        self.expect_stage(Stage::Bidding)?;
        self.bidding_mut().place_bid(seat, amount)?;
        debug!(%seat, amount, "bid");
        self.events.push_back(Event::Bid(BidRecord { seat, bid: amount }));
        self.epoch += 1;
        Ok(())
    }

    fn pass_bid(&mut self, seat: Seat, timed_out: bool) -> Result<(), GameError> {
        self.expect_stage(Stage::Bidding)?;
        let winner = self.bidding_mut().pass(seat)?;
        debug!(%seat, timed_out, "pass");
        self.events.push_back(Event::Pass { seat, timed_out });
        self.epoch += 1;
        if let Some(winner) = winner {
            let bid = self.bidding_mut().current_bid;
            info!(%winner, bid, "bidding complete");
            self.events.push_back(Event::BiddingWon { seat: winner, bid });
            self.transition(Stage::BiddingComplete);
        }
        Ok(())
    }

    fn update_bid_timer(&mut self, seconds: u32) -> Result<(), GameError> {
        self.expect_stage(Stage::Bidding)?;
        if seconds == 0 {
            let seat = self.bidding_mut().current_bidder;
            info!(%seat, "bid timer expired");
            self.pass_bid(seat, true)
        } else {
            self.bidding_mut().set_timer(seconds);
            Ok(())
        }
    }

    fn set_bid_and_trump(
        &mut self,
        trump: Suit,
        bidder: Seat,
        teammate_card: Card,
    ) -> Result<(), GameError> {
        self.expect_stage(Stage::TrumpSelection)?;
        let bidding = self.bidding.as_ref().expect("bidding is complete");
        if bidding.winner != Some(bidder) {
            return Err(PlayerError::NotBidWinner(bidder).into());
        }
        if self.hand(bidder).contains(&teammate_card) {
            return Err(PlayerError::TeammateCardHeld(bidder, teammate_card).into());
        }
        let teams = assign_teams_by_teammate_card(&self.hands, bidder, teammate_card)?;
        let contract = Contract {
            bidder,
            bid: bidding.current_bid,
            trump,
            teammate_card,
        };
        info!(%contract, "trump selected");
        self.contract = Some(contract);
        self.teams = Some(teams);
        self.events.push_back(Event::TrumpSelected(contract));
        self.transition(Stage::TrumpSelectionComplete);
        Ok(())
    }

    fn play_card(&mut self, seat: Seat, index: usize) -> Result<(), GameError> {
        self.expect_stage(Stage::Playing)?;
        if seat != self.turn {
            return Err(PlayerError::NotYourTurn(seat).into());
        }
        let hand = self.hands.get(&seat).expect("hands populated");
        let card = *hand
            .get(index)
            .ok_or(PlayerError::CardIndexOutOfRange { seat, index })?;
        let trick = self.trick.as_mut().expect("trick is open while playing");
        if !trick.is_following_lead(hand, card) {
            let lead = trick.lead().expect("lead exists").card;
            return Err(PlayerError::MustFollowSuit(seat, lead).into());
        }

        self.hands.get_mut(&seat).expect("hands populated").remove(index);
        trick.play(seat, card);
        debug!(%seat, %card, "play");
        self.events.push_back(Event::CardPlayed(TableCard::new(seat, card)));
        if self.contract.is_some_and(|c| c.teammate_card == card) && !self.teammate_revealed {
            self.teammate_revealed = true;
            self.events.push_back(Event::TeammateRevealed(seat));
        }

        if trick.is_complete() {
            let winner = trick.best().expect("complete trick has a winner").seat;
            let points = trick.points();
            let team = self.teams.as_ref().expect("teams are set").team(winner);
            *self.scores.entry(winner).or_default() += points;
            *self.team_scores.entry(team).or_default() += points;
            info!(%winner, points, round = self.round, %trick, "trick");
            self.events.push_back(Event::Trick {
                trick: trick.clone(),
                winner,
                points,
            });
            self.tricks.push(trick.clone());
            self.round_winner = Some(winner);
            self.turn = winner;
            self.transition(Stage::RoundSummary);
        } else {
            self.turn = seat.next();
            self.epoch += 1;
        }
        Ok(())
    }

    fn start_new_round(&mut self) -> Result<(), GameError> {
        self.expect_stage(Stage::RoundSummary)?;
        if self.round >= self.total_rounds {
            self.trick = None;
            self.transition(Stage::GameOver);
            if let Some(outcome) = self.outcome() {
                info!(%outcome, "game over");
                self.events.push_back(Event::GameOver(outcome));
            }
        } else {
            let contract = self.contract.expect("contract is set");
            self.trick = Some(Trick::new(contract.trump));
            self.round += 1;
            self.turn = self.round_winner.expect("previous trick has a winner");
            self.transition(Stage::Playing);
        }
        Ok(())
    }

    /// A serializable copy of the whole game state, hidden information included. Use
    /// [`player_state`](Game::player_state) for what a single seat may see.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stage: self.stage,
            hands: Seat::all_seats()
                .iter()
                .map(|&s| self.hand(s).to_vec())
                .collect(),
            scores: Seat::all_seats().iter().map(|&s| self.score(s)).collect(),
            team_scores: [
                self.team_score(Team::Bidding),
                self.team_score(Team::Defending),
            ],
            table: self.trick.as_ref().map(|t| t.cards.clone()).unwrap_or_default(),
            running_suit: self.trick.as_ref().and_then(Trick::running_suit),
            trump: self.contract.map(|c| c.trump),
            bidding: self.bidding.clone(),
            contract: self.contract,
            teams: self.teams.clone(),
            teammate: self.teammate(),
            teammate_revealed: self.teammate_revealed,
            turn: self.next_action().map(|a| a.seat),
            round: self.round,
            total_rounds: self.total_rounds,
            round_winner: self.round_winner,
            outcome: self.outcome(),
        }
    }
}

/// The state visible to a particular seat.
#[derive(Debug)]
pub struct PlayerState<'a> {
    /// The player who has access to this state.
    pub seat: Seat,
    /// The player's hand, sorted.
    pub hand: &'a [Card],
    pub bidding: Option<&'a BiddingState>,
    /// The contract, once trump is selected.
    pub contract: Option<Contract>,
    /// The trick in progress.
    pub trick: Option<&'a Trick>,
    /// Every card played so far.
    pub played: Vec<Card>,
    /// The player's team, once the teams are revealed.
    pub team: Option<Team>,
}

impl PlayerState<'_> {
    /// The trump suit, once selected.
    pub fn trump(&self) -> Option<Suit> {
        self.contract.map(|c| c.trump)
    }

    /// Cards in the trick in progress.
    pub fn table(&self) -> &[TableCard] {
        self.trick.map(|t| t.cards.as_slice()).unwrap_or_default()
    }
}

/// A read-only copy of the game state, for logs and display. Every hand is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stage: Stage,
    /// Hands, indexed by seat.
    pub hands: Vec<Vec<Card>>,
    /// Personal scores, indexed by seat.
    pub scores: Vec<u32>,
    /// Bidding team, then defending team.
    pub team_scores: [u32; 2],
    pub table: Vec<TableCard>,
    pub running_suit: Option<Suit>,
    pub trump: Option<Suit>,
    pub bidding: Option<BiddingState>,
    pub contract: Option<Contract>,
    /// Seat to team, once trump is selected.
    pub teams: Option<TeamMap>,
    /// The bid winner's teammate, once trump is selected.
    pub teammate: Option<Seat>,
    /// The teammate card has been played, so the table knows the teams.
    pub teammate_revealed: bool,
    /// The seat expected to act.
    pub turn: Option<Seat>,
    pub round: u32,
    pub total_rounds: u32,
    pub round_winner: Option<Seat>,
    pub outcome: Option<GameOutcome>,
}

#[cfg(test)]
mod test;

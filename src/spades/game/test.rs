use assert_matches::assert_matches;

use super::*;
use crate::spades::card::generate_deck;
use crate::spades::card::test::{card, cards};

// Dealing the canonical deck round-robin gives:
//   Player 1: 3S 9S KS 7H JH 3C 9C KC 7D JD
//   Player 2: 5S TS AS 8H QH 5C TC AC 8D QD
//   Player 3: 7S JS 3H 9H KH 7C JC 3D 9D KD
//   Player 4: 8S QS 5H TH AH 8C QC 5D TD AD

fn seat(i: usize) -> Seat {
    Seat::try_from(i).unwrap()
}

fn drain(game: &mut Game) -> Vec<Event> {
    std::iter::from_fn(|| game.pop_event()).collect()
}

fn dealt(starting: usize) -> Game {
    let mut game = Game::default();
    game.apply(Command::StartGame {
        deck: generate_deck(),
        starting: seat(starting),
    })
    .unwrap();
    game
}

fn bidding(starting: usize) -> Game {
    let mut game = dealt(starting);
    game.apply(Command::Proceed).unwrap();
    game
}

/// Player 1 wins at 170, names spades and the ace of spades, and leads the first trick.
fn playing() -> Game {
    let mut game = bidding(0);
    game.apply(Command::PlaceBid {
        seat: seat(0),
        amount: 170,
    })
    .unwrap();
    for i in 1..4 {
        game.apply(Command::PassBid { seat: seat(i) }).unwrap();
    }
    game.apply(Command::Proceed).unwrap();
    game.apply(Command::SetBidAndTrump {
        trump: Suit::Spade,
        bidder: seat(0),
        teammate: card("AS"),
    })
    .unwrap();
    game.apply(Command::Proceed).unwrap();
    game
}

fn play(game: &mut Game, i: usize, card_id: &str) {
    let index = game
        .hand(seat(i))
        .iter()
        .position(|&c| c == card(card_id))
        .unwrap();
    game.apply(Command::PlayCard {
        seat: seat(i),
        index,
    })
    .unwrap();
}

#[test]
fn test_deal() {
    let mut game = dealt(2);
    assert_eq!(Stage::DistributeCards, game.stage());
    assert_eq!(None, game.next_action());
    assert_eq!(10, game.total_rounds());
    let mut all = vec![];
    for &s in Seat::all_seats() {
        let hand = game.hand(s);
        assert_eq!(10, hand.len());
        assert!(hand
            .windows(2)
            .all(|w| w[0].position_value() < w[1].position_value()));
        all.extend_from_slice(hand);
    }
    all.sort_unstable();
    assert_eq!(generate_deck(), all);
    assert_eq!(
        cards(&["7S", "JS", "3H", "9H", "KH", "7C", "JC", "3D", "9D", "KD"]),
        game.hand(seat(2))
    );
    let events = drain(&mut game);
    assert_matches!(events.as_slice(), [Event::Dealt { starting }] if *starting == seat(2));

    game.apply(Command::Proceed).unwrap();
    assert_eq!(Stage::Bidding, game.stage());
    assert_eq!(
        Some(ExpectAction::new(seat(2), ActionType::Bid)),
        game.next_action()
    );
}

#[test]
fn test_bad_deals() {
    let mut game = Game::default();
    let mut deck = generate_deck();
    deck.pop();
    assert_matches!(
        game.apply(Command::StartGame {
            deck,
            starting: seat(0),
        }),
        Err(GameError::Deal(_))
    );
    let mut deck = generate_deck();
    deck[1] = deck[0];
    assert_matches!(
        game.apply(Command::StartGame {
            deck,
            starting: seat(0),
        }),
        Err(GameError::DuplicateCard)
    );
    assert_eq!(Stage::Init, game.stage());

    let mut game = bidding(0);
    assert_matches!(
        game.apply(Command::StartGame {
            deck: generate_deck(),
            starting: seat(0),
        }),
        Err(GameError::WrongStage(Stage::Bidding))
    );
}

#[test]
fn test_scripted_bidding() {
    let mut game = bidding(1);
    drain(&mut game);
    let script = [
        Command::PlaceBid {
            seat: seat(1),
            amount: 175,
        },
        Command::PassBid { seat: seat(2) },
        Command::PlaceBid {
            seat: seat(3),
            amount: 200,
        },
        Command::PlaceBid {
            seat: seat(0),
            amount: 210,
        },
        Command::PassBid { seat: seat(1) },
        Command::PassBid { seat: seat(3) },
    ];
    for command in script {
        game.apply(command).unwrap();
    }
    assert_eq!(Stage::BiddingComplete, game.stage());
    let bidding = game.bidding().unwrap();
    assert_eq!(Some(seat(0)), bidding.winner);
    assert_eq!(210, bidding.current_bid);
    let events = drain(&mut game);
    assert_eq!(7, events.len());
    assert_matches!(
        events.last(),
        Some(Event::BiddingWon { seat: s, bid: 210 }) if *s == seat(0)
    );

    game.apply(Command::Proceed).unwrap();
    assert_eq!(
        Some(ExpectAction::new(seat(0), ActionType::SelectTrump)),
        game.next_action()
    );
}

#[test]
fn test_illegal_bids() {
    let mut game = bidding(0);
    let before = game.snapshot();
    let epoch = game.epoch();
    assert_matches!(
        game.apply(Command::PlaceBid {
            seat: seat(1),
            amount: 170
        }),
        Err(GameError::Player(PlayerError::NotYourTurn(_)))
    );
    assert_matches!(
        game.apply(Command::PlaceBid {
            seat: seat(0),
            amount: 172
        }),
        Err(GameError::Player(PlayerError::IllegalBid { amount: 172, .. }))
    );
    assert_matches!(
        game.apply(Command::PlaceBid {
            seat: seat(0),
            amount: 260
        }),
        Err(GameError::Player(PlayerError::IllegalBid { .. }))
    );
    assert_eq!(before, game.snapshot());
    assert_eq!(epoch, game.epoch());
    assert_matches!(
        game.apply(Command::PlayCard {
            seat: seat(0),
            index: 0
        }),
        Err(GameError::WrongStage(Stage::Bidding))
    );
}

#[test]
fn test_bid_timer() {
    let mut game = bidding(0);
    drain(&mut game);
    let epoch = game.epoch();
    game.apply(Command::UpdateBidTimer { seconds: 12 }).unwrap();
    assert_eq!(12, game.bidding().unwrap().timer);
    assert_eq!(epoch, game.epoch());

    game.apply(Command::UpdateBidTimer { seconds: 0 }).unwrap();
    assert_ne!(epoch, game.epoch());
    let bidding = game.bidding().unwrap();
    assert!(bidding.passed.contains(&seat(0)));
    assert_eq!(seat(1), bidding.current_bidder);
    assert_eq!(BID_TIMER_SECS, bidding.timer);
    let events = drain(&mut game);
    assert_matches!(
        events.as_slice(),
        [Event::Pass { seat: s, timed_out: true }] if *s == seat(0)
    );

    // Running out the clock on everyone leaves the last player holding the opening bid.
    for _ in 0..2 {
        game.apply(Command::UpdateBidTimer { seconds: 0 }).unwrap();
    }
    assert_eq!(Stage::BiddingComplete, game.stage());
    assert_eq!(Some(seat(3)), game.bidding().unwrap().winner);
    assert_matches!(
        game.apply(Command::UpdateBidTimer { seconds: 0 }),
        Err(GameError::WrongStage(Stage::BiddingComplete))
    );
}

#[test]
fn test_trump_selection() {
    let mut game = bidding(0);
    for i in 0..3 {
        game.apply(Command::PassBid { seat: seat(i) }).unwrap();
    }
    game.apply(Command::Proceed).unwrap();
    assert_eq!(Stage::TrumpSelection, game.stage());

    let options = game.teammate_options(seat(3));
    assert_eq!(30, options.len());
    assert!(!options.contains(&card("AD")));
    assert!(options.contains(&card("3S")));

    let before = game.snapshot();
    assert_matches!(
        game.apply(Command::SetBidAndTrump {
            trump: Suit::Heart,
            bidder: seat(3),
            teammate: card("AD"),
        }),
        Err(GameError::Player(PlayerError::TeammateCardHeld(_, _)))
    );
    assert_matches!(
        game.apply(Command::SetBidAndTrump {
            trump: Suit::Heart,
            bidder: seat(1),
            teammate: card("3S"),
        }),
        Err(GameError::Player(PlayerError::NotBidWinner(_)))
    );
    assert_eq!(before, game.snapshot());

    game.apply(Command::SetBidAndTrump {
        trump: Suit::Heart,
        bidder: seat(3),
        teammate: card("3S"),
    })
    .unwrap();
    let contract = game.snapshot().contract.unwrap();
    assert_eq!(165, contract.bid);
    assert_eq!(Suit::Heart, contract.trump);
    assert_eq!(Stage::TrumpSelectionComplete, game.stage());
    // Teams stay hidden from the players until the teammate card is played.
    assert_eq!(None, game.revealed_team(seat(0)));
    assert_eq!(None, game.player_state(seat(0)).team);
    // The snapshot is the full state, and already knows who holds it.
    let snapshot = game.snapshot();
    assert_eq!(Some(seat(0)), snapshot.teammate);
    assert!(!snapshot.teammate_revealed);
    assert_eq!(
        Some(Team::Bidding),
        snapshot.teams.as_ref().map(|t| t.team(seat(0)))
    );
}

#[test]
fn test_first_trick() {
    let mut game = playing();
    drain(&mut game);
    assert_eq!(1, game.round());
    assert_eq!(
        Some(ExpectAction::new(seat(0), ActionType::Play)),
        game.next_action()
    );
    assert_eq!((0..10).collect::<Vec<_>>(), game.legal_card_indices(seat(0)));
    assert!(game.legal_card_indices(seat(1)).is_empty());

    let before = game.snapshot();
    assert_matches!(
        game.apply(Command::PlayCard {
            seat: seat(1),
            index: 0
        }),
        Err(GameError::Player(PlayerError::NotYourTurn(_)))
    );
    assert_matches!(
        game.apply(Command::PlayCard {
            seat: seat(0),
            index: 10
        }),
        Err(GameError::Player(PlayerError::CardIndexOutOfRange { index: 10, .. }))
    );
    assert_eq!(before, game.snapshot());

    play(&mut game, 0, "KS");
    assert_eq!(vec![0, 1, 2], game.legal_card_indices(seat(1)));
    let before = game.snapshot();
    assert_matches!(
        game.apply(Command::PlayCard {
            seat: seat(1),
            index: 3
        }),
        Err(GameError::Player(PlayerError::MustFollowSuit(_, c))) if c == card("KS")
    );
    assert_eq!(before, game.snapshot());

    play(&mut game, 1, "AS");
    assert_eq!(Some(Team::Bidding), game.revealed_team(seat(1)));
    assert_eq!(Some(Team::Defending), game.revealed_team(seat(2)));
    assert_eq!(Some(Team::Bidding), game.player_state(seat(0)).team);
    play(&mut game, 2, "JS");
    play(&mut game, 3, "QS");

    assert_eq!(Stage::RoundSummary, game.stage());
    assert_eq!(None, game.next_action());
    assert_eq!(40, game.score(seat(1)));
    assert_eq!(0, game.score(seat(0)));
    assert_eq!(40, game.team_score(Team::Bidding));
    assert_eq!(0, game.team_score(Team::Defending));
    let snapshot = game.snapshot();
    assert_eq!(Some(seat(1)), snapshot.round_winner);
    assert_eq!(Some(seat(1)), snapshot.teammate);
    assert!(snapshot.teammate_revealed);
    assert!(snapshot.teams.is_some());

    let events = drain(&mut game);
    assert_matches!(
        events.as_slice(),
        [
            Event::CardPlayed(_),
            Event::CardPlayed(_),
            Event::TeammateRevealed(_),
            Event::CardPlayed(_),
            Event::CardPlayed(_),
            Event::Trick { points: 40, .. },
        ]
    );

    game.apply(Command::StartNewRound).unwrap();
    assert_eq!(2, game.round());
    assert_eq!(Stage::Playing, game.stage());
    assert!(game.trick().is_some_and(Trick::is_empty));
    assert_eq!(
        Some(ExpectAction::new(seat(1), ActionType::Play)),
        game.next_action()
    );
    assert_eq!(cards(&["KS", "AS", "JS", "QS"]), game.played_cards());
}

#[test]
fn test_full_game() {
    let mut game = playing();
    while game.stage() != Stage::GameOver {
        match game.next_action() {
            Some(ExpectAction {
                seat,
                action: ActionType::Play,
            }) => {
                let index = game.legal_card_indices(seat)[0];
                game.apply(Command::PlayCard { seat, index }).unwrap();
            }
            Some(expect) => panic!("unexpected {expect:?}"),
            None => game.apply(Command::StartNewRound).unwrap(),
        }
    }

    assert_eq!(10, game.tricks().len());
    assert!(Seat::all_seats().iter().all(|&s| game.hand(s).is_empty()));
    let total: u32 = Seat::all_seats().iter().map(|&s| game.score(s)).sum();
    assert_eq!(250, total);

    let outcome = game.outcome().unwrap();
    assert_eq!(seat(1), outcome.teammate);
    assert_eq!(game.team_score(Team::Bidding), outcome.bidding_score);
    assert_eq!(250, outcome.bidding_score + outcome.defending_score);
    assert_eq!(outcome.made, outcome.bidding_score >= 170);
    let winner = if outcome.made {
        Team::Bidding
    } else {
        Team::Defending
    };
    assert_eq!(winner, outcome.winner);
    assert_matches!(drain(&mut game).last(), Some(Event::GameOver(o)) if *o == outcome);

    assert_eq!(None, game.next_action());
    assert_matches!(game.apply(Command::Proceed), Err(GameError::GameOver));
    assert_matches!(
        game.apply(Command::StartNewRound),
        Err(GameError::GameOver)
    );

    // A new game can be dealt at the same table.
    game.apply(Command::StartGame {
        deck: generate_deck(),
        starting: seat(3),
    })
    .unwrap();
    assert_eq!(Stage::DistributeCards, game.stage());
    assert_eq!(0, game.score(seat(1)));
    assert!(game.tricks().is_empty());
    assert_eq!(None, game.snapshot().contract);
}

#[test]
fn test_snapshot_serde() {
    let game = playing();
    let snapshot = game.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"AS\""));
    let parsed: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, parsed);
}

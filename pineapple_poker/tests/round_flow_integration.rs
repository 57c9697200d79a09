//! Integration tests for the table lifecycle: buy-in, staged dealing,
//! settlement, card checks, and exits.

use pineapple_poker::account::{Address, Amount, units};
use pineapple_poker::token::{StandardToken, TokenService};
use pineapple_poker::venue::{
    TableId, TableState, Venue, VenueConfig, VenueError, VenueEvent,
};

const ETHER: Amount = 1_000_000_000_000_000_000;

struct Fixture {
    venue: Venue,
    owner: Address,
    token: Address,
    alice: Address,
    bob: Address,
    carol: Address,
    dave: Address,
}

/// Deploy a token, fund four players with 100 tokens each, and approve the venue.
fn setup() -> Fixture {
    let owner = Address::new("owner");
    let token_address = Address::new("pineapple-token");
    let venue_address = Address::new("venue");

    let mut token = StandardToken::new(
        token_address.clone(),
        "Pineapple Poker Token",
        "PPT",
        &owner,
        units(1_000, 18),
    );

    let players: Vec<Address> = ["alice", "bob", "carol", "dave"]
        .into_iter()
        .map(Address::new)
        .collect();
    for player in &players {
        token.transfer(&owner, player, units(100, 18)).unwrap();
        token
            .approve(player, &venue_address, units(100, 18))
            .unwrap();
    }

    let config = VenueConfig {
        shuffle_seed: Some(2024),
        ..Default::default()
    };
    let mut venue = Venue::initialize(config, venue_address, owner.clone()).unwrap();
    venue.register_token(Box::new(token)).unwrap();

    Fixture {
        venue,
        owner,
        token: token_address,
        alice: players[0].clone(),
        bob: players[1].clone(),
        carol: players[2].clone(),
        dave: players[3].clone(),
    }
}

/// Table with buy-in 10, point cost 0.1, three seats.
fn create_standard_table(f: &mut Fixture) -> TableId {
    f.venue
        .create_table(&f.owner, 10 * ETHER, ETHER / 10, 3, &f.token)
        .unwrap()
}

fn wallet(f: &Fixture, player: &Address) -> Amount {
    f.venue.token(&f.token).unwrap().balance_of(player)
}

fn escrow_matches_ledger(f: &Fixture, table: TableId) {
    let escrowed = f.venue.table(table).unwrap().escrowed;
    assert_eq!(escrowed, f.venue.chips_total(table));
    assert_eq!(wallet(f, f.venue.address()), escrowed);
}

#[test]
fn test_create_table_records_configuration() {
    let mut f = setup();
    let table = create_standard_table(&mut f);

    assert_eq!(f.venue.total_tables(), 1);
    let t = f.venue.table(table).unwrap();
    assert_eq!(t.buy_in_amount, 10 * ETHER);
    assert_eq!(t.points_cost, ETHER / 10);
    assert_eq!(t.max_players, 3);
    assert_eq!(t.current_round, 0);
    assert_eq!(t.state, TableState::Empty);
    assert_eq!(t.token, f.token);

    let events = f.venue.drain_events();
    assert!(matches!(
        events.back(),
        Some(VenueEvent::NewTableCreated { table_id: 0, max_players: 3, .. })
    ));
}

#[test]
fn test_create_table_player_bounds() {
    let mut f = setup();

    let err = f
        .venue
        .create_table(&f.owner, 10 * ETHER, ETHER / 10, 5, &f.token)
        .unwrap_err();
    assert!(matches!(err, VenueError::InvalidPlayerCount { requested: 5, .. }));
    assert_eq!(err.to_string(), "Invalid number of players");
    assert_eq!(f.venue.total_tables(), 0);

    assert!(
        f.venue
            .create_table(&f.owner, 10 * ETHER, ETHER / 10, 3, &f.token)
            .is_ok()
    );
}

#[test]
fn test_full_round_settles_two_players() {
    let mut f = setup();
    let table = create_standard_table(&mut f);

    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();
    escrow_matches_ledger(&f, table);

    assert_eq!(f.venue.deal_cards(&f.owner, table).unwrap(), 0);
    for stage in 1..=4 {
        assert_eq!(f.venue.new_deal(&f.owner, table).unwrap(), stage);
    }

    let round = f.venue.round(table, 0).unwrap();
    assert!(round.active);
    for player in [&f.alice, &f.bob] {
        let hand = &round.hands[player];
        assert_eq!(hand.capacity(), 17);
        assert!(hand.is_complete());
    }

    assert_eq!(
        f.venue
            .end_round(&f.owner, table, &[7, 7], &[true, false])
            .unwrap(),
        0
    );

    assert_eq!(f.venue.chips(&f.alice, table), 10_700_000_000_000_000_000);
    assert_eq!(f.venue.chips(&f.bob, table), 9_300_000_000_000_000_000);
    let t = f.venue.table(table).unwrap();
    assert_eq!(t.current_round, 1);
    assert_eq!(t.state, TableState::RoundOver);
    assert!(!f.venue.round(table, 0).unwrap().active);
    escrow_matches_ledger(&f, table);

    // Dealing is closed until a new round starts.
    assert!(matches!(
        f.venue.new_deal(&f.owner, table),
        Err(VenueError::GameNotStarted)
    ));
}

#[test]
fn test_no_double_dealing() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();

    f.venue.deal_cards(&f.owner, table).unwrap();
    assert!(matches!(
        f.venue.deal_cards(&f.owner, table),
        Err(VenueError::GameInProgress)
    ));

    for _ in 0..4 {
        f.venue.new_deal(&f.owner, table).unwrap();
    }
    assert!(matches!(
        f.venue.new_deal(&f.owner, table),
        Err(VenueError::DeckExhausted)
    ));
    assert_eq!(f.venue.round(table, 0).unwrap().deal_stage, 4);
}

#[test]
fn test_end_round_before_dealing_completes() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();

    assert!(matches!(
        f.venue.end_round(&f.owner, table, &[1, 1], &[true, false]),
        Err(VenueError::GameNotStarted)
    ));

    f.venue.deal_cards(&f.owner, table).unwrap();
    f.venue.new_deal(&f.owner, table).unwrap();

    let err = f
        .venue
        .end_round(&f.owner, table, &[1, 1], &[true, false])
        .unwrap_err();
    assert!(matches!(
        err,
        VenueError::DealingIncomplete {
            stage: 1,
            required: 4
        }
    ));
    assert_eq!(f.venue.chips(&f.alice, table), 10 * ETHER);
}

#[test]
fn test_end_round_rejects_unbalanced_and_short_scores() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();
    f.venue.deal_cards(&f.owner, table).unwrap();
    for _ in 0..4 {
        f.venue.new_deal(&f.owner, table).unwrap();
    }

    assert!(matches!(
        f.venue.end_round(&f.owner, table, &[7], &[true]),
        Err(VenueError::ScoreLengthMismatch { seats: 2, .. })
    ));
    assert!(matches!(
        f.venue.end_round(&f.owner, table, &[7, 3], &[true, false]),
        Err(VenueError::UnbalancedSettlement { .. })
    ));

    assert_eq!(f.venue.table(table).unwrap().state, TableState::Dealing);
    assert_eq!(f.venue.chips_total(table), 20 * ETHER);
}

#[test]
fn test_second_round_after_settlement() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();

    f.venue.deal_cards(&f.owner, table).unwrap();
    for _ in 0..4 {
        f.venue.new_deal(&f.owner, table).unwrap();
    }
    f.venue
        .end_round(&f.owner, table, &[7, 7], &[true, false])
        .unwrap();

    // Bob is below the stake until he tops up.
    assert!(matches!(
        f.venue.deal_cards(&f.owner, table),
        Err(VenueError::UndercapitalizedTable { .. })
    ));
    f.venue.add_chips(&f.bob, table, ETHER).unwrap();

    assert_eq!(f.venue.deal_cards(&f.owner, table).unwrap(), 1);
    assert_eq!(f.venue.table(table).unwrap().state, TableState::Dealing);
    escrow_matches_ledger(&f, table);
}

#[test]
fn test_seat_exclusivity() {
    let mut f = setup();
    let table = create_standard_table(&mut f);

    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    assert_eq!(f.venue.seats(table).unwrap().len(), 1);
    assert_eq!(f.venue.chips(&f.alice, table), 20 * ETHER);

    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.carol, table, 10 * ETHER).unwrap();

    let before = wallet(&f, &f.dave);
    assert!(matches!(
        f.venue.buy_in(&f.dave, table, 10 * ETHER),
        Err(VenueError::TableFull)
    ));
    assert_eq!(wallet(&f, &f.dave), before);
    assert_eq!(f.venue.seats(table).unwrap().len(), 3);
}

#[test]
fn test_buy_in_failures_leave_no_trace() {
    let mut f = setup();
    let table = create_standard_table(&mut f);

    assert!(matches!(
        f.venue.buy_in(&f.alice, 7, 10 * ETHER),
        Err(VenueError::TableNotFound(7))
    ));
    assert!(matches!(
        f.venue.buy_in(&f.alice, table, 9 * ETHER),
        Err(VenueError::InsufficientBuyIn { .. })
    ));

    // No allowance for an unknown player.
    let stranger = Address::new("stranger");
    let err = f.venue.buy_in(&stranger, table, 10 * ETHER).unwrap_err();
    assert!(matches!(err, VenueError::Token(_)));
    assert!(f.venue.seats(table).unwrap().is_empty());
    assert_eq!(f.venue.chips(&stranger, table), 0);
    escrow_matches_ledger(&f, table);
}

#[test]
fn test_add_chips_requires_seat() {
    let mut f = setup();
    let table = create_standard_table(&mut f);

    assert!(matches!(
        f.venue.add_chips(&f.alice, table, ETHER),
        Err(VenueError::NotASeatedPlayer)
    ));

    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    assert_eq!(f.venue.add_chips(&f.alice, table, ETHER).unwrap(), 11 * ETHER);
    assert!(matches!(
        f.venue.add_chips(&f.alice, table, 0),
        Err(VenueError::InvalidAmount)
    ));

    let events = f.venue.drain_events();
    assert!(matches!(
        events.back(),
        Some(VenueEvent::ChipsAdded { amount, .. }) if *amount == ETHER
    ));
    escrow_matches_ledger(&f, table);
}

#[test]
fn test_checking_cards_gated_by_dealing() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();

    assert!(matches!(
        f.venue.checking_cards(&f.carol, table),
        Err(VenueError::NotASeatedPlayer)
    ));
    assert!(matches!(
        f.venue.checking_cards(&f.alice, table),
        Err(VenueError::NoRoundDealt)
    ));

    f.venue.deal_cards(&f.owner, table).unwrap();
    assert!(matches!(
        f.venue.checking_cards(&f.alice, table),
        Err(VenueError::RoundActive)
    ));

    for _ in 0..4 {
        f.venue.new_deal(&f.owner, table).unwrap();
    }
    assert!(matches!(
        f.venue.checking_cards(&f.alice, table),
        Err(VenueError::RoundActive)
    ));

    f.venue
        .end_round(&f.owner, table, &[0, 0], &[true, false])
        .unwrap();
    let alice_hand = f.venue.checking_cards(&f.alice, table).unwrap();
    let bob_hand = f.venue.checking_cards(&f.bob, table).unwrap();
    assert_eq!(alice_hand.cards().len(), 17);
    assert!(
        alice_hand
            .cards()
            .iter()
            .all(|card| !bob_hand.cards().contains(card))
    );
}

#[test]
fn test_deal_events_carry_seat_and_stage() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();
    f.venue.drain_events();

    f.venue.deal_cards(&f.owner, table).unwrap();
    let initial: Vec<_> = f.venue.drain_events().into_iter().collect();
    assert_eq!(initial.len(), 2);
    for (idx, event) in initial.iter().enumerate() {
        match event {
            VenueEvent::CardsDealt {
                round,
                cards,
                player_index,
                ..
            } => {
                assert_eq!(*round, 0);
                assert_eq!(cards.len(), 5);
                assert_eq!(*player_index, idx);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    f.venue.new_deal(&f.owner, table).unwrap();
    let staged: Vec<_> = f.venue.drain_events().into_iter().collect();
    assert!(staged.iter().all(|event| matches!(
        event,
        VenueEvent::StageDealt { stage: 1, cards, .. } if cards.len() == 3
    )));
}

#[test]
fn test_self_exit_then_forced_exit() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();
    let before = wallet(&f, &f.alice);
    f.venue.drain_events();

    assert_eq!(
        f.venue.exit_table(&f.alice, table, &f.alice).unwrap(),
        10 * ETHER
    );
    assert_eq!(wallet(&f, &f.alice), before + 10 * ETHER);
    assert_eq!(f.venue.chips(&f.alice, table), 0);
    assert!(matches!(
        f.venue.drain_events().back(),
        Some(VenueEvent::PlayerExited { player, .. }) if *player == f.alice
    ));

    assert!(matches!(
        f.venue.exit_table(&f.carol, table, &f.alice),
        Err(VenueError::InvalidExit(_))
    ));
    escrow_matches_ledger(&f, table);
}

#[test]
fn test_forced_exit_emits_removal() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();

    f.venue.exit_table(&f.owner, table, &f.alice).unwrap();
    assert!(matches!(
        f.venue.drain_events().back(),
        Some(VenueEvent::PlayerRemoved { removed_by, .. }) if *removed_by == f.owner
    ));
}

#[test]
fn test_exit_blocked_while_dealing_and_table_resets() {
    let mut f = setup();
    let table = create_standard_table(&mut f);
    f.venue.buy_in(&f.alice, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.bob, table, 10 * ETHER).unwrap();
    f.venue.deal_cards(&f.owner, table).unwrap();

    assert!(matches!(
        f.venue.exit_table(&f.alice, table, &f.alice),
        Err(VenueError::RoundActive)
    ));

    for _ in 0..4 {
        f.venue.new_deal(&f.owner, table).unwrap();
    }
    f.venue
        .end_round(&f.owner, table, &[3, 3], &[false, true])
        .unwrap();

    f.venue.exit_table(&f.alice, table, &f.alice).unwrap();
    assert_eq!(f.venue.table(table).unwrap().state, TableState::RoundOver);
    f.venue.exit_table(&f.bob, table, &f.bob).unwrap();

    let t = f.venue.table(table).unwrap();
    assert_eq!(t.state, TableState::Empty);
    assert_eq!(t.current_round, 1);
    assert_eq!(t.escrowed, 0);
    assert_eq!(wallet(&f, f.venue.address()), 0);

    // History survives the reset, and the next cycle continues the numbering.
    assert!(f.venue.round(table, 0).is_ok());
    f.venue.buy_in(&f.carol, table, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.dave, table, 10 * ETHER).unwrap();
    assert_eq!(f.venue.deal_cards(&f.owner, table).unwrap(), 1);
}

#[test]
fn test_tables_are_independent() {
    let mut f = setup();
    let first = create_standard_table(&mut f);
    let second = f
        .venue
        .create_table(&f.owner, ETHER, ETHER / 100, 2, &f.token)
        .unwrap();
    assert_eq!(second, 1);

    f.venue.buy_in(&f.alice, first, 10 * ETHER).unwrap();
    f.venue.buy_in(&f.alice, second, ETHER).unwrap();
    f.venue.buy_in(&f.bob, second, ETHER).unwrap();

    f.venue.deal_cards(&f.owner, second).unwrap();
    assert!(matches!(
        f.venue.deal_cards(&f.owner, first),
        Err(VenueError::NotEnoughPlayers { seated: 1 })
    ));
    assert_eq!(f.venue.table(first).unwrap().state, TableState::Empty);
    assert_eq!(f.venue.round(second, 0).unwrap().hands[&f.alice].capacity(), 26);

    assert_eq!(f.venue.chips_total(first), 10 * ETHER);
    assert_eq!(f.venue.chips_total(second), 2 * ETHER);
    assert_eq!(wallet(&f, f.venue.address()), 12 * ETHER);
}

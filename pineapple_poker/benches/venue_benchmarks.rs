use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pineapple_poker::{
    account::{Address, Amount},
    token::{StandardToken, TokenService},
    venue::{Deck, Pooled, SettlementStrategy, StageSchedule, TableId, Venue, VenueConfig},
};
use rand::{SeedableRng, rngs::StdRng};
use std::hint::black_box;

/// Helper to create a venue with one table and N players bought in
fn setup_table_with_players(n_players: usize) -> (Venue, TableId) {
    let owner = Address::new("owner");
    let venue_address = Address::new("venue");
    let token_address = Address::new("ppt");

    let mut token = StandardToken::new(
        token_address.clone(),
        "Pineapple Poker Token",
        "PPT",
        &owner,
        1_000_000,
    );
    for i in 0..n_players {
        let player = Address::new(&format!("player{i}"));
        token.transfer(&owner, &player, 10_000).unwrap();
        token.approve(&player, &venue_address, Amount::MAX).unwrap();
    }

    let config = VenueConfig {
        shuffle_seed: Some(1),
        ..Default::default()
    };
    let mut venue = Venue::initialize(config, venue_address, owner.clone()).unwrap();
    venue.register_token(Box::new(token)).unwrap();
    let table = venue
        .create_table(&owner, 100, 1, n_players, &token_address)
        .unwrap();
    for i in 0..n_players {
        let player = Address::new(&format!("player{i}"));
        venue.buy_in(&player, table, 100).unwrap();
    }

    (venue, table)
}

/// Benchmark a full round: initial deal, every stage, zero-point settlement
fn bench_full_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_round");

    for n_players in [2, 3, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n| {
                let (mut venue, table) = setup_table_with_players(n);
                let owner = venue.owner().clone();
                let points = vec![0; n];
                let won = vec![false; n];
                b.iter(|| {
                    venue.deal_cards(&owner, table).unwrap();
                    while venue.new_deal(&owner, table).is_ok() {}
                    venue.end_round(&owner, table, &points, &won).unwrap();
                    venue.drain_events();
                });
            },
        );
    }

    group.finish();
}

/// Benchmark deck shuffling
fn bench_shuffle(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);

    c.bench_function("deck_shuffle", |b| {
        b.iter(|| Deck::shuffled(&mut rng));
    });
}

/// Benchmark stage schedule construction
fn bench_stage_schedule(c: &mut Criterion) {
    c.bench_function("stage_schedule", |b| {
        b.iter(|| StageSchedule::new(black_box(3), 5, 4));
    });
}

/// Benchmark pooled settlement at a full table
fn bench_pooled_deltas(c: &mut Criterion) {
    let points: [u64; 4] = [12, 3, 7, 9];
    let won = [true, false, true, false];

    c.bench_function("pooled_deltas_4_players", |b| {
        b.iter(|| Pooled.deltas(black_box(&points), black_box(&won), 100_000_000_000_000_000));
    });
}

criterion_group!(dealing, bench_full_round, bench_shuffle, bench_stage_schedule);

criterion_group!(settlement, bench_pooled_deltas);

criterion_main!(dealing, settlement);

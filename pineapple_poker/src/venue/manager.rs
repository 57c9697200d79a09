//! Venue manager: the table/round state machine over the chip ledger.
//!
//! Every operation runs all of its checks before it mutates anything. The
//! escrow token call is the only step that can fail independently, and it runs
//! before the ledger and seat writes. A failed call therefore has no effect.

use super::{
    cards::{Card, Deck, Hand, StageSchedule},
    config::VenueConfig,
    errors::{VenueError, VenueResult},
    events::{EventLog, VenueEvent},
    ledger::ChipLedger,
    models::{Round, RoundIndex, Table, TableId, TableState, TableSummary},
    seats::SeatSet,
    settlement::{SettlementStrategy, net},
    storage::{STORAGE_VERSION, VenueStorage},
};
use crate::{
    account::{Address, Amount},
    token::TokenService,
};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::{BTreeMap, VecDeque};

/// The venue: owns every table, round, seat, and ledger entry.
#[derive(Debug)]
pub struct Venue {
    /// Escrow account holding table tokens
    address: Address,

    /// Relays external scores through `end_round`
    owner: Address,

    config: VenueConfig,

    tables: Vec<Table>,

    /// Rounds per table, indexed by round index
    rounds: Vec<Vec<Round>>,

    chips: ChipLedger,

    seats: Vec<SeatSet>,

    /// External token contracts by address
    tokens: BTreeMap<Address, Box<dyn TokenService>>,

    /// Shuffle source. Not persisted.
    rng: StdRng,

    events: EventLog,
}

fn shuffle_rng(config: &VenueConfig) -> StdRng {
    match config.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

impl Venue {
    /// Initialize a fresh venue
    ///
    /// # Arguments
    ///
    /// * `config` - Venue-wide settings
    /// * `address` - Escrow account of the venue
    /// * `owner` - Account allowed to settle rounds
    ///
    /// # Errors
    ///
    /// * `VenueError::InvalidConfig` - Config failed validation
    pub fn initialize(config: VenueConfig, address: Address, owner: Address) -> VenueResult<Self> {
        config.validate()?;
        log::info!("Venue {address} initialized, owner {owner}");

        Ok(Self {
            address,
            owner,
            rng: shuffle_rng(&config),
            config,
            tables: Vec::new(),
            rounds: Vec::new(),
            chips: ChipLedger::new(),
            seats: Vec::new(),
            tokens: BTreeMap::new(),
            events: EventLog::new(),
        })
    }

    /// Rebuild a venue from persisted storage
    ///
    /// Token contracts are external and must be registered again. The shuffle
    /// source is reseeded from the stored config.
    ///
    /// # Errors
    ///
    /// * `VenueError::UnsupportedStorageVersion` - Snapshot from a newer layout
    /// * `VenueError::CorruptStorage` - Per-table collections disagree, or a
    ///   table's capacity, seats, or rounds are inconsistent
    pub fn restore(storage: VenueStorage) -> VenueResult<Self> {
        if storage.version > STORAGE_VERSION {
            return Err(VenueError::UnsupportedStorageVersion {
                found: storage.version,
                supported: STORAGE_VERSION,
            });
        }
        storage.config.validate()?;

        let table_count = storage.tables.len();
        if storage.rounds.len() != table_count || storage.seats.len() != table_count {
            return Err(VenueError::CorruptStorage(format!(
                "{} tables, {} round lists, {} seat sets",
                table_count,
                storage.rounds.len(),
                storage.seats.len()
            )));
        }
        for (id, table) in storage.tables.iter().enumerate() {
            if table.id != id {
                return Err(VenueError::CorruptStorage(format!(
                    "table at position {id} has id {}",
                    table.id
                )));
            }
            if storage.chips.table_total(id) != table.escrowed {
                return Err(VenueError::CorruptStorage(format!(
                    "table {id} ledger does not match escrow"
                )));
            }
            check_table(
                &storage.config,
                table,
                &storage.rounds[id],
                &storage.seats[id],
            )
            .map_err(|reason| VenueError::CorruptStorage(format!("table {id} {reason}")))?;
        }

        log::info!(
            "Venue {} restored from storage v{} with {} tables",
            storage.address,
            storage.version,
            table_count
        );

        Ok(Self {
            rng: shuffle_rng(&storage.config),
            address: storage.address,
            owner: storage.owner,
            config: storage.config,
            tables: storage.tables,
            rounds: storage.rounds,
            chips: storage.chips,
            seats: storage.seats,
            tokens: BTreeMap::new(),
            events: EventLog::new(),
        })
    }

    /// Persistent state in append-only layout order.
    pub fn snapshot(&self) -> VenueStorage {
        VenueStorage {
            version: STORAGE_VERSION,
            owner: self.owner.clone(),
            address: self.address.clone(),
            config: self.config.clone(),
            tables: self.tables.clone(),
            rounds: self.rounds.clone(),
            chips: self.chips.clone(),
            seats: self.seats.clone(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn config(&self) -> &VenueConfig {
        &self.config
    }

    /// Register an external token contract under its address.
    pub fn register_token(&mut self, token: Box<dyn TokenService>) -> VenueResult<()> {
        let address = token.address().clone();
        if self.tokens.contains_key(&address) {
            return Err(VenueError::TokenAlreadyRegistered(address));
        }
        log::info!("Token {address} registered");
        self.tokens.insert(address, token);
        Ok(())
    }

    pub fn token(&self, address: &Address) -> Option<&dyn TokenService> {
        self.tokens.get(address).map(|t| &**t)
    }

    /// Mutable access for calls made outside the venue (funding, approvals).
    pub fn token_mut(&mut self, address: &Address) -> Option<&mut (dyn TokenService + 'static)> {
        self.tokens.get_mut(address).map(|t| &mut **t)
    }

    fn escrow_token(&mut self, address: &Address) -> VenueResult<&mut (dyn TokenService + 'static)> {
        self.tokens
            .get_mut(address)
            .map(|t| &mut **t)
            .ok_or_else(|| VenueError::UnknownToken(address.clone()))
    }

    pub fn total_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn table(&self, table_id: TableId) -> VenueResult<&Table> {
        self.tables
            .get(table_id)
            .ok_or(VenueError::TableNotFound(table_id))
    }

    pub fn seats(&self, table_id: TableId) -> VenueResult<&[Address]> {
        self.table(table_id)?;
        Ok(self.seats[table_id].occupants())
    }

    pub fn chips(&self, player: &Address, table_id: TableId) -> Amount {
        self.chips.balance(player, table_id)
    }

    /// Sum of ledger entries at a table.
    pub fn chips_total(&self, table_id: TableId) -> Amount {
        self.chips.table_total(table_id)
    }

    pub fn round(&self, table_id: TableId, index: RoundIndex) -> VenueResult<&Round> {
        self.table(table_id)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.rounds[table_id].get(i))
            .ok_or(VenueError::RoundNotFound { round: index })
    }

    pub fn summary(&self, table_id: TableId) -> VenueResult<TableSummary> {
        let table = self.table(table_id)?;
        Ok(TableSummary {
            id: table.id,
            state: table.state,
            current_round: table.current_round,
            seated: self.seats[table_id].occupants().to_vec(),
            max_players: table.max_players,
            escrowed: table.escrowed,
            chips_total: self.chips.table_total(table_id),
        })
    }

    /// Take the buffered events.
    ///
    /// The buffer holds at most `MAX_BUFFERED_EVENTS`. Indexers should drain it
    /// after every round or lose the oldest entries.
    pub fn drain_events(&mut self) -> VecDeque<VenueEvent> {
        self.events.drain()
    }

    /// Create a table
    ///
    /// # Arguments
    ///
    /// * `caller` - Account creating the table
    /// * `buy_in_amount` - Minimum stake
    /// * `points_cost` - Value of one scoring point
    /// * `max_players` - Seat capacity
    /// * `token` - Escrow currency
    ///
    /// # Returns
    ///
    /// * `VenueResult<TableId>` - Index of the new table
    ///
    /// # Errors
    ///
    /// * `VenueError::InvalidPlayerCount` - Capacity outside the configured bounds
    /// * `VenueError::InvalidBuyIn` - Zero stake
    /// * `VenueError::UnknownToken` - Token not registered
    pub fn create_table(
        &mut self,
        caller: &Address,
        buy_in_amount: Amount,
        points_cost: Amount,
        max_players: usize,
        token: &Address,
    ) -> VenueResult<TableId> {
        if !self.config.allows_players(max_players) {
            return Err(VenueError::InvalidPlayerCount {
                requested: max_players,
                min: self.config.min_players,
                max: self.config.max_players,
            });
        }
        if buy_in_amount == 0 {
            return Err(VenueError::InvalidBuyIn);
        }
        if !self.tokens.contains_key(token) {
            return Err(VenueError::UnknownToken(token.clone()));
        }

        let id = self.tables.len();
        self.tables.push(Table {
            id,
            buy_in_amount,
            points_cost,
            max_players,
            state: TableState::Empty,
            current_round: 0,
            token: token.clone(),
            escrowed: 0,
        });
        self.rounds.push(Vec::new());
        self.seats.push(SeatSet::new());

        log::debug!("{caller} created table {id}");
        self.events.emit(VenueEvent::NewTableCreated {
            table_id: id,
            token: token.clone(),
            buy_in_amount,
            points_cost,
            max_players,
        });

        Ok(id)
    }

    /// Take a seat and escrow a stake
    ///
    /// Buying in again while seated only raises the balance.
    ///
    /// # Returns
    ///
    /// * `VenueResult<Amount>` - Caller's chip balance afterwards
    ///
    /// # Errors
    ///
    /// * `VenueError::InsufficientBuyIn` - `amount` below the table's buy-in
    /// * `VenueError::TableFull` - No free seat for a new player
    /// * `VenueError::RoundActive` - New player during dealing
    /// * `VenueError::Token` - Escrow transfer rejected
    pub fn buy_in(
        &mut self,
        caller: &Address,
        table_id: TableId,
        amount: Amount,
    ) -> VenueResult<Amount> {
        let table = self.table(table_id)?;
        if amount < table.buy_in_amount {
            return Err(VenueError::InsufficientBuyIn {
                required: table.buy_in_amount,
                offered: amount,
            });
        }

        let seats = &self.seats[table_id];
        let seated = seats.contains(caller);
        if !seated {
            if seats.is_full(table.max_players) {
                return Err(VenueError::TableFull);
            }
            if table.state == TableState::Dealing {
                return Err(VenueError::RoundActive);
            }
        }

        let balance = self.chips.credited(caller, table_id, amount)?;
        let escrowed = table
            .escrowed
            .checked_add(amount)
            .ok_or(VenueError::ArithmeticOverflow)?;
        let token = table.token.clone();

        self.escrow_in(&token, caller, amount)?;

        if !seated {
            self.seats[table_id].seat(caller);
        }
        self.chips.set(caller, table_id, balance);
        self.tables[table_id].escrowed = escrowed;

        self.events.emit(VenueEvent::BuyIn {
            table_id,
            player: caller.clone(),
            amount,
        });

        Ok(balance)
    }

    /// Top up a seated player's balance
    ///
    /// # Errors
    ///
    /// * `VenueError::NotASeatedPlayer` - Caller has no seat
    /// * `VenueError::InvalidAmount` - Zero amount
    /// * `VenueError::Token` - Escrow transfer rejected
    pub fn add_chips(
        &mut self,
        caller: &Address,
        table_id: TableId,
        amount: Amount,
    ) -> VenueResult<Amount> {
        let table = self.table(table_id)?;
        if !self.seats[table_id].contains(caller) {
            return Err(VenueError::NotASeatedPlayer);
        }
        if amount == 0 {
            return Err(VenueError::InvalidAmount);
        }

        let balance = self.chips.credited(caller, table_id, amount)?;
        let escrowed = table
            .escrowed
            .checked_add(amount)
            .ok_or(VenueError::ArithmeticOverflow)?;
        let token = table.token.clone();

        self.escrow_in(&token, caller, amount)?;

        self.chips.set(caller, table_id, balance);
        self.tables[table_id].escrowed = escrowed;

        self.events.emit(VenueEvent::ChipsAdded {
            table_id,
            player: caller.clone(),
            amount,
        });

        Ok(balance)
    }

    /// Pay out a seated player's balance and free the seat
    ///
    /// Anyone may call this. A caller other than `target` is recorded as a
    /// forced removal.
    ///
    /// # Returns
    ///
    /// * `VenueResult<Amount>` - Amount paid to `target`
    ///
    /// # Errors
    ///
    /// * `VenueError::InvalidExit` - `target` not seated or holding no chips
    /// * `VenueError::RoundActive` - Table is dealing
    /// * `VenueError::Token` - Payout transfer rejected
    pub fn exit_table(
        &mut self,
        caller: &Address,
        table_id: TableId,
        target: &Address,
    ) -> VenueResult<Amount> {
        let table = self.table(table_id)?;
        let balance = self.chips.balance(target, table_id);
        if !self.seats[table_id].contains(target) || balance == 0 {
            return Err(VenueError::InvalidExit(target.clone()));
        }
        if table.state == TableState::Dealing {
            return Err(VenueError::RoundActive);
        }

        let escrowed = table
            .escrowed
            .checked_sub(balance)
            .ok_or(VenueError::ArithmeticOverflow)?;
        let token = table.token.clone();
        let venue = self.address.clone();

        self.escrow_token(&token)?.transfer(&venue, target, balance)?;

        self.chips.take(target, table_id);
        self.seats[table_id].vacate(target);
        let table = &mut self.tables[table_id];
        table.escrowed = escrowed;
        if self.seats[table_id].is_empty() {
            table.state = TableState::Empty;
            log::info!("Table {table_id} emptied, reset to {}", table.state);
        }

        let event = if caller == target {
            VenueEvent::PlayerExited {
                table_id,
                player: target.clone(),
                amount: balance,
            }
        } else {
            VenueEvent::PlayerRemoved {
                table_id,
                player: target.clone(),
                removed_by: caller.clone(),
                amount: balance,
            }
        };
        self.events.emit(event);

        Ok(balance)
    }

    /// Start a round and run the initial deal
    ///
    /// # Returns
    ///
    /// * `VenueResult<RoundIndex>` - Index of the opened round
    ///
    /// # Errors
    ///
    /// * `VenueError::GameInProgress` - Table already dealing
    /// * `VenueError::NotEnoughPlayers` - Fewer than two seats taken
    /// * `VenueError::UndercapitalizedTable` - A seat cannot cover the buy-in
    pub fn deal_cards(&mut self, caller: &Address, table_id: TableId) -> VenueResult<RoundIndex> {
        let table = self.table(table_id)?;
        if table.state == TableState::Dealing {
            return Err(VenueError::GameInProgress);
        }

        let players = self.seats[table_id].occupants().to_vec();
        if players.len() < 2 {
            return Err(VenueError::NotEnoughPlayers {
                seated: players.len(),
            });
        }
        for player in &players {
            let balance = self.chips.balance(player, table_id);
            if balance < table.buy_in_amount {
                return Err(VenueError::UndercapitalizedTable {
                    player: player.clone(),
                    balance,
                    required: table.buy_in_amount,
                });
            }
        }

        let round_index = table.current_round;
        let capacity = table.hand_capacity();
        let schedule = StageSchedule::new(
            table.max_players,
            self.config.initial_deal,
            self.config.extra_stages,
        );
        debug_assert_eq!(self.rounds[table_id].len() as RoundIndex, round_index);

        let mut deck = Deck::shuffled(&mut self.rng);
        let dealt = deal_stage(&mut deck, &players, schedule.stage(0))?;

        let mut hands = BTreeMap::new();
        for (player, cards) in players.iter().zip(&dealt) {
            let mut hand = Hand::with_capacity(capacity);
            hand.fill(cards);
            hands.insert(player.clone(), hand);
        }

        self.rounds[table_id].push(Round {
            index: round_index,
            active: true,
            deal_stage: 0,
            schedule,
            deck,
            hands,
        });
        self.tables[table_id].state = TableState::Dealing;

        log::info!(
            "{caller} dealt round {round_index} at table {table_id} to {} players",
            players.len()
        );
        for (player_index, cards) in dealt.into_iter().enumerate() {
            self.events.emit(VenueEvent::CardsDealt {
                table_id,
                round: round_index,
                cards,
                player_index,
            });
        }

        Ok(round_index)
    }

    /// Run the next dealing stage of the current round
    ///
    /// # Returns
    ///
    /// * `VenueResult<usize>` - Stage number just dealt (1-based)
    ///
    /// # Errors
    ///
    /// * `VenueError::GameNotStarted` - Table not dealing
    /// * `VenueError::DeckExhausted` - All stages already dealt
    /// * `VenueError::HandOverflow` - A hand has no room for the stage
    pub fn new_deal(&mut self, caller: &Address, table_id: TableId) -> VenueResult<usize> {
        let table = self.table(table_id)?;
        if table.state != TableState::Dealing {
            return Err(VenueError::GameNotStarted);
        }
        let round_index = table.current_round;
        let capacity = table.hand_capacity();

        let players = self.seats[table_id].occupants().to_vec();
        let round = self.rounds[table_id]
            .last_mut()
            .ok_or(VenueError::RoundNotFound { round: round_index })?;
        if round.is_fully_dealt() {
            return Err(VenueError::DeckExhausted);
        }

        let stage = round.deal_stage + 1;
        let count = round.schedule.stage(stage);
        for player in &players {
            let (dealt, slots) = round
                .hands
                .get(player)
                .map_or((0, capacity), |hand| (hand.dealt(), hand.capacity()));
            if dealt + count > slots {
                return Err(VenueError::HandOverflow {
                    player: player.clone(),
                    stage,
                });
            }
        }

        let mut deck = round.deck.clone();
        let dealt = deal_stage(&mut deck, &players, count)?;

        round.deck = deck;
        for (player, cards) in players.iter().zip(&dealt) {
            round
                .hands
                .entry(player.clone())
                .or_insert_with(|| Hand::with_capacity(capacity))
                .fill(cards);
        }
        round.deal_stage = stage;

        log::debug!("{caller} dealt stage {stage} of round {round_index} at table {table_id}");
        for (player_index, cards) in dealt.into_iter().enumerate() {
            self.events.emit(VenueEvent::StageDealt {
                table_id,
                round: round_index,
                cards,
                player_index,
                stage,
            });
        }

        Ok(stage)
    }

    /// Settle the current round with an external score
    ///
    /// `points` and `won` hold one entry per seat, in seat order.
    ///
    /// # Returns
    ///
    /// * `VenueResult<RoundIndex>` - Index of the closed round
    ///
    /// # Errors
    ///
    /// * `VenueError::Unauthorized` - Caller is not the owner
    /// * `VenueError::GameNotStarted` - Table not dealing
    /// * `VenueError::DealingIncomplete` - Stages left to deal
    /// * `VenueError::ScoreLengthMismatch` - Score does not cover every seat
    /// * `VenueError::UnbalancedSettlement` - Deltas do not sum to zero
    /// * `VenueError::InsufficientChips` - A loss exceeds a balance
    pub fn end_round(
        &mut self,
        caller: &Address,
        table_id: TableId,
        points: &[u64],
        won: &[bool],
    ) -> VenueResult<RoundIndex> {
        let table = self.table(table_id)?;
        if caller != &self.owner {
            return Err(VenueError::Unauthorized(caller.clone()));
        }
        if table.state != TableState::Dealing {
            return Err(VenueError::GameNotStarted);
        }
        let round_index = table.current_round;
        let round = self.rounds[table_id]
            .last()
            .ok_or(VenueError::RoundNotFound { round: round_index })?;
        if !round.is_fully_dealt() {
            return Err(VenueError::DealingIncomplete {
                stage: round.deal_stage,
                required: round.schedule.max_stages(),
            });
        }

        let players = self.seats[table_id].occupants();
        if points.len() != players.len() || won.len() != players.len() {
            return Err(VenueError::ScoreLengthMismatch {
                seats: players.len(),
                points: points.len(),
                won: won.len(),
            });
        }

        let deltas = self
            .config
            .settlement
            .deltas(points, won, table.points_cost)?;
        let net_delta = net(&deltas).ok_or(VenueError::ArithmeticOverflow)?;
        if net_delta != 0 || deltas.len() != players.len() {
            log::warn!(
                "Table {table_id}: rejected {} settlement of round {round_index}, net {net_delta}",
                self.config.settlement
            );
            return Err(VenueError::UnbalancedSettlement { net: net_delta });
        }

        let signed: Vec<(Address, _)> = players.iter().cloned().zip(deltas).collect();
        let balances = self.chips.preview_deltas(table_id, &signed)?;

        self.chips.commit(table_id, balances);
        if let Some(round) = self.rounds[table_id].last_mut() {
            round.active = false;
        }
        let table = &mut self.tables[table_id];
        table.state = TableState::RoundOver;
        table.current_round += 1;

        self.events.emit(VenueEvent::RoundClosed {
            table_id,
            round: round_index,
        });

        Ok(round_index)
    }

    /// The caller's hand from the current or most recent round
    ///
    /// Hands are only revealed once dealing has finished. A player who joined
    /// after the last round gets an empty hand.
    ///
    /// # Errors
    ///
    /// * `VenueError::NotASeatedPlayer` - Caller has no seat
    /// * `VenueError::RoundActive` - Table is dealing
    /// * `VenueError::NoRoundDealt` - Table never dealt
    pub fn checking_cards(&self, caller: &Address, table_id: TableId) -> VenueResult<Hand> {
        let table = self.table(table_id)?;
        if !self.seats[table_id].contains(caller) {
            return Err(VenueError::NotASeatedPlayer);
        }
        if table.state == TableState::Dealing {
            return Err(VenueError::RoundActive);
        }

        let round = self.rounds[table_id]
            .last()
            .ok_or(VenueError::NoRoundDealt)?;
        Ok(round
            .hands
            .get(caller)
            .cloned()
            .unwrap_or_else(|| Hand::with_capacity(table.hand_capacity())))
    }

    fn escrow_in(&mut self, token: &Address, from: &Address, amount: Amount) -> VenueResult<()> {
        let venue = self.address.clone();
        self.escrow_token(token)?
            .transfer_from(&venue, from, &venue, amount)?;
        Ok(())
    }
}

/// Consistency of one stored table with its rounds and seats.
///
/// Runs before anything derives a hand size from `max_players`.
fn check_table(
    config: &VenueConfig,
    table: &Table,
    rounds: &[Round],
    seats: &SeatSet,
) -> Result<(), String> {
    if !config.allows_players(table.max_players) {
        return Err(format!(
            "has capacity {} outside {}..={}",
            table.max_players, config.min_players, config.max_players
        ));
    }
    if seats.len() > table.max_players {
        return Err(format!(
            "seats {} players with capacity {}",
            seats.len(),
            table.max_players
        ));
    }

    let dealing = table.state == TableState::Dealing;
    let expected = table.current_round.saturating_add(RoundIndex::from(dealing));
    if rounds.len() as RoundIndex != expected {
        return Err(format!(
            "holds {} rounds, expected {expected} in state {}",
            rounds.len(),
            table.state
        ));
    }

    let capacity = table.hand_capacity();
    let last = rounds.len().saturating_sub(1);
    for (position, round) in rounds.iter().enumerate() {
        if round.index != position as RoundIndex {
            return Err(format!("has round {} at position {position}", round.index));
        }
        if round.active != (dealing && position == last) {
            return Err(format!(
                "round {position} active flag {} disagrees with state {}",
                round.active, table.state
            ));
        }
        if round.schedule.total() != capacity || round.deal_stage > round.schedule.max_stages() {
            return Err(format!(
                "round {position} schedule does not fit hand capacity {capacity}"
            ));
        }
        if !round.deck.is_intact() {
            return Err(format!("round {position} deck is damaged"));
        }
        if let Some((player, _)) = round.hands.iter().find(|(_, hand)| hand.capacity() != capacity) {
            return Err(format!(
                "round {position} hand of {player} does not match capacity {capacity}"
            ));
        }
    }
    Ok(())
}

/// Draw `count` cards per player, in seat order.
fn deal_stage(deck: &mut Deck, players: &[Address], count: usize) -> VenueResult<Vec<Vec<Card>>> {
    if deck.remaining() < count * players.len() {
        return Err(VenueError::DeckExhausted);
    }
    players
        .iter()
        .map(|_| deck.draw(count).ok_or(VenueError::DeckExhausted))
        .collect()
}

//! Bounded audit stream of venue events.

use super::{
    cards::Card,
    models::{RoundIndex, TableId},
};
use crate::account::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

/// One event per state-changing operation (one per player for deals).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum VenueEvent {
    NewTableCreated {
        table_id: TableId,
        token: Address,
        buy_in_amount: Amount,
        points_cost: Amount,
        max_players: usize,
    },
    BuyIn {
        table_id: TableId,
        player: Address,
        amount: Amount,
    },
    /// Initial deal of a round
    CardsDealt {
        table_id: TableId,
        round: RoundIndex,
        cards: Vec<Card>,
        player_index: usize,
    },
    /// A later `newDeal` stage
    StageDealt {
        table_id: TableId,
        round: RoundIndex,
        cards: Vec<Card>,
        player_index: usize,
        stage: usize,
    },
    ChipsAdded {
        table_id: TableId,
        player: Address,
        amount: Amount,
    },
    RoundClosed {
        table_id: TableId,
        round: RoundIndex,
    },
    /// Player left on their own
    PlayerExited {
        table_id: TableId,
        player: Address,
        amount: Amount,
    },
    /// Player removed by someone else
    PlayerRemoved {
        table_id: TableId,
        player: Address,
        removed_by: Address,
        amount: Amount,
    },
}

impl VenueEvent {
    pub fn table_id(&self) -> TableId {
        match self {
            Self::NewTableCreated { table_id, .. }
            | Self::BuyIn { table_id, .. }
            | Self::CardsDealt { table_id, .. }
            | Self::StageDealt { table_id, .. }
            | Self::ChipsAdded { table_id, .. }
            | Self::RoundClosed { table_id, .. }
            | Self::PlayerExited { table_id, .. }
            | Self::PlayerRemoved { table_id, .. } => *table_id,
        }
    }
}

impl fmt::Display for VenueEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NewTableCreated {
                table_id,
                token,
                buy_in_amount,
                points_cost,
                max_players,
            } => format!(
                "table {table_id} created: token {token}, buy-in {buy_in_amount}, point {points_cost}, {max_players} seats"
            ),
            Self::BuyIn {
                table_id,
                player,
                amount,
            } => format!("{player} bought in for {amount} at table {table_id}"),
            Self::CardsDealt {
                table_id,
                round,
                cards,
                player_index,
            } => format!(
                "table {table_id} round {round}: dealt {} cards to seat {player_index}",
                cards.len()
            ),
            Self::StageDealt {
                table_id,
                round,
                cards,
                player_index,
                stage,
            } => format!(
                "table {table_id} round {round} stage {stage}: dealt {} cards to seat {player_index}",
                cards.len()
            ),
            Self::ChipsAdded {
                table_id,
                player,
                amount,
            } => format!("{player} added {amount} at table {table_id}"),
            Self::RoundClosed { table_id, round } => {
                format!("table {table_id} round {round} closed")
            }
            Self::PlayerExited {
                table_id,
                player,
                amount,
            } => format!("{player} left table {table_id} with {amount}"),
            Self::PlayerRemoved {
                table_id,
                player,
                removed_by,
                amount,
            } => format!("{player} removed from table {table_id} by {removed_by}, paid {amount}"),
        };
        write!(f, "{repr}")
    }
}

/// Events kept before the oldest are discarded.
pub const MAX_BUFFERED_EVENTS: usize = 10_000;

/// Buffered event stream. Events are logged as they are emitted and kept until
/// drained by an indexer.
///
/// The buffer is bounded. Callers must drain it regularly (once per round is
/// enough); past `limit` the oldest event is dropped and counted, and it
/// survives only in the log output.
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<VenueEvent>,
    limit: usize,
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_limit(MAX_BUFFERED_EVENTS)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    pub fn emit(&mut self, event: VenueEvent) {
        log::info!("{event}");
        if self.events.len() >= self.limit {
            self.events.pop_front();
            if self.dropped == 0 {
                log::warn!("Event buffer full at {} events, dropping oldest", self.limit);
            }
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> VecDeque<VenueEvent> {
        if self.dropped > 0 {
            log::warn!("{} events dropped before drain", self.dropped);
            self.dropped = 0;
        }
        std::mem::take(&mut self.events)
    }

    /// Events discarded since the last drain.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VenueEvent> {
        self.events.iter()
    }
}

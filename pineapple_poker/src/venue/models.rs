//! Venue data models.

use super::cards::{DECK_SIZE, Deck, Hand, StageSchedule};
use crate::account::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Table ID type. Tables are numbered densely from 0.
pub type TableId = usize;

/// Round index within a table.
pub type RoundIndex = u64;

/// Table lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    /// No round in progress. Seats may be vacant or waiting for a deal.
    #[default]
    Empty,
    /// Cards are being dealt.
    Dealing,
    /// The last round was settled. The next `dealCards` starts a new round.
    RoundOver,
}

impl std::fmt::Display for TableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableState::Empty => write!(f, "empty"),
            TableState::Dealing => write!(f, "dealing"),
            TableState::RoundOver => write!(f, "round_over"),
        }
    }
}

/// Table model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    /// Minimum stake, fixed at creation
    pub buy_in_amount: Amount,
    /// Value of one scoring point, fixed at creation
    pub points_cost: Amount,
    /// Seat capacity, fixed at creation
    pub max_players: usize,
    pub state: TableState,
    pub current_round: RoundIndex,
    /// Escrow currency, fixed at creation
    pub token: Address,
    /// Tokens held in custody for this table
    pub escrowed: Amount,
}

impl Table {
    /// Per-player share of the deck.
    pub fn hand_capacity(&self) -> usize {
        DECK_SIZE / self.max_players
    }
}

/// One deal-to-settlement cycle of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub index: RoundIndex,
    /// Dealing in progress
    pub active: bool,
    /// `newDeal` stages completed after the initial deal
    pub deal_stage: usize,
    pub schedule: StageSchedule,
    pub(crate) deck: Deck,
    pub hands: BTreeMap<Address, Hand>,
}

impl Round {
    pub fn is_fully_dealt(&self) -> bool {
        self.deal_stage >= self.schedule.max_stages()
    }
}

/// Snapshot of a table for discovery and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub id: TableId,
    pub state: TableState,
    pub current_round: RoundIndex,
    pub seated: Vec<Address>,
    pub max_players: usize,
    pub escrowed: Amount,
    pub chips_total: Amount,
}

//! Persisted venue state.
//!
//! Field order is the storage layout. Later versions may only append fields
//! after the existing ones, each with `#[serde(default)]` so older snapshots
//! keep loading. Existing fields are never reordered or narrowed.

use super::{
    config::VenueConfig,
    errors::VenueResult,
    ledger::ChipLedger,
    models::{Round, Table},
    seats::SeatSet,
};
use crate::account::Address;
use serde::{Deserialize, Serialize};

/// Current storage layout version.
pub const STORAGE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueStorage {
    pub version: u32,
    pub owner: Address,
    pub address: Address,
    pub config: VenueConfig,
    /// Table list
    pub tables: Vec<Table>,
    /// Per-table round list, hands included
    pub rounds: Vec<Vec<Round>>,
    /// Per-(player, table) chip ledger
    pub chips: ChipLedger,
    /// Per-table seat set
    pub seats: Vec<SeatSet>,
}

impl VenueStorage {
    pub fn to_json(&self) -> VenueResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> VenueResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

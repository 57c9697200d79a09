//! Chip ledger: per-(player, table) balances of escrowed value.
//!
//! The ledger only does accounting. Token custody happens in the venue, which
//! pairs every deposit and withdrawal here with a token transfer. Settlement
//! moves value between entries and never moves tokens.

use super::{
    errors::{VenueError, VenueResult},
    models::TableId,
};
use crate::account::{Address, Amount, SignedAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipLedger {
    balances: BTreeMap<TableId, BTreeMap<Address, Amount>>,
}

impl ChipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, player: &Address, table_id: TableId) -> Amount {
        self.balances
            .get(&table_id)
            .and_then(|entries| entries.get(player))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all entries for a table.
    pub fn table_total(&self, table_id: TableId) -> Amount {
        self.balances
            .get(&table_id)
            .map(|entries| entries.values().sum())
            .unwrap_or(0)
    }

    /// Balance after crediting `amount`, without writing it.
    pub fn credited(&self, player: &Address, table_id: TableId, amount: Amount) -> VenueResult<Amount> {
        self.balance(player, table_id)
            .checked_add(amount)
            .ok_or(VenueError::ArithmeticOverflow)
    }

    pub(crate) fn set(&mut self, player: &Address, table_id: TableId, balance: Amount) {
        let entries = self.balances.entry(table_id).or_default();
        if balance == 0 {
            entries.remove(player);
        } else {
            entries.insert(player.clone(), balance);
        }
    }

    /// Zero a player's entry and return what it held.
    pub(crate) fn take(&mut self, player: &Address, table_id: TableId) -> Amount {
        self.balances
            .get_mut(&table_id)
            .and_then(|entries| entries.remove(player))
            .unwrap_or(0)
    }

    /// New balances after applying signed `deltas`, without writing them.
    ///
    /// # Errors
    ///
    /// * `VenueError::InsufficientChips` - A loss exceeds the player's balance
    /// * `VenueError::ArithmeticOverflow` - A gain overflows
    pub fn preview_deltas(
        &self,
        table_id: TableId,
        deltas: &[(Address, SignedAmount)],
    ) -> VenueResult<Vec<(Address, Amount)>> {
        deltas
            .iter()
            .map(|(player, delta)| {
                let balance = self.balance(player, table_id);
                let magnitude = delta.unsigned_abs();
                let updated = if *delta >= 0 {
                    balance
                        .checked_add(magnitude)
                        .ok_or(VenueError::ArithmeticOverflow)?
                } else {
                    balance
                        .checked_sub(magnitude)
                        .ok_or_else(|| VenueError::InsufficientChips {
                            player: player.clone(),
                            balance,
                            loss: magnitude,
                        })?
                };
                Ok((player.clone(), updated))
            })
            .collect()
    }

    /// Write balances produced by [`ChipLedger::preview_deltas`].
    pub(crate) fn commit(&mut self, table_id: TableId, balances: Vec<(Address, Amount)>) {
        for (player, balance) in balances {
            self.set(&player, table_id, balance);
        }
    }
}

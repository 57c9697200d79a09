//! Seat registry for a single table.

use crate::account::Address;
use serde::{Deserialize, Serialize};

/// Ordered set of seated addresses. Seat order is buy-in order and is the
/// player index used in deal events and score sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSet {
    occupants: Vec<Address>,
}

impl SeatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, player: &Address) -> bool {
        self.occupants.contains(player)
    }

    pub fn position(&self, player: &Address) -> Option<usize> {
        self.occupants.iter().position(|p| p == player)
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn is_full(&self, capacity: usize) -> bool {
        self.occupants.len() >= capacity
    }

    pub fn occupants(&self) -> &[Address] {
        &self.occupants
    }

    /// Seat `player` at the end. Returns `false` if already seated.
    pub(crate) fn seat(&mut self, player: &Address) -> bool {
        if self.contains(player) {
            return false;
        }
        self.occupants.push(player.clone());
        true
    }

    /// Remove `player`, keeping everyone else's order. Returns `false` if absent.
    pub(crate) fn vacate(&mut self, player: &Address) -> bool {
        match self.position(player) {
            Some(idx) => {
                self.occupants.remove(idx);
                true
            }
            None => false,
        }
    }
}

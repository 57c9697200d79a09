//! Venue module: tables, seats, chip ledger, staged dealing, and settlement.
//!
//! This module implements:
//! - Table lifecycle state machine (Empty → Dealing → RoundOver → Empty)
//! - Seat registry with bounded capacity
//! - Chip ledger over token escrow, with fund conservation per table
//! - Staged dealing from a per-round deck, no card dealt twice
//! - Zero-sum settlement of externally scored rounds
//!
//! ## Example
//!
//! ```
//! use pineapple_poker::account::{Address, units};
//! use pineapple_poker::token::{StandardToken, TokenService};
//! use pineapple_poker::venue::{Venue, VenueConfig};
//!
//! let owner = Address::new("owner");
//! let venue_address = Address::new("venue");
//! let token_address = Address::new("ppt");
//!
//! let mut token = StandardToken::new(token_address.clone(), "Pineapple", "PPT", &owner, units(100, 18));
//! for name in ["alice", "bob"] {
//!     let player = Address::new(name);
//!     token.transfer(&owner, &player, units(10, 18)).unwrap();
//!     token.approve(&player, &venue_address, units(10, 18)).unwrap();
//! }
//!
//! let mut venue = Venue::initialize(VenueConfig::default(), venue_address, owner.clone()).unwrap();
//! venue.register_token(Box::new(token)).unwrap();
//!
//! let table = venue.create_table(&owner, units(10, 18), units(1, 17), 3, &token_address).unwrap();
//! venue.buy_in(&Address::new("alice"), table, units(10, 18)).unwrap();
//! venue.buy_in(&Address::new("bob"), table, units(10, 18)).unwrap();
//!
//! venue.deal_cards(&owner, table).unwrap();
//! for _ in 0..4 {
//!     venue.new_deal(&owner, table).unwrap();
//! }
//! venue.end_round(&owner, table, &[7, 7], &[true, false]).unwrap();
//!
//! assert_eq!(venue.chips(&Address::new("alice"), table), 10_700_000_000_000_000_000);
//! ```

pub mod cards;
pub mod config;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod manager;
pub mod models;
pub mod seats;
pub mod settlement;
pub mod storage;

pub use cards::{Card, DECK_SIZE, Deck, Hand, StageSchedule, Suit};
pub use config::{ConfigError, VenueConfig};
pub use errors::{VenueError, VenueResult};
pub use events::{EventLog, MAX_BUFFERED_EVENTS, VenueEvent};
pub use manager::Venue;
pub use models::{Round, RoundIndex, Table, TableId, TableState, TableSummary};
pub use settlement::{Pairwise, Pooled, Settlement, SettlementStrategy};
pub use storage::{STORAGE_VERSION, VenueStorage};

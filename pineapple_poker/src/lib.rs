//! # Pineapple Poker
//!
//! A multiplayer card-game venue with escrowed chips and staged dealing.
//!
//! Players buy into a table with a fungible token. The venue holds their stake
//! in escrow and tracks it on a per-table chip ledger. Cards are dealt from a
//! shuffled per-round deck over several stages. An external scorer settles
//! each round with a zero-sum adjustment of the ledger. Players leave with
//! their current balance.
//!
//! ## Core Modules
//!
//! - [`venue`]: Table state machine, seats, chip ledger, dealing, settlement
//! - [`token`]: The fungible-token collaborator used for escrow
//! - [`account`]: Addresses and fixed-point token amounts
//!
//! The shuffle uses a cryptographically secure RNG seeded from the OS. Callers
//! cannot predict or steer the deck. The operator of the process can, for
//! example by configuring a fixed seed.

pub mod account;
pub mod token;
pub mod venue;

pub use account::{Address, Amount};
pub use venue::{Venue, VenueConfig, VenueError, VenueEvent, VenueResult};

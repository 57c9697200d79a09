//! Fungible-token collaborator used for table escrow.
//!
//! The venue never defines token semantics itself. It only calls the
//! operations of [`TokenService`] and trusts their error conventions:
//! every failure is an `Err`, never a `false` return that could be ignored.
//!
//! [`StandardToken`] is an in-memory implementation with a fixed supply minted
//! to its deployer, suitable for simulations and tests.
//!
//! ## Example
//!
//! ```
//! use pineapple_poker::account::{Address, units};
//! use pineapple_poker::token::{StandardToken, TokenService};
//!
//! let deployer = Address::new("deployer");
//! let mut token = StandardToken::new(
//!     Address::new("token"),
//!     "Pineapple Poker Token",
//!     "PPT",
//!     &deployer,
//!     units(100, 18),
//! );
//!
//! token.transfer(&deployer, &Address::new("alice"), units(10, 18)).unwrap();
//! assert_eq!(token.balance_of(&Address::new("alice")), units(10, 18));
//! ```

pub mod errors;
pub mod service;
pub mod standard;

pub use errors::{TokenError, TokenResult};
pub use service::TokenService;
pub use standard::StandardToken;

//! Venue error types.
//!
//! Every variant is an abort: the operation that returned it changed nothing.
//! The `Display` text doubles as the user-visible failure reason.

use super::{
    config::ConfigError,
    models::{RoundIndex, TableId},
};
use crate::{
    account::{Address, Amount, SignedAmount},
    token::TokenError,
};
use thiserror::Error;

/// Venue errors
#[derive(Debug, Error)]
pub enum VenueError {
    /// No table with this index
    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    /// Seat capacity outside the configured bounds
    #[error("Invalid number of players")]
    InvalidPlayerCount { requested: usize, min: usize, max: usize },

    /// Tables need a non-zero stake
    #[error("Buy-in amount must be positive")]
    InvalidBuyIn,

    /// Zero top-up
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Token contract not registered with the venue
    #[error("Unknown token: {0}")]
    UnknownToken(Address),

    #[error("Token already registered: {0}")]
    TokenAlreadyRegistered(Address),

    /// Offered stake below the table's buy-in
    #[error("Insufficient buy-in: required {required}, offered {offered}")]
    InsufficientBuyIn { required: Amount, offered: Amount },

    #[error("Table is full")]
    TableFull,

    #[error("Not a seated player")]
    NotASeatedPlayer,

    /// Exit target not seated or holding no chips
    #[error("Invalid exit for {0}")]
    InvalidExit(Address),

    /// Operation not allowed while cards are being dealt
    #[error("Round is active")]
    RoundActive,

    #[error("Game already in progress")]
    GameInProgress,

    #[error("Game not started")]
    GameNotStarted,

    #[error("Need at least 2 players, have {seated}")]
    NotEnoughPlayers { seated: usize },

    /// A seated player cannot cover the stake
    #[error("Table is undercapitalized: {player} holds {balance}, buy-in is {required}")]
    UndercapitalizedTable {
        player: Address,
        balance: Amount,
        required: Amount,
    },

    /// All dealing stages already ran
    #[error("Deck exhausted")]
    DeckExhausted,

    /// A stage would deal past a hand's slots
    #[error("Hand of {player} has no room for stage {stage}")]
    HandOverflow { player: Address, stage: usize },

    #[error("Dealing incomplete: stage {stage} of {required}")]
    DealingIncomplete { stage: usize, required: usize },

    #[error("No round has been dealt at this table")]
    NoRoundDealt,

    #[error("Caller {0} is not authorized")]
    Unauthorized(Address),

    /// Score sequences must have one entry per seat
    #[error("Score length mismatch: {seats} seats, {points} points, {won} flags")]
    ScoreLengthMismatch {
        seats: usize,
        points: usize,
        won: usize,
    },

    /// Settlement deltas would mint or burn chips
    #[error("Settlement is not zero-sum: net {net}")]
    UnbalancedSettlement { net: SignedAmount },

    /// A loss would drive a balance below zero
    #[error("Insufficient chips for {player}: balance {balance}, loss {loss}")]
    InsufficientChips {
        player: Address,
        balance: Amount,
        loss: Amount,
    },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Unsupported storage version {found}, expected at most {supported}")]
    UnsupportedStorageVersion { found: u32, supported: u32 },

    #[error("Corrupt storage: {0}")]
    CorruptStorage(String),

    #[error("Storage encoding error: {0}")]
    Storage(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Escrow transfer rejected by the token
    #[error("Token transfer failed: {0}")]
    Token(#[from] TokenError),

    #[error("Round {round} not found")]
    RoundNotFound { round: RoundIndex },
}

impl VenueError {
    /// Failure reason safe to show to the caller.
    ///
    /// Storage and token internals are summarized rather than echoed.
    pub fn client_message(&self) -> String {
        match self {
            VenueError::Storage(_) | VenueError::CorruptStorage(_) => {
                "Internal storage error".to_string()
            }
            VenueError::Token(_) => "Token transfer failed".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for venue operations
pub type VenueResult<T> = Result<T, VenueError>;

//! Token error types.

use crate::account::{Address, Amount};
use thiserror::Error;

/// Token errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Holder does not own enough tokens
    #[error("Insufficient balance for {holder}: available {available}, required {required}")]
    InsufficientBalance {
        holder: Address,
        available: Amount,
        required: Amount,
    },

    /// Spender was not approved for enough tokens
    #[error(
        "Insufficient allowance for {spender} on {owner}: available {available}, required {required}"
    )]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: Amount,
        required: Amount,
    },

    /// Transfer to an empty address
    #[error("Invalid recipient")]
    InvalidRecipient,

    /// Credit would overflow the recipient balance
    #[error("Balance overflow")]
    BalanceOverflow,
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;

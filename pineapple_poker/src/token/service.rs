//! The value-transfer interface the venue consumes.

use super::errors::TokenResult;
use crate::account::{Address, Amount};
use std::fmt;

/// Standard value-transfer contract.
///
/// Calls are made on behalf of an explicit account (`from`, `owner`, `spender`)
/// because there is no ambient message sender outside a chain.
pub trait TokenService: fmt::Debug {
    /// Contract address the token is registered under.
    fn address(&self) -> &Address;

    fn balance_of(&self, holder: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> TokenResult<()>;

    /// Move `amount` from `from` to `to` using the allowance `from` granted `spender`.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TokenResult<()>;

    /// Set the allowance of `spender` over `owner`'s tokens.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<()>;
}

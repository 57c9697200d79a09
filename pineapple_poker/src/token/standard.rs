//! In-memory standard token with a fixed supply.

use super::{
    errors::{TokenError, TokenResult},
    service::TokenService,
};
use crate::account::{Address, Amount, TOKEN_DECIMALS};
use std::collections::HashMap;

/// Fixed-supply fungible token. The whole supply is minted to the deployer.
#[derive(Debug, Clone)]
pub struct StandardToken {
    address: Address,
    name: String,
    symbol: String,
    decimals: u32,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl StandardToken {
    /// Deploy a new token
    ///
    /// # Arguments
    ///
    /// * `address` - Contract address of the token
    /// * `name` - Human-readable name
    /// * `symbol` - Ticker symbol
    /// * `deployer` - Account receiving the initial supply
    /// * `initial_supply` - Supply in base units
    pub fn new(
        address: Address,
        name: &str,
        symbol: &str,
        deployer: &Address,
        initial_supply: Amount,
    ) -> Self {
        let mut balances = HashMap::new();
        balances.insert(deployer.clone(), initial_supply);

        log::debug!("Token {symbol} deployed at {address} with supply {initial_supply}");

        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: TOKEN_DECIMALS,
            total_supply: initial_supply,
            balances,
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> TokenResult<()> {
        if to.as_str().is_empty() {
            return Err(TokenError::InvalidRecipient);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                holder: from.clone(),
                available,
                required: amount,
            });
        }

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::BalanceOverflow)?;

        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}

impl TokenService for StandardToken {
    fn address(&self) -> &Address {
        &self.address
    }

    fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> TokenResult<()> {
        self.move_balance(from, to, amount)?;
        log::debug!("{}: {from} -> {to} {amount}", self.symbol);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TokenResult<()> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                available: allowed,
                required: amount,
            });
        }

        self.move_balance(from, to, amount)?;
        self.allowances
            .insert((from.clone(), spender.clone()), allowed - amount);

        log::debug!(
            "{}: {from} -> {to} {amount} (spent by {spender})",
            self.symbol
        );
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<()> {
        if spender.as_str().is_empty() {
            return Err(TokenError::InvalidRecipient);
        }
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }
}

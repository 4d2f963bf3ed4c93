//! Pool-share bookkeeping.
//!
//! Tracks per-owner share balances and the total supply.  The first mint
//! permanently locks [`MINIMUM_LIQUIDITY`] shares at [`Address::ZERO`], so
//! the supply of an initialised pair can never return to zero and the
//! share price ratio stays well defined.

use std::collections::BTreeMap;

use crate::domain::{Address, PoolEvent, Shares};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Shares locked forever by the first deposit.
pub const MINIMUM_LIQUIDITY: Shares = Shares::new(1_000);

/// Share balances and supply of one pair.
///
/// Every mutation records a [`PoolEvent::Transfer`], drained with
/// [`take_transfers`](Self::take_transfers).  All methods validate before
/// mutating, so an `Err` leaves the ledger untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    balances: BTreeMap<Address, Shares>,
    total_supply: Shares,
    transfers: Vec<PoolEvent>,
}

impl ShareLedger {
    /// Creates an empty, uninitialised ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outstanding share supply, locked shares included.
    pub const fn total_supply(&self) -> Shares {
        self.total_supply
    }

    /// Returns `true` once the first mint has happened.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        !self.total_supply.is_zero()
    }

    /// Returns `owner`'s share balance.
    pub fn balance_of(&self, owner: &Address) -> Shares {
        self.balances.get(owner).copied().unwrap_or(Shares::ZERO)
    }

    /// Issues `amount` new shares to `to`.
    ///
    /// On the very first mint [`MINIMUM_LIQUIDITY`] extra shares are issued
    /// to [`Address::ZERO`] before `to` is credited.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply would exceed `u128`.
    pub fn mint(&mut self, to: Address, amount: Shares) -> Result<(), AmmError> {
        let lock = if self.is_initialized() {
            Shares::ZERO
        } else {
            MINIMUM_LIQUIDITY
        };
        let supply = self.total_supply.safe_add(&lock)?.safe_add(&amount)?;
        // `to` may itself be the zero address; credit the lock first.
        let locked_balance = self.balance_of(&Address::ZERO).safe_add(&lock)?;
        let to_balance = if to.is_zero() {
            locked_balance.safe_add(&amount)?
        } else {
            self.balance_of(&to).safe_add(&amount)?
        };

        if !lock.is_zero() {
            self.balances.insert(Address::ZERO, locked_balance);
            self.record(Address::ZERO, Address::ZERO, lock);
        }
        self.store(to, to_balance);
        self.total_supply = supply;
        self.record(Address::ZERO, to, amount);
        Ok(())
    }

    /// Destroys `amount` of `from`'s shares.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if `from` is the locked zero address.
    /// - [`AmmError::InsufficientBalance`] if `from` holds fewer than
    ///   `amount` shares.
    pub fn burn(&mut self, from: Address, amount: Shares) -> Result<(), AmmError> {
        if from.is_zero() {
            return Err(AmmError::Forbidden("locked shares cannot be burned"));
        }
        let balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        let supply = self.total_supply.safe_sub(&amount)?;

        self.store(from, balance);
        self.total_supply = supply;
        self.record(from, Address::ZERO, amount);
        Ok(())
    }

    /// Moves `amount` shares from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if `from` is the locked zero address.
    /// - [`AmmError::InsufficientBalance`] if `from` holds fewer than
    ///   `amount` shares.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Shares) -> Result<(), AmmError> {
        if from.is_zero() {
            return Err(AmmError::Forbidden("locked shares cannot be transferred"));
        }
        let from_balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;

        if from != to {
            let to_balance = self.balance_of(&to).safe_add(&amount)?;
            self.store(from, from_balance);
            self.store(to, to_balance);
        }
        self.record(from, to, amount);
        Ok(())
    }

    /// Drains the transfer notifications recorded since the last call.
    pub fn take_transfers(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.transfers)
    }

    fn store(&mut self, owner: Address, balance: Shares) {
        if balance.is_zero() {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, balance);
        }
    }

    fn record(&mut self, from: Address, to: Address, amount: Shares) {
        self.transfers.push(PoolEvent::Transfer { from, to, amount });
    }
}

//! In-process multi-asset ledger.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::AssetCustody;

/// A minimal fungible-asset ledger keyed by `(token, owner)`.
///
/// Serves as the custody substrate for simulations and tests.  Zero
/// balances are not stored.
///
/// # Examples
///
/// ```
/// use reservoir_amm::custody::TokenLedger;
/// use reservoir_amm::domain::{Address, Amount};
/// use reservoir_amm::traits::AssetCustody;
///
/// let token = Address::from_bytes([1u8; 32]);
/// let alice = Address::from_bytes([2u8; 32]);
/// let bob = Address::from_bytes([3u8; 32]);
///
/// let mut ledger = TokenLedger::new();
/// ledger.mint(&token, &alice, Amount::new(100)).expect("mint");
/// ledger.transfer(&token, &alice, &bob, Amount::new(40)).expect("transfer");
/// assert_eq!(ledger.balance_of(&token, &bob), Amount::new(40));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    balances: BTreeMap<(Address, Address), Amount>,
    supplies: BTreeMap<Address, Amount>,
}

impl TokenLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `amount` new units of `token` owned by `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance or the token's total
    /// supply would exceed `u128`.
    pub fn mint(&mut self, token: &Address, to: &Address, amount: Amount) -> Result<(), AmmError> {
        let supply = self.total_supply(token).safe_add(&amount)?;
        let balance = self.balance_of(token, to).safe_add(&amount)?;
        self.supplies.insert(*token, supply);
        self.store(token, to, balance);
        Ok(())
    }

    /// Returns the total minted supply of `token`.
    #[must_use]
    pub fn total_supply(&self, token: &Address) -> Amount {
        self.supplies.get(token).copied().unwrap_or(Amount::ZERO)
    }

    fn store(&mut self, token: &Address, owner: &Address, balance: Amount) {
        if balance.is_zero() {
            self.balances.remove(&(*token, *owner));
        } else {
            self.balances.insert((*token, *owner), balance);
        }
    }
}

impl AssetCustody for TokenLedger {
    fn balance_of(&self, token: &Address, owner: &Address) -> Amount {
        self.balances
            .get(&(*token, *owner))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let from_balance = self
            .balance_of(token, from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(token, to).safe_add(&amount)?;
        self.store(token, from, from_balance);
        self.store(token, to, to_balance);
        Ok(())
    }
}

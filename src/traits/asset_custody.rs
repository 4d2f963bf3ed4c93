//! Fungible-asset custody seam.
//!
//! The pair never holds token balances itself.  It reads what it owns and
//! moves assets through an [`AssetCustody`] implementation supplied by the
//! host: an in-process [`TokenLedger`](crate::custody::TokenLedger), a
//! simulator, or an adapter onto a real ledger.

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Balance queries and transfers of fungible assets.
///
/// # Contract
///
/// - `transfer` is all-or-nothing: an `Err` leaves every balance unchanged.
/// - A transfer of `amount` from `from` to `to` followed by a transfer of
///   the same `amount` from `to` back to `from` must succeed and restore
///   both balances.  The pair relies on this to undo an aborted operation.
/// - A failed transfer aborts the enclosing pair operation.
pub trait AssetCustody {
    /// Returns `owner`'s balance of `token`.
    fn balance_of(&self, token: &Address, owner: &Address) -> Amount;

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    /// - [`AmmError::TransferFailed`] for any implementation-specific refusal.
    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError>;
}

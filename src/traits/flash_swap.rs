//! Flash-swap callback seam.

use super::AssetCustody;
use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Receiver of a flash swap.
///
/// When [`Pair::swap`](crate::pair::Pair::swap) is called with non-empty
/// callback data, the requested outputs are transferred first and then
/// [`on_flash_swap`](Self::on_flash_swap) runs.  The callee must leave the
/// pair holding enough input for the fee-adjusted invariant check, which
/// runs only after the callback returns.
///
/// `custody` is the same journaled view the pair uses, so any transfer the
/// callee performs is undone if the swap later aborts.  Any attempt to
/// re-enter the pair from inside the callback fails with
/// [`AmmError::Locked`].
pub trait FlashSwapCallee {
    /// Invoked once per flash swap, after the optimistic transfer.
    ///
    /// # Errors
    ///
    /// Any error aborts the swap and is returned to the swap's caller.
    fn on_flash_swap(
        &mut self,
        sender: Address,
        amount_a_out: Amount,
        amount_b_out: Amount,
        data: &[u8],
        custody: &mut dyn AssetCustody,
    ) -> Result<(), AmmError>;
}

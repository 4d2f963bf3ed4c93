//! Collaborator seams consumed by the settlement core.
//!
//! [`AssetCustody`] abstracts the fungible-asset ledger the pair reads
//! balances from and transfers through; [`FlashSwapCallee`] is the
//! recipient-side callback of an optimistic swap.

mod asset_custody;
mod flash_swap;

pub use asset_custody::AssetCustody;
pub use flash_swap::FlashSwapCallee;

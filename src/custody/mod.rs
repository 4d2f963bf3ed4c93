//! Custody substrates.
//!
//! - [`TokenLedger`]: in-process [`AssetCustody`](crate::traits::AssetCustody)
//!   used by simulations and tests.
//! - [`Journal`]: records transfers so an aborted pair operation can undo
//!   them.

mod in_memory;
mod journal;

pub use in_memory::TokenLedger;
pub use journal::Journal;

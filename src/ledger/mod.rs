//! Pool-share ledger.

mod share_ledger;

pub use share_ledger::{ShareLedger, MINIMUM_LIQUIDITY};

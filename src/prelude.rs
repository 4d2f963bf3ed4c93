//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use reservoir_amm::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, CallContext, PoolEvent, Shares, Side, TokenPair, U112,
};

pub use crate::traits::{AssetCustody, FlashSwapCallee};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{FactoryConfig, PairConfig};

pub use crate::custody::{Journal, TokenLedger};

pub use crate::ledger::MINIMUM_LIQUIDITY;

pub use crate::oracle::{average_price, AveragePrice, PriceObservation};

pub use crate::pair::{BurnOutcome, MintOutcome, Pair, SkimOutcome, SwapOutcome, SwapRequest};

pub use crate::factory::PairFactory;

pub use crate::error::{AmmError, Result};

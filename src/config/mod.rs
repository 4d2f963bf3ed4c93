//! Pair and factory configuration.
//!
//! [`PairConfig`] carries the fee schedule and governance addresses of a
//! single pair; [`FactoryConfig`] carries the defaults new pairs inherit and
//! the owner allowed to change them.  Both validate their fee bounds on
//! construction and on every governance update.

mod factory_config;
mod pair_config;

pub use factory_config::FactoryConfig;
pub use pair_config::{PairConfig, MAX_PLATFORM_FEE, MAX_SWAP_FEE};

//! Swap-fee quotes, the fee-adjusted invariant check and the platform-fee
//! growth formula.

mod fee_engine;

pub use fee_engine::{
    amount_in, amount_out, check_invariant, platform_fee_shares, ACCURACY,
};

//! Results returned by successful pair operations.

use crate::domain::{Amount, Shares};

/// Result of [`Pair::mint`](super::Pair::mint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintOutcome {
    /// Shares issued to the recipient.
    pub liquidity: Shares,
    /// Deposited amount of asset A.
    pub amount_a: Amount,
    /// Deposited amount of asset B.
    pub amount_b: Amount,
    /// Shares minted to the platform-fee recipient before the deposit.
    pub platform_fee: Shares,
}

/// Result of [`Pair::burn`](super::Pair::burn).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnOutcome {
    /// Shares destroyed.
    pub liquidity: Shares,
    /// Withdrawn amount of asset A.
    pub amount_a: Amount,
    /// Withdrawn amount of asset B.
    pub amount_b: Amount,
    /// Shares minted to the platform-fee recipient before the withdrawal.
    pub platform_fee: Shares,
}

/// Result of [`Pair::swap`](super::Pair::swap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_a_in: Amount,
    pub amount_b_in: Amount,
    pub amount_a_out: Amount,
    pub amount_b_out: Amount,
}

/// Result of [`Pair::skim`](super::Pair::skim).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkimOutcome {
    pub amount_a: Amount,
    pub amount_b: Amount,
}

//! Mutable state of a pair and the request type for swaps.

use ethnum::U256;

use crate::config::PairConfig;
use crate::domain::{Address, Amount};
use crate::ledger::ShareLedger;
use crate::oracle::ReserveAccumulator;

/// Everything a pair operation may change.
///
/// Operations work on a staged copy and publish it only on success.
#[derive(Debug, Clone, Default)]
pub(crate) struct PairState {
    pub(crate) reserves: ReserveAccumulator,
    pub(crate) shares: ShareLedger,
    pub(crate) k_last: U256,
    pub(crate) config: PairConfig,
}

impl PairState {
    pub(crate) fn new(config: PairConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

/// The part of the state an operation replaces on commit.
#[derive(Debug)]
pub(crate) enum Staged {
    /// Only the reserves and accumulators moved (swap, sync).
    Reserves(ReserveAccumulator),
    /// Reserves, shares and checkpoint moved (mint, burn).
    Full(Box<PairState>),
    /// Custody moved but pair state did not (skim, recover).
    Unchanged,
}

impl Staged {
    pub(crate) fn apply(self, state: &mut PairState) {
        match self {
            Self::Reserves(reserves) => state.reserves = reserves,
            Self::Full(staged) => *state = *staged,
            Self::Unchanged => {}
        }
    }
}

/// Parameters of [`Pair::swap`](super::Pair::swap).
///
/// # Examples
///
/// ```
/// use reservoir_amm::domain::{Address, Amount};
/// use reservoir_amm::pair::SwapRequest;
///
/// let to = Address::from_bytes([7u8; 32]);
/// let request = SwapRequest::new(Amount::ZERO, Amount::new(1_000), to);
/// assert!(request.data.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest<'a> {
    /// Requested output of asset A.
    pub amount_a_out: Amount,
    /// Requested output of asset B.
    pub amount_b_out: Amount,
    /// Recipient of the outputs.
    pub to: Address,
    /// Flash-swap payload; non-empty data triggers the callee.
    pub data: &'a [u8],
}

impl<'a> SwapRequest<'a> {
    /// A plain swap without callback data.
    #[must_use]
    pub const fn new(amount_a_out: Amount, amount_b_out: Amount, to: Address) -> Self {
        Self {
            amount_a_out,
            amount_b_out,
            to,
            data: &[],
        }
    }

    /// Attaches flash-swap callback data.
    #[must_use]
    pub const fn with_data(mut self, data: &'a [u8]) -> Self {
        self.data = data;
        self
    }
}

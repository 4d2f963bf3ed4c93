//! The pair: reserves, shares and settlement of one asset pair.
//!
//! [`Pair`] is the only stateful entity in the crate.  Its operations
//! (mint, burn, swap, sync, skim, recover) each run to completion or abort
//! with no effect; see the [`Pair`] docs for the lifecycle.

mod guard;
mod outcome;
#[allow(clippy::module_inception)]
mod pair;
mod state;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use outcome::{BurnOutcome, MintOutcome, SkimOutcome, SwapOutcome};
pub use pair::Pair;
pub use state::SwapRequest;

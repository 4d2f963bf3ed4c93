//! Reserve tracking and time-weighted price accumulation.
//!
//! [`ReserveAccumulator`] is the only writer of a pair's reserves; external
//! oracles difference two [`PriceObservation`]s with [`average_price`].

mod reserve_accumulator;
mod twap;

pub use reserve_accumulator::ReserveAccumulator;
pub use twap::{average_price, AveragePrice, PriceObservation};

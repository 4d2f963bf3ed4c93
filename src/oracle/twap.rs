//! Time-weighted average prices from accumulator snapshots.
//!
//! A consumer stores two [`PriceObservation`]s taken some time apart and
//! calls [`average_price`] to get the mean price over that window.  The
//! pair itself never computes averages.

use ethnum::U256;

use crate::domain::Amount;
use crate::error::AmmError;

/// A snapshot of both price accumulators at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceObservation {
    price_a_cumulative: U256,
    price_b_cumulative: U256,
    timestamp: u32,
}

impl PriceObservation {
    /// Creates an observation.
    #[must_use]
    pub const fn new(price_a_cumulative: U256, price_b_cumulative: U256, timestamp: u32) -> Self {
        Self {
            price_a_cumulative,
            price_b_cumulative,
            timestamp,
        }
    }

    /// Accumulated `reserve_b / reserve_a` price.
    #[must_use]
    pub const fn price_a_cumulative(&self) -> U256 {
        self.price_a_cumulative
    }

    /// Accumulated `reserve_a / reserve_b` price.
    #[must_use]
    pub const fn price_b_cumulative(&self) -> U256 {
        self.price_b_cumulative
    }

    /// Timestamp (mod 2^32) of the snapshot.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        self.timestamp
    }
}

/// Mean UQ112x112 prices over the window between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AveragePrice {
    /// Mean price of asset A in units of asset B.
    pub price_a: U256,
    /// Mean price of asset B in units of asset A.
    pub price_b: U256,
}

impl AveragePrice {
    /// Converts `amount_a` of asset A into asset B at the mean price.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn quote_a(&self, amount_a: Amount) -> Result<Amount, AmmError> {
        decode(self.price_a, amount_a)
    }

    /// Converts `amount_b` of asset B into asset A at the mean price.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn quote_b(&self, amount_b: Amount) -> Result<Amount, AmmError> {
        decode(self.price_b, amount_b)
    }
}

fn decode(price: U256, amount: Amount) -> Result<Amount, AmmError> {
    let scaled = price
        .checked_mul(amount.widen())
        .ok_or(AmmError::Overflow("twap quote exceeds 256 bits"))?;
    u128::try_from(scaled >> 112u32)
        .map(Amount::new)
        .map_err(|_| AmmError::Overflow("twap quote exceeds 128 bits"))
}

/// Averages the accumulators between `older` and `newer`.
///
/// Both the accumulator difference and the elapsed time are computed with
/// wraparound, so windows spanning an accumulator or timestamp overflow
/// still yield the correct mean.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if both observations carry the same
/// timestamp.
pub fn average_price(
    older: &PriceObservation,
    newer: &PriceObservation,
) -> Result<AveragePrice, AmmError> {
    let elapsed = newer.timestamp.wrapping_sub(older.timestamp);
    if elapsed == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let elapsed = U256::from(elapsed);
    Ok(AveragePrice {
        price_a: newer
            .price_a_cumulative
            .wrapping_sub(older.price_a_cumulative)
            / elapsed,
        price_b: newer
            .price_b_cumulative
            .wrapping_sub(older.price_b_cumulative)
            / elapsed,
    })
}

//! Reserve bookkeeping and cumulative price accumulators.

use ethnum::U256;

use super::PriceObservation;
use crate::domain::{Amount, U112};
use crate::error::AmmError;
use crate::math::uq112x112;

/// The pair's view of its own custodied balances as of the last sync.
///
/// Holds both reserves, the 32-bit timestamp of the last update and the
/// two UQ112x112 price accumulators:
///
/// - `price_a_cumulative` integrates `reserve_b / reserve_a` over time,
/// - `price_b_cumulative` integrates `reserve_a / reserve_b`.
///
/// Accumulators and elapsed time wrap; every other quantity is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReserveAccumulator {
    reserve_a: U112,
    reserve_b: U112,
    block_timestamp_last: u32,
    price_a_cumulative: U256,
    price_b_cumulative: U256,
}

impl ReserveAccumulator {
    /// Creates an accumulator with zero reserves at timestamp zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reserve_a: U112::ZERO,
            reserve_b: U112::ZERO,
            block_timestamp_last: 0,
            price_a_cumulative: U256::ZERO,
            price_b_cumulative: U256::ZERO,
        }
    }

    /// Overwrites the reserves with the actual balances at `timestamp`.
    ///
    /// If time has passed since the last update and both prior reserves
    /// are non-zero, each accumulator first advances by the prior price
    /// times the elapsed seconds.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if either balance exceeds 112 bits.
    /// Nothing is modified in that case.
    pub fn update(
        &mut self,
        balance_a: Amount,
        balance_b: Amount,
        timestamp: u32,
    ) -> Result<(), AmmError> {
        let reserve_a = U112::try_from_amount(balance_a)?;
        let reserve_b = U112::try_from_amount(balance_b)?;

        let elapsed = timestamp.wrapping_sub(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve_a.is_zero() && !self.reserve_b.is_zero() {
            let (price_a, price_b) = self.spot_prices()?;
            let elapsed = U256::from(elapsed);
            self.price_a_cumulative = self
                .price_a_cumulative
                .wrapping_add(price_a.wrapping_mul(elapsed));
            self.price_b_cumulative = self
                .price_b_cumulative
                .wrapping_add(price_b.wrapping_mul(elapsed));
        }

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.block_timestamp_last = timestamp;
        Ok(())
    }

    /// Snapshot of the accumulators as they would read at `timestamp`,
    /// including the time elapsed since the last update.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::DivisionByZero`] only in the unreachable case
    /// of a zero reserve being used as a divisor.
    pub fn observe(&self, timestamp: u32) -> Result<PriceObservation, AmmError> {
        let mut a = self.price_a_cumulative;
        let mut b = self.price_b_cumulative;
        let elapsed = timestamp.wrapping_sub(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve_a.is_zero() && !self.reserve_b.is_zero() {
            let (price_a, price_b) = self.spot_prices()?;
            let elapsed = U256::from(elapsed);
            a = a.wrapping_add(price_a.wrapping_mul(elapsed));
            b = b.wrapping_add(price_b.wrapping_mul(elapsed));
        }
        Ok(PriceObservation::new(a, b, timestamp))
    }

    /// UQ112x112 spot prices `(reserve_b / reserve_a, reserve_a / reserve_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if either reserve is zero.
    pub fn spot_prices(&self) -> Result<(U256, U256), AmmError> {
        Ok((
            uq112x112::ratio(self.reserve_b, self.reserve_a)?,
            uq112x112::ratio(self.reserve_a, self.reserve_b)?,
        ))
    }

    /// Returns `(reserve_a, reserve_b)`.
    #[must_use]
    pub const fn reserves(&self) -> (U112, U112) {
        (self.reserve_a, self.reserve_b)
    }

    /// Returns the product of the two reserves.
    #[must_use]
    pub fn k(&self) -> U256 {
        self.reserve_a.full_mul(&self.reserve_b)
    }

    /// Timestamp (mod 2^32) of the last update.
    #[must_use]
    pub const fn block_timestamp_last(&self) -> u32 {
        self.block_timestamp_last
    }

    /// Accumulated `reserve_b / reserve_a` price, UQ112x112 seconds.
    #[must_use]
    pub const fn price_a_cumulative(&self) -> U256 {
        self.price_a_cumulative
    }

    /// Accumulated `reserve_a / reserve_b` price, UQ112x112 seconds.
    #[must_use]
    pub const fn price_b_cumulative(&self) -> U256 {
        self.price_b_cumulative
    }
}

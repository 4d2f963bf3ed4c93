//! 112-bit bounded unsigned integer for committed reserves.

use core::fmt;

use ethnum::U256;

use super::Amount;
use crate::error::AmmError;

/// An unsigned integer guaranteed to fit in 112 bits.
///
/// Reserves are stored as `U112` so that the product of two reserves fits
/// in 224 bits and a UQ112x112 price fits in 224 bits.  Construction is
/// the only validation point: once built, a `U112` never needs rechecking.
///
/// # Examples
///
/// ```
/// use reservoir_amm::domain::{Amount, U112};
///
/// assert!(U112::try_from_amount(Amount::new(1_000)).is_ok());
/// assert!(U112::try_from_amount(Amount::new(U112::MAX.get() + 1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct U112(u128);

impl U112 {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// `2^112 - 1`.
    pub const MAX: Self = Self((1u128 << 112) - 1);

    /// Creates a `U112`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if `value` needs more than 112 bits.
    pub const fn new(value: u128) -> crate::error::Result<Self> {
        if value > Self::MAX.0 {
            return Err(AmmError::Overflow("value exceeds 112 bits"));
        }
        Ok(Self(value))
    }

    /// Narrows an [`Amount`] into 112 bits.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the amount needs more than 112 bits.
    pub const fn try_from_amount(amount: Amount) -> crate::error::Result<Self> {
        Self::new(amount.get())
    }

    /// Returns the value as `u128`.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns the value as an [`Amount`].
    pub const fn amount(&self) -> Amount {
        Amount::new(self.0)
    }

    /// Returns `true` if zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens to 256 bits.
    #[must_use]
    pub fn widen(&self) -> U256 {
        U256::from(self.0)
    }

    /// Full-width product of two 112-bit values (at most 224 bits).
    #[must_use]
    pub fn full_mul(&self, other: &Self) -> U256 {
        self.widen() * other.widen()
    }
}

impl fmt::Display for U112 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn max_is_112_bits() {
        assert_eq!(U112::MAX.get(), 5_192_296_858_534_827_628_530_496_329_220_095);
        assert_eq!(U112::MAX.get().count_ones(), 112);
    }

    #[test]
    fn boundary() {
        assert!(U112::new(U112::MAX.get()).is_ok());
        assert_eq!(
            U112::new(U112::MAX.get() + 1),
            Err(AmmError::Overflow("value exceeds 112 bits"))
        );
    }

    #[test]
    fn amount_round_trip() {
        let Ok(v) = U112::try_from_amount(Amount::new(77)) else {
            panic!("expected Ok");
        };
        assert_eq!(v.amount(), Amount::new(77));
        assert!(!v.is_zero());
        assert!(U112::ZERO.is_zero());
    }

    #[test]
    fn full_mul_does_not_overflow_at_max() {
        let p = U112::MAX.full_mul(&U112::MAX);
        let expected = U256::from(U112::MAX.get()) * U256::from(U112::MAX.get());
        assert_eq!(p, expected);
        assert!(p < (U256::ONE << 224u32));
    }
}

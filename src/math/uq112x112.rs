//! UQ112x112 binary fixed-point encoding for reserve ratios.
//!
//! A UQ112x112 value stores a ratio `n / d` as `n * 2^112 / d` in the low
//! 224 bits of a 256-bit word.  Price accumulators add
//! `ratio * elapsed_seconds` into a 256-bit word with wraparound.

use ethnum::U256;

use crate::domain::U112;
use crate::error::AmmError;

/// The fixed-point scale, `2^112`.
pub const Q112: U256 = U256::from_words(0, 1u128 << 112);

/// Encodes a 112-bit integer as UQ112x112.
#[must_use]
pub fn encode(value: U112) -> U256 {
    value.widen() << 112u32
}

/// Divides a UQ112x112 value by a 112-bit integer.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `divisor` is zero.
pub fn uqdiv(value: U256, divisor: U112) -> crate::error::Result<U256> {
    if divisor.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    Ok(value / divisor.widen())
}

/// The UQ112x112 ratio `numerator / denominator`.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `denominator` is zero.
pub fn ratio(numerator: U112, denominator: U112) -> crate::error::Result<U256> {
    uqdiv(encode(numerator), denominator)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn u112(v: u128) -> U112 {
        let Ok(v) = U112::new(v) else {
            panic!("fits");
        };
        v
    }

    #[test]
    fn q112_is_two_pow_112() {
        assert_eq!(Q112, U256::ONE << 112u32);
    }

    #[test]
    fn encode_one() {
        assert_eq!(encode(u112(1)), Q112);
    }

    #[test]
    fn ratio_of_equal_reserves_is_one() {
        let Ok(r) = ratio(u112(3_000), u112(3_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(r, Q112);
    }

    #[test]
    fn ratio_truncates() {
        let Ok(r) = ratio(u112(1), u112(3)) else {
            panic!("expected Ok");
        };
        assert_eq!(r, Q112 / U256::from(3u32));
    }

    #[test]
    fn ratio_at_extremes_fits_224_bits() {
        let Ok(r) = ratio(U112::MAX, u112(1)) else {
            panic!("expected Ok");
        };
        assert!(r < (U256::ONE << 224u32));
    }

    #[test]
    fn divide_by_zero() {
        assert_eq!(ratio(u112(1), U112::ZERO), Err(AmmError::DivisionByZero));
    }
}

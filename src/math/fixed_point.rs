//! Deterministic integer arithmetic at 128- and 256-bit widths.
//!
//! Every division here truncates toward zero.  Nothing rounds up: the
//! pair relies on floor rounding in every share and output computation so
//! that rounding dust always stays in the pool.

use ethnum::U256;

use crate::error::AmmError;

/// Computes `floor(a * b / denom)` with a 256-bit intermediate.
///
/// The product of two `u128` values always fits in 256 bits, so the only
/// failure modes are a zero denominator and a quotient wider than 128 bits.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denom` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use reservoir_amm::math::mul_div_down;
///
/// assert_eq!(mul_div_down(u128::MAX, 4, 8), Ok(u128::MAX / 2));
/// ```
pub fn mul_div_down(a: u128, b: u128, denom: u128) -> crate::error::Result<u128> {
    let q = mul_div_down_wide(U256::from(a), U256::from(b), U256::from(denom))?;
    u128::try_from(q).map_err(|_| AmmError::Overflow("mul_div result exceeds 128 bits"))
}

/// Computes `floor(a * b / denom)` entirely in 256 bits.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denom` is zero.
/// - [`AmmError::Overflow`] if `a * b` exceeds 256 bits.
pub fn mul_div_down_wide(a: U256, b: U256, denom: U256) -> crate::error::Result<U256> {
    if denom == U256::ZERO {
        return Err(AmmError::DivisionByZero);
    }
    let product = a
        .checked_mul(b)
        .ok_or(AmmError::Overflow("mul_div product exceeds 256 bits"))?;
    Ok(product / denom)
}

/// Returns `floor(sqrt(x))` by Babylonian iteration.
///
/// Starts from `(x + 1) / 2` and stops as soon as the iterate no longer
/// decreases.  `(x + 1) / 2` is evaluated as `x / 2 + (x & 1)` so that
/// `U256::MAX` does not overflow.
#[must_use]
pub fn integer_sqrt(x: U256) -> U256 {
    let mut z = (x >> 1u32) + (x & U256::ONE);
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) >> 1u32;
    }
    y
}

/// [`integer_sqrt`] for `u128` inputs.
#[must_use]
pub fn integer_sqrt_u128(x: u128) -> u128 {
    integer_sqrt(U256::from(x)).as_u128()
}

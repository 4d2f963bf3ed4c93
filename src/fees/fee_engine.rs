//! Swap-fee and platform-fee arithmetic.
//!
//! # Swap fee
//!
//! A swap fee of `f` basis points means only `amount_in * (10_000 - f)`
//! counts towards the invariant; the rest stays in the pool as extra
//! reserve and accrues to every share.  [`check_invariant`] performs the
//! fee-adjusted comparison
//!
//! ```text
//! (bal_a * 10_000 - in_a * f) * (bal_b * 10_000 - in_b * f) >= r_a * r_b * 10_000^2
//! ```
//!
//! and [`amount_out`] / [`amount_in`] solve it exactly for single-sided
//! swaps.
//!
//! # Platform fee
//!
//! [`platform_fee_shares`] measures growth of `sqrt(k)` since the last
//! checkpoint and returns the number of shares that, minted to the
//! platform, give it `platform_fee / 10_000` of that growth:
//!
//! ```text
//! g = root_new * ACCURACY / root_old
//! m = ACCURACY - ACCURACY^2 / g
//! t = m * platform_fee / 10_000
//! shares = t * total_supply / (ACCURACY - t)
//! ```
//!
//! Every division floors; the result is reproduced bit-for-bit rather than
//! "improved".

use ethnum::U256;

use crate::domain::{Amount, BasisPoints, Shares, BPS_DENOMINATOR, U112};
use crate::error::AmmError;
use crate::math::integer_sqrt;

/// Fixed scale of the platform-fee growth ratio, `10^38`.
pub const ACCURACY: u128 = 100_000_000_000_000_000_000_000_000_000_000_000_000;

fn bps_scale() -> U256 {
    U256::from(BPS_DENOMINATOR)
}

fn complement(fee: BasisPoints) -> Result<U256, AmmError> {
    fee.complement()
        .map(U256::from)
        .ok_or(AmmError::InvalidFee("fee exceeds 100%"))
}

/// Largest output a single-sided swap of `amount_in` can withdraw while
/// still passing [`check_invariant`].
///
/// ```text
/// amount_out = reserve_out * amount_in * (10_000 - f)
///            / (reserve_in * 10_000 + amount_in * (10_000 - f))
/// ```
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::InvalidFee`] if `swap_fee` exceeds 100%.
///
/// # Examples
///
/// ```
/// use reservoir_amm::domain::{Amount, BasisPoints, U112};
/// use reservoir_amm::fees::amount_out;
///
/// let e18 = 1_000_000_000_000_000_000u128;
/// let out = amount_out(
///     Amount::new(e18),
///     U112::new(5 * e18).expect("fits"),
///     U112::new(10 * e18).expect("fits"),
///     BasisPoints::new(30),
/// );
/// assert_eq!(out, Ok(Amount::new(1_662_497_915_624_478_906)));
/// ```
pub fn amount_out(
    amount_in: Amount,
    reserve_in: U112,
    reserve_out: U112,
    swap_fee: BasisPoints,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let in_after_fee = amount_in.widen() * complement(swap_fee)?;
    let numerator = in_after_fee * reserve_out.widen();
    let denominator = reserve_in.widen() * bps_scale() + in_after_fee;
    // numerator / denominator < reserve_out, so the narrowing is lossless.
    Ok(Amount::new((numerator / denominator).as_u128()))
}

/// Smallest single-sided input that lets a swap withdraw `amount_out`.
///
/// ```text
/// amount_in = ceil(reserve_in * amount_out * 10_000
///                  / ((reserve_out - amount_out) * (10_000 - f)))
/// ```
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if a reserve is zero or
///   `amount_out >= reserve_out`.
/// - [`AmmError::InvalidFee`] if `swap_fee` is 100% or more.
/// - [`AmmError::Overflow`] if the required input exceeds `u128`.
pub fn amount_in(
    amount_out: Amount,
    reserve_in: U112,
    reserve_out: U112,
    swap_fee: BasisPoints,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || amount_out.get() >= reserve_out.get() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let c = complement(swap_fee)?;
    if c == U256::ZERO {
        return Err(AmmError::InvalidFee("a 100% fee admits no input"));
    }
    let numerator = reserve_in.widen() * amount_out.widen() * bps_scale();
    let denominator = (reserve_out.widen() - amount_out.widen()) * c;
    let mut quotient = numerator / denominator;
    if numerator % denominator != U256::ZERO {
        quotient += U256::ONE;
    }
    u128::try_from(quotient)
        .map(Amount::new)
        .map_err(|_| AmmError::Overflow("required input exceeds 128 bits"))
}

/// Verifies the fee-adjusted constant-product invariant after a swap.
///
/// `balances` are the pair's actual post-swap holdings, `amounts_in` the
/// inputs inferred from them, `reserves` the pre-swap reserves.
///
/// # Errors
///
/// - [`AmmError::KInvariantViolation`] if the adjusted product is smaller
///   than the scaled prior product.
/// - [`AmmError::Overflow`] if the adjusted product exceeds 256 bits.
/// - [`AmmError::InvalidFee`] if `swap_fee` exceeds 100%.
pub fn check_invariant(
    balances: (Amount, Amount),
    amounts_in: (Amount, Amount),
    reserves: (U112, U112),
    swap_fee: BasisPoints,
) -> Result<(), AmmError> {
    complement(swap_fee)?;
    let fee = U256::from(swap_fee.get());
    let adjust = |balance: Amount, input: Amount| -> Result<U256, AmmError> {
        (balance.widen() * bps_scale())
            .checked_sub(input.widen() * fee)
            .ok_or(AmmError::Underflow("swap input exceeds balance"))
    };
    let adjusted_a = adjust(balances.0, amounts_in.0)?;
    let adjusted_b = adjust(balances.1, amounts_in.1)?;

    let lhs = adjusted_a
        .checked_mul(adjusted_b)
        .ok_or(AmmError::Overflow("fee-adjusted balance product exceeds 256 bits"))?;
    let rhs = reserves.0.full_mul(&reserves.1) * bps_scale() * bps_scale();
    if lhs < rhs {
        return Err(AmmError::KInvariantViolation);
    }
    Ok(())
}

/// Shares owed to the platform for invariant growth since `k_last`.
///
/// Returns [`Shares::ZERO`] when no checkpoint exists (`k_last == 0`), the
/// fee is zero, or `sqrt(k)` has not grown.  `reserve_a` and `reserve_b`
/// are the reserves *before* the mint or burn that triggers the fee.
///
/// # Errors
///
/// - [`AmmError::Overflow`] if a root exceeds 112 bits, the multiplier or
///   target ownership exceeds 128 bits, or the share count exceeds `u128`.
/// - [`AmmError::InvalidFee`] if `platform_fee` exceeds 100%.
pub fn platform_fee_shares(
    k_last: U256,
    reserve_a: U112,
    reserve_b: U112,
    total_supply: Shares,
    platform_fee: BasisPoints,
) -> Result<Shares, AmmError> {
    if k_last == U256::ZERO || platform_fee.is_zero() {
        return Ok(Shares::ZERO);
    }
    if !platform_fee.is_valid_percent() {
        return Err(AmmError::InvalidFee("platform fee exceeds 100%"));
    }

    let u112_max = U112::MAX.widen();
    let root_old = integer_sqrt(k_last);
    let root_new = integer_sqrt(reserve_a.full_mul(&reserve_b));
    if root_old > u112_max {
        return Err(AmmError::Overflow("sqrt(k_last) exceeds 112 bits"));
    }
    if root_new > u112_max {
        return Err(AmmError::Overflow("sqrt(k) exceeds 112 bits"));
    }
    if root_new <= root_old {
        return Ok(Shares::ZERO);
    }

    let accuracy = U256::from(ACCURACY);
    let u128_max = U256::from(u128::MAX);

    let growth = root_new * accuracy / root_old;
    let multiplier = accuracy - accuracy * accuracy / growth;
    if multiplier > u128_max {
        return Err(AmmError::Overflow("fee multiplier exceeds 128 bits"));
    }
    let target = multiplier * U256::from(platform_fee.get()) / bps_scale();
    if target > u128_max {
        return Err(AmmError::Overflow("target ownership exceeds 128 bits"));
    }

    let shares = target * total_supply.widen() / (accuracy - target);
    u128::try_from(shares)
        .map(Shares::new)
        .map_err(|_| AmmError::Overflow("platform fee shares exceed 128 bits"))
}

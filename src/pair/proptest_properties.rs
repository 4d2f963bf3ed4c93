//! Property-based tests using `proptest` for pair settlement invariants.
//!
//! 1. **Quote tightness**: the quoted output settles, one more unit fails.
//! 2. **Invariant growth**: with a non-zero swap fee the reserve product
//!    strictly increases across a swap.
//! 3. **Swap reversibility**: a round trip A→B→A returns at most the input.
//! 4. **Share issuance**: a later deposit mints exactly
//!    `min(dA·S/rA, dB·S/rB)` shares, and never returns more than it put in.
//! 5. **Proportional round trip**: mint then burn of a deposit in reserve
//!    proportion loses less than one share's worth of each asset.
//! 6. **Atomicity**: a rejected swap leaves custody and reserves untouched.
//! 7. **Integer square root bounds**: `r² ≤ x < (r + 1)²`.

use ethnum::U256;
use proptest::prelude::*;

use super::{Pair, SwapRequest};
use crate::config::PairConfig;
use crate::custody::TokenLedger;
use crate::domain::{Address, Amount, CallContext, TokenPair};
use crate::error::AmmError;
use crate::math::integer_sqrt;
use crate::traits::AssetCustody;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const TOKEN_X: Address = Address::from_bytes([1u8; 32]);
const TOKEN_Y: Address = Address::from_bytes([2u8; 32]);
const PAIR: Address = Address::from_bytes([0xaa; 32]);
const FACTORY: Address = Address::from_bytes([0xfa; 32]);
const PROVIDER: Address = Address::from_bytes([0xa1; 32]);
const TRADER: Address = Address::from_bytes([0xb2; 32]);

/// A pair seeded with `ra`/`rb` and a trader holding plenty of both assets.
fn seeded(ra: u128, rb: u128) -> (Pair, TokenLedger) {
    let Ok(tokens) = TokenPair::new(TOKEN_X, TOKEN_Y) else {
        panic!("distinct tokens");
    };
    let Ok(pair) = Pair::new(PAIR, FACTORY, tokens, PairConfig::default()) else {
        panic!("valid pair");
    };
    let mut ledger = TokenLedger::new();
    for (token, amount) in [(TOKEN_X, ra), (TOKEN_Y, rb)] {
        let Ok(()) = ledger.mint(&token, &PAIR, Amount::new(amount)) else {
            panic!("fund pair");
        };
        let Ok(()) = ledger.mint(&token, &TRADER, Amount::new(1u128 << 100)) else {
            panic!("fund trader");
        };
    }
    let Ok(_) = pair.mint(&CallContext::new(PROVIDER, 1), &mut ledger, PROVIDER) else {
        panic!("seed mint");
    };
    (pair, ledger)
}

fn pay(ledger: &mut TokenLedger, token: Address, amount: u128) -> bool {
    ledger
        .transfer(&token, &TRADER, &PAIR, Amount::new(amount))
        .is_ok()
}

fn product(pair: &Pair) -> U256 {
    let (a, b, _) = pair.reserves();
    a.full_mul(&b)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves in [10_000, 10^24], wide enough to exercise 256-bit products.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=1_000_000_000_000_000_000_000_000u128
}

/// Swap input as a fraction of the input reserve, in per-mille.
fn fraction_strategy() -> impl Strategy<Value = u128> {
    1u128..=500u128
}

// ---------------------------------------------------------------------------
// Properties 1-3: swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quote_is_tight(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        per_mille in fraction_strategy(),
    ) {
        let (pair, mut ledger) = seeded(ra, rb);
        let amount_in = (ra * per_mille / 1_000).max(1);
        let Ok(out) = pair.quote_amount_out(&TOKEN_X, Amount::new(amount_in)) else {
            return Ok(());
        };
        if out.is_zero() {
            return Ok(());
        }
        prop_assume!(pay(&mut ledger, TOKEN_X, amount_in));

        let ctx = CallContext::new(TRADER, 2);
        let too_much = SwapRequest::new(Amount::ZERO, Amount::new(out.get() + 1), TRADER);
        prop_assert_eq!(
            pair.swap(&ctx, &mut ledger, too_much, None),
            Err(AmmError::KInvariantViolation)
        );
        let exact = SwapRequest::new(Amount::ZERO, out, TRADER);
        prop_assert!(pair.swap(&ctx, &mut ledger, exact, None).is_ok());
    }

    #[test]
    fn prop_fee_strictly_grows_invariant(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        per_mille in fraction_strategy(),
    ) {
        let (pair, mut ledger) = seeded(ra, rb);
        let before = product(&pair);
        let amount_in = (rb * per_mille / 1_000).max(1);
        let Ok(out) = pair.quote_amount_out(&TOKEN_Y, Amount::new(amount_in)) else {
            return Ok(());
        };
        if out.is_zero() {
            return Ok(());
        }
        prop_assume!(pay(&mut ledger, TOKEN_Y, amount_in));
        let request = SwapRequest::new(out, Amount::ZERO, TRADER);
        let Ok(_) = pair.swap(&CallContext::new(TRADER, 2), &mut ledger, request, None) else {
            return Ok(());
        };
        let after = product(&pair);
        prop_assert!(after > before, "k did not grow: {} -> {}", before, after);
    }

    #[test]
    fn prop_swap_reversibility(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        per_mille in fraction_strategy(),
    ) {
        let (pair, mut ledger) = seeded(ra, rb);
        let ctx = CallContext::new(TRADER, 2);
        let amount_in = (ra * per_mille / 1_000).max(1);

        // A → B
        let Ok(received_b) = pair.quote_amount_out(&TOKEN_X, Amount::new(amount_in)) else {
            return Ok(());
        };
        if received_b.is_zero() {
            return Ok(());
        }
        prop_assume!(pay(&mut ledger, TOKEN_X, amount_in));
        let Ok(_) = pair.swap(&ctx, &mut ledger, SwapRequest::new(Amount::ZERO, received_b, TRADER), None) else {
            return Ok(());
        };

        // B → A
        let Ok(received_a) = pair.quote_amount_out(&TOKEN_Y, received_b) else {
            return Ok(());
        };
        prop_assert!(
            received_a.get() <= amount_in,
            "round trip gained value: returned={} > paid={}",
            received_a, amount_in
        );
    }
}

// ---------------------------------------------------------------------------
// Properties 4-6: liquidity and atomicity
// ---------------------------------------------------------------------------

/// `floor(deposit * supply / reserve)` computed in 256 bits.
fn pro_rata(deposit: u128, supply: u128, reserve: u128) -> U256 {
    U256::from(deposit) * U256::from(supply) / U256::from(reserve)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_mint_issues_min_pro_rata_shares(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        deposit_a in 1_000u128..=1_000_000_000_000u128,
        deposit_b in 1_000u128..=1_000_000_000_000u128,
    ) {
        let (pair, mut ledger) = seeded(ra, rb);
        let supply = pair.total_supply().get();
        let expected = pro_rata(deposit_a, supply, ra).min(pro_rata(deposit_b, supply, rb));
        let ctx = CallContext::new(TRADER, 2);
        prop_assume!(pay(&mut ledger, TOKEN_X, deposit_a));
        prop_assume!(pay(&mut ledger, TOKEN_Y, deposit_b));

        let minted = match pair.mint(&ctx, &mut ledger, TRADER) {
            Ok(minted) => minted,
            Err(err) => {
                prop_assert_eq!(expected, U256::ZERO);
                prop_assert_eq!(err, AmmError::InsufficientLiquidityMinted);
                return Ok(());
            }
        };
        prop_assert_eq!(minted.liquidity.widen(), expected);

        let Ok(()) = pair.transfer_shares(&ctx, PAIR, minted.liquidity) else {
            return Ok(());
        };
        let Ok(burned) = pair.burn(&ctx, &mut ledger, TRADER) else {
            return Ok(());
        };
        prop_assert!(burned.amount_a.get() <= deposit_a, "a: {} > {}", burned.amount_a, deposit_a);
        prop_assert!(burned.amount_b.get() <= deposit_b, "b: {} > {}", burned.amount_b, deposit_b);
    }

    #[test]
    fn prop_proportional_round_trip_is_within_one_share(
        unit_a in 1u128..=1_000_000u128,
        unit_b in 1u128..=1_000_000u128,
        scale in 10_000u128..=1_000_000_000_000u128,
        units in 1u128..=1_000_000u128,
    ) {
        let (ra, rb) = (unit_a * scale, unit_b * scale);
        let (deposit_a, deposit_b) = (unit_a * units, unit_b * units);
        let (pair, mut ledger) = seeded(ra, rb);
        let ctx = CallContext::new(TRADER, 2);
        prop_assume!(pay(&mut ledger, TOKEN_X, deposit_a));
        prop_assume!(pay(&mut ledger, TOKEN_Y, deposit_b));
        let Ok(minted) = pair.mint(&ctx, &mut ledger, TRADER) else {
            return Ok(());
        };
        let supply = pair.total_supply().get();
        let Ok(()) = pair.transfer_shares(&ctx, PAIR, minted.liquidity) else {
            return Ok(());
        };
        let Ok(burned) = pair.burn(&ctx, &mut ledger, TRADER) else {
            return Ok(());
        };

        // Loss per side is below reserve / supply + 1, i.e. at most
        // ceil(reserve / supply); at most one unit when a share is worth
        // no more than one unit of the asset.
        for (deposit, returned, reserve) in [
            (deposit_a, burned.amount_a.get(), ra),
            (deposit_b, burned.amount_b.get(), rb),
        ] {
            prop_assert!(returned <= deposit);
            let loss = deposit - returned;
            let bound = reserve.div_ceil(supply).max(1);
            prop_assert!(loss <= bound, "loss {} exceeds {}", loss, bound);
            if reserve <= supply {
                prop_assert!(loss <= 1, "loss {} with sub-unit shares", loss);
            }
        }
    }

    #[test]
    fn prop_rejected_swap_is_atomic(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        per_mille in fraction_strategy(),
    ) {
        let (pair, mut ledger) = seeded(ra, rb);
        let before_ledger = ledger.clone();
        let before_reserves = pair.reserves();
        let out = (rb * per_mille / 1_000).max(1);
        let request = SwapRequest::new(Amount::ZERO, Amount::new(out), TRADER);
        let result = pair.swap(&CallContext::new(TRADER, 9), &mut ledger, request, None);
        prop_assert_eq!(result, Err(AmmError::InsufficientInputAmount));
        prop_assert_eq!(ledger, before_ledger);
        prop_assert_eq!(pair.reserves(), before_reserves);
    }
}

// ---------------------------------------------------------------------------
// Property 7: integer square root
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_integer_sqrt_bounds(hi in any::<u128>(), lo in any::<u128>()) {
        let x = U256::from_words(hi, lo);
        let r = integer_sqrt(x);
        prop_assert!(r * r <= x);
        let next = r + U256::ONE;
        if let Some(sq) = next.checked_mul(next) {
            prop_assert!(sq > x);
        }
    }
}

//! The pair state machine.
//!
//! A [`Pair`] owns reserves, the share ledger, the price accumulators and
//! the platform-fee checkpoint of one asset pair.  Assets themselves live in
//! an external [`AssetCustody`]; the pair only reads its balances there and
//! moves them through a [`Journal`].
//!
//! # Operation lifecycle
//!
//! Every mutating call follows the same four phases:
//!
//! 1. **Enter**: take the non-blocking reentrancy guard.
//! 2. **Stage**: copy the state it needs and compute against the copy,
//!    performing custody transfers (and the flash-swap callback) through the
//!    journal.
//! 3. **Verify**: any failure returns `Err` and reverses the journal.
//! 4. **Commit**: publish the staged state and append events.
//!
//! No partial state is ever observable: readers see either the state before
//! the call or the state after it.

use core::sync::atomic::AtomicBool;

use ethnum::U256;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use super::guard::ReentrancyGuard;
use super::outcome::{BurnOutcome, MintOutcome, SkimOutcome, SwapOutcome};
use super::state::{PairState, Staged, SwapRequest};
use crate::config::PairConfig;
use crate::custody::Journal;
use crate::domain::{
    Address, Amount, BasisPoints, CallContext, PoolEvent, Shares, Side, TokenPair, U112,
};
use crate::error::AmmError;
use crate::fees;
use crate::ledger::MINIMUM_LIQUIDITY;
use crate::math::{integer_sqrt, mul_div_down};
use crate::oracle::PriceObservation;
use crate::traits::{AssetCustody, FlashSwapCallee};

/// What a staged operation hands back for commit.
struct Settlement<T> {
    staged: Staged,
    events: Vec<PoolEvent>,
    outcome: T,
}

impl<T> Settlement<T> {
    fn new(staged: Staged, events: Vec<PoolEvent>, outcome: T) -> Self {
        Self {
            staged,
            events,
            outcome,
        }
    }
}

/// A constant-product liquidity pool over two assets.
///
/// `Pair` is `Send + Sync`.  Mutating operations take `&self`; only one may
/// be in flight at a time and any concurrent or reentrant attempt fails
/// immediately with [`AmmError::Locked`].  Read accessors never wait on
/// that guard.
///
/// # Examples
///
/// ```
/// use reservoir_amm::prelude::*;
///
/// let token_x = Address::from_bytes([1u8; 32]);
/// let token_y = Address::from_bytes([2u8; 32]);
/// let pair_addr = Address::from_bytes([0xaa; 32]);
/// let factory = Address::from_bytes([0xfa; 32]);
/// let alice = Address::from_bytes([0xa1; 32]);
///
/// let tokens = TokenPair::new(token_x, token_y).expect("distinct");
/// let pair = Pair::new(pair_addr, factory, tokens, PairConfig::default()).expect("valid");
///
/// let mut ledger = TokenLedger::new();
/// ledger.mint(&token_x, &pair_addr, Amount::new(1_000_000)).expect("fund");
/// ledger.mint(&token_y, &pair_addr, Amount::new(4_000_000)).expect("fund");
///
/// let ctx = CallContext::new(alice, 1);
/// let minted = pair.mint(&ctx, &mut ledger, alice).expect("mint");
/// assert_eq!(minted.liquidity, Shares::new(2_000_000 - 1_000));
/// ```
#[derive(Debug)]
pub struct Pair {
    address: Address,
    factory: Address,
    tokens: TokenPair,
    lock: AtomicBool,
    state: RwLock<PairState>,
    events: Mutex<Vec<PoolEvent>>,
}

impl Pair {
    /// Creates an empty pair.
    ///
    /// `address` is the pair's own account in custody; `factory` is the only
    /// caller allowed to change its configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `address` is zero or equal to
    ///   one of the assets.
    /// - [`AmmError::InvalidFee`] if `config` fails validation.
    pub fn new(
        address: Address,
        factory: Address,
        tokens: TokenPair,
        config: PairConfig,
    ) -> Result<Self, AmmError> {
        if address.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "pair address must not be zero",
            ));
        }
        if tokens.contains(&address) {
            return Err(AmmError::InvalidConfiguration(
                "pair address collides with one of its assets",
            ));
        }
        config.validate()?;
        Ok(Self {
            address,
            factory,
            tokens,
            lock: AtomicBool::new(false),
            state: RwLock::new(PairState::new(config)),
            events: Mutex::new(Vec::new()),
        })
    }

    // -- accessors ------------------------------------------------------------

    /// The pair's own custody account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The governance account allowed to change this pair's configuration.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// The canonically ordered assets.
    #[must_use]
    pub const fn tokens(&self) -> TokenPair {
        self.tokens
    }

    /// Returns `(reserve_a, reserve_b, block_timestamp_last)`.
    #[must_use]
    pub fn reserves(&self) -> (U112, U112, u32) {
        let state = self.state.read();
        let (a, b) = state.reserves.reserves();
        (a, b, state.reserves.block_timestamp_last())
    }

    /// Accumulated `reserve_b / reserve_a`, UQ112x112 seconds.
    #[must_use]
    pub fn price_a_cumulative_last(&self) -> U256 {
        self.state.read().reserves.price_a_cumulative()
    }

    /// Accumulated `reserve_a / reserve_b`, UQ112x112 seconds.
    #[must_use]
    pub fn price_b_cumulative_last(&self) -> U256 {
        self.state.read().reserves.price_b_cumulative()
    }

    /// The reserve product recorded after the last mint or burn.
    #[must_use]
    pub fn k_last(&self) -> U256 {
        self.state.read().k_last
    }

    /// Outstanding share supply, locked shares included.
    pub fn total_supply(&self) -> Shares {
        self.state.read().shares.total_supply()
    }

    /// `owner`'s share balance.
    pub fn share_balance_of(&self, owner: &Address) -> Shares {
        self.state.read().shares.balance_of(owner)
    }

    /// Current fee schedule and governance addresses.
    #[must_use]
    pub fn config(&self) -> PairConfig {
        self.state.read().config
    }

    /// Accumulator snapshot as of `timestamp`, including time elapsed since
    /// the last update.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::DivisionByZero`] from the price ratio; this
    /// cannot happen while both reserves are non-zero.
    pub fn observe(&self, timestamp: u64) -> Result<PriceObservation, AmmError> {
        let reserves = self.state.read().reserves;
        reserves.observe(CallContext::new(Address::ZERO, timestamp).block_timestamp())
    }

    /// Output a single-sided swap of `amount_in` of `token_in` would get
    /// at current reserves and fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token_in` is not one of the assets.
    /// - Any error of [`fees::amount_out`].
    pub fn quote_amount_out(
        &self,
        token_in: &Address,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let side = self.tokens.side_of(token_in)?;
        let (reserve_in, reserve_out, fee) = self.oriented(side);
        fees::amount_out(amount_in, reserve_in, reserve_out, fee)
    }

    /// Input of `token_in` a single-sided swap needs to withdraw
    /// `amount_out` of the other asset.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token_in` is not one of the assets.
    /// - Any error of [`fees::amount_in`].
    pub fn quote_amount_in(
        &self,
        token_in: &Address,
        amount_out: Amount,
    ) -> Result<Amount, AmmError> {
        let side = self.tokens.side_of(token_in)?;
        let (reserve_in, reserve_out, fee) = self.oriented(side);
        fees::amount_in(amount_out, reserve_in, reserve_out, fee)
    }

    /// Drains every event committed since the last call, oldest first.
    pub fn take_events(&self) -> Vec<PoolEvent> {
        core::mem::take(&mut *self.events.lock())
    }

    fn oriented(&self, side_in: Side) -> (U112, U112, BasisPoints) {
        let state = self.state.read();
        let (a, b) = state.reserves.reserves();
        let fee = state.config.swap_fee();
        match side_in {
            Side::A => (a, b, fee),
            Side::B => (b, a, fee),
        }
    }

    // -- liquidity ------------------------------------------------------------

    /// Issues shares for assets deposited since the last sync.
    ///
    /// Deposits are the differences between the pair's actual balances and
    /// its reserves.  Before the deposit is priced, any platform fee owed on
    /// invariant growth is minted.  The first deposit issues
    /// `sqrt(a * b) - MINIMUM_LIQUIDITY` shares and locks
    /// `MINIMUM_LIQUIDITY` forever; later deposits issue
    /// `min(a * supply / reserve_a, b * supply / reserve_b)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::Underflow`] if a balance is below its reserve.
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be issued.
    /// - [`AmmError::Overflow`] if a new reserve exceeds 112 bits.
    pub fn mint<C: AssetCustody + ?Sized>(
        &self,
        ctx: &CallContext,
        custody: &mut C,
        to: Address,
    ) -> Result<MintOutcome, AmmError> {
        let outcome = self.settle("mint", custody, |custody| {
            self.stage_mint(ctx, custody, to)
        })?;
        debug!(
            pair = %self.address,
            sender = %ctx.sender,
            %to,
            liquidity = %outcome.liquidity,
            amount_a = %outcome.amount_a,
            amount_b = %outcome.amount_b,
            platform_fee = %outcome.platform_fee,
            "mint"
        );
        Ok(outcome)
    }

    /// Redeems the shares the pair holds on its own account.
    ///
    /// Shares must be transferred to [`address`](Self::address) first.  The
    /// platform fee is minted before pricing, then each asset is paid out as
    /// `shares * balance / supply` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout is zero.
    /// - Any custody transfer error.
    pub fn burn<C: AssetCustody + ?Sized>(
        &self,
        ctx: &CallContext,
        custody: &mut C,
        to: Address,
    ) -> Result<BurnOutcome, AmmError> {
        let outcome = self.settle("burn", custody, |custody| {
            self.stage_burn(ctx, custody, to)
        })?;
        debug!(
            pair = %self.address,
            sender = %ctx.sender,
            %to,
            liquidity = %outcome.liquidity,
            amount_a = %outcome.amount_a,
            amount_b = %outcome.amount_b,
            platform_fee = %outcome.platform_fee,
            "burn"
        );
        Ok(outcome)
    }

    // -- swapping -------------------------------------------------------------

    /// Settles a swap.
    ///
    /// The requested outputs are transferred to `request.to` first.  If
    /// `request.data` is non-empty, `callee` is invoked next and may pay the
    /// input (or not).  Inputs are then inferred from actual balances and
    /// the fee-adjusted invariant is checked.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`AmmError::InsufficientLiquidity`] if an output reaches its reserve.
    /// - [`AmmError::InvalidRecipient`] if `to` is one of the assets or the
    ///   pair itself.
    /// - [`AmmError::MissingCallee`] if data is supplied without a callee.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::KInvariantViolation`] if the payment is too small.
    /// - [`AmmError::Overflow`] if a new reserve exceeds 112 bits.
    /// - Any error returned by the callee or by custody.
    pub fn swap<C: AssetCustody + ?Sized>(
        &self,
        ctx: &CallContext,
        custody: &mut C,
        request: SwapRequest<'_>,
        callee: Option<&mut dyn FlashSwapCallee>,
    ) -> Result<SwapOutcome, AmmError> {
        let outcome = self.settle("swap", custody, |custody| {
            self.stage_swap(ctx, custody, request, callee)
        })?;
        debug!(
            pair = %self.address,
            sender = %ctx.sender,
            to = %request.to,
            amount_a_in = %outcome.amount_a_in,
            amount_b_in = %outcome.amount_b_in,
            amount_a_out = %outcome.amount_a_out,
            amount_b_out = %outcome.amount_b_out,
            flash = !request.data.is_empty(),
            "swap"
        );
        Ok(outcome)
    }

    // -- balance reconciliation -----------------------------------------------

    /// Sets the reserves to the actual balances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::Overflow`] if a balance exceeds 112 bits.
    pub fn sync<C: AssetCustody + ?Sized>(
        &self,
        ctx: &CallContext,
        custody: &mut C,
    ) -> Result<(), AmmError> {
        self.settle("sync", custody, |custody| self.stage_sync(ctx, custody))?;
        debug!(pair = %self.address, sender = %ctx.sender, "sync");
        Ok(())
    }

    /// Sends any balance above the reserves to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::Underflow`] if a balance is below its reserve.
    pub fn skim<C: AssetCustody + ?Sized>(
        &self,
        ctx: &CallContext,
        custody: &mut C,
        to: Address,
    ) -> Result<SkimOutcome, AmmError> {
        let outcome = self.settle("skim", custody, |custody| self.stage_skim(custody, to))?;
        debug!(
            pair = %self.address,
            sender = %ctx.sender,
            %to,
            amount_a = %outcome.amount_a,
            amount_b = %outcome.amount_b,
            "skim"
        );
        Ok(outcome)
    }

    /// Sends the pair's whole balance of a foreign `token` to the recoverer.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::InvalidTokenToRecover`] if `token` is one of the assets.
    /// - [`AmmError::RecovererNotSet`] if no recoverer is configured.
    pub fn recover_token<C: AssetCustody + ?Sized>(
        &self,
        ctx: &CallContext,
        custody: &mut C,
        token: Address,
    ) -> Result<Amount, AmmError> {
        let amount = self.settle("recover_token", custody, |custody| {
            self.stage_recover(custody, token)
        })?;
        debug!(pair = %self.address, sender = %ctx.sender, %token, %amount, "recover_token");
        Ok(amount)
    }

    // -- shares ---------------------------------------------------------------

    /// Moves `amount` of the caller's shares to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if another operation is in flight.
    /// - [`AmmError::InsufficientBalance`] if the caller holds too few shares.
    pub fn transfer_shares(
        &self,
        ctx: &CallContext,
        to: Address,
        amount: Shares,
    ) -> Result<(), AmmError> {
        let _guard = ReentrancyGuard::enter(&self.lock)?;
        let events = {
            let mut state = self.state.write();
            state.shares.transfer(ctx.sender, to, amount)?;
            state.shares.take_transfers()
        };
        self.events.lock().extend(events);
        debug!(pair = %self.address, from = %ctx.sender, %to, %amount, "transfer_shares");
        Ok(())
    }

    // -- governance -----------------------------------------------------------

    /// Changes the swap fee.  Factory only.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the factory.
    /// - [`AmmError::InvalidFee`] above [`MAX_SWAP_FEE`](crate::config::MAX_SWAP_FEE).
    pub fn set_swap_fee(&self, ctx: &CallContext, fee: BasisPoints) -> Result<(), AmmError> {
        self.govern(ctx, |config| config.set_swap_fee(fee))?;
        info!(pair = %self.address, swap_fee = %fee, "swap fee updated");
        Ok(())
    }

    /// Changes the platform fee.  Factory only.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the factory.
    /// - [`AmmError::InvalidFee`] above
    ///   [`MAX_PLATFORM_FEE`](crate::config::MAX_PLATFORM_FEE).
    pub fn set_platform_fee(&self, ctx: &CallContext, fee: BasisPoints) -> Result<(), AmmError> {
        self.govern(ctx, |config| config.set_platform_fee(fee))?;
        info!(pair = %self.address, platform_fee = %fee, "platform fee updated");
        Ok(())
    }

    /// Changes (or clears) the platform-fee recipient.  Factory only.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] if the caller is not the factory.
    pub fn set_platform_fee_to(
        &self,
        ctx: &CallContext,
        to: Option<Address>,
    ) -> Result<(), AmmError> {
        self.govern(ctx, |config| {
            config.set_platform_fee_to(to);
            Ok(())
        })?;
        info!(pair = %self.address, platform_fee_to = ?to, "platform fee recipient updated");
        Ok(())
    }

    /// Changes (or clears) the recoverer.  Factory only.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] if the caller is not the factory.
    pub fn set_recoverer(
        &self,
        ctx: &CallContext,
        recoverer: Option<Address>,
    ) -> Result<(), AmmError> {
        self.govern(ctx, |config| {
            config.set_recoverer(recoverer);
            Ok(())
        })?;
        info!(pair = %self.address, recoverer = ?recoverer, "recoverer updated");
        Ok(())
    }

    fn govern<F>(&self, ctx: &CallContext, update: F) -> Result<(), AmmError>
    where
        F: FnOnce(&mut PairConfig) -> Result<(), AmmError>,
    {
        if ctx.sender != self.factory {
            return Err(AmmError::Forbidden("caller is not the pair's factory"));
        }
        let _guard = ReentrancyGuard::enter(&self.lock)?;
        let mut state = self.state.write();
        let mut config = state.config;
        update(&mut config)?;
        state.config = config;
        Ok(())
    }

    // -- settlement -----------------------------------------------------------

    fn settle<C, T, F>(&self, op: &'static str, custody: &mut C, body: F) -> Result<T, AmmError>
    where
        C: AssetCustody + ?Sized,
        F: FnOnce(&mut dyn AssetCustody) -> Result<Settlement<T>, AmmError>,
    {
        let _guard = ReentrancyGuard::enter(&self.lock)?;
        let mut journal = Journal::new(custody);
        match body(&mut journal) {
            Ok(settlement) => {
                journal.commit();
                settlement.staged.apply(&mut self.state.write());
                self.events.lock().extend(settlement.events);
                Ok(settlement.outcome)
            }
            Err(err) => {
                warn!(
                    pair = %self.address,
                    op,
                    error = %err,
                    transfers = journal.len(),
                    "operation aborted, rolling back"
                );
                if journal.rollback().is_err() {
                    error!(pair = %self.address, op, "custody could not be fully restored");
                }
                Err(err)
            }
        }
    }

    fn balances(&self, custody: &dyn AssetCustody) -> (Amount, Amount) {
        (
            custody.balance_of(&self.tokens.token_a(), &self.address),
            custody.balance_of(&self.tokens.token_b(), &self.address),
        )
    }

    /// Mints the platform's cut of invariant growth into `staged`.
    fn mint_platform_fee(
        staged: &mut PairState,
        reserve_a: U112,
        reserve_b: U112,
    ) -> Result<Shares, AmmError> {
        let Some(fee_to) = staged.config.platform_fee_to() else {
            return Ok(Shares::ZERO);
        };
        let shares = fees::platform_fee_shares(
            staged.k_last,
            reserve_a,
            reserve_b,
            staged.shares.total_supply(),
            staged.config.platform_fee(),
        )?;
        if !shares.is_zero() {
            staged.shares.mint(fee_to, shares)?;
        }
        Ok(shares)
    }

    fn stage_mint(
        &self,
        ctx: &CallContext,
        custody: &mut dyn AssetCustody,
        to: Address,
    ) -> Result<Settlement<MintOutcome>, AmmError> {
        let mut staged = self.state.read().clone();
        let (reserve_a, reserve_b) = staged.reserves.reserves();
        let (balance_a, balance_b) = self.balances(custody);
        let amount_a = balance_a
            .checked_sub(&reserve_a.amount())
            .ok_or(AmmError::Underflow("balance of asset A is below its reserve"))?;
        let amount_b = balance_b
            .checked_sub(&reserve_b.amount())
            .ok_or(AmmError::Underflow("balance of asset B is below its reserve"))?;

        let platform_fee = Self::mint_platform_fee(&mut staged, reserve_a, reserve_b)?;
        let total_supply = staged.shares.total_supply();
        let liquidity = if total_supply.is_zero() {
            // sqrt of a 256-bit value always fits in 128 bits.
            let root = integer_sqrt(amount_a.widen() * amount_b.widen()).as_u128();
            Shares::new(root.saturating_sub(MINIMUM_LIQUIDITY.get()))
        } else {
            let from_a = mul_div_down(amount_a.get(), total_supply.get(), reserve_a.get())?;
            let from_b = mul_div_down(amount_b.get(), total_supply.get(), reserve_b.get())?;
            Shares::new(from_a.min(from_b))
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }

        staged.shares.mint(to, liquidity)?;
        staged
            .reserves
            .update(balance_a, balance_b, ctx.block_timestamp())?;
        staged.k_last = staged.reserves.k();

        let mut events = staged.shares.take_transfers();
        events.push(sync_event(&staged));
        events.push(PoolEvent::Mint {
            sender: ctx.sender,
            amount_a,
            amount_b,
        });
        let outcome = MintOutcome {
            liquidity,
            amount_a,
            amount_b,
            platform_fee,
        };
        Ok(Settlement::new(Staged::Full(Box::new(staged)), events, outcome))
    }

    fn stage_burn(
        &self,
        ctx: &CallContext,
        custody: &mut dyn AssetCustody,
        to: Address,
    ) -> Result<Settlement<BurnOutcome>, AmmError> {
        let mut staged = self.state.read().clone();
        let (reserve_a, reserve_b) = staged.reserves.reserves();
        let (balance_a, balance_b) = self.balances(custody);
        let liquidity = staged.shares.balance_of(&self.address);

        let platform_fee = Self::mint_platform_fee(&mut staged, reserve_a, reserve_b)?;
        let total_supply = staged.shares.total_supply();
        if total_supply.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        // Pro-rata on balances, not reserves, so unsynced donations are shared.
        let amount_a = Amount::new(mul_div_down(
            liquidity.get(),
            balance_a.get(),
            total_supply.get(),
        )?);
        let amount_b = Amount::new(mul_div_down(
            liquidity.get(),
            balance_b.get(),
            total_supply.get(),
        )?);
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        staged.shares.burn(self.address, liquidity)?;
        custody.transfer(&self.tokens.token_a(), &self.address, &to, amount_a)?;
        custody.transfer(&self.tokens.token_b(), &self.address, &to, amount_b)?;

        let (balance_a, balance_b) = self.balances(custody);
        staged
            .reserves
            .update(balance_a, balance_b, ctx.block_timestamp())?;
        staged.k_last = staged.reserves.k();

        let mut events = staged.shares.take_transfers();
        events.push(sync_event(&staged));
        events.push(PoolEvent::Burn {
            sender: ctx.sender,
            amount_a,
            amount_b,
            to,
        });
        let outcome = BurnOutcome {
            liquidity,
            amount_a,
            amount_b,
            platform_fee,
        };
        Ok(Settlement::new(Staged::Full(Box::new(staged)), events, outcome))
    }

    fn stage_swap(
        &self,
        ctx: &CallContext,
        custody: &mut dyn AssetCustody,
        request: SwapRequest<'_>,
        callee: Option<&mut dyn FlashSwapCallee>,
    ) -> Result<Settlement<SwapOutcome>, AmmError> {
        let SwapRequest {
            amount_a_out,
            amount_b_out,
            to,
            data,
        } = request;
        if amount_a_out.is_zero() && amount_b_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }

        let (mut reserves, swap_fee) = {
            let state = self.state.read();
            (state.reserves, state.config.swap_fee())
        };
        let (reserve_a, reserve_b) = reserves.reserves();
        if amount_a_out.get() >= reserve_a.get() || amount_b_out.get() >= reserve_b.get() {
            return Err(AmmError::InsufficientLiquidity);
        }
        if self.tokens.contains(&to) || to == self.address {
            return Err(AmmError::InvalidRecipient);
        }
        let callee = match (data.is_empty(), callee) {
            (true, _) => None,
            (false, Some(callee)) => Some(callee),
            (false, None) => return Err(AmmError::MissingCallee),
        };

        // Optimistic transfer; repayment is verified below.
        if !amount_a_out.is_zero() {
            custody.transfer(&self.tokens.token_a(), &self.address, &to, amount_a_out)?;
        }
        if !amount_b_out.is_zero() {
            custody.transfer(&self.tokens.token_b(), &self.address, &to, amount_b_out)?;
        }
        if let Some(callee) = callee {
            callee.on_flash_swap(ctx.sender, amount_a_out, amount_b_out, data, custody)?;
        }

        let (balance_a, balance_b) = self.balances(custody);
        let amount_a_in = balance_a.saturating_sub(&reserve_a.amount().saturating_sub(&amount_a_out));
        let amount_b_in = balance_b.saturating_sub(&reserve_b.amount().saturating_sub(&amount_b_out));
        if amount_a_in.is_zero() && amount_b_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        fees::check_invariant(
            (balance_a, balance_b),
            (amount_a_in, amount_b_in),
            (reserve_a, reserve_b),
            swap_fee,
        )?;
        reserves.update(balance_a, balance_b, ctx.block_timestamp())?;

        let (new_a, new_b) = reserves.reserves();
        let events = vec![
            PoolEvent::Sync {
                reserve_a: new_a,
                reserve_b: new_b,
            },
            PoolEvent::Swap {
                sender: ctx.sender,
                amount_a_in,
                amount_b_in,
                amount_a_out,
                amount_b_out,
                to,
            },
        ];
        let outcome = SwapOutcome {
            amount_a_in,
            amount_b_in,
            amount_a_out,
            amount_b_out,
        };
        Ok(Settlement::new(Staged::Reserves(reserves), events, outcome))
    }

    fn stage_sync(
        &self,
        ctx: &CallContext,
        custody: &mut dyn AssetCustody,
    ) -> Result<Settlement<()>, AmmError> {
        let mut reserves = self.state.read().reserves;
        let (balance_a, balance_b) = self.balances(custody);
        reserves.update(balance_a, balance_b, ctx.block_timestamp())?;
        let (reserve_a, reserve_b) = reserves.reserves();
        let events = vec![PoolEvent::Sync {
            reserve_a,
            reserve_b,
        }];
        Ok(Settlement::new(Staged::Reserves(reserves), events, ()))
    }

    fn stage_skim(
        &self,
        custody: &mut dyn AssetCustody,
        to: Address,
    ) -> Result<Settlement<SkimOutcome>, AmmError> {
        let (reserve_a, reserve_b) = self.state.read().reserves.reserves();
        let (balance_a, balance_b) = self.balances(custody);
        let amount_a = balance_a
            .checked_sub(&reserve_a.amount())
            .ok_or(AmmError::Underflow("balance of asset A is below its reserve"))?;
        let amount_b = balance_b
            .checked_sub(&reserve_b.amount())
            .ok_or(AmmError::Underflow("balance of asset B is below its reserve"))?;

        if !amount_a.is_zero() {
            custody.transfer(&self.tokens.token_a(), &self.address, &to, amount_a)?;
        }
        if !amount_b.is_zero() {
            custody.transfer(&self.tokens.token_b(), &self.address, &to, amount_b)?;
        }
        let outcome = SkimOutcome { amount_a, amount_b };
        Ok(Settlement::new(Staged::Unchanged, Vec::new(), outcome))
    }

    fn stage_recover(
        &self,
        custody: &mut dyn AssetCustody,
        token: Address,
    ) -> Result<Settlement<Amount>, AmmError> {
        if self.tokens.contains(&token) {
            return Err(AmmError::InvalidTokenToRecover);
        }
        let recoverer = self
            .state
            .read()
            .config
            .recoverer()
            .ok_or(AmmError::RecovererNotSet)?;
        let amount = custody.balance_of(&token, &self.address);
        if !amount.is_zero() {
            custody.transfer(&token, &self.address, &recoverer, amount)?;
        }
        Ok(Settlement::new(Staged::Unchanged, Vec::new(), amount))
    }
}

fn sync_event(state: &PairState) -> PoolEvent {
    let (reserve_a, reserve_b) = state.reserves.reserves();
    PoolEvent::Sync {
        reserve_a,
        reserve_b,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::custody::TokenLedger;

    const TOKEN_X: Address = Address::from_bytes([1u8; 32]);
    const TOKEN_Y: Address = Address::from_bytes([2u8; 32]);
    const PAIR: Address = Address::from_bytes([0xaa; 32]);
    const FACTORY: Address = Address::from_bytes([0xfa; 32]);
    const ALICE: Address = Address::from_bytes([0xa1; 32]);

    fn make_pair() -> Pair {
        let Ok(tokens) = TokenPair::new(TOKEN_X, TOKEN_Y) else {
            panic!("distinct tokens");
        };
        let Ok(pair) = Pair::new(PAIR, FACTORY, tokens, PairConfig::default()) else {
            panic!("valid pair");
        };
        pair
    }

    fn funded(a: u128, b: u128) -> (Pair, TokenLedger) {
        let pair = make_pair();
        let mut ledger = TokenLedger::new();
        let (Ok(()), Ok(())) = (
            ledger.mint(&TOKEN_X, &PAIR, Amount::new(a)),
            ledger.mint(&TOKEN_Y, &PAIR, Amount::new(b)),
        ) else {
            panic!("fund");
        };
        (pair, ledger)
    }

    #[test]
    fn pair_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pair>();
    }

    #[test]
    fn zero_address_rejected() {
        let Ok(tokens) = TokenPair::new(TOKEN_X, TOKEN_Y) else {
            panic!("distinct tokens");
        };
        assert!(matches!(
            Pair::new(Address::ZERO, FACTORY, tokens, PairConfig::default()),
            Err(AmmError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Pair::new(TOKEN_X, FACTORY, tokens, PairConfig::default()),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn fresh_pair_is_empty() {
        let pair = make_pair();
        assert_eq!(pair.reserves(), (U112::ZERO, U112::ZERO, 0));
        assert_eq!(pair.total_supply(), Shares::ZERO);
        assert_eq!(pair.k_last(), U256::ZERO);
        assert!(pair.take_events().is_empty());
    }

    #[test]
    fn first_mint_locks_minimum_liquidity() {
        let (pair, mut ledger) = funded(4_000, 9_000);
        let ctx = CallContext::new(ALICE, 10);
        let Ok(out) = pair.mint(&ctx, &mut ledger, ALICE) else {
            panic!("mint");
        };
        assert_eq!(out.liquidity, Shares::new(6_000 - 1_000));
        assert_eq!(pair.share_balance_of(&Address::ZERO), MINIMUM_LIQUIDITY);
        assert_eq!(pair.total_supply(), Shares::new(6_000));
        assert_eq!(pair.k_last(), U256::from(36_000_000u32));
        let (a, b, ts) = pair.reserves();
        assert_eq!((a.get(), b.get(), ts), (4_000, 9_000, 10));
    }

    #[test]
    fn mint_below_minimum_fails_without_side_effects() {
        let (pair, mut ledger) = funded(1_000, 1_000);
        let ctx = CallContext::new(ALICE, 1);
        assert_eq!(
            pair.mint(&ctx, &mut ledger, ALICE),
            Err(AmmError::InsufficientLiquidityMinted)
        );
        assert_eq!(pair.total_supply(), Shares::ZERO);
        assert!(pair.take_events().is_empty());
    }

    #[test]
    fn swap_requires_output() {
        let (pair, mut ledger) = funded(10_000, 10_000);
        let ctx = CallContext::new(ALICE, 1);
        let request = SwapRequest::new(Amount::ZERO, Amount::ZERO, ALICE);
        assert_eq!(
            pair.swap(&ctx, &mut ledger, request, None),
            Err(AmmError::InsufficientOutputAmount)
        );
    }

    #[test]
    fn swap_rejects_asset_as_recipient() {
        let (pair, mut ledger) = funded(10_000, 10_000);
        let ctx = CallContext::new(ALICE, 1);
        let Ok(_) = pair.mint(&ctx, &mut ledger, ALICE) else {
            panic!("mint");
        };
        let request = SwapRequest::new(Amount::new(1), Amount::ZERO, TOKEN_Y);
        assert_eq!(
            pair.swap(&ctx, &mut ledger, request, None),
            Err(AmmError::InvalidRecipient)
        );
    }

    #[test]
    fn swap_rejects_pair_as_recipient_even_without_fee() {
        let Ok(tokens) = TokenPair::new(TOKEN_X, TOKEN_Y) else {
            panic!("distinct tokens");
        };
        let Ok(config) = PairConfig::new(BasisPoints::ZERO, BasisPoints::ZERO) else {
            panic!("valid config");
        };
        let Ok(pair) = Pair::new(PAIR, FACTORY, tokens, config) else {
            panic!("valid pair");
        };
        let mut ledger = TokenLedger::new();
        let five = 5_000_000_000_000_000_000u128;
        let (Ok(()), Ok(())) = (
            ledger.mint(&TOKEN_X, &PAIR, Amount::new(five)),
            ledger.mint(&TOKEN_Y, &PAIR, Amount::new(2 * five)),
        ) else {
            panic!("fund");
        };
        let ctx = CallContext::new(ALICE, 1);
        let Ok(_) = pair.mint(&ctx, &mut ledger, ALICE) else {
            panic!("mint");
        };
        let _ = pair.take_events();
        let before = ledger.clone();
        let reserves = pair.reserves();

        let request = SwapRequest::new(
            Amount::new(1_000_000_000_000_000_000),
            Amount::ZERO,
            PAIR,
        );
        assert_eq!(
            pair.swap(&ctx, &mut ledger, request, None),
            Err(AmmError::InvalidRecipient)
        );
        assert_eq!(ledger, before);
        assert_eq!(pair.reserves(), reserves);
        assert!(pair.take_events().is_empty());
    }

    #[test]
    fn swap_data_without_callee_fails_before_transfers() {
        let (pair, mut ledger) = funded(10_000, 10_000);
        let ctx = CallContext::new(ALICE, 1);
        let Ok(_) = pair.mint(&ctx, &mut ledger, ALICE) else {
            panic!("mint");
        };
        let before = ledger.clone();
        let request = SwapRequest::new(Amount::new(10), Amount::ZERO, ALICE).with_data(b"x");
        assert_eq!(
            pair.swap(&ctx, &mut ledger, request, None),
            Err(AmmError::MissingCallee)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn failed_swap_rolls_back_optimistic_transfer() {
        let (pair, mut ledger) = funded(10_000, 10_000);
        let ctx = CallContext::new(ALICE, 1);
        let Ok(_) = pair.mint(&ctx, &mut ledger, ALICE) else {
            panic!("mint");
        };
        let _ = pair.take_events();
        let before = ledger.clone();
        let request = SwapRequest::new(Amount::new(10), Amount::ZERO, ALICE);
        assert_eq!(
            pair.swap(&ctx, &mut ledger, request, None),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(ledger, before);
        assert!(pair.take_events().is_empty());
    }

    #[test]
    fn governance_is_factory_only() {
        let pair = make_pair();
        let stranger = CallContext::new(ALICE, 0);
        assert!(matches!(
            pair.set_swap_fee(&stranger, BasisPoints::new(10)),
            Err(AmmError::Forbidden(_))
        ));
        let factory = CallContext::new(FACTORY, 0);
        assert_eq!(pair.set_swap_fee(&factory, BasisPoints::new(10)), Ok(()));
        assert_eq!(pair.config().swap_fee(), BasisPoints::new(10));
        assert!(matches!(
            pair.set_swap_fee(&factory, BasisPoints::new(201)),
            Err(AmmError::InvalidFee(_))
        ));
        assert_eq!(pair.config().swap_fee(), BasisPoints::new(10));
    }

    #[test]
    fn held_lock_rejects_every_mutator() {
        let (pair, mut ledger) = funded(10_000, 10_000);
        let ctx = CallContext::new(FACTORY, 1);
        let Ok(_guard) = ReentrancyGuard::enter(&pair.lock) else {
            panic!("guard");
        };
        assert_eq!(pair.mint(&ctx, &mut ledger, ALICE), Err(AmmError::Locked));
        assert_eq!(pair.sync(&ctx, &mut ledger), Err(AmmError::Locked));
        assert_eq!(pair.skim(&ctx, &mut ledger, ALICE), Err(AmmError::Locked));
        assert_eq!(
            pair.transfer_shares(&ctx, ALICE, Shares::ZERO),
            Err(AmmError::Locked)
        );
        assert_eq!(
            pair.set_platform_fee_to(&ctx, Some(ALICE)),
            Err(AmmError::Locked)
        );
        assert_eq!(pair.reserves(), (U112::ZERO, U112::ZERO, 0));
    }

    #[test]
    fn quotes_follow_reserves() {
        let (pair, mut ledger) = funded(5_000_000, 10_000_000);
        let ctx = CallContext::new(ALICE, 1);
        let Ok(_) = pair.mint(&ctx, &mut ledger, ALICE) else {
            panic!("mint");
        };
        let Ok(out) = pair.quote_amount_out(&TOKEN_X, Amount::new(1_000_000)) else {
            panic!("quote");
        };
        let Ok(back) = pair.quote_amount_in(&TOKEN_X, out) else {
            panic!("quote");
        };
        assert!(back <= Amount::new(1_000_000));
        assert!(matches!(
            pair.quote_amount_out(&ALICE, Amount::new(1)),
            Err(AmmError::InvalidToken(_))
        ));
    }
}

//! Pair registry and fee governance.

use std::collections::BTreeMap;
use std::sync::Arc;

use sha3::{Digest, Keccak256};
use tracing::info;

use crate::config::FactoryConfig;
use crate::domain::{Address, BasisPoints, CallContext, TokenPair};
use crate::error::AmmError;
use crate::pair::Pair;

/// Creates pairs and owns their fee configuration.
///
/// Anyone may create a pair; every configuration change requires the
/// caller to be the configured owner.  The factory acts on its pairs under
/// its own address, which each pair checks as its governance account.
///
/// Pairs are shared as `Arc<Pair>` so hosts can settle on several pairs
/// from several threads while the factory keeps its registry.
///
/// # Examples
///
/// ```
/// use reservoir_amm::prelude::*;
///
/// let owner = Address::from_bytes([0x0f; 32]);
/// let config = FactoryConfig::new(owner).expect("valid owner");
/// let mut factory = PairFactory::new(Address::from_bytes([0xfa; 32]), config);
///
/// let token_x = Address::from_bytes([2u8; 32]);
/// let token_y = Address::from_bytes([1u8; 32]);
/// let pair = factory.create_pair(token_x, token_y).expect("created");
///
/// assert_eq!(pair.tokens().token_a(), token_y);
/// assert!(factory.get_pair(token_y, token_x).is_some());
/// assert_eq!(factory.all_pairs_len(), 1);
/// ```
#[derive(Debug)]
pub struct PairFactory {
    address: Address,
    config: FactoryConfig,
    pairs: BTreeMap<TokenPair, Arc<Pair>>,
    all_pairs: Vec<Arc<Pair>>,
}

impl PairFactory {
    /// Creates an empty factory acting under `address`.
    #[must_use]
    pub fn new(address: Address, config: FactoryConfig) -> Self {
        Self {
            address,
            config,
            pairs: BTreeMap::new(),
            all_pairs: Vec::new(),
        }
    }

    /// The factory's governance address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Current defaults and roles.
    #[must_use]
    pub const fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Deterministic custody address of the pair for `tokens`:
    /// `keccak256(factory ‖ token_a ‖ token_b)`.
    #[must_use]
    pub fn pair_address(&self, tokens: &TokenPair) -> Address {
        let mut hasher = Keccak256::new();
        hasher.update(self.address.as_bytes());
        hasher.update(tokens.token_a().as_bytes());
        hasher.update(tokens.token_b().as_bytes());
        Address::from_bytes(hasher.finalize().into())
    }

    /// Registers a new pair for two assets, in either order.
    ///
    /// The pair inherits the factory's default fees, platform-fee recipient
    /// and recoverer.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if the assets are identical or zero.
    /// - [`AmmError::PairExists`] if a pair for these assets is registered.
    pub fn create_pair(
        &mut self,
        token_x: Address,
        token_y: Address,
    ) -> Result<Arc<Pair>, AmmError> {
        let tokens = TokenPair::new(token_x, token_y)?;
        if self.pairs.contains_key(&tokens) {
            return Err(AmmError::PairExists);
        }
        let address = self.pair_address(&tokens);
        let pair = Arc::new(Pair::new(
            address,
            self.address,
            tokens,
            self.config.pair_config(),
        )?);
        self.pairs.insert(tokens, Arc::clone(&pair));
        self.all_pairs.push(Arc::clone(&pair));
        info!(
            factory = %self.address,
            pair = %address,
            token_a = %tokens.token_a(),
            token_b = %tokens.token_b(),
            index = self.all_pairs.len() - 1,
            "pair created"
        );
        Ok(pair)
    }

    /// The pair for two assets, in either order.
    #[must_use]
    pub fn get_pair(&self, token_x: Address, token_y: Address) -> Option<Arc<Pair>> {
        let tokens = TokenPair::new(token_x, token_y).ok()?;
        self.pairs.get(&tokens).cloned()
    }

    /// Every pair in creation order.
    #[must_use]
    pub fn all_pairs(&self) -> &[Arc<Pair>] {
        &self.all_pairs
    }

    /// Number of pairs created so far.
    #[must_use]
    pub fn all_pairs_len(&self) -> usize {
        self.all_pairs.len()
    }

    // -- per-pair governance --------------------------------------------------

    /// Changes one pair's swap fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::PairNotFound`] if no such pair exists.
    /// - Any error of [`Pair::set_swap_fee`].
    pub fn set_swap_fee_for_pair(
        &self,
        ctx: &CallContext,
        token_x: Address,
        token_y: Address,
        fee: BasisPoints,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.lookup(token_x, token_y)?
            .set_swap_fee(&self.acting(ctx), fee)
    }

    /// Changes one pair's platform fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::PairNotFound`] if no such pair exists.
    /// - Any error of [`Pair::set_platform_fee`].
    pub fn set_platform_fee_for_pair(
        &self,
        ctx: &CallContext,
        token_x: Address,
        token_y: Address,
        fee: BasisPoints,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.lookup(token_x, token_y)?
            .set_platform_fee(&self.acting(ctx), fee)
    }

    /// Changes (or clears) one pair's recoverer.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::PairNotFound`] if no such pair exists.
    pub fn set_recoverer(
        &self,
        ctx: &CallContext,
        token_x: Address,
        token_y: Address,
        recoverer: Option<Address>,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.lookup(token_x, token_y)?
            .set_recoverer(&self.acting(ctx), recoverer)
    }

    // -- factory-wide governance ----------------------------------------------

    /// Changes the platform-fee recipient for the factory and every pair.
    ///
    /// Pairs are updated in creation order; if one is busy the call stops
    /// with [`AmmError::Locked`] and earlier pairs keep the new recipient.
    /// Repeating the call completes the propagation.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::Locked`] if a pair is mid-operation.
    pub fn set_platform_fee_to(
        &mut self,
        ctx: &CallContext,
        to: Option<Address>,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.config.set_platform_fee_to(to);
        let acting = self.acting(ctx);
        for pair in &self.all_pairs {
            pair.set_platform_fee_to(&acting, to)?;
        }
        info!(factory = %self.address, platform_fee_to = ?to, pairs = self.all_pairs.len(), "platform fee recipient propagated");
        Ok(())
    }

    /// Changes the swap fee inherited by future pairs.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::InvalidFee`] above the swap-fee bound.
    pub fn set_default_swap_fee(
        &mut self,
        ctx: &CallContext,
        fee: BasisPoints,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.config.set_default_swap_fee(fee)?;
        info!(factory = %self.address, swap_fee = %fee, "default swap fee updated");
        Ok(())
    }

    /// Changes the platform fee inherited by future pairs.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::InvalidFee`] above the platform-fee bound.
    pub fn set_default_platform_fee(
        &mut self,
        ctx: &CallContext,
        fee: BasisPoints,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.config.set_default_platform_fee(fee)?;
        info!(factory = %self.address, platform_fee = %fee, "default platform fee updated");
        Ok(())
    }

    /// Changes the recoverer inherited by future pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] if the caller is not the owner.
    pub fn set_default_recoverer(
        &mut self,
        ctx: &CallContext,
        recoverer: Option<Address>,
    ) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.config.set_default_recoverer(recoverer);
        info!(factory = %self.address, recoverer = ?recoverer, "default recoverer updated");
        Ok(())
    }

    /// Hands ownership to `owner`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if the caller is not the owner.
    /// - [`AmmError::InvalidConfiguration`] if `owner` is zero.
    pub fn set_owner(&mut self, ctx: &CallContext, owner: Address) -> Result<(), AmmError> {
        self.ensure_owner(ctx)?;
        self.config.set_owner(owner)?;
        info!(factory = %self.address, %owner, "owner updated");
        Ok(())
    }

    fn ensure_owner(&self, ctx: &CallContext) -> Result<(), AmmError> {
        if ctx.sender == self.config.owner() {
            Ok(())
        } else {
            Err(AmmError::Forbidden("caller is not the factory owner"))
        }
    }

    fn lookup(&self, token_x: Address, token_y: Address) -> Result<Arc<Pair>, AmmError> {
        self.get_pair(token_x, token_y).ok_or(AmmError::PairNotFound)
    }

    /// The context the factory presents to its pairs.
    const fn acting(&self, ctx: &CallContext) -> CallContext {
        CallContext::new(self.address, ctx.timestamp)
    }
}

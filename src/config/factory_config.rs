//! Factory-wide defaults and governance roles.

use super::PairConfig;
use crate::domain::{Address, BasisPoints};
use crate::error::AmmError;

/// Defaults applied to every pair a [`PairFactory`](crate::factory::PairFactory)
/// creates, plus the owner allowed to change them.
///
/// The defaults mirror the classic constant-product fee structure: 30 bps
/// swap fee and no platform fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactoryConfig {
    owner: Address,
    default_swap_fee: BasisPoints,
    default_platform_fee: BasisPoints,
    platform_fee_to: Option<Address>,
    default_recoverer: Option<Address>,
}

impl FactoryConfig {
    /// Creates a configuration owned by `owner` with default fees.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `owner` is the zero
    /// address.
    pub fn new(owner: Address) -> Result<Self, AmmError> {
        let defaults = PairConfig::default();
        let config = Self {
            owner,
            default_swap_fee: defaults.swap_fee(),
            default_platform_fee: defaults.platform_fee(),
            platform_fee_to: None,
            default_recoverer: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Overrides the default fees.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if either fee exceeds its bound.
    pub fn with_default_fees(
        mut self,
        swap_fee: BasisPoints,
        platform_fee: BasisPoints,
    ) -> Result<Self, AmmError> {
        self.default_swap_fee = swap_fee;
        self.default_platform_fee = platform_fee;
        self.validate()?;
        Ok(self)
    }

    /// Sets the platform-fee recipient inherited by new pairs.
    #[must_use]
    pub fn with_platform_fee_to(mut self, to: Address) -> Self {
        self.platform_fee_to = Some(to).filter(|a| !a.is_zero());
        self
    }

    /// Sets the recoverer inherited by new pairs.
    #[must_use]
    pub fn with_default_recoverer(mut self, recoverer: Address) -> Self {
        self.default_recoverer = Some(recoverer).filter(|a| !a.is_zero());
        self
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the owner is the zero address.
    /// - [`AmmError::InvalidFee`] if a default fee exceeds its bound.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.owner.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "factory owner must not be the zero address",
            ));
        }
        self.pair_config().validate()
    }

    /// The configuration a freshly created pair starts with.
    #[must_use]
    pub fn pair_config(&self) -> PairConfig {
        PairConfig::from_parts(
            self.default_swap_fee,
            self.default_platform_fee,
            self.platform_fee_to,
            self.default_recoverer,
        )
    }

    /// Returns the governance owner.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the default swap fee.
    #[must_use]
    pub const fn default_swap_fee(&self) -> BasisPoints {
        self.default_swap_fee
    }

    /// Returns the default platform fee.
    #[must_use]
    pub const fn default_platform_fee(&self) -> BasisPoints {
        self.default_platform_fee
    }

    /// Returns the platform-fee recipient, if any.
    #[must_use]
    pub const fn platform_fee_to(&self) -> Option<Address> {
        self.platform_fee_to
    }

    /// Returns the default recoverer, if any.
    #[must_use]
    pub const fn default_recoverer(&self) -> Option<Address> {
        self.default_recoverer
    }

    pub(crate) fn set_owner(&mut self, owner: Address) -> Result<(), AmmError> {
        if owner.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "factory owner must not be the zero address",
            ));
        }
        self.owner = owner;
        Ok(())
    }

    pub(crate) fn set_default_swap_fee(&mut self, fee: BasisPoints) -> Result<(), AmmError> {
        let mut next = *self;
        next.default_swap_fee = fee;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub(crate) fn set_default_platform_fee(&mut self, fee: BasisPoints) -> Result<(), AmmError> {
        let mut next = *self;
        next.default_platform_fee = fee;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub(crate) fn set_platform_fee_to(&mut self, to: Option<Address>) {
        self.platform_fee_to = to.filter(|a| !a.is_zero());
    }

    pub(crate) fn set_default_recoverer(&mut self, recoverer: Option<Address>) {
        self.default_recoverer = recoverer.filter(|a| !a.is_zero());
    }
}

//! Per-pair fee and governance configuration.

use crate::domain::{Address, BasisPoints};
use crate::error::AmmError;

/// Upper bound for a pair's swap fee (2%).
pub const MAX_SWAP_FEE: BasisPoints = BasisPoints::new(200);

/// Upper bound for a pair's platform fee (50% of invariant growth).
pub const MAX_PLATFORM_FEE: BasisPoints = BasisPoints::new(5_000);

/// Fee schedule and governance addresses of a single pair.
///
/// A pair receives its configuration from the factory at creation and only
/// changes it through the factory-gated setters on [`Pair`](crate::pair::Pair).
///
/// # Validation
///
/// - `swap_fee <= MAX_SWAP_FEE`
/// - `platform_fee <= MAX_PLATFORM_FEE`
///
/// A zero `swap_fee` is allowed; the invariant is then preserved exactly
/// instead of growing on every swap.
///
/// # Examples
///
/// ```
/// use reservoir_amm::config::PairConfig;
/// use reservoir_amm::domain::BasisPoints;
///
/// let cfg = PairConfig::new(BasisPoints::new(30), BasisPoints::new(1_667)).expect("valid");
/// assert_eq!(cfg.swap_fee().get(), 30);
/// assert!(cfg.platform_fee_to().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairConfig {
    swap_fee: BasisPoints,
    platform_fee: BasisPoints,
    platform_fee_to: Option<Address>,
    recoverer: Option<Address>,
}

impl PairConfig {
    /// Creates a configuration with no platform-fee recipient and no
    /// recoverer.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if either fee exceeds its bound.
    pub fn new(swap_fee: BasisPoints, platform_fee: BasisPoints) -> Result<Self, AmmError> {
        let config = Self {
            swap_fee,
            platform_fee,
            platform_fee_to: None,
            recoverer: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the platform-fee recipient.  The zero address means "unset".
    #[must_use]
    pub fn with_platform_fee_to(mut self, to: Address) -> Self {
        self.platform_fee_to = Some(to).filter(|a| !a.is_zero());
        self
    }

    /// Sets the recoverer.  The zero address means "unset".
    #[must_use]
    pub fn with_recoverer(mut self, recoverer: Address) -> Self {
        self.recoverer = Some(recoverer).filter(|a| !a.is_zero());
        self
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if either fee exceeds its bound.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.swap_fee > MAX_SWAP_FEE {
            return Err(AmmError::InvalidFee("swap fee exceeds 200 bps"));
        }
        if self.platform_fee > MAX_PLATFORM_FEE {
            return Err(AmmError::InvalidFee("platform fee exceeds 5000 bps"));
        }
        Ok(())
    }

    /// Returns the swap fee charged on every input amount.
    #[must_use]
    pub const fn swap_fee(&self) -> BasisPoints {
        self.swap_fee
    }

    /// Returns the share of invariant growth minted to the platform.
    #[must_use]
    pub const fn platform_fee(&self) -> BasisPoints {
        self.platform_fee
    }

    /// Returns the platform-fee recipient, if any.
    #[must_use]
    pub const fn platform_fee_to(&self) -> Option<Address> {
        self.platform_fee_to
    }

    /// Returns the recoverer, if any.
    #[must_use]
    pub const fn recoverer(&self) -> Option<Address> {
        self.recoverer
    }

    pub(crate) const fn from_parts(
        swap_fee: BasisPoints,
        platform_fee: BasisPoints,
        platform_fee_to: Option<Address>,
        recoverer: Option<Address>,
    ) -> Self {
        Self {
            swap_fee,
            platform_fee,
            platform_fee_to,
            recoverer,
        }
    }

    pub(crate) fn set_swap_fee(&mut self, fee: BasisPoints) -> Result<(), AmmError> {
        let mut next = *self;
        next.swap_fee = fee;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub(crate) fn set_platform_fee(&mut self, fee: BasisPoints) -> Result<(), AmmError> {
        let mut next = *self;
        next.platform_fee = fee;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub(crate) fn set_platform_fee_to(&mut self, to: Option<Address>) {
        self.platform_fee_to = to.filter(|a| !a.is_zero());
    }

    pub(crate) fn set_recoverer(&mut self, recoverer: Option<Address>) {
        self.recoverer = recoverer.filter(|a| !a.is_zero());
    }
}

impl Default for PairConfig {
    /// 30 bps swap fee, platform fee off.
    fn default() -> Self {
        Self {
            swap_fee: BasisPoints::new(30),
            platform_fee: BasisPoints::ZERO,
            platform_fee_to: None,
            recoverer: None,
        }
    }
}

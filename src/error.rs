//! Unified error types for the settlement core.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every failure is an atomic abort: a pair operation that
//! returns `Err` leaves reserves, shares, accumulators and custody exactly
//! as they were before the call.

/// Every failure the settlement core can surface to a caller.
///
/// Variants carrying a `&'static str` describe *which* quantity or check
/// failed, so two overflows in different code paths remain distinguishable
/// in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum AmmError {
    /// A quantity exceeded its representable width (112-bit reserves,
    /// 256-bit intermediates, 128-bit share counts).
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would have produced a negative value.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by a zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    /// A deposit would mint zero shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would return zero of at least one asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// A swap requested zero output on both sides.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// A swap received no input on either side.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// A requested output meets or exceeds the corresponding reserve.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A share or asset balance is too small for the requested debit.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The fee-adjusted invariant product decreased across a swap.
    #[error("constant-product invariant violated")]
    KInvariantViolation,

    /// Attempted to recover one of the pair's own assets.
    #[error("token cannot be recovered from this pair")]
    InvalidTokenToRecover,

    /// Token recovery requested while no recoverer is configured.
    #[error("recoverer address is not set")]
    RecovererNotSet,

    /// A swap recipient equal to one of the pair's assets or the pair itself.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// A token identifier is not acceptable in this context.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// A fee parameter is outside its permitted range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// A configuration value is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The caller is not authorised for this operation.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// The pair is already executing an operation (reentrant call).
    #[error("pair is locked")]
    Locked,

    /// A pair for these two assets already exists.
    #[error("pair already exists")]
    PairExists,

    /// No pair is registered for these two assets.
    #[error("pair not found")]
    PairNotFound,

    /// Callback data was supplied to a swap without a callee to receive it.
    #[error("flash-swap data supplied without a callee")]
    MissingCallee,

    /// The custody collaborator refused a transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

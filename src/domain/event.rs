//! Observable notifications emitted by a pair.

use super::{Address, Amount, Shares, U112};

/// A notification committed by a successful pair operation.
///
/// Events are recorded only when the enclosing operation commits; an
/// aborted operation leaves no trace in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolEvent {
    /// Share balance movement.  Mints come from [`Address::ZERO`], burns go
    /// to [`Address::ZERO`].
    Transfer {
        from: Address,
        to: Address,
        amount: Shares,
    },
    /// Reserves were resynchronised.
    Sync { reserve_a: U112, reserve_b: U112 },
    /// Liquidity was deposited.
    Mint {
        sender: Address,
        amount_a: Amount,
        amount_b: Amount,
    },
    /// Liquidity was withdrawn.
    Burn {
        sender: Address,
        amount_a: Amount,
        amount_b: Amount,
        to: Address,
    },
    /// A swap settled.
    Swap {
        sender: Address,
        amount_a_in: Amount,
        amount_b_in: Amount,
        amount_a_out: Amount,
        amount_b_out: Amount,
        to: Address,
    },
}

/// Caller identity and block time accompanying every mutating call.
///
/// `timestamp` is taken as a full `u64`; the pair stores it modulo `2^32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallContext {
    /// The account invoking the operation.
    pub sender: Address,
    /// Seconds since an arbitrary epoch, as reported by the host.
    pub timestamp: u64,
}

impl CallContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(sender: Address, timestamp: u64) -> Self {
        Self { sender, timestamp }
    }

    /// The timestamp truncated to the 32-bit modulus used for storage.
    #[must_use]
    pub const fn block_timestamp(&self) -> u32 {
        (self.timestamp % (1u64 << 32)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_timestamp_wraps() {
        let ctx = CallContext::new(Address::ZERO, (1u64 << 32) + 5);
        assert_eq!(ctx.block_timestamp(), 5);
        let ctx = CallContext::new(Address::ZERO, u64::from(u32::MAX));
        assert_eq!(ctx.block_timestamp(), u32::MAX);
    }
}

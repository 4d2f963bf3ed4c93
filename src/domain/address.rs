//! Chain-agnostic account and asset identifier.

use core::fmt;

/// A chain-agnostic 32-byte identifier for accounts, assets and pairs.
///
/// The same type names a token (an asset), a holder of balances, a pair's
/// own custody account, and the protocol's burn sink.  Ordering is
/// lexicographic over the bytes; token pairs use it for canonical order.
///
/// # Examples
///
/// ```
/// use reservoir_amm::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(Address::ZERO < addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero address.
    ///
    /// Shares minted here are unrecoverable; it doubles as the "unset"
    /// sentinel in configuration fields that do not use `Option`.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for [`Address::ZERO`].
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; 32];
        assert_eq!(Address::from_bytes(bytes).as_bytes(), bytes);
    }

    #[test]
    fn zero_is_all_zeros() {
        assert_eq!(Address::ZERO.as_bytes(), [0u8; 32]);
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1u8; 32]).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut hi = [0u8; 32];
        hi[0] = 1;
        let mut lo = [0xffu8; 32];
        lo[0] = 0;
        assert!(Address::from_bytes(lo) < Address::from_bytes(hi));
    }

    #[test]
    fn display_is_hex() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xab;
        let s = Address::from_bytes(bytes).to_string();
        assert!(s.starts_with("0x00"));
        assert!(s.ends_with("ab"));
        assert_eq!(s.len(), 66);
    }
}

//! Canonically ordered pair of distinct asset identifiers.

use super::Address;
use crate::error::AmmError;

/// Which side of a pair an asset sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The lower-addressed asset (`tokenA`).
    A,
    /// The higher-addressed asset (`tokenB`).
    B,
}

/// An ordered pair of distinct assets, canonically sorted by address.
///
/// The canonical ordering guarantees `token_a < token_b`, so `(X, Y)` and
/// `(Y, X)` describe the same pair.  Ordering is fixed at construction and
/// never changes for the pair's lifetime.
///
/// # Examples
///
/// ```
/// use reservoir_amm::domain::{Address, TokenPair};
///
/// let x = Address::from_bytes([1u8; 32]);
/// let y = Address::from_bytes([2u8; 32]);
///
/// let pair = TokenPair::new(y, x).expect("distinct tokens");
/// assert_eq!(pair.token_a(), x);
/// assert_eq!(pair.token_b(), y);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenPair {
    token_a: Address,
    token_b: Address,
}

impl TokenPair {
    /// Creates a new canonically-ordered `TokenPair`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if both identifiers are equal.
    /// - [`AmmError::InvalidToken`] if either identifier is the zero address.
    pub fn new(token1: Address, token2: Address) -> Result<Self, AmmError> {
        if token1 == token2 {
            return Err(AmmError::InvalidToken(
                "token pair requires two distinct addresses",
            ));
        }

        let (token_a, token_b) = if token1 < token2 {
            (token1, token2)
        } else {
            (token2, token1)
        };

        if token_a.is_zero() {
            return Err(AmmError::InvalidToken("zero address is not a token"));
        }

        Ok(Self { token_a, token_b })
    }

    /// Returns the lower-addressed asset.
    #[must_use]
    pub const fn token_a(&self) -> Address {
        self.token_a
    }

    /// Returns the higher-addressed asset.
    #[must_use]
    pub const fn token_b(&self) -> Address {
        self.token_b
    }

    /// Returns `true` if `token` is one of the two assets.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// Returns the side `token` occupies.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token` is not in the pair.
    pub fn side_of(&self, token: &Address) -> Result<Side, AmmError> {
        if *token == self.token_a {
            Ok(Side::A)
        } else if *token == self.token_b {
            Ok(Side::B)
        } else {
            Err(AmmError::InvalidToken("token is not part of this pair"))
        }
    }

}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[test]
    fn preserves_sorted_input() {
        let Ok(pair) = TokenPair::new(addr(1), addr(2)) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.token_a(), addr(1));
        assert_eq!(pair.token_b(), addr(2));
    }

    #[test]
    fn sorts_reversed_input() {
        let (Ok(p1), Ok(p2)) = (TokenPair::new(addr(2), addr(1)), TokenPair::new(addr(1), addr(2)))
        else {
            panic!("expected Ok");
        };
        assert_eq!(p1, p2);
        assert_eq!(p1.token_a(), addr(1));
    }

    #[test]
    fn rejects_identical() {
        let Err(e) = TokenPair::new(addr(3), addr(3)) else {
            panic!("expected Err");
        };
        assert_eq!(
            e,
            AmmError::InvalidToken("token pair requires two distinct addresses")
        );
    }

    #[test]
    fn rejects_zero_address() {
        assert!(matches!(
            TokenPair::new(Address::ZERO, addr(3)),
            Err(AmmError::InvalidToken(_))
        ));
    }

    #[test]
    fn sides() {
        let Ok(pair) = TokenPair::new(addr(1), addr(2)) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.side_of(&addr(1)), Ok(Side::A));
        assert_eq!(pair.side_of(&addr(2)), Ok(Side::B));
        assert!(pair.side_of(&addr(9)).is_err());
        assert!(pair.contains(&addr(1)));
        assert!(!pair.contains(&addr(9)));
    }
}

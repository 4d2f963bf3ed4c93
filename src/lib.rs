//! # Reservoir AMM
//!
//! Invariant-preserving settlement core for two-asset constant-product
//! liquidity pairs.
//!
//! A [`Pair`](pair::Pair) holds reserves of two assets, issues proportional
//! shares to liquidity providers, settles swaps (including optimistic flash
//! swaps repaid inside a callback), skims a configurable platform cut of
//! invariant growth, and maintains manipulation-resistant cumulative price
//! accumulators.  Assets live behind the [`AssetCustody`](traits::AssetCustody)
//! seam; the crate ships an in-memory [`TokenLedger`](custody::TokenLedger)
//! for hosts and tests.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize`/`Deserialize` on configuration and value types |
//!
//! # Quick Start
//!
//! ```rust
//! use reservoir_amm::prelude::*;
//!
//! let owner = Address::from_bytes([0x0f; 32]);
//! let alice = Address::from_bytes([0xa1; 32]);
//! let usdc = Address::from_bytes([1u8; 32]);
//! let weth = Address::from_bytes([2u8; 32]);
//!
//! // 1. A factory creates the pair and owns its fee configuration
//! let config = FactoryConfig::new(owner).expect("valid owner");
//! let mut factory = PairFactory::new(Address::from_bytes([0xfa; 32]), config);
//! let pair = factory.create_pair(usdc, weth).expect("pair created");
//!
//! // 2. Deposit both assets into the pair's account, then mint shares
//! let mut ledger = TokenLedger::new();
//! ledger.mint(&usdc, &pair.address(), Amount::new(5_000_000)).expect("fund");
//! ledger.mint(&weth, &pair.address(), Amount::new(10_000_000)).expect("fund");
//! let ctx = CallContext::new(alice, 1_700_000_000);
//! pair.mint(&ctx, &mut ledger, alice).expect("minted");
//!
//! // 3. Pay the input in, then ask for the quoted output
//! ledger.mint(&usdc, &alice, Amount::new(1_000_000)).expect("fund");
//! ledger.transfer(&usdc, &alice, &pair.address(), Amount::new(1_000_000)).expect("pay");
//! let out = pair.quote_amount_out(&usdc, Amount::new(1_000_000)).expect("quote");
//! let request = SwapRequest::new(Amount::ZERO, out, alice);
//! pair.swap(&ctx, &mut ledger, request, None).expect("swapped");
//!
//! assert_eq!(ledger.balance_of(&weth, &alice), out);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ PairFactory  │  registry, fee governance
//! └──────┬──────┘
//!        │ Arc<Pair>
//!        ▼
//! ┌─────────────┐
//! │    Pair      │  mint / burn / swap / sync / skim / recover
//! └──────┬──────┘
//!        │ ShareLedger, ReserveAccumulator, fee engine
//!        ▼
//! ┌─────────────┐
//! │   Journal    │  every transfer reversible until commit
//! └──────┬──────┘
//!        │ AssetCustody
//!        ▼
//! ┌─────────────┐
//! │   Custody    │  host ledger or TokenLedger
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`U112`](domain::U112), events |
//! | [`math`] | 256-bit mul-div, integer square root, UQ112x112 |
//! | [`config`] | [`PairConfig`](config::PairConfig) and [`FactoryConfig`](config::FactoryConfig) |
//! | [`traits`] | Collaborator seams: [`AssetCustody`](traits::AssetCustody), [`FlashSwapCallee`](traits::FlashSwapCallee) |
//! | [`custody`] | [`TokenLedger`](custody::TokenLedger) and the rollback [`Journal`](custody::Journal) |
//! | [`ledger`] | Pool-share accounting with the locked minimum |
//! | [`oracle`] | Price accumulators and TWAP helpers |
//! | [`fees`] | Swap quotes, invariant check, platform-fee formula |
//! | [`pair`] | The [`Pair`](pair::Pair) state machine |
//! | [`factory`] | [`PairFactory`](factory::PairFactory) |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod custody;
pub mod domain;
pub mod error;
pub mod factory;
pub mod fees;
pub mod ledger;
pub mod math;
pub mod oracle;
pub mod pair;
pub mod prelude;
pub mod traits;

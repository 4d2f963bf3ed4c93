//! Pair creation and governance.
//!
//! The [`PairFactory`] is the governance collaborator of every pair it
//! creates: it derives each pair's custody address, hands it the default
//! [`FactoryConfig`](crate::config::FactoryConfig), and is the only account
//! a pair accepts fee and recoverer changes from.

mod pair_factory;

pub use pair_factory::PairFactory;

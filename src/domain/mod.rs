//! Fundamental domain value types used throughout the settlement core.
//!
//! Identifiers, amounts, share counts, bounded reserve integers, fee rates
//! and the events a pair emits.  All numeric types are newtypes with
//! validated or checked constructors so that widths are enforced by the
//! type system rather than by convention.

mod address;
mod amount;
mod basis_points;
mod event;
mod shares;
mod token_pair;
mod uint112;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::{BasisPoints, BPS_DENOMINATOR};
pub use event::{CallContext, PoolEvent};
pub use shares::Shares;
pub use token_pair::{Side, TokenPair};
pub use uint112::U112;

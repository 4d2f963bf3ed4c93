//! Deterministic integer arithmetic for the settlement core.
//!
//! - [`mul_div_down`] / [`mul_div_down_wide`]: truncating multiply-divide
//!   with a 256-bit intermediate.
//! - [`integer_sqrt`]: Babylonian floor square root.
//! - [`CheckedArithmetic`]: `Result`-returning add/sub on quantity types.
//! - [`uq112x112`]: the binary fixed-point format of the price accumulators.
//!
//! Wraparound is used only by the oracle accumulators; everything here is
//! checked.

mod checked;
mod fixed_point;
pub mod uq112x112;

pub use checked::CheckedArithmetic;
pub use fixed_point::{integer_sqrt, integer_sqrt_u128, mul_div_down, mul_div_down_wide};

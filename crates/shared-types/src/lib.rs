//! # Shared Types Crate
//!
//! Domain primitives used by every xOracle subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, hashes and amounts are defined
//!   once here and reused by the registry, verifier, feed and relay crates.
//! - **No Floating Point**: prices are fixed-point integers scaled by
//!   [`PRICE_SCALE`], so consensus values reproduce bit-for-bit.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};

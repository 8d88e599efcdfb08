//! # Price Aggregation Subsystem (XO-03)
//!
//! Turns per-signer price vectors into one consensus price per asset.
//!
//! ## Wire Format
//!
//! Signers attest to a packed byte string of 8-byte records:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────┐
//! │ asset_index u16  │ price u48 (8 decimals)       │  × n
//! │ big-endian       │ big-endian                   │
//! └──────────────────┴──────────────────────────────┘
//! ```
//!
//! ## Consensus Rule
//!
//! The consensus value is the median of the submitted values. For an even
//! number of submissions it is the floor of the mean of the two middle
//! values. Everything is integer arithmetic.

pub mod aggregate;
pub mod codec;
pub mod errors;
pub mod median;

pub use aggregate::{aggregate, AssetSubmissions};
pub use codec::{decode_prices, encode_prices, PricePoint, PRICE_RECORD_LEN};
pub use errors::PriceCodecError;
pub use median::median;

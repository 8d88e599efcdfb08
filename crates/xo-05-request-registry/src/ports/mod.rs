//! Inbound API and outbound delivery ports.

pub mod inbound;
pub mod outbound;

pub use inbound::PriceOracleApi;
pub use outbound::{CallbackRouter, PriceCallback};

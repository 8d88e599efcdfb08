//! # Shared Crypto - Attestation Primitives
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `hashing` | Keccak-256 and the Ethereum personal-sign digest |
//! | `encoding` | Canonical price and cross-chain message encodings |
//! | `ecdsa` | 65-byte recoverable secp256k1 signatures and signer recovery |
//!
//! ## Security Properties
//!
//! - **Low-S only (EIP-2)**: malleable signatures are rejected before recovery
//! - **Deterministic encodings**: signer and verifier build identical bytes,
//!   no floating point anywhere in the pipeline

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod encoding;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{address_from_pubkey, recover_signer, EthSigner, RecoverableSignature};
pub use encoding::{encode_message, message_hash, price_hash, CrossChainMessageRef};
pub use errors::CryptoError;
pub use hashing::{eth_signed_message_hash, keccak256};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

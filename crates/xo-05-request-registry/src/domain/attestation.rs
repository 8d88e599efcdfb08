//! Signed price vectors submitted by relayers.

use shared_crypto::{eth_signed_message_hash, price_hash, RecoverableSignature};
use shared_types::{Address, Hash, Timestamp};

/// One signer's statement of prices at a timestamp. Lives only for the
/// duration of a fulfill call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    /// Declared signer; must match the recovered one.
    pub signer: Address,
    /// Must equal the request's `created_at`.
    pub timestamp: Timestamp,
    /// Packed `(u16, u48)` records.
    pub encoded_prices: Vec<u8>,
    /// Signature over the personal-sign digest of the price hash.
    pub signature: RecoverableSignature,
}

impl Attestation {
    /// Digest the signature must recover against.
    pub fn digest(&self) -> Hash {
        eth_signed_message_hash(&price_hash(self.timestamp, &self.encoded_prices))
    }
}

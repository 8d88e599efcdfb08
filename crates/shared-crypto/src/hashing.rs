//! Keccak-256 helpers.

use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// Prefix applied by `eth_sign` / `personal_sign` to a 32-byte hash.
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Digest that signers actually sign: `keccak256(prefix || hash)`.
pub fn eth_signed_message_hash(hash: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(ETH_SIGNED_MESSAGE_PREFIX);
    hasher.update(hash);
    hasher.finalize().into()
}

//! # Canonical Encodings
//!
//! Both encodings mirror the Solidity ABI so attestations produced by
//! existing signer tooling verify unchanged.
//!
//! - Price attestation: `keccak256(abi.encodePacked(uint256 timestamp, bytes prices))`
//! - Cross-chain message: `keccak256(abi.encode(uint256 nonce, bytes payload,
//!   address endpoint, uint256 srcChainId, uint256 dstChainId, bytes32 srcTxHash))`

use crate::hashing::keccak256;
use shared_types::{Address, ChainId, Hash, Timestamp};

const WORD: usize = 32;

/// Number of static head words in the message encoding.
const MESSAGE_HEAD_WORDS: usize = 6;

/// Borrowed view of the six fields bound by a message hash.
#[derive(Debug, Clone, Copy)]
pub struct CrossChainMessageRef<'a> {
    /// Sender-side sequence number.
    pub nonce: u64,
    /// Opaque application payload.
    pub payload: &'a [u8],
    /// Destination handler identity.
    pub endpoint: &'a Address,
    /// Chain the message originated on.
    pub src_chain_id: ChainId,
    /// Chain the message is addressed to.
    pub dst_chain_id: ChainId,
    /// Originating transaction hash on the source chain.
    pub src_tx_hash: &'a Hash,
}

fn u64_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address.as_bytes());
    word
}

/// Hash signed by price attesters.
pub fn price_hash(timestamp: Timestamp, encoded_prices: &[u8]) -> Hash {
    let mut packed = Vec::with_capacity(WORD + encoded_prices.len());
    packed.extend_from_slice(&u64_word(timestamp));
    packed.extend_from_slice(encoded_prices);
    keccak256(&packed)
}

/// ABI-encode a cross-chain message (non-packed, dynamic `bytes` in the tail).
pub fn encode_message(message: &CrossChainMessageRef<'_>) -> Vec<u8> {
    let padded_len = message.payload.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD * (MESSAGE_HEAD_WORDS + 1) + padded_len);

    out.extend_from_slice(&u64_word(message.nonce));
    out.extend_from_slice(&u64_word((MESSAGE_HEAD_WORDS * WORD) as u64));
    out.extend_from_slice(&address_word(message.endpoint));
    out.extend_from_slice(&u64_word(message.src_chain_id));
    out.extend_from_slice(&u64_word(message.dst_chain_id));
    out.extend_from_slice(message.src_tx_hash);

    out.extend_from_slice(&u64_word(message.payload.len() as u64));
    out.extend_from_slice(message.payload);
    out.resize(out.len() + (padded_len - message.payload.len()), 0);
    out
}

/// Replay-protection key and signed hash for a cross-chain message.
pub fn message_hash(message: &CrossChainMessageRef<'_>) -> Hash {
    keccak256(&encode_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample<'a>(payload: &'a [u8], endpoint: &'a Address, tx: &'a Hash) -> CrossChainMessageRef<'a> {
        CrossChainMessageRef {
            nonce: 1,
            payload,
            endpoint,
            src_chain_id: 56,
            dst_chain_id: 31337,
            src_tx_hash: tx,
        }
    }

    #[test]
    fn test_message_layout() {
        let endpoint = Address::new([0x11; 20]);
        let tx = [0x22; 32];
        let payload = [0xaa; 33];
        let encoded = encode_message(&sample(&payload, &endpoint, &tx));

        // 6 head words + length word + 2 padded payload words
        assert_eq!(encoded.len(), 32 * 9);
        assert_eq!(encoded[31], 1);
        assert_eq!(encoded[63], 192);
        assert_eq!(&encoded[76..96], endpoint.as_bytes());
        assert_eq!(&encoded[160..192], &tx);
        assert_eq!(encoded[223], 33);
        assert_eq!(&encoded[224..257], &payload);
        assert!(encoded[257..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_word_aligned_payload_gets_no_padding() {
        let endpoint = Address::new([1; 20]);
        let tx = [0; 32];
        let payload = [5u8; 64];
        assert_eq!(encode_message(&sample(&payload, &endpoint, &tx)).len(), 32 * 9);
    }

    #[test]
    fn test_every_field_is_bound() {
        let endpoint = Address::new([1; 20]);
        let other_endpoint = Address::new([2; 20]);
        let tx = [3; 32];
        let other_tx = [4; 32];
        let base = sample(b"hello", &endpoint, &tx);
        let h = message_hash(&base);

        assert_ne!(h, message_hash(&CrossChainMessageRef { nonce: 2, ..base }));
        assert_ne!(h, message_hash(&CrossChainMessageRef { payload: b"hellp", ..base }));
        assert_ne!(h, message_hash(&CrossChainMessageRef { endpoint: &other_endpoint, ..base }));
        assert_ne!(h, message_hash(&CrossChainMessageRef { src_chain_id: 1, ..base }));
        assert_ne!(h, message_hash(&CrossChainMessageRef { dst_chain_id: 1, ..base }));
        assert_ne!(h, message_hash(&CrossChainMessageRef { src_tx_hash: &other_tx, ..base }));
    }

    #[test]
    fn test_price_hash_binds_timestamp() {
        let prices = hex::decode("00000187a1f990a0").unwrap();
        assert_ne!(price_hash(1, &prices), price_hash(2, &prices));
        assert_eq!(price_hash(1, &prices), price_hash(1, &prices));
    }
}

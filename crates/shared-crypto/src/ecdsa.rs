//! # ECDSA Signatures (secp256k1)
//!
//! Recoverable 65-byte `r || s || v` signatures as produced by Ethereum
//! wallets, and recovery of the signing [`Address`].
//!
//! ## Security Properties
//!
//! - `v` must be 0, 1, 27 or 28
//! - `r` and `s` must lie in `[1, n-1]`
//! - `s` must lie in the lower half of the curve order (EIP-2)

use crate::errors::CryptoError;
use crate::hashing::{eth_signed_message_hash, keccak256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Address, Hash};
use std::fmt;

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// A 65-byte recoverable ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; SIGNATURE_LENGTH]);

impl RecoverableSignature {
    /// Wrap raw bytes.
    pub fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice; fails unless it is exactly 65 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(raw))
    }

    /// Parse `0x`-prefixed or bare hex.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let trimmed = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(trimmed).map_err(|_| CryptoError::MalformedSignature)?;
        Self::from_slice(&bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Recovery byte as transmitted.
    pub fn v(&self) -> u8 {
        self.0[64]
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature(0x{})", hex::encode(self.0))
    }
}

/// Recover the signer of a prehashed `digest`.
///
/// The caller decides which digest was signed; attestation flows apply
/// [`eth_signed_message_hash`] first.
pub fn recover_signer(
    digest: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    let recovery_id = parse_recovery_id(signature.v())?;

    let sig =
        Signature::from_slice(&signature.0[..64]).map_err(|_| CryptoError::MalformedSignature)?;

    // normalize_s returns Some only when s is in the upper half
    if sig.normalize_s().is_some() {
        return Err(CryptoError::MalleableSignature);
    }

    let recovered_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);

    // Keccak256 hash of public key (without 0x04 prefix)
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| CryptoError::InvalidRecoveryId(v))
}

/// secp256k1 key that signs the way Ethereum wallets do.
///
/// Used by relayer tooling and tests to produce attestations.
pub struct EthSigner {
    signing_key: SigningKey,
}

impl EthSigner {
    /// Generate random keypair.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes(bytes.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a raw digest, returning a low-S signature with `v` in {27, 28}.
    pub fn sign_digest(&self, digest: &Hash) -> Result<RecoverableSignature, CryptoError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| CryptoError::SigningFailed)?;

        // Normalize S to low value (EIP-2), flipping the y parity with it
        let (sig, recid) = match sig.normalize_s() {
            Some(normalized) => (
                normalized,
                RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced()),
            ),
            None => (sig, recid),
        };

        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = 27 + recid.to_byte();
        Ok(RecoverableSignature(bytes))
    }

    /// `personal_sign` over a 32-byte hash.
    pub fn sign_hash(&self, hash: &Hash) -> Result<RecoverableSignature, CryptoError> {
        self.sign_digest(&eth_signed_message_hash(hash))
    }
}

impl fmt::Debug for EthSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

//! Crypto error types.

use thiserror::Error;

/// Signature parsing and recovery errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signature was not exactly 65 bytes.
    #[error("ECDSA: invalid signature length: {0}")]
    InvalidSignatureLength(usize),

    /// Recovery byte was not 0, 1, 27 or 28.
    #[error("ECDSA: invalid signature 'v' value: {0}")]
    InvalidRecoveryId(u8),

    /// `r` or `s` outside `[1, n-1]`.
    #[error("ECDSA: invalid signature scalars")]
    MalformedSignature,

    /// `s` in the upper half of the curve order (EIP-2).
    #[error("ECDSA: invalid signature 's' value")]
    MalleableSignature,

    /// No public key recovers from this signature and digest.
    #[error("ECDSA: failed to recover public key")]
    RecoveryFailed,

    /// Secret key bytes were not a valid scalar.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// The signing backend rejected the digest.
    #[error("Signing failed")]
    SigningFailed,
}

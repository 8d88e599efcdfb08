//! # Quorum Verifier
//!
//! Recovers every signature, filters to registered signers and checks the
//! distinct count against the registry's threshold.

use crate::domain::entities::{QuorumOutcome, SignedDigest};
use crate::domain::errors::ConsensusError;
use rayon::prelude::*;
use shared_crypto::{eth_signed_message_hash, recover_signer, RecoverableSignature};
use shared_types::{Address, Hash};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};
use xo_01_signer_registry::SignerRegistry;

/// Threshold-signature verifier bound to one signer registry.
#[derive(Debug, Clone)]
pub struct QuorumVerifier {
    registry: Arc<SignerRegistry>,
}

impl QuorumVerifier {
    /// Verifier reading from `registry`.
    pub fn new(registry: Arc<SignerRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this verifier consults.
    pub fn registry(&self) -> &Arc<SignerRegistry> {
        &self.registry
    }

    /// Verify signatures that all `personal_sign` the same `hash`.
    pub fn verify_hash(
        &self,
        hash: &Hash,
        signatures: &[RecoverableSignature],
    ) -> Result<QuorumOutcome, ConsensusError> {
        let digest = eth_signed_message_hash(hash);
        let items: Vec<SignedDigest> = signatures
            .iter()
            .map(|signature| SignedDigest {
                digest,
                signature: *signature,
                claimed_signer: None,
            })
            .collect();
        self.verify(&items)
    }

    /// Verify a batch where each entry may sign a different digest.
    pub fn verify(&self, items: &[SignedDigest]) -> Result<QuorumOutcome, ConsensusError> {
        let recovered: Vec<Option<Address>> = items
            .par_iter()
            .map(|item| match recover_signer(&item.digest, &item.signature) {
                Ok(address) => Some(address),
                Err(e) => {
                    trace!(error = %e, "Signature did not recover");
                    None
                }
            })
            .collect();

        self.registry.with_set(|set| {
            let mut seen = HashSet::with_capacity(items.len());
            let mut signers = Vec::new();
            let mut accepted = Vec::new();

            for (index, (item, signer)) in items.iter().zip(recovered).enumerate() {
                let Some(signer) = signer else {
                    continue;
                };
                if item.claimed_signer.is_some_and(|claimed| claimed != signer) {
                    debug!(index, %signer, "Recovered signer differs from declared signer");
                    continue;
                }
                if !set.is_signer(&signer) {
                    debug!(index, %signer, "Skipping non-signer");
                    continue;
                }
                if !seen.insert(signer) {
                    return Err(ConsensusError::DuplicateSigner { signer });
                }
                signers.push(signer);
                accepted.push(index);
            }

            let count = u32::try_from(signers.len()).unwrap_or(u32::MAX);
            let required = set.threshold();
            if count < required {
                return Err(ConsensusError::BelowThreshold { got: count, required });
            }

            Ok(QuorumOutcome {
                count,
                signers,
                accepted,
                threshold: required,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::{keccak256, EthSigner};
    use xo_01_signer_registry::SignerSet;

    struct Fixture {
        signers: Vec<EthSigner>,
        outsider: EthSigner,
        verifier: QuorumVerifier,
    }

    fn fixture(n: usize, threshold: u32) -> Fixture {
        let signers: Vec<EthSigner> = (0..n).map(|_| EthSigner::random()).collect();
        let set =
            SignerSet::with_signers(signers.iter().map(EthSigner::address), threshold).unwrap();
        Fixture {
            signers,
            outsider: EthSigner::random(),
            verifier: QuorumVerifier::new(Arc::new(SignerRegistry::new(set))),
        }
    }

    fn sign(signer: &EthSigner, hash: &Hash) -> RecoverableSignature {
        signer.sign_hash(hash).unwrap()
    }

    #[test]
    fn test_exact_threshold_passes() {
        let f = fixture(3, 3);
        let hash = keccak256(b"message");
        let sigs: Vec<_> = f.signers.iter().map(|s| sign(s, &hash)).collect();

        let outcome = f.verifier.verify_hash(&hash, &sigs).unwrap();
        assert_eq!(outcome.count, 3);
        assert_eq!(outcome.threshold, 3);
        assert_eq!(outcome.accepted, vec![0, 1, 2]);
        assert_eq!(outcome.signers[0], f.signers[0].address());
    }

    #[test]
    fn test_one_short_fails() {
        let f = fixture(3, 3);
        let hash = keccak256(b"message");
        let sigs: Vec<_> = f.signers[..2].iter().map(|s| sign(s, &hash)).collect();

        assert_eq!(
            f.verifier.verify_hash(&hash, &sigs),
            Err(ConsensusError::BelowThreshold { got: 2, required: 3 })
        );
    }

    #[test]
    fn test_duplicate_fails_regardless_of_position() {
        let f = fixture(3, 3);
        let hash = keccak256(b"message");
        let s: Vec<_> = f.signers.iter().map(|s| sign(s, &hash)).collect();

        for batch in [
            vec![s[0], s[0]],
            vec![s[0], s[1], s[0], s[2]],
            vec![s[0], s[1], s[2], s[2]],
        ] {
            assert!(matches!(
                f.verifier.verify_hash(&hash, &batch),
                Err(ConsensusError::DuplicateSigner { .. })
            ));
        }
    }

    #[test]
    fn test_non_signers_and_wrong_hash_are_skipped() {
        let f = fixture(3, 3);
        let hash = keccak256(b"message");
        let other = keccak256(b"other message");

        let batch = vec![
            sign(&f.signers[0], &hash),
            sign(&f.signers[1], &other),
            sign(&f.signers[1], &other),
            sign(&f.outsider, &hash),
            sign(&f.signers[2], &hash),
        ];

        // the wrong-hash pair recovers to an unknown key, never a duplicate
        assert_eq!(
            f.verifier.verify_hash(&hash, &batch),
            Err(ConsensusError::BelowThreshold { got: 2, required: 3 })
        );
    }

    #[test]
    fn test_zero_threshold_accepts_empty_batch() {
        let f = fixture(0, 0);
        let hash = keccak256(b"message");
        let outcome = f.verifier.verify_hash(&hash, &[]).unwrap();
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.threshold, 0);
        assert!(outcome.signers.is_empty());
    }

    #[test]
    fn test_empty_batch_fails_once_threshold_set() {
        let f = fixture(1, 1);
        let hash = keccak256(b"message");
        assert_eq!(
            f.verifier.verify_hash(&hash, &[]),
            Err(ConsensusError::BelowThreshold { got: 0, required: 1 })
        );
    }

    #[test]
    fn test_claimed_signer_mismatch_skipped() {
        let f = fixture(2, 1);
        let hash = keccak256(b"prices");
        let digest = eth_signed_message_hash(&hash);

        let items = vec![
            SignedDigest {
                digest,
                signature: sign(&f.signers[0], &hash),
                claimed_signer: Some(f.signers[1].address()),
            },
            SignedDigest {
                digest,
                signature: sign(&f.signers[1], &hash),
                claimed_signer: Some(f.signers[1].address()),
            },
        ];

        let outcome = f.verifier.verify(&items).unwrap();
        assert_eq!(outcome.accepted, vec![1]);
    }

    #[test]
    fn test_signer_removal_visible_to_next_verify() {
        let f = fixture(2, 1);
        let hash = keccak256(b"message");
        let sigs = vec![sign(&f.signers[0], &hash)];
        f.verifier.verify_hash(&hash, &sigs).unwrap();

        f.verifier
            .registry()
            .set_signer(f.signers[0].address(), false)
            .unwrap();
        assert!(f.verifier.verify_hash(&hash, &sigs).is_err());
    }
}

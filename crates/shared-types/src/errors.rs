//! # Error Taxonomy
//!
//! Every subsystem error maps onto one [`ErrorKind`] so callers can decide
//! how to react without matching on crate-specific variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification shared by all subsystem errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller is not the owner, a controller, or a permitted contract.
    Authorization,
    /// Malformed input: empty payload, null endpoint, bad chain id, bad threshold.
    Validation,
    /// Quorum failure: duplicate signer or too few valid signatures.
    Consensus,
    /// Lifecycle violation: unknown, finalized, fulfilled or expired.
    State,
    /// Fee below quote or balance too small.
    Fee,
}

impl ErrorKind {
    /// Stable lowercase label, used for metrics and structured logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::Validation => "validation",
            ErrorKind::Consensus => "consensus",
            ErrorKind::State => "state",
            ErrorKind::Fee => "fee",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Versioned snapshot encoding.

use super::PersistenceError;
use serde::{Deserialize, Serialize};
use xo_05_request_registry::RegistryState;
use xo_06_message_relay::RelayState;

/// Current snapshot layout.
pub const STATE_VERSION: u32 = 1;

/// Everything a node needs to resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Layout version, always [`STATE_VERSION`] when produced here.
    pub version: u32,
    /// Request registry, fee ledger and price feed.
    pub price_oracle: RegistryState,
    /// Fulfilled hashes, nonce and relay configuration.
    pub message_relay: RelayState,
}

/// Outer frame. The version is readable without decoding the payload, so
/// a future layout can be rejected (or migrated) before parsing it.
#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    payload: Vec<u8>,
}

impl PersistedState {
    /// Bundle both service states at the current version.
    pub fn new(price_oracle: RegistryState, message_relay: RelayState) -> Self {
        Self {
            version: STATE_VERSION,
            price_oracle,
            message_relay,
        }
    }

    /// Encode into a version-tagged envelope.
    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        let payload =
            bincode::serialize(self).map_err(|e| PersistenceError::Codec(e.to_string()))?;
        bincode::serialize(&Envelope {
            version: self.version,
            payload,
        })
        .map_err(|e| PersistenceError::Codec(e.to_string()))
    }

    /// Decode an envelope, rejecting any version other than the current one.
    pub fn decode(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let envelope: Envelope =
            bincode::deserialize(bytes).map_err(|e| PersistenceError::Codec(e.to_string()))?;
        if envelope.version != STATE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: envelope.version,
                supported: STATE_VERSION,
            });
        }

        let state: Self = bincode::deserialize(&envelope.payload)
            .map_err(|e| PersistenceError::Codec(e.to_string()))?;
        if state.version != envelope.version {
            return Err(PersistenceError::Codec(format!(
                "payload version {} inside envelope version {}",
                state.version, envelope.version
            )));
        }
        Ok(state)
    }
}

//! # Oracle Configuration
//!
//! One JSON document configures both services. Every section has defaults,
//! so a file only needs the fields it changes; the owners have no usable
//! default and must be set.

use oracle_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, AssetIndex, ChainId};
use std::path::{Path, PathBuf};
use thiserror::Error;
use xo_01_signer_registry::{AccessPolicy, RegistryError, SignerSet};
use xo_05_request_registry::domain::fees::BPS_DENOMINATOR;
use xo_05_request_registry::FeeSchedule;
use xo_06_message_relay::DEFAULT_MAX_PAYLOAD_LEN;

/// Names the config file to load.
pub const CONFIG_ENV: &str = "XO_CONFIG";
/// Overrides `chain.chain_id`.
pub const CHAIN_ID_ENV: &str = "XO_CHAIN_ID";
/// Overrides `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "XO_DATA_DIR";

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Chain this node serves.
    pub chain: ChainConfig,
    /// Request registry and price feed.
    pub price_oracle: PriceOracleConfig,
    /// Cross-chain message relay.
    pub message_relay: MessageRelayConfig,
    /// Snapshot location.
    pub storage: StorageConfig,
    /// Logging and metrics.
    pub telemetry: TelemetryConfig,
}

/// Chain identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Local chain id; inbound messages must target it.
    pub chain_id: ChainId,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { chain_id: 31337 }
    }
}

/// Roles shared by both services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Administrator.
    pub owner: Address,
    /// Relayers allowed to fulfill and refund.
    pub controllers: Vec<Address>,
    /// Contracts allowed to request prices or send messages.
    pub contracts: Vec<Address>,
    /// Callers admitted while whitelist mode is on.
    pub whitelist: Vec<Address>,
    /// Whitelist mode.
    pub only_whitelist: bool,
}

impl AccessConfig {
    /// Build the policy, rejecting zero addresses.
    pub fn build(&self) -> Result<AccessPolicy, RegistryError> {
        let mut policy = AccessPolicy::new(self.owner)?;
        for &controller in &self.controllers {
            policy.set_controller(controller, true)?;
        }
        for &contract in &self.contracts {
            policy.set_contract(contract, true)?;
        }
        for &identity in &self.whitelist {
            policy.set_whitelist(identity, true)?;
        }
        policy.set_only_whitelist(self.only_whitelist);
        Ok(policy)
    }
}

/// Attesters and quorum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuorumConfig {
    /// Authorized signer addresses.
    pub signers: Vec<Address>,
    /// Distinct signatures required; `0` leaves it unconfigured.
    pub threshold: u32,
}

impl QuorumConfig {
    /// Build the signer set.
    pub fn build(&self) -> Result<SignerSet, RegistryError> {
        SignerSet::with_signers(self.signers.iter().copied(), self.threshold)
    }
}

/// A feed described at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Asset index.
    pub asset_index: AssetIndex,
    /// Human-readable name, e.g. `BTC/USD Price Feed`.
    pub description: String,
    /// Price decimals.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    shared_types::PRICE_DECIMALS
}

/// Price oracle section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceOracleConfig {
    /// Roles.
    #[serde(flatten)]
    pub access: AccessConfig,
    /// Attesters.
    #[serde(flatten)]
    pub quorum: QuorumConfig,
    /// Fee parameters.
    pub fees: FeeSchedule,
    /// Feed metadata.
    pub feeds: Vec<FeedConfig>,
}

/// Fee to reach one destination chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationFee {
    /// Destination chain.
    pub chain_id: ChainId,
    /// Fee per send.
    pub fee: Amount,
}

/// Message relay section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRelayConfig {
    /// Roles.
    #[serde(flatten)]
    pub access: AccessConfig,
    /// Attesters.
    #[serde(flatten)]
    pub quorum: QuorumConfig,
    /// Identity of the fee controller; defaults to the owner.
    pub fee_controller: Option<Address>,
    /// Receives every send fee.
    pub fee_receiver: Address,
    /// Known destinations.
    pub destination_fees: Vec<DestinationFee>,
    /// Largest payload accepted.
    pub max_payload_len: usize,
}

impl Default for MessageRelayConfig {
    fn default() -> Self {
        Self {
            access: AccessConfig::default(),
            quorum: QuorumConfig::default(),
            fee_controller: None,
            fee_receiver: Address::ZERO,
            destination_fees: Vec::new(),
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }
}

impl MessageRelayConfig {
    /// Fee controller identity after defaulting.
    pub fn fee_controller_id(&self) -> Address {
        self.fee_controller.unwrap_or(self.access.owner)
    }
}

/// Storage section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot and lock file.
    pub data_dir: PathBuf,
    /// Snapshot file name inside `data_dir`.
    pub snapshot_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            snapshot_file: "xoracle.snapshot".to_string(),
        }
    }
}

impl StorageConfig {
    /// Full snapshot path.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("cannot parse config {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// An environment override did not parse.
    #[error("invalid {var}={value}")]
    InvalidEnv { var: &'static str, value: String },

    /// A required address is zero.
    #[error("{section}: {field} must be set")]
    ZeroAddress {
        section: &'static str,
        field: &'static str,
    },

    /// Threshold above the signer count.
    #[error("{section}: threshold {threshold} exceeds {signers} signers")]
    InvalidThreshold {
        section: &'static str,
        threshold: u32,
        signers: usize,
    },

    /// Surcharge above 100%.
    #[error("price_oracle: fulfill_fee_bps {bps} exceeds 10000")]
    InvalidFulfillFee { bps: u32 },

    /// Zero payload limit.
    #[error("message_relay: max_payload_len must be positive")]
    InvalidPayloadLimit,
}

impl OracleConfig {
    /// Load from `XO_CONFIG` (or defaults), apply environment overrides and
    /// validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an injectable environment.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(value) = lookup(CHAIN_ID_ENV) {
            config.chain.chain_id = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: CHAIN_ID_ENV,
                value,
            })?;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            config.storage.data_dir = PathBuf::from(dir);
        }
        config.telemetry = config.telemetry.with_overrides(&lookup);

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Check the settings services would otherwise reject at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_section("price_oracle", &self.price_oracle.access, &self.price_oracle.quorum)?;
        check_section("message_relay", &self.message_relay.access, &self.message_relay.quorum)?;

        let bps = self.price_oracle.fees.fulfill_fee_bps;
        if bps > BPS_DENOMINATOR {
            return Err(ConfigError::InvalidFulfillFee { bps });
        }
        if self.message_relay.fee_receiver.is_zero() {
            return Err(ConfigError::ZeroAddress {
                section: "message_relay",
                field: "fee_receiver",
            });
        }
        if self.message_relay.fee_controller_id().is_zero() {
            return Err(ConfigError::ZeroAddress {
                section: "message_relay",
                field: "fee_controller",
            });
        }
        if self.message_relay.max_payload_len == 0 {
            return Err(ConfigError::InvalidPayloadLimit);
        }
        Ok(())
    }
}

fn check_section(
    section: &'static str,
    access: &AccessConfig,
    quorum: &QuorumConfig,
) -> Result<(), ConfigError> {
    if access.owner.is_zero() {
        return Err(ConfigError::ZeroAddress {
            section,
            field: "owner",
        });
    }
    let zero_member = access
        .controllers
        .iter()
        .chain(&access.contracts)
        .chain(&access.whitelist)
        .chain(&quorum.signers)
        .any(Address::is_zero);
    if zero_member {
        return Err(ConfigError::ZeroAddress {
            section,
            field: "role member",
        });
    }

    let mut distinct = quorum.signers.clone();
    distinct.sort();
    distinct.dedup();
    if quorum.threshold as usize > distinct.len() {
        return Err(ConfigError::InvalidThreshold {
            section,
            threshold: quorum.threshold,
            signers: distinct.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const OWNER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const RECEIVER: &str = "0xfefefefefefefefefefefefefefefefefefefefe";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal_json() -> String {
        format!(
            r#"{{
                "price_oracle": {{ "owner": "{OWNER}" }},
                "message_relay": {{ "owner": "{OWNER}", "fee_receiver": "{RECEIVER}" }}
            }}"#
        )
    }

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_require_owner() {
        assert!(matches!(
            OracleConfig::default().validate(),
            Err(ConfigError::ZeroAddress { section: "price_oracle", field: "owner" })
        ));
    }

    #[test]
    fn test_minimal_file_loads_with_defaults() {
        let file = write_config(&minimal_json());
        let path = file.path().to_string_lossy().to_string();

        let config = OracleConfig::load_with(env(&[(CONFIG_ENV, &path)])).unwrap();
        assert_eq!(config.chain.chain_id, 31337);
        assert_eq!(config.price_oracle.fees, FeeSchedule::default());
        assert_eq!(config.message_relay.max_payload_len, DEFAULT_MAX_PAYLOAD_LEN);
        assert_eq!(
            config.message_relay.fee_controller_id(),
            config.message_relay.access.owner
        );
    }

    #[test]
    fn test_env_overrides() {
        let file = write_config(&minimal_json());
        let path = file.path().to_string_lossy().to_string();

        let config = OracleConfig::load_with(env(&[
            (CONFIG_ENV, &path),
            (CHAIN_ID_ENV, "56"),
            (DATA_DIR_ENV, "/var/lib/xoracle"),
            ("XO_JSON_LOGS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.chain.chain_id, 56);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/xoracle"));
        assert!(config.telemetry.json_logs);

        assert!(matches!(
            OracleConfig::load_with(env(&[(CONFIG_ENV, &path), (CHAIN_ID_ENV, "bsc")])),
            Err(ConfigError::InvalidEnv { var: CHAIN_ID_ENV, .. })
        ));
    }

    #[test]
    fn test_full_sections_parse() {
        let text = format!(
            r#"{{
                "chain": {{ "chain_id": 97 }},
                "price_oracle": {{
                    "owner": "{OWNER}",
                    "signers": ["0x0101010101010101010101010101010101010101",
                                "0x0202020202020202020202020202020202020202"],
                    "threshold": 2,
                    "controllers": ["0x0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d"],
                    "fees": {{ "fulfill_fee_bps": 500 }},
                    "feeds": [{{ "asset_index": 0, "description": "BTC/USD Price Feed" }}]
                }},
                "message_relay": {{
                    "owner": "{OWNER}",
                    "fee_receiver": "{RECEIVER}",
                    "destination_fees": [{{ "chain_id": 56, "fee": 10000000000000000 }}],
                    "max_payload_len": 1024
                }}
            }}"#
        );
        let config: OracleConfig = serde_json::from_str(&text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.price_oracle.quorum.threshold, 2);
        assert_eq!(config.price_oracle.access.controllers.len(), 1);
        assert_eq!(config.price_oracle.fees.fulfill_fee_bps, 500);
        assert_eq!(config.price_oracle.fees.min_gas_limit, 1_000_000);
        assert_eq!(config.price_oracle.feeds[0].decimals, 8);
        assert_eq!(
            config.message_relay.destination_fees,
            vec![DestinationFee { chain_id: 56, fee: 10_000_000_000_000_000 }]
        );
        config.price_oracle.access.build().unwrap();
        assert_eq!(config.price_oracle.quorum.build().unwrap().len(), 2);
    }

    #[test]
    fn test_validation_failures() {
        let base: OracleConfig = serde_json::from_str(&minimal_json()).unwrap();

        let mut config = base.clone();
        config.price_oracle.quorum.signers = vec![Address::new([1; 20]), Address::new([1; 20])];
        config.price_oracle.quorum.threshold = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { threshold: 2, signers: 1, .. })
        ));

        let mut config = base.clone();
        config.price_oracle.fees.fulfill_fee_bps = 10_001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFulfillFee { bps: 10_001 })
        ));

        let mut config = base.clone();
        config.message_relay.fee_receiver = Address::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroAddress { field: "fee_receiver", .. })
        ));

        let mut config = base;
        config.message_relay.access.controllers = vec![Address::ZERO];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroAddress { section: "message_relay", .. })
        ));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        assert!(matches!(
            OracleConfig::from_file(Path::new("/nonexistent/xoracle.json")),
            Err(ConfigError::Read { .. })
        ));
        let file = write_config("{ not json");
        assert!(matches!(
            OracleConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}

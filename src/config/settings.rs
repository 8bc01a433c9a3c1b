use crate::error::{ConfigError, Result};
use crate::wallet::{Accounts, MnemonicAccounts};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the in-process simulated chain
pub const SIMULATED_NETWORK: &str = "hardhat";
/// Name of the implicit network pointing at a locally running node
pub const LOCALHOST_NETWORK: &str = "localhost";
pub const LOCALHOST_URL: &str = "http://127.0.0.1:8545";

pub const SIMULATED_CHAIN_ID: u64 = 31337;
pub const SIMULATED_BLOCK_GAS_LIMIT: u64 = 30_000_000;
/// RPC timeout for live networks that don't set one, in milliseconds
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 40_000;

/// Gas price or gas limit: left to the node, or pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "GasRepr")]
pub enum GasSetting {
    #[default]
    Auto,
    Fixed(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GasRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<GasRepr> for GasSetting {
    type Error = String;

    fn try_from(repr: GasRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            GasRepr::Number(value) => Ok(GasSetting::Fixed(value)),
            GasRepr::Text(text) if text == "auto" => Ok(GasSetting::Auto),
            GasRepr::Text(text) => Err(format!(
                "expected \"auto\" or a non-negative integer, got \"{text}\""
            )),
        }
    }
}

impl Serialize for GasSetting {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            GasSetting::Auto => serializer.serialize_str("auto"),
            GasSetting::Fixed(value) => serializer.serialize_u64(*value),
        }
    }
}

impl fmt::Display for GasSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasSetting::Auto => write!(f, "auto"),
            GasSetting::Fixed(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerSettings {
    pub enabled: bool,
    /// Signed so that a negative value survives parsing and is reported by
    /// validation instead of a generic parse error.
    pub runs: i64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        OptimizerSettings {
            enabled: false,
            runs: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSettings {
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

/// One compiler the toolchain may pick for a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerProfile {
    pub version: String,
    #[serde(default)]
    pub settings: CompilerSettings,
}

impl CompilerProfile {
    pub fn new(version: impl Into<String>, enabled: bool, runs: i64) -> Self {
        CompilerProfile {
            version: version.into(),
            settings: CompilerSettings {
                optimizer: OptimizerSettings { enabled, runs },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolidityConfig {
    #[serde(default)]
    pub compilers: Vec<CompilerProfile>,
}

/// Behaviour switches that only the simulated network understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationFlags {
    pub throw_on_transaction_failures: bool,
    pub throw_on_call_failures: bool,
    pub allow_unlimited_contract_size: bool,
    pub logging_enabled: bool,
}

impl Default for SimulationFlags {
    fn default() -> Self {
        SimulationFlags {
            throw_on_transaction_failures: true,
            throw_on_call_failures: true,
            allow_unlimited_contract_size: false,
            logging_enabled: false,
        }
    }
}

/// A fully resolved network entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(skip)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub accounts: Accounts,
    pub gas_price: GasSetting,
    pub gas: GasSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(flatten)]
    pub flags: Option<SimulationFlags>,
}

impl NetworkProfile {
    /// The simulated network with the toolchain's defaults
    pub fn simulated() -> Self {
        NetworkProfile {
            name: SIMULATED_NETWORK.to_string(),
            chain_id: Some(SIMULATED_CHAIN_ID),
            url: None,
            accounts: Accounts::Mnemonic(MnemonicAccounts::default()),
            gas_price: GasSetting::Auto,
            gas: GasSetting::Fixed(SIMULATED_BLOCK_GAS_LIMIT),
            timeout: None,
            flags: Some(SimulationFlags::default()),
        }
    }

    /// A live network reached over HTTP with the toolchain's defaults
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        NetworkProfile {
            name: name.into(),
            chain_id: None,
            url: Some(url.into()),
            accounts: Accounts::Remote,
            gas_price: GasSetting::Auto,
            gas: GasSetting::Auto,
            timeout: Some(DEFAULT_HTTP_TIMEOUT_MS),
            flags: None,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.name == SIMULATED_NETWORK
    }
}

/// The resolved configuration handed to the toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRoot {
    pub default_network: String,
    pub solidity: SolidityConfig,
    pub networks: BTreeMap<String, NetworkProfile>,
}

impl ConfigurationRoot {
    pub fn network(&self, name: &str) -> Result<&NetworkProfile> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn default_network_profile(&self) -> Result<&NetworkProfile> {
        self.network(&self.default_network)
    }

    pub fn compilers(&self) -> &[CompilerProfile] {
        &self.solidity.compilers
    }

    /// The wire shape the toolchain reads, as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gas_setting_parsing() {
        #[derive(Deserialize)]
        struct Holder {
            gas: GasSetting,
        }

        let auto: Holder = toml::from_str("gas = \"auto\"").unwrap();
        assert_eq!(auto.gas, GasSetting::Auto);
        let fixed: Holder = toml::from_str("gas = 15000000").unwrap();
        assert_eq!(fixed.gas, GasSetting::Fixed(15_000_000));
        assert!(toml::from_str::<Holder>("gas = \"fast\"").is_err());
    }

    #[test]
    fn test_optimizer_round_trips_exactly() {
        let profile: CompilerProfile = toml::from_str(
            "version = \"0.8.18\"\nsettings.optimizer = { enabled = true, runs = 200 }\n",
        )
        .unwrap();
        assert_eq!(profile, CompilerProfile::new("0.8.18", true, 200));
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"version": "0.8.18", "settings": {"optimizer": {"enabled": true, "runs": 200}}})
        );
    }

    #[test]
    fn test_simulated_network_wire_shape() {
        let value = serde_json::to_value(NetworkProfile::simulated()).unwrap();
        assert_eq!(value["chainId"], json!(31337));
        assert_eq!(value["gasPrice"], json!("auto"));
        assert_eq!(value["gas"], json!(30_000_000));
        assert_eq!(value["throwOnTransactionFailures"], json!(true));
        assert_eq!(value["throwOnCallFailures"], json!(true));
        assert_eq!(value["allowUnlimitedContractSize"], json!(false));
        assert_eq!(value["loggingEnabled"], json!(false));
        assert!(value.get("url").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_http_network_omits_simulation_flags() {
        let value = serde_json::to_value(NetworkProfile::http("localhost", LOCALHOST_URL)).unwrap();
        assert_eq!(value["url"], json!(LOCALHOST_URL));
        assert_eq!(value["accounts"], json!("remote"));
        assert_eq!(value["timeout"], json!(40_000));
        assert!(value.get("throwOnCallFailures").is_none());
        assert!(value.get("chainId").is_none());
    }

    #[test]
    fn test_unknown_network_lookup() {
        let root = ConfigurationRoot {
            default_network: SIMULATED_NETWORK.to_string(),
            solidity: SolidityConfig::default(),
            networks: BTreeMap::from([(SIMULATED_NETWORK.to_string(), NetworkProfile::simulated())]),
        };
        assert!(root.default_network_profile().is_ok());
        assert_eq!(
            root.network("mainnet"),
            Err(ConfigError::UnknownNetwork("mainnet".to_string()))
        );
    }
}

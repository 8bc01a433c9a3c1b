//! Declarative configuration descriptor
//!
//! A descriptor is what a project checks into version control. Values that
//! vary per machine or are secret are written as environment references and
//! only become concrete when the descriptor is resolved by the loader.
//!
//! ```toml
//! defaultNetwork = "hardhat"
//!
//! [[solidity.compilers]]
//! version = "0.8.18"
//! settings.optimizer = { enabled = true, runs = 200 }
//!
//! [networks.BSCTestnet]
//! url = { env = "BSC_TESTNET_RPC", default = "https://bsc-dataseed.binance.org/" }
//! accounts = { env = "BSC_TESTNET_PRIVATE_KEY" }
//! timeout = 300000
//! gas = 15000000
//! ```

use super::settings::{CompilerProfile, GasSetting, SolidityConfig, SIMULATED_NETWORK};
use crate::error::Result;
use crate::wallet::DEFAULT_MNEMONIC;
use log::debug;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default file name for a descriptor on disk
pub const DESCRIPTOR_FILE_NAME: &str = "contract-config.toml";

pub const BSC_TESTNET: &str = "BSCTestnet";
pub const BSC_TESTNET_RPC_VAR: &str = "BSC_TESTNET_RPC";
pub const BSC_TESTNET_PRIVATE_KEY_VAR: &str = "BSC_TESTNET_PRIVATE_KEY";
pub const BSC_TESTNET_DEFAULT_RPC: &str = "https://bsc-dataseed.binance.org/";

/// A string value, written literally or read from the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    Literal(String),
    Env(EnvReference),
}

/// `{ env = "NAME", default = "..." }`; an unset or empty variable falls back
/// to `default`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvReference {
    pub env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ValueSource {
    pub fn literal(value: impl Into<String>) -> Self {
        ValueSource::Literal(value.into())
    }

    pub fn env(variable: impl Into<String>) -> Self {
        ValueSource::Env(EnvReference {
            env: variable.into(),
            default: None,
        })
    }

    pub fn env_or(variable: impl Into<String>, default: impl Into<String>) -> Self {
        ValueSource::Env(EnvReference {
            env: variable.into(),
            default: Some(default.into()),
        })
    }
}

/// Where a network's accounts come from.
///
/// Private keys can only be referenced through an environment variable, never
/// listed literally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AccountsRepr")]
pub enum AccountsSource {
    /// `accounts = "remote"`
    Remote,
    Mnemonic(MnemonicSource),
    /// Comma-separated private keys in an environment variable
    PrivateKeysFromEnv(PrivateKeysEnv),
}

// Arrays are matched before the table forms: serde would otherwise accept a
// sequence as a struct and read a key list as a mnemonic.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountsRepr {
    Text(String),
    List(#[allow(dead_code)] Vec<IgnoredAny>),
    Mnemonic(MnemonicSource),
    PrivateKeysFromEnv(PrivateKeysEnv),
}

impl TryFrom<AccountsRepr> for AccountsSource {
    type Error = String;

    fn try_from(repr: AccountsRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            AccountsRepr::Text(text) if text == "remote" => Ok(AccountsSource::Remote),
            AccountsRepr::Text(text) => Err(format!(
                "expected \"remote\", a mnemonic table or {{ env = \"...\" }}, got \"{text}\""
            )),
            AccountsRepr::List(_) => Err(
                "private keys cannot be listed literally; use { env = \"VARIABLE\" }".to_string(),
            ),
            AccountsRepr::Mnemonic(source) => Ok(AccountsSource::Mnemonic(source)),
            AccountsRepr::PrivateKeysFromEnv(source) => {
                Ok(AccountsSource::PrivateKeysFromEnv(source))
            }
        }
    }
}

impl Serialize for AccountsSource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AccountsSource::Remote => serializer.serialize_str("remote"),
            AccountsSource::Mnemonic(source) => source.serialize(serializer),
            AccountsSource::PrivateKeysFromEnv(source) => source.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrivateKeysEnv {
    pub env: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MnemonicSource {
    pub mnemonic: ValueSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<ValueSource>,
}

impl AccountsSource {
    pub fn mnemonic(phrase: ValueSource) -> Self {
        AccountsSource::Mnemonic(MnemonicSource {
            mnemonic: phrase,
            path: None,
            initial_index: None,
            count: None,
            passphrase: None,
        })
    }

    pub fn private_keys_from_env(variable: impl Into<String>) -> Self {
        AccountsSource::PrivateKeysFromEnv(PrivateKeysEnv {
            env: variable.into(),
        })
    }
}

/// One network as written in the descriptor; every field is optional and
/// defaulted during resolution
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NetworkDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<GasSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<GasSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_on_transaction_failures: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_on_call_failures: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unlimited_contract_size: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<ValueSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<AccountsSource>,
}

impl NetworkDescriptor {
    pub fn has_simulation_flags(&self) -> bool {
        self.throw_on_transaction_failures.is_some()
            || self.throw_on_call_failures.is_some()
            || self.allow_unlimited_contract_size.is_some()
            || self.logging_enabled.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Descriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<String>,
    #[serde(default)]
    pub solidity: SolidityConfig,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkDescriptor>,
}

impl Descriptor {
    /// The project's own configuration: one optimized compiler, the simulated
    /// chain and BSC testnet.
    pub fn builtin() -> Self {
        let simulated = NetworkDescriptor {
            chain_id: Some(1),
            gas_price: Some(GasSetting::Auto),
            throw_on_transaction_failures: Some(true),
            throw_on_call_failures: Some(true),
            allow_unlimited_contract_size: Some(true),
            logging_enabled: Some(false),
            accounts: Some(AccountsSource::mnemonic(ValueSource::literal(
                DEFAULT_MNEMONIC,
            ))),
            ..NetworkDescriptor::default()
        };

        let bsc_testnet = NetworkDescriptor {
            url: Some(ValueSource::env_or(
                BSC_TESTNET_RPC_VAR,
                BSC_TESTNET_DEFAULT_RPC,
            )),
            accounts: Some(AccountsSource::private_keys_from_env(
                BSC_TESTNET_PRIVATE_KEY_VAR,
            )),
            timeout: Some(300_000),
            gas: Some(GasSetting::Fixed(15_000_000)),
            ..NetworkDescriptor::default()
        };

        Descriptor {
            default_network: Some(SIMULATED_NETWORK.to_string()),
            solidity: SolidityConfig {
                compilers: vec![CompilerProfile::new("0.8.18", true, 200)],
            },
            networks: BTreeMap::from([
                (SIMULATED_NETWORK.to_string(), simulated),
                (BSC_TESTNET.to_string(), bsc_testnet),
            ]),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading descriptor {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

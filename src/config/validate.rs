//! Startup validation of a resolved configuration
//!
//! Errors stop the toolchain from starting. Warnings are logged and returned
//! so the caller can surface them, but never block startup.

use super::compiler::CompilerVersion;
use super::settings::{ConfigurationRoot, NetworkProfile, SIMULATED_NETWORK};
use crate::error::{ConfigError, Result};
use crate::wallet::{Accounts, MNEMONIC_WORD_COUNTS};
use log::warn;
use std::fmt;

/// A non-fatal finding about the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

impl ConfigWarning {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigWarning {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a resolved configuration. The first error found is returned.
pub fn validate(root: &ConfigurationRoot) -> Result<Vec<ConfigWarning>> {
    let mut warnings = Vec::new();

    if !root.networks.contains_key(&root.default_network) {
        return Err(ConfigError::UnknownNetwork(root.default_network.clone()));
    }

    validate_compilers(root)?;

    for (name, network) in &root.networks {
        validate_network(name, network, &mut warnings)?;
    }

    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(warnings)
}

fn validate_compilers(root: &ConfigurationRoot) -> Result<()> {
    if root.solidity.compilers.is_empty() {
        return Err(ConfigError::MissingField("solidity.compilers".to_string()));
    }
    for (index, compiler) in root.solidity.compilers.iter().enumerate() {
        let field = format!("solidity.compilers[{index}]");
        compiler
            .version
            .parse::<CompilerVersion>()
            .map_err(|_| {
                ConfigError::invalid(
                    format!("{field}.version"),
                    format!("\"{}\" is not major.minor.patch", compiler.version),
                )
            })?;
        let runs = compiler.settings.optimizer.runs;
        if runs < 0 {
            return Err(ConfigError::invalid(
                format!("{field}.settings.optimizer.runs"),
                format!("must be zero or greater, got {runs}"),
            ));
        }
    }
    Ok(())
}

fn validate_network(
    name: &str,
    network: &NetworkProfile,
    warnings: &mut Vec<ConfigWarning>,
) -> Result<()> {
    let field = format!("networks.{name}");

    if network.chain_id == Some(0) {
        return Err(ConfigError::invalid(
            format!("{field}.chainId"),
            "must be greater than zero",
        ));
    }

    // Keyed by the map entry, not the profile's own name field.
    if name == SIMULATED_NETWORK {
        if network.url.is_some() {
            return Err(ConfigError::invalid(
                format!("{field}.url"),
                "the simulated network runs in-process and takes no url",
            ));
        }
    } else {
        match network.url.as_deref() {
            None | Some("") => return Err(ConfigError::MissingField(format!("{field}.url"))),
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                return Err(ConfigError::invalid(
                    format!("{field}.url"),
                    format!("must start with http:// or https://, got {url}"),
                ));
            }
            Some(_) => {}
        }
        if network.flags.is_some() {
            return Err(ConfigError::invalid(
                field.clone(),
                "simulation flags are only accepted on the simulated network",
            ));
        }
    }

    if network.timeout == Some(0) {
        warnings.push(ConfigWarning::new(
            format!("{field}.timeout"),
            "a zero timeout makes every RPC request fail",
        ));
    }

    validate_accounts(&format!("{field}.accounts"), &network.accounts, warnings)
}

fn validate_accounts(
    field: &str,
    accounts: &Accounts,
    warnings: &mut Vec<ConfigWarning>,
) -> Result<()> {
    match accounts {
        Accounts::Remote => Ok(()),
        Accounts::Mnemonic(mnemonic) => {
            let words = mnemonic.word_count();
            if !MNEMONIC_WORD_COUNTS.contains(&words) {
                return Err(ConfigError::invalid(
                    format!("{field}.mnemonic"),
                    format!("expected 12, 15, 18, 21 or 24 words, got {words}"),
                ));
            }
            if mnemonic.count == 0 {
                return Err(ConfigError::invalid(
                    format!("{field}.count"),
                    "must derive at least one account",
                ));
            }
            Ok(())
        }
        Accounts::PrivateKeys(keys) => {
            if keys.is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
            for (index, key) in keys.iter().enumerate() {
                if key.is_empty() {
                    return Err(ConfigError::invalid(
                        format!("{field}[{index}]"),
                        "empty private key (check for stray commas)",
                    ));
                }
                // Kept verbatim; the toolchain gives the definitive answer.
                if !key.is_well_formed() {
                    warnings.push(ConfigWarning::new(
                        format!("{field}[{index}]"),
                        "not a 32-byte hex private key",
                    ));
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::descriptor::{Descriptor, BSC_TESTNET, BSC_TESTNET_PRIVATE_KEY_VAR};
    use crate::config::environment::Environment;
    use crate::config::loader::resolve;
    use crate::config::settings::{CompilerProfile, SimulationFlags};
    use crate::wallet::{MnemonicAccounts, PrivateKey};

    const KEY_A: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const KEY_B: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

    fn builtin_root() -> ConfigurationRoot {
        let environment =
            Environment::new().with(BSC_TESTNET_PRIVATE_KEY_VAR, format!("{KEY_A},{KEY_B}"));
        resolve(&Descriptor::builtin(), &environment).unwrap()
    }

    fn testnet(root: &mut ConfigurationRoot) -> &mut NetworkProfile {
        root.networks.get_mut(BSC_TESTNET).unwrap()
    }

    #[test]
    fn test_builtin_configuration_is_valid() {
        let warnings = validate(&builtin_root()).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_unknown_default_network() {
        let mut root = builtin_root();
        root.default_network = "mainnet".to_string();
        assert_eq!(
            validate(&root),
            Err(ConfigError::UnknownNetwork("mainnet".to_string()))
        );
    }

    #[test]
    fn test_negative_optimizer_runs() {
        let mut root = builtin_root();
        root.solidity.compilers[0].settings.optimizer.runs = -1;
        let err = validate(&root).unwrap_err();
        assert!(err
            .to_string()
            .contains("solidity.compilers[0].settings.optimizer.runs"));
    }

    #[test]
    fn test_zero_runs_is_allowed() {
        let mut root = builtin_root();
        root.solidity.compilers[0].settings.optimizer.runs = 0;
        assert!(validate(&root).is_ok());
    }

    #[test]
    fn test_missing_compilers_and_bad_versions() {
        let mut root = builtin_root();
        root.solidity.compilers.clear();
        assert_eq!(
            validate(&root),
            Err(ConfigError::MissingField("solidity.compilers".to_string()))
        );

        root.solidity.compilers.push(CompilerProfile::new("latest", true, 200));
        assert!(validate(&root).is_err());
    }

    #[test]
    fn test_empty_private_key_list() {
        let mut root = builtin_root();
        testnet(&mut root).accounts = Accounts::PrivateKeys(Vec::new());
        assert_eq!(
            validate(&root),
            Err(ConfigError::MissingField(
                "networks.BSCTestnet.accounts".to_string()
            ))
        );
    }

    #[test]
    fn test_stray_comma_is_fatal() {
        let mut root = builtin_root();
        testnet(&mut root).accounts =
            Accounts::PrivateKeys(vec![PrivateKey::new(KEY_A), PrivateKey::new("")]);
        let err = validate(&root).unwrap_err();
        assert!(err.to_string().contains("networks.BSCTestnet.accounts[1]"));
    }

    #[test]
    fn test_malformed_key_is_a_warning() {
        let mut root = builtin_root();
        testnet(&mut root).accounts =
            Accounts::PrivateKeys(vec![PrivateKey::new("0xabc"), PrivateKey::new(KEY_B)]);
        let warnings = validate(&root).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "networks.BSCTestnet.accounts[0]");
    }

    #[test]
    fn test_live_network_needs_http_url() {
        let mut root = builtin_root();
        testnet(&mut root).url = None;
        assert!(matches!(validate(&root), Err(ConfigError::MissingField(_))));

        testnet(&mut root).url = Some("ws://bsc.example".to_string());
        assert!(matches!(
            validate(&root),
            Err(ConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_simulated_network_rejects_url() {
        let mut root = builtin_root();
        root.networks.get_mut(SIMULATED_NETWORK).unwrap().url =
            Some("http://127.0.0.1:8545".to_string());
        assert!(validate(&root).is_err());
    }

    #[test]
    fn test_simulation_flags_on_live_network() {
        let mut root = builtin_root();
        testnet(&mut root).flags = Some(SimulationFlags::default());
        assert!(validate(&root).is_err());
    }

    #[test]
    fn test_zero_chain_id() {
        let mut root = builtin_root();
        testnet(&mut root).chain_id = Some(0);
        assert!(validate(&root).is_err());
    }

    #[test]
    fn test_mnemonic_word_count() {
        let mut root = builtin_root();
        testnet(&mut root).accounts = Accounts::Mnemonic(MnemonicAccounts::new("only three words"));
        assert!(validate(&root).is_err());
    }

    #[test]
    fn test_zero_timeout_warns() {
        let mut root = builtin_root();
        testnet(&mut root).timeout = Some(0);
        let warnings = validate(&root).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "networks.BSCTestnet.timeout");
    }

    #[test]
    fn test_simulated_entry_checked_by_map_key() {
        let mut root = builtin_root();
        root.networks.insert(
            SIMULATED_NETWORK.to_string(),
            NetworkProfile::http("renamed", "http://127.0.0.1:8545"),
        );
        assert!(matches!(
            validate(&root),
            Err(ConfigError::InvalidField { ref field, .. }) if field == "networks.hardhat.url"
        ));
    }
}

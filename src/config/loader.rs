use super::descriptor::{AccountsSource, Descriptor, NetworkDescriptor, ValueSource};
use super::environment::{Environment, SECRETS_FILE_NAME};
use super::settings::{
    ConfigurationRoot, NetworkProfile, SimulationFlags, LOCALHOST_NETWORK, LOCALHOST_URL,
    SIMULATED_NETWORK,
};
use crate::error::{EnvironmentError, Result};
use crate::wallet::{
    split_private_keys, Accounts, MnemonicAccounts, Secret, DEFAULT_ACCOUNT_COUNT,
    DEFAULT_HD_PATH,
};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Loads a descriptor together with the secrets file that sits next to it
#[derive(Debug, Clone)]
pub struct Loader {
    descriptor: Descriptor,
    secrets_path: PathBuf,
}

impl Loader {
    /// The built-in descriptor, with `.env` looked up in the current directory
    pub fn builtin() -> Self {
        Self::new(Descriptor::builtin(), Path::new("."))
    }

    /// `base_dir` is the directory the secrets file is looked up in
    pub fn new(descriptor: Descriptor, base_dir: &Path) -> Self {
        Loader {
            descriptor,
            secrets_path: base_dir.join(SECRETS_FILE_NAME),
        }
    }

    /// Read a TOML descriptor; its secrets file is `.env` in the same directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let descriptor = Descriptor::from_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(descriptor, base_dir))
    }

    pub fn with_secrets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_path = path.into();
        self
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn secrets_path(&self) -> &Path {
        &self.secrets_path
    }

    /// `base` plus whatever the secrets file adds; `base` always wins
    pub fn environment(&self, base: Environment) -> Result<Environment> {
        let mut environment = base;
        environment.merge_secrets_file(&self.secrets_path)?;
        Ok(environment)
    }

    /// Snapshot the process environment, merge the secrets file and resolve
    pub fn load(&self) -> Result<ConfigurationRoot> {
        let environment = self.environment(Environment::from_process())?;
        self.load_with(&environment)
    }

    /// Resolve against an explicit snapshot. Does not touch the filesystem.
    pub fn load_with(&self, environment: &Environment) -> Result<ConfigurationRoot> {
        resolve(&self.descriptor, environment)
    }
}

/// Load the built-in configuration from the process environment and `./.env`
pub fn load() -> Result<ConfigurationRoot> {
    Loader::builtin().load()
}

/// Turn a descriptor into a concrete configuration, applying defaults.
pub fn resolve(descriptor: &Descriptor, environment: &Environment) -> Result<ConfigurationRoot> {
    let mut networks = BTreeMap::new();
    for (name, raw) in &descriptor.networks {
        let profile = resolve_network(name, raw, environment)?;
        debug!(
            "Resolved network {name}: url={:?}, accounts={}",
            profile.url,
            profile.accounts.kind()
        );
        networks.insert(name.clone(), profile);
    }

    networks
        .entry(SIMULATED_NETWORK.to_string())
        .or_insert_with(NetworkProfile::simulated);
    networks
        .entry(LOCALHOST_NETWORK.to_string())
        .or_insert_with(|| NetworkProfile::http(LOCALHOST_NETWORK, LOCALHOST_URL));

    let default_network = descriptor
        .default_network
        .clone()
        .unwrap_or_else(|| SIMULATED_NETWORK.to_string());

    info!(
        "Loaded configuration: {} compiler(s), {} network(s), default network {default_network}",
        descriptor.solidity.compilers.len(),
        networks.len()
    );

    Ok(ConfigurationRoot {
        default_network,
        solidity: descriptor.solidity.clone(),
        networks,
    })
}

fn resolve_network(
    name: &str,
    raw: &NetworkDescriptor,
    environment: &Environment,
) -> Result<NetworkProfile> {
    let mut profile = if name == SIMULATED_NETWORK {
        NetworkProfile::simulated()
    } else {
        NetworkProfile::http(name, "")
    };
    // A declared localhost keeps the local node endpoint unless it sets its own.
    let default_url = (name == LOCALHOST_NETWORK).then(|| LOCALHOST_URL.to_string());
    profile.url = match &raw.url {
        Some(source) => Some(resolve_value(
            source,
            environment,
            &format!("networks.{name}.url"),
        )?),
        None => default_url,
    };

    if raw.chain_id.is_some() {
        profile.chain_id = raw.chain_id;
    }
    if let Some(gas_price) = raw.gas_price {
        profile.gas_price = gas_price;
    }
    if let Some(gas) = raw.gas {
        profile.gas = gas;
    }
    if raw.timeout.is_some() {
        profile.timeout = raw.timeout;
    }
    if let Some(source) = &raw.accounts {
        let field = format!("networks.{name}.accounts");
        profile.accounts = resolve_accounts(source, environment, &field)?;
    }
    if name == SIMULATED_NETWORK || raw.has_simulation_flags() {
        profile.flags = Some(resolve_flags(raw));
    }
    Ok(profile)
}

fn resolve_flags(raw: &NetworkDescriptor) -> SimulationFlags {
    let defaults = SimulationFlags::default();
    SimulationFlags {
        throw_on_transaction_failures: raw
            .throw_on_transaction_failures
            .unwrap_or(defaults.throw_on_transaction_failures),
        throw_on_call_failures: raw
            .throw_on_call_failures
            .unwrap_or(defaults.throw_on_call_failures),
        allow_unlimited_contract_size: raw
            .allow_unlimited_contract_size
            .unwrap_or(defaults.allow_unlimited_contract_size),
        logging_enabled: raw.logging_enabled.unwrap_or(defaults.logging_enabled),
    }
}

/// Literal values pass through. Environment references fall back to their
/// default when the variable is unset or empty, and fail without one.
pub fn resolve_value(
    source: &ValueSource,
    environment: &Environment,
    field: &str,
) -> Result<String> {
    match source {
        ValueSource::Literal(value) => Ok(value.clone()),
        ValueSource::Env(reference) => {
            match (environment.get_non_empty(&reference.env), &reference.default) {
                (Some(value), _) => Ok(value.to_string()),
                (None, Some(default)) => {
                    debug!("{} unset, using default for {field}", reference.env);
                    Ok(default.clone())
                }
                (None, None) => Err(EnvironmentError::new(&reference.env, field).into()),
            }
        }
    }
}

fn resolve_accounts(
    source: &AccountsSource,
    environment: &Environment,
    field: &str,
) -> Result<Accounts> {
    match source {
        AccountsSource::Remote => Ok(Accounts::Remote),
        AccountsSource::Mnemonic(mnemonic) => {
            let phrase =
                resolve_value(&mnemonic.mnemonic, environment, &format!("{field}.mnemonic"))?;
            let passphrase = mnemonic
                .passphrase
                .as_ref()
                .map(|source| resolve_value(source, environment, &format!("{field}.passphrase")))
                .transpose()?
                .unwrap_or_default();
            Ok(Accounts::Mnemonic(MnemonicAccounts {
                mnemonic: Secret::new(phrase),
                path: mnemonic
                    .path
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HD_PATH.to_string()),
                initial_index: mnemonic.initial_index.unwrap_or(0),
                count: mnemonic.count.unwrap_or(DEFAULT_ACCOUNT_COUNT),
                passphrase: Secret::new(passphrase),
            }))
        }
        AccountsSource::PrivateKeysFromEnv(keys) => {
            // An absent variable must fail here rather than split into nothing.
            let raw = environment
                .get(&keys.env)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| EnvironmentError::new(&keys.env, field))?;
            Ok(Accounts::PrivateKeys(split_private_keys(raw)))
        }
    }
}

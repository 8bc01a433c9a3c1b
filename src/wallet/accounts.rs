use super::keys::{PrivateKey, Secret};
use serde::{Serialize, Serializer};

/// The well-known development mnemonic used by the simulated network
pub const DEFAULT_MNEMONIC: &str = "test test test test test test test test test test test junk";
pub const DEFAULT_HD_PATH: &str = "m/44'/60'/0'/0";
pub const DEFAULT_ACCOUNT_COUNT: u32 = 20;

/// Word counts a BIP-39 phrase may have
pub const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// HD-wallet account descriptor derived from a seed phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MnemonicAccounts {
    pub mnemonic: Secret,
    pub path: String,
    pub initial_index: u32,
    pub count: u32,
    pub passphrase: Secret,
}

impl MnemonicAccounts {
    pub fn new(phrase: impl Into<String>) -> Self {
        MnemonicAccounts {
            mnemonic: Secret::new(phrase),
            path: DEFAULT_HD_PATH.to_string(),
            initial_index: 0,
            count: DEFAULT_ACCOUNT_COUNT,
            passphrase: Secret::new(""),
        }
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.expose().split_whitespace().count()
    }
}

impl Default for MnemonicAccounts {
    fn default() -> Self {
        Self::new(DEFAULT_MNEMONIC)
    }
}

/// Where a network gets its signing accounts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accounts {
    /// Accounts are managed by the node behind the RPC endpoint
    Remote,
    /// Accounts derived from a seed phrase
    Mnemonic(MnemonicAccounts),
    /// Explicit private keys, in configured order
    PrivateKeys(Vec<PrivateKey>),
}

impl Accounts {
    pub fn private_keys(&self) -> Option<&[PrivateKey]> {
        match self {
            Accounts::PrivateKeys(keys) => Some(keys),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Accounts::Remote => "remote",
            Accounts::Mnemonic(_) => "mnemonic",
            Accounts::PrivateKeys(_) => "private keys",
        }
    }
}

impl Serialize for Accounts {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Accounts::Remote => serializer.serialize_str("remote"),
            Accounts::Mnemonic(mnemonic) => mnemonic.serialize(serializer),
            Accounts::PrivateKeys(keys) => keys.serialize(serializer),
        }
    }
}

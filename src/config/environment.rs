use crate::error::Result;
use log::{debug, info};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;

/// File name of the secrets file looked up next to the descriptor
pub const SECRETS_FILE_NAME: &str = ".env";

/// Immutable snapshot of environment variables used to resolve a descriptor.
///
/// Resolution never reads the process environment directly; it reads one of
/// these, so the same snapshot always yields the same configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment. Variables whose name or
    /// value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Environment { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Environment {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get) but treats an empty value as unset
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Add a variable only if it is not already present
    pub fn insert_if_absent(&mut self, key: String, value: String) -> bool {
        if self.vars.contains_key(&key) {
            return false;
        }
        self.vars.insert(key, value);
        true
    }

    /// Merge a `KEY=value` secrets file into the snapshot.
    ///
    /// Variables already present are left untouched. A missing file is not an
    /// error and adds nothing. Returns the number of variables added.
    pub fn merge_secrets_file(&mut self, path: &Path) -> Result<usize> {
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => {
                debug!("No secrets file at {}, skipping", path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let mut added = 0;
        for entry in entries {
            let (key, value) = entry?;
            if self.insert_if_absent(key, value) {
                added += 1;
            }
        }
        info!("Loaded {added} variable(s) from {}", path.display());
        Ok(added)
    }
}

// Values are secrets more often than not, so only names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_secrets_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut environment = Environment::new();
        let added = environment
            .merge_secrets_file(&dir.path().join(SECRETS_FILE_NAME))
            .unwrap();
        assert_eq!(added, 0);
        assert!(environment.is_empty());
    }

    #[test]
    fn test_secrets_file_does_not_override_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SECRETS_FILE_NAME);
        fs::write(&path, "BSC_TESTNET_RPC=https://file.example/\nEXTRA='quoted value'\n").unwrap();

        let mut environment = Environment::new().with("BSC_TESTNET_RPC", "https://process.example/");
        let added = environment.merge_secrets_file(&path).unwrap();

        assert_eq!(added, 1);
        assert_eq!(environment.get("BSC_TESTNET_RPC"), Some("https://process.example/"));
        assert_eq!(environment.get("EXTRA"), Some("quoted value"));
    }

    #[test]
    fn test_malformed_secrets_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SECRETS_FILE_NAME);
        fs::write(&path, "THIS LINE IS NOT AN ASSIGNMENT\n").unwrap();

        let mut environment = Environment::new();
        assert!(environment.merge_secrets_file(&path).is_err());
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let environment = Environment::new().with("BSC_TESTNET_RPC", "");
        assert_eq!(environment.get("BSC_TESTNET_RPC"), Some(""));
        assert_eq!(environment.get_non_empty("BSC_TESTNET_RPC"), None);
    }

    #[test]
    fn test_debug_hides_values() {
        let environment = Environment::new().with("BSC_TESTNET_PRIVATE_KEY", "0xsecret");
        let printed = format!("{environment:?}");
        assert!(printed.contains("BSC_TESTNET_PRIVATE_KEY"));
        assert!(!printed.contains("0xsecret"));
    }
}

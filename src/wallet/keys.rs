use serde::{Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a raw secp256k1 private key in bytes
pub const PRIVATE_KEY_LEN: usize = 32;

/// A secret string (private key, mnemonic phrase) wiped from memory on drop.
///
/// `Debug` never prints the value. `Serialize` does, since the toolchain
/// needs the plain value in the resolved configuration.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl Serialize for Secret {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// One entry of a private-key account list, kept exactly as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrivateKey(Secret);

impl PrivateKey {
    pub fn new(value: impl Into<String>) -> Self {
        PrivateKey(Secret::new(value))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the key is 32 bytes of hex, with or without a `0x` prefix
    pub fn is_well_formed(&self) -> bool {
        let raw = self.expose();
        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        match hex::decode(digits) {
            Ok(mut bytes) => {
                let ok = bytes.len() == PRIVATE_KEY_LEN;
                bytes.zeroize();
                ok
            }
            Err(_) => false,
        }
    }
}

/// Split a comma-separated key list, preserving order and duplicates.
///
/// Entries are trimmed but empty entries are kept so validation can report
/// them by position.
pub fn split_private_keys(value: &str) -> Vec<PrivateKey> {
    value
        .split(',')
        .map(|entry| PrivateKey::new(entry.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn test_split_preserves_order_and_duplicates() {
        let keys = split_private_keys("0xabc,0xdef,0xabc");
        let raw: Vec<&str> = keys.iter().map(|k| k.expose()).collect();
        assert_eq!(raw, vec!["0xabc", "0xdef", "0xabc"]);
    }

    #[test]
    fn test_split_trims_and_keeps_empty_entries() {
        let keys = split_private_keys(" 0xabc , 0xdef,");
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].expose(), "0xabc");
        assert_eq!(keys[1].expose(), "0xdef");
        assert!(keys[2].is_empty());
    }

    #[test]
    fn test_well_formed_keys() {
        assert!(PrivateKey::new(KEY).is_well_formed());
        assert!(PrivateKey::new(&KEY[2..]).is_well_formed());
        assert!(!PrivateKey::new("0xabc").is_well_formed());
        assert!(!PrivateKey::new("not-hex").is_well_formed());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = PrivateKey::new(KEY);
        let printed = format!("{key:?}");
        assert!(!printed.contains("59c6995e"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_serializes_plain_value() {
        let key = PrivateKey::new("0xabc");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"0xabc\"");
    }
}

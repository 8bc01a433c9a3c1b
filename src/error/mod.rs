//! Error handling for configuration loading
//!
//! Every failure here is fatal at startup: nothing is retried and a partially
//! resolved configuration is never handed to the toolchain.

use std::fmt;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A required environment variable is absent or empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentError {
    /// Name of the variable that was looked up
    pub variable: String,
    /// Field the variable was feeding, e.g. `networks.BSCTestnet.accounts`
    pub field: String,
}

impl EnvironmentError {
    pub fn new(variable: impl Into<String>, field: impl Into<String>) -> Self {
        EnvironmentError {
            variable: variable.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "environment variable {} is not set or empty (required by {})",
            self.variable, self.field
        )
    }
}

impl std::error::Error for EnvironmentError {}

/// Error types for loading and validating a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field has no value
    MissingField(String),
    /// A field holds a value the toolchain would reject
    InvalidField { field: String, reason: String },
    /// `defaultNetwork` (or a lookup) names a network that was not declared
    UnknownNetwork(String),
    /// A required environment variable is missing
    Environment(EnvironmentError),
    /// The secrets file exists but could not be parsed
    SecretsFile(String),
    /// File I/O errors
    Io(String),
    /// Descriptor parse errors
    Parse(String),
    /// Serialization errors
    Serialization(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_environment(&self) -> bool {
        matches!(self, ConfigError::Environment(_))
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidField { field, reason } => {
                write!(f, "Invalid value for {field}: {reason}")
            }
            ConfigError::UnknownNetwork(name) => write!(f, "Unknown network: {name}"),
            ConfigError::Environment(err) => write!(f, "Environment error: {err}"),
            ConfigError::SecretsFile(msg) => write!(f, "Secrets file error: {msg}"),
            ConfigError::Io(msg) => write!(f, "I/O error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Descriptor parse error: {msg}"),
            ConfigError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Environment(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EnvironmentError> for ConfigError {
    fn from(err: EnvironmentError) -> Self {
        ConfigError::Environment(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

impl From<dotenvy::Error> for ConfigError {
    fn from(err: dotenvy::Error) -> Self {
        ConfigError::SecretsFile(err.to_string())
    }
}

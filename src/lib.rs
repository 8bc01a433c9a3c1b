//! # Contract Config - Typed Toolchain Configuration
//!
//! This crate holds the configuration my contract toolchain reads at startup:
//! which compilers to build with, which networks to deploy to, and where the
//! signing accounts for each network come from.
//!
//! ## What It Does
//! - **Descriptor**: declarative settings, built in or read from a TOML file
//! - **Secrets**: a `.env` file merged into an environment snapshot, never
//!   overriding variables that are already set
//! - **Resolution**: environment references and toolchain defaults applied,
//!   producing an immutable `ConfigurationRoot`
//! - **Validation**: every misconfiguration is fatal before anything runs
//!
//! ## How the Code Is Organized
//! - `config/`: descriptor, environment snapshot, loader, validation, compiler selection
//! - `wallet/`: private keys and mnemonics, wiped from memory on drop
//! - `error/`: the error types every fallible operation returns
//! - `cli/`: command-line interface for inspecting a configuration
//!
//! ## Typical Use
//! ```no_run
//! use contract_config::{Loader, Result};
//!
//! fn main() -> Result<()> {
//!     let config = Loader::builtin().load()?;
//!     config.validate()?;
//!     println!("{}", config.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod wallet;

pub use cli::{Command, Opt};
pub use config::{
    load, resolve, select_compiler, validate, CompilerProfile, ConfigWarning, ConfigurationRoot,
    Descriptor, Environment, GasSetting, Loader, NetworkProfile,
};
pub use error::{ConfigError, EnvironmentError, Result};
pub use wallet::{Accounts, MnemonicAccounts, PrivateKey};

//! Configuration management
//!
//! This module turns a declarative descriptor plus the environment into the
//! resolved configuration the compile-and-deploy toolchain reads at startup:
//! compiler profiles, networks and their accounts.
//!
//! Resolution takes an explicit [`Environment`] snapshot and never writes to
//! the process environment.

pub mod compiler;
pub mod descriptor;
pub mod environment;
pub mod loader;
pub mod settings;
pub mod validate;

pub use compiler::{select_compiler, CompilerVersion, VersionPragma};
pub use descriptor::{AccountsSource, Descriptor, NetworkDescriptor, ValueSource};
pub use environment::Environment;
pub use loader::{load, resolve, Loader};
pub use settings::{
    CompilerProfile, ConfigurationRoot, GasSetting, NetworkProfile, OptimizerSettings,
    SimulationFlags, SolidityConfig,
};
pub use validate::{validate, ConfigWarning};

impl ConfigurationRoot {
    /// The compiler profile the toolchain would use for a source file with
    /// the given version pragma
    pub fn select_compiler(&self, pragma: &str) -> crate::error::Result<&CompilerProfile> {
        select_compiler(&self.solidity.compilers, pragma)
    }

    pub fn validate(&self) -> crate::error::Result<Vec<ConfigWarning>> {
        validate(self)
    }
}

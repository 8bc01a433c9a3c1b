//! Command-line interface
//!
//! This module contains the CLI commands and argument parsing
//! for inspecting a toolchain configuration.

pub mod commands;

pub use commands::{Command, Opt};

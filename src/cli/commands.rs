use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "contract-config", about = "Inspect and check toolchain configuration")]
pub struct Opt {
    #[arg(
        long,
        global = true,
        help = "Descriptor file to load instead of the built-in configuration"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Secrets file to read (defaults to .env next to the descriptor)"
    )]
    pub secrets: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "show", about = "Print the resolved configuration as JSON")]
    Show {
        #[arg(long, help = "Only print this network")]
        network: Option<String>,
    },
    #[command(name = "check", about = "Validate the configuration and report warnings")]
    Check,
    #[command(name = "networks", about = "List configured networks")]
    Networks,
    #[command(
        name = "compiler",
        about = "Show the compiler selected for a version pragma"
    )]
    Compiler {
        #[arg(help = "Version pragma, e.g. \"^0.8.0\"")]
        pragma: String,
    },
    #[command(name = "template", about = "Print the built-in descriptor as TOML")]
    Template,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_with_network() {
        let opt = Opt::parse_from(["contract-config", "show", "--network", "BSCTestnet"]);
        match opt.command {
            Command::Show { network } => assert_eq!(network.as_deref(), Some("BSCTestnet")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_paths_after_subcommand() {
        let opt = Opt::parse_from([
            "contract-config",
            "check",
            "--config",
            "deploy/contract-config.toml",
            "--secrets",
            "deploy/.env",
        ]);
        assert!(matches!(opt.command, Command::Check));
        assert_eq!(opt.config, Some(PathBuf::from("deploy/contract-config.toml")));
        assert_eq!(opt.secrets, Some(PathBuf::from("deploy/.env")));
    }

    #[test]
    fn test_compiler_requires_pragma() {
        assert!(Opt::try_parse_from(["contract-config", "compiler"]).is_err());
    }
}

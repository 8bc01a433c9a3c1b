// Entry point for inspecting the toolchain configuration from the shell
use clap::Parser;
use contract_config::{Command, ConfigurationRoot, Loader, Opt};
use log::{error, LevelFilter};
use std::process;

fn main() {
    // Info level shows which secrets file was read without printing any values
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    // Any configuration error aborts with a non-zero exit code
    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn build_loader(opt: &Opt) -> contract_config::Result<Loader> {
    let loader = match &opt.config {
        Some(path) => Loader::from_file(path)?,
        None => Loader::builtin(),
    };
    Ok(match &opt.secrets {
        Some(path) => loader.with_secrets_path(path),
        None => loader,
    })
}

// Everything except `template` resolves and validates first, so a broken
// configuration never gets printed as if it were usable
fn load_checked(loader: &Loader) -> contract_config::Result<ConfigurationRoot> {
    let config = loader.load()?;
    config.validate()?;
    Ok(config)
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let loader = build_loader(&opt)?;

    match opt.command {
        Command::Show { network } => {
            let config = load_checked(&loader)?;
            match network {
                Some(name) => {
                    let profile = config.network(&name)?;
                    println!("{}", serde_json::to_string_pretty(profile)?);
                }
                None => println!("{}", config.to_json()?),
            }
        }
        Command::Check => {
            let config = loader.load()?;
            let warnings = config.validate()?;
            for warning in &warnings {
                println!("warning: {warning}");
            }
            println!(
                "Configuration OK ({} network(s), {} warning(s))",
                config.networks.len(),
                warnings.len()
            );
        }
        Command::Networks => {
            let config = load_checked(&loader)?;
            for (name, network) in &config.networks {
                let marker = if *name == config.default_network { "*" } else { " " };
                let endpoint = network.url.as_deref().unwrap_or("(in-process)");
                let chain = network
                    .chain_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{marker} {name:<16} chain {chain:<8} {endpoint} [{}]",
                    network.accounts.kind()
                );
            }
        }
        Command::Compiler { pragma } => {
            let config = load_checked(&loader)?;
            let compiler = config.select_compiler(&pragma)?;
            let optimizer = compiler.settings.optimizer;
            println!(
                "{} (optimizer {}, runs {})",
                compiler.version,
                if optimizer.enabled { "on" } else { "off" },
                optimizer.runs
            );
        }
        Command::Template => {
            print!("{}", loader.descriptor().to_toml_string()?);
        }
    }
    Ok(())
}

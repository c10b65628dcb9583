//! # teavault CLI
//!
//! Entry point for the `teavault` binary.
//!
//! Subcommands:
//! - `teavault check`     — Decide one manager call against a vault config
//! - `teavault predict`   — Print the CREATE2 address for a salt
//! - `teavault selectors` — List the functions each validator kind recognizes

use std::path::PathBuf;

use alloy::primitives::{Address, B256, U256};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// teavault — offline tooling for the vault's call-authorization engine.
#[derive(Parser)]
#[command(name = "teavault", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the vault would forward a manager call.
    Check {
        /// Path to vault.yaml.
        #[arg(long, short, env = "TEAVAULT_CONFIG")]
        config: PathBuf,

        /// Target contract address (0x...).
        #[arg(long)]
        target: Address,

        /// Native value in wei. Default: 0.
        #[arg(long)]
        value: Option<U256>,

        /// Hex-encoded calldata (with or without 0x prefix).
        #[arg(long)]
        data: String,
    },

    /// Print the deterministic address of the vault deployed at a salt.
    Predict {
        /// Deployer contract address.
        #[arg(long)]
        deployer: Address,

        /// Hex-encoded vault init code.
        #[arg(long)]
        init_code: String,

        /// 32-byte salt (0x-prefixed hex).
        #[arg(long)]
        salt: B256,
    },

    /// List the functions each validator kind recognizes.
    Selectors,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            config,
            target,
            value,
            data,
        } => commands::check::run(config, target, value, &data),
        Commands::Predict {
            deployer,
            init_code,
            salt,
        } => commands::predict::run(deployer, &init_code, salt).map(|()| true),
        Commands::Selectors => {
            commands::selectors::run();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

//! lazsync CLI - signed Lazada Open Platform client and order/product harvester.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use lazsync_lib::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;

use commands::call::CallArgs;
use commands::sync::SyncArgs;
use config::Settings;

#[derive(Parser)]
#[command(name = "lazsync")]
#[command(about = "Lazada Open Platform client and order/product harvester", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file. Defaults to <config dir>/lazsync/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Region code (e.g., MY, SG). Overrides the settings file and LAZSYNC_REGION
    #[arg(short, long, global = true)]
    region: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest every order of a seller
    Orders(SyncArgs),

    /// Harvest every product of a seller
    Products(SyncArgs),

    /// Exchange an authorization code for an access token
    Token {
        /// Authorization code received on the callback URL
        #[arg(short, long)]
        code: String,
    },

    /// Print the seller authorization URL
    AuthUrl {
        /// Callback URL registered for the app
        #[arg(short, long)]
        callback: String,
    },

    /// List known regions
    Regions,

    /// Make one signed API call and print the response envelope
    Call(CallArgs),
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_env(|key| std::env::var(key).ok());
    if let Some(region) = cli.region {
        settings.region = Some(region);
    }

    match command {
        Commands::Orders(args) => {
            commands::sync::sync(&settings, Collection::Orders, &args, cli.quiet).await
        }
        Commands::Products(args) => {
            commands::sync::sync(&settings, Collection::Products, &args, cli.quiet).await
        }
        Commands::Token { code } => commands::token::exchange(&settings, &code).await,
        Commands::AuthUrl { callback } => commands::auth_url::print_auth_url(&settings, &callback),
        Commands::Regions => commands::regions::list_regions(&settings),
        Commands::Call(args) => commands::call::call(&settings, &args).await,
    }
}

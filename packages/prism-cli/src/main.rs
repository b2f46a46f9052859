mod config;
mod host;
mod relay_server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::RelayConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prism")]
#[command(about = "Prism inspector relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay between inspected pages and inspector panels
    Relay {
        /// Address to listen on
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Log filter used when RUST_LOG is not set
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Print the effective configuration
    Config {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Relay {
            bind,
            config,
            log_level,
        } => {
            let mut config = RelayConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(level) = log_level {
                config.log_level = level;
            }
            init_tracing(&config.log_level);
            relay_server::serve(config).await?;
        }
        Commands::Config { config } => {
            let config = RelayConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

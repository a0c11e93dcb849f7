use anyhow::Context;
use bounceban_bridge_core::core::config::load_config_file;
use bounceban_bridge_core::{logging, service, Config, ConfigBuilder};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "BOUNCEBAN_BRIDGE_LOG_LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP bridge
    Serve(ConfigArgs),
    /// Print the effective configuration (API key redacted)
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long, env = "BOUNCEBAN_BRIDGE_BIND")]
    bind: Option<String>,

    /// Provider base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn build_config(args: &ConfigArgs) -> anyhow::Result<Config> {
    let file = load_config_file(args.config.as_deref()).context("Failed to load config file")?;

    let mut builder = ConfigBuilder::new().with_file(file).with_env();
    if let Some(bind) = &args.bind {
        builder = builder.bind_address(bind.clone());
    }
    if let Some(base_url) = &args.base_url {
        builder = builder.api_base_url(base_url.clone());
    }
    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Serve(args) => {
            let config = build_config(&args)?;
            if let Some(path) = &config.loaded_config_path {
                tracing::info!(target: "config", path = %path, "Loaded configuration file");
            }
            if config.fallback_api_key.is_none() {
                tracing::warn!(
                    target: "config",
                    "No fallback API key configured; requests must carry their own credential"
                );
            }
            service::serve(config).await?;
        }
        Commands::Config(args) => {
            let config = build_config(&args)?;
            println!("{:#?}", config);
        }
    }
    Ok(())
}

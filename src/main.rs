use std::path::PathBuf;

use clap::Parser;
use codelist_graph::{config, server};

/// Codelist Graph - read-only code list API over Neo4j
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file; environment variables are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP server host address
    #[arg(long)]
    http_host: Option<String>,

    /// HTTP server port
    #[arg(long)]
    http_port: Option<u16>,

    /// Neo4j bolt address
    #[arg(long)]
    neo4j_uri: Option<String>,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host.clone(),
            http_port: cli.http_port,
            neo4j_uri: cli.neo4j_uri.clone(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<config::ServerConfig, config::ConfigError> {
    let base = match &cli.config {
        Some(path) => config::ServerConfig::from_yaml_file(path)?,
        None => config::ServerConfig::from_env()?,
    };
    base.apply_cli(cli.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Codelist Graph v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await
}

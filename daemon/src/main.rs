//! reclaim daemon: entry point for running a reclaim node.

use anyhow::Context;
use clap::Parser;
use reclaim_node::{NodeConfig, ReclaimNode};
use reclaim_utils::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reclaimd", version, about = "Campus lost-and-found claim service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "RECLAIM_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "RECLAIM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// LMDB map size in MiB.
    #[arg(long, env = "RECLAIM_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Interface for the HTTP API.
    #[arg(long, env = "RECLAIM_RPC_HOST")]
    rpc_host: Option<String>,

    /// HTTP API port.
    #[arg(long, env = "RECLAIM_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Serve Prometheus metrics on /metrics.
    #[arg(long, env = "RECLAIM_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "RECLAIM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "RECLAIM_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Base URL of the matching service.
    #[arg(long, env = "RECLAIM_MATCHING_ENDPOINT")]
    matching_endpoint: Option<String>,

    /// Capacity of the match queue.
    #[arg(long, env = "RECLAIM_MATCHING_QUEUE_CAPACITY")]
    matching_queue_capacity: Option<usize>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run the service until SIGINT or SIGTERM.
    Serve,
    /// Print the effective configuration as TOML and exit.
    Config,
}

impl Cli {
    /// Layer CLI flags and env vars over `base`.
    fn apply(self, base: NodeConfig) -> NodeConfig {
        let mut config = base;
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(mb) = self.map_size_mb {
            config.map_size_mb = mb;
        }
        if let Some(host) = self.rpc_host {
            config.rpc_host = host;
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        config.enable_metrics |= self.metrics;
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(endpoint) = self.matching_endpoint {
            config.matching.endpoint = Some(endpoint);
        }
        if let Some(capacity) = self.matching_queue_capacity {
            config.matching.queue_capacity = capacity;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    let command = cli.command;
    let config = cli.apply(base);

    match command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Serve => {
            reclaim_utils::init_logging(config.log_format, &config.log_level)?;

            let mut node = ReclaimNode::new(config)
                .await
                .context("failed to initialise node")?;
            node.start().await.context("failed to start node")?;

            node.wait_for_signal().await;
            tracing::info!("shutdown signal received, stopping node");
            node.stop().await?;

            tracing::info!("reclaim daemon exited cleanly");
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use talk2db_core::config::Settings;
use talk2db_core::Pipeline;
use talk2db_server::config::ServerConfig;
use talk2db_server::server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen address (overrides T2DB_SERVER_ADDR)
    #[arg(long)]
    addr: Option<String>,

    /// Optional YAML settings file
    #[arg(long, env = "T2DB_CONFIG")]
    config: Option<PathBuf>,
}

use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .init();
}

const CONFIG_ERROR: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // loads .env as a side effect, so it runs before ServerConfig reads the environment
    let settings = Settings::load(args.config.as_deref(), None);
    let mut cfg = ServerConfig::from_env();
    if let Some(addr) = args.addr {
        cfg.addr = addr;
    }

    init_logging(&cfg.log_level);

    let pipeline = match settings.and_then(|s| Pipeline::from_settings(&s)) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(event = "config_error", error = %e);
            std::process::exit(CONFIG_ERROR);
        }
    };

    tracing::info!(
        event = "server_start",
        config = ?cfg,
        provider = pipeline.provider().provider_name(),
        model = pipeline.provider().model(),
        dialect = pipeline.dialect().label()
    );

    server::serve(&cfg.addr, Arc::new(pipeline)).await
}

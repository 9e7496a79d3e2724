use super::args::*;
use std::path::Path;
use talk2db_core::config::Settings;
use talk2db_core::{ConfigError, Pipeline, ProviderKind};

pub mod ask;
pub mod query;
pub mod schema;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const QUESTION_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.config.as_deref();
    match cli.cmd {
        Command::Ask(args) => ask::run(args, config).await,
        Command::Query(args) => query::run(args, config).await,
        Command::Schema(args) => schema::run(args, config),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// Resolve settings and open the database plus provider.
fn open_pipeline(
    config: Option<&Path>,
    provider: Option<ProviderKind>,
) -> Result<(Settings, Pipeline), ConfigError> {
    let settings = Settings::load(config, provider)?;
    tracing::debug!(event = "settings_loaded", settings = ?settings);
    let pipeline = Pipeline::from_settings(&settings)?;
    Ok((settings, pipeline))
}

fn report_config_error(e: &ConfigError) -> i32 {
    tracing::error!(event = "config_error", error = %e);
    eprintln!("config error: {}", e);
    exit_codes::CONFIG_ERROR
}

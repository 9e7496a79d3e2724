use clap::Parser;

mod cli;
mod report;

use cli::args::Cli;
use cli::commands::{dispatch, exit_codes};
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    // results go to stdout, so logs stay on stderr and quiet by default
    let filter = EnvFilter::try_from_env(talk2db_core::config::ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        // config errors are reported inside the commands; anything here is I/O
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::QUESTION_FAILED
        }
    };
    std::process::exit(code);
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use talk2db_core::{ProviderKind, SchemaStyle};

#[derive(Parser)]
#[command(
    name = "talk2db",
    version,
    about = "Ask questions of a relational database in plain language"
)]
pub struct Cli {
    /// Optional YAML settings file (secrets stay in the environment)
    #[arg(long, global = true, env = "T2DB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive question loop
    Ask(AskArgs),
    /// Answer a single question and exit
    Query(QueryArgs),
    /// Print the schema context handed to the model
    Schema(SchemaArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AskArgs {
    /// chat | hosted | fake (overrides T2DB_PROVIDER)
    #[arg(long)]
    pub provider: Option<ProviderKind>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    pub question: String,

    #[arg(long)]
    pub provider: Option<ProviderKind>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the rendered result here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SchemaArgs {
    /// compact | annotated | ddl (defaults to T2DB_SCHEMA_STYLE)
    #[arg(long)]
    pub style: Option<SchemaStyle>,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

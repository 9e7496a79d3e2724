use super::exit_codes;
use crate::cli::args::SchemaArgs;
use std::path::{Path, PathBuf};
use talk2db_core::{ProviderKind, SchemaStyle};

pub fn run(args: SchemaArgs, config: Option<&Path>) -> anyhow::Result<i32> {
    // no model call here, so no provider credentials either
    let (settings, pipeline) = match super::open_pipeline(config, Some(ProviderKind::Fake)) {
        Ok(opened) => opened,
        Err(e) => return Ok(super::report_config_error(&e)),
    };

    let style = args.style.unwrap_or(settings.schema.style);
    let rendered = match pipeline.render_schema(style) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(event = "schema_failed", error = %e);
            eprintln!("Error: {}", e);
            return Ok(exit_codes::QUESTION_FAILED);
        }
    };

    let out = match (args.out, style) {
        (Some(p), _) => Some(p),
        (None, SchemaStyle::Ddl) => Some(default_ddl_path()),
        (None, _) => None,
    };

    match out {
        Some(p) => {
            std::fs::write(&p, rendered)?;
            eprintln!("wrote file: {}", p.display());
        }
        None => print!("{}", rendered),
    }

    Ok(exit_codes::OK)
}

fn default_ddl_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("schema_{}.sql", stamp))
}

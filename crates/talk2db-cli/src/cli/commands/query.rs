use super::exit_codes;
use crate::cli::args::{OutputFormat, QueryArgs};
use crate::report;
use serde_json::json;
use std::path::Path;

pub async fn run(args: QueryArgs, config: Option<&Path>) -> anyhow::Result<i32> {
    let (_, pipeline) = match super::open_pipeline(config, args.provider) {
        Ok(opened) => opened,
        Err(e) => return Ok(super::report_config_error(&e)),
    };

    let answer = match pipeline.ask(&args.question).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!(event = "question_failed", kind = e.kind(), error = %e);
            eprintln!("Error: {}", e);
            return Ok(exit_codes::QUESTION_FAILED);
        }
    };

    let rendered = match args.format {
        OutputFormat::Table => format!(
            "SQL: {}\n{}",
            answer.sql_query,
            report::render_table(&answer.result)
        ),
        OutputFormat::Json => {
            let body = json!({
                "sql_query": answer.sql_query,
                "results": answer.records(),
            });
            format!("{}\n", serde_json::to_string_pretty(&body)?)
        }
        OutputFormat::Csv => report::render_csv(&answer.result)?,
    };

    if let Some(p) = args.out {
        std::fs::write(&p, rendered)?;
        eprintln!("wrote file: {}", p.display());
    } else {
        print!("{}", rendered);
    }

    Ok(exit_codes::OK)
}

use super::exit_codes;
use crate::cli::args::AskArgs;
use crate::report;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "Question: ";

pub async fn run(args: AskArgs, config: Option<&Path>) -> anyhow::Result<i32> {
    let (_, pipeline) = match super::open_pipeline(config, args.provider) {
        Ok(opened) => opened,
        Err(e) => return Ok(super::report_config_error(&e)),
    };

    eprintln!("talk2db ready ({}). Type 'exit' to quit.", pipeline.provider().provider_name());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        match pipeline.ask(question).await {
            Ok(answer) => {
                println!("SQL: {}", answer.sql_query);
                print!("{}", report::render_table(&answer.result));
            }
            Err(e) => {
                tracing::error!(event = "question_failed", kind = e.kind(), error = %e);
                eprintln!("Error: {}", e);
            }
        }
    }

    Ok(exit_codes::OK)
}

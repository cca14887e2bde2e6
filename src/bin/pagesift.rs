//! CLI that reads HTML from stdin and writes the extraction result as
//! JSON to stdout.
//!
//! Usage: `pagesift [--markdown|--html] [--no-detect] [--base-url URL]`

use std::io::Read;
use std::process::ExitCode;

use pagesift::{Engine, EngineConfig, ExtractOptions, OutputFormat};
use tracing_subscriber::EnvFilter;

fn parse_args() -> Result<ExtractOptions, String> {
    let mut options = ExtractOptions::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--markdown" => options.format = OutputFormat::Markdown,
            "--html" => options.format = OutputFormat::Html,
            "--no-detect" => options.detect_article = false,
            "--base-url" => match args.next() {
                Some(url) => options.base_url = Some(url),
                None => return Err("--base-url requires a value".to_string()),
            },
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: pagesift [--markdown|--html] [--no-detect] [--base-url URL]");
            return ExitCode::FAILURE;
        }
    };

    let mut html = Vec::new();
    if std::io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("failed to read from stdin");
        return ExitCode::FAILURE;
    }

    let engine = Engine::new(EngineConfig::default());
    match engine.extract(html, &options).await {
        Ok(result) => match result.to_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("serialization failed: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("extraction failed: {err}");
            ExitCode::FAILURE
        }
    }
}

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use rbison_core::{Value, to_markup, to_pretty_markup};
use rbison_vm::{Dispatcher, Input, Parser, ReaderInput, RunConfig};

use super::build::BuildArgs;
use super::grammar_loader::build_engine;
use crate::cli::OutputFormat;

pub struct RunArgs {
    pub build: BuildArgs,
    /// `None` reads stdin
    pub input: Option<PathBuf>,
    pub debug: bool,
    pub interactive: bool,
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

pub fn run(args: RunArgs) {
    let (_, artifact) = build_engine(&args.build.engine_options()).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    });

    let mut config = RunConfig::new()
        .debug(args.debug)
        .interactive(args.interactive);
    if let Some(timeout) = args.timeout {
        config = config.timeout(timeout);
    }

    let mut parser = match Parser::load(&artifact, Dispatcher::new()) {
        Ok(parser) => parser.with_config(config),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let mut input: Box<dyn Input> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(ReaderInput::new(BufReader::new(file))),
            Err(e) => {
                eprintln!("error: failed to read '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(ReaderInput::new(io::stdin().lock())),
    };

    let outcomes = match parser.run_to_end(input.as_mut()) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for outcome in outcomes {
        if outcome.value != Value::Empty {
            match render(&outcome.value, args.format) {
                Ok(text) => println!("{}", text),
                Err(msg) => {
                    eprintln!("error: {}", msg);
                    std::process::exit(1);
                }
            }
        }
        if let Some(e) = outcome.error {
            eprintln!("error: {}", e);
            failed = true;
        }
    }
    if failed {
        std::process::exit(1);
    }
}

/// Print a run result in `format`.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, String> {
    match (format, value) {
        (OutputFormat::Json, _) => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        (OutputFormat::Markup, Value::Node(node)) => to_markup(node).map_err(|e| e.to_string()),
        (OutputFormat::Pretty, Value::Node(node)) => {
            to_pretty_markup(node).map_err(|e| e.to_string())
        }
        (OutputFormat::Dump, Value::Node(node)) => Ok(node.dump().trim_end().to_string()),
        (_, other) => Ok(other.to_string()),
    }
}

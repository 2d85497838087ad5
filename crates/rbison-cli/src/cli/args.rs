//! Shared argument builders for CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file (positional).
pub fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Bison grammar file")
}

/// Lexer script (positional).
pub fn lexer_arg() -> Arg {
    Arg::new("lexer")
        .value_name("LEXER")
        .value_parser(value_parser!(PathBuf))
        .help("Flex lexer script")
}

/// Input to parse (positional, stdin when absent or "-").
pub fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("INPUT")
        .value_parser(value_parser!(PathBuf))
        .help("Input file (stdin if omitted or \"-\")")
}

/// Output file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write to FILE instead of stdout")
}

/// Generate node types per target (--per-target-types).
pub fn per_target_types_arg() -> Arg {
    Arg::new("per_target_types")
        .long("per-target-types")
        .action(ArgAction::SetTrue)
        .help("Emit one node type per target")
}

/// Engine build directory (--build-dir).
pub fn build_dir_arg() -> Arg {
    Arg::new("build_dir")
        .long("build-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory for the built engine [default: .]")
}

/// Engine name (--name).
pub fn name_arg() -> Arg {
    Arg::new("name")
        .short('n')
        .long("name")
        .value_name("NAME")
        .help("Engine base name [default: grammar file stem]")
}

/// Keep intermediate build files (--keep-files).
pub fn keep_files_arg() -> Arg {
    Arg::new("keep_files")
        .long("keep-files")
        .action(ArgAction::SetTrue)
        .help("Keep the generated C sources")
}

/// Build configuration file (--build-config).
pub fn build_config_arg() -> Arg {
    Arg::new("build_config")
        .long("build-config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON build configuration (toolchain commands, flags, file names)")
}

/// Parser trace (--debug).
pub fn debug_arg() -> Arg {
    Arg::new("debug")
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Print the engine's parse trace to stderr")
}

/// Keep going after syntax errors (-i/--interactive).
pub fn interactive_arg() -> Arg {
    Arg::new("interactive")
        .short('i')
        .long("interactive")
        .action(ArgAction::SetTrue)
        .help("Report syntax errors and keep parsing")
}

/// Run time limit (--timeout).
pub fn timeout_arg() -> Arg {
    Arg::new("timeout")
        .long("timeout")
        .value_name("SECS")
        .value_parser(parse_timeout)
        .help("Abort the run after SECS seconds")
}

/// Seconds as a non-negative duration; fractions allowed.
pub fn parse_timeout(text: &str) -> Result<Duration, String> {
    let secs: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("`{text}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid timeout `{text}`: {e}"))
}

/// Result format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .value_name("FORMAT")
        .default_value("markup")
        .value_parser(["markup", "pretty", "json", "dump"])
        .help("How to print the result")
}

//! Tests for CLI dispatch logic.

use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::cli::commands::{build_command, convert_command, run_command};
use crate::commands::build::BuildArgs;
use crate::commands::convert::ConvertArgs;
use crate::commands::run::RunArgs;

#[test]
fn convert_lexer_is_optional() {
    let m = convert_command()
        .try_get_matches_from(["convert", "grammars/Calc-Lang.y"])
        .unwrap();
    let args: ConvertArgs = ConvertParams::from_matches(&m).into();

    assert_eq!(args.grammar, PathBuf::from("grammars/Calc-Lang.y"));
    assert_eq!(args.lexer, None);
    assert_eq!(args.output, None);
    assert_eq!(args.module_name, "calc_lang");
    assert!(!args.per_target_types);
}

#[test]
fn convert_flags() {
    let m = convert_command()
        .try_get_matches_from([
            "convert",
            "calc.y",
            "calc.l",
            "-o",
            "calc.rs",
            "--per-target-types",
            "--name",
            "desk",
        ])
        .unwrap();
    let args: ConvertArgs = ConvertParams::from_matches(&m).into();

    assert_eq!(args.lexer, Some(PathBuf::from("calc.l")));
    assert_eq!(args.output, Some(PathBuf::from("calc.rs")));
    assert_eq!(args.module_name, "desk");
    assert!(args.per_target_types);
}

#[test]
fn build_requires_lexer() {
    let result = build_command().try_get_matches_from(["build", "calc.y"]);
    assert!(result.is_err());
}

#[test]
fn build_params() {
    let m = build_command()
        .try_get_matches_from([
            "build",
            "calc.y",
            "calc.l",
            "--build-dir",
            "out",
            "--keep-files",
            "--build-config",
            "cc.json",
        ])
        .unwrap();
    let args: BuildArgs = BuildParams::from_matches(&m).into();

    assert_eq!(args.build_dir, Some(PathBuf::from("out")));
    assert_eq!(args.module_name, "calc");
    assert!(args.keep_files);
    assert_eq!(args.build_config, Some(PathBuf::from("cc.json")));
}

#[test]
fn run_defaults() {
    let m = run_command()
        .try_get_matches_from(["run", "calc.y", "calc.l"])
        .unwrap();
    let args: RunArgs = RunParams::from_matches(&m).into();

    assert_eq!(args.input, None);
    assert_eq!(args.format, OutputFormat::Markup);
    assert_eq!(args.timeout, None);
    assert!(!args.debug);
    assert!(!args.interactive);
}

#[test]
fn run_flags() {
    let m = run_command()
        .try_get_matches_from([
            "run",
            "calc.y",
            "calc.l",
            "input.txt",
            "--debug",
            "-i",
            "--timeout",
            "1.5",
            "--format",
            "json",
        ])
        .unwrap();
    let args: RunArgs = RunParams::from_matches(&m).into();

    assert_eq!(args.input, Some(PathBuf::from("input.txt")));
    assert_eq!(args.timeout, Some(Duration::from_millis(1500)));
    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.debug);
    assert!(args.interactive);
}

#[test]
fn run_dash_input_is_stdin() {
    let m = run_command()
        .try_get_matches_from(["run", "calc.y", "calc.l", "-"])
        .unwrap();
    let args: RunArgs = RunParams::from_matches(&m).into();
    assert_eq!(args.input, None);
}

#[test]
fn run_rejects_unknown_format() {
    let result =
        run_command().try_get_matches_from(["run", "calc.y", "calc.l", "--format", "yaml"]);
    assert!(result.is_err());
}

#[test]
fn cli_requires_subcommand() {
    assert!(build_cli().try_get_matches_from(["rbison"]).is_err());
}

#[test]
fn run_rejects_out_of_range_timeouts() {
    for timeout in ["--timeout=-1", "--timeout=1e30", "--timeout=NaN", "--timeout=soon"] {
        let result = run_command().try_get_matches_from(["run", "calc.y", "calc.l", timeout]);
        assert!(result.is_err(), "{timeout} was accepted");
    }
}

#[test]
fn parse_timeout_accepts_zero_and_fractions() {
    use super::args::parse_timeout;

    assert_eq!(parse_timeout("0"), Ok(Duration::ZERO));
    assert_eq!(parse_timeout("0.25"), Ok(Duration::from_millis(250)));
    assert!(parse_timeout("-0.5").unwrap_err().contains("invalid timeout"));
}

//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("rbison")
        .about("Bison/flex parsers driven from Rust")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(convert_command())
        .subcommand(build_command())
        .subcommand(run_command())
}

/// Generate a Rust host module from a grammar.
pub fn convert_command() -> Command {
    Command::new("convert")
        .about("Generate a Rust host module from a bison grammar")
        .after_help(
            r#"EXAMPLES:
  rbison convert calc.y calc.l -o calc.rs
  rbison convert calc.y --per-target-types"#,
        )
        .arg(grammar_arg())
        .arg(lexer_arg())
        .arg(output_arg())
        .arg(name_arg())
        .arg(per_target_types_arg())
}

/// Compile a grammar and lexer into an engine.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Compile a grammar and lexer script into a loadable engine")
        .after_help(
            r#"EXAMPLES:
  rbison build calc.y calc.l
  rbison build calc.y calc.l --build-dir target/engines --keep-files
  rbison build calc.y calc.l --build-config toolchain.json"#,
        )
        .arg(grammar_arg())
        .arg(lexer_arg().required(true))
        .arg(build_dir_arg())
        .arg(name_arg())
        .arg(keep_files_arg())
        .arg(build_config_arg())
}

/// Build (if needed) and run an engine over input.
pub fn run_command() -> Command {
    Command::new("run")
        .about("Parse input with a grammar, printing the parse tree")
        .after_help(
            r#"EXAMPLES:
  rbison run calc.y calc.l input.txt
  echo '1 + 2' | rbison run calc.y calc.l --format dump
  rbison run calc.y calc.l input.txt --timeout 5 --debug"#,
        )
        .arg(grammar_arg())
        .arg(lexer_arg().required(true))
        .arg(input_arg())
        .arg(build_dir_arg())
        .arg(name_arg())
        .arg(build_config_arg())
        .arg(debug_arg())
        .arg(interactive_arg())
        .arg(timeout_arg())
        .arg(format_arg())
}

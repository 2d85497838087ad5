//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;

use super::OutputFormat;
use crate::commands::build::BuildArgs;
use crate::commands::convert::ConvertArgs;
use crate::commands::run::RunArgs;

pub struct ConvertParams {
    pub grammar: PathBuf,
    pub lexer: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub per_target_types: bool,
}

impl ConvertParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: grammar_path(m),
            lexer: m.get_one::<PathBuf>("lexer").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            name: m.get_one::<String>("name").cloned(),
            per_target_types: m.get_flag("per_target_types"),
        }
    }
}

impl From<ConvertParams> for ConvertArgs {
    fn from(p: ConvertParams) -> Self {
        let module_name = p.name.unwrap_or_else(|| module_name_for(&p.grammar));
        Self {
            grammar: p.grammar,
            lexer: p.lexer,
            output: p.output,
            module_name,
            per_target_types: p.per_target_types,
        }
    }
}

pub struct BuildParams {
    pub grammar: PathBuf,
    pub lexer: PathBuf,
    pub build_dir: Option<PathBuf>,
    pub name: Option<String>,
    pub keep_files: bool,
    pub build_config: Option<PathBuf>,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: grammar_path(m),
            lexer: lexer_path(m),
            build_dir: m.get_one::<PathBuf>("build_dir").cloned(),
            name: m.get_one::<String>("name").cloned(),
            keep_files: m.get_flag("keep_files"),
            build_config: m.get_one::<PathBuf>("build_config").cloned(),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        let module_name = p.name.unwrap_or_else(|| module_name_for(&p.grammar));
        Self {
            grammar: p.grammar,
            lexer: p.lexer,
            build_dir: p.build_dir,
            module_name,
            keep_files: p.keep_files,
            build_config: p.build_config,
        }
    }
}

pub struct RunParams {
    pub build: BuildParams,
    pub input: Option<PathBuf>,
    pub debug: bool,
    pub interactive: bool,
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            build: BuildParams {
                grammar: grammar_path(m),
                lexer: lexer_path(m),
                build_dir: m.get_one::<PathBuf>("build_dir").cloned(),
                name: m.get_one::<String>("name").cloned(),
                keep_files: false,
                build_config: m.get_one::<PathBuf>("build_config").cloned(),
            },
            input: m.get_one::<PathBuf>("input").cloned(),
            debug: m.get_flag("debug"),
            interactive: m.get_flag("interactive"),
            timeout: m.get_one::<Duration>("timeout").copied(),
            format: m
                .get_one::<String>("format")
                .and_then(|f| OutputFormat::from_name(f))
                .unwrap_or_default(),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            build: p.build.into(),
            input: p.input.filter(|path| path.as_os_str() != "-"),
            debug: p.debug,
            interactive: p.interactive,
            timeout: p.timeout,
            format: p.format,
        }
    }
}

fn grammar_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("grammar")
        .cloned()
        .unwrap_or_else(|| unreachable!("clap requires GRAMMAR"))
}

fn lexer_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("lexer")
        .cloned()
        .unwrap_or_else(|| unreachable!("clap requires LEXER"))
}

/// Engine name from the grammar file: `grammars/calc.y` gives `calc`.
fn module_name_for(grammar: &std::path::Path) -> String {
    grammar
        .file_stem()
        .map(|stem| rbison_core::utils::to_snake_case(&stem.to_string_lossy()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "parser".to_string())
}

use std::fs;
use std::path::{Path, PathBuf};

use rbison_compiler::codegen::{Config, generate};

use super::grammar_loader::load_grammar;

pub struct ConvertArgs {
    pub grammar: PathBuf,
    pub lexer: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub module_name: String,
    pub per_target_types: bool,
}

pub fn run(args: ConvertArgs) {
    let source = match convert(&args) {
        Ok(source) => source,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, source) {
                eprintln!("error: failed to write '{}': {}", path.display(), e);
                std::process::exit(1);
            }
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", source),
    }
}

/// Host module source for the grammar in `args`.
pub fn convert(args: &ConvertArgs) -> Result<String, String> {
    let (spec, lexer) = load_grammar(&args.grammar, args.lexer.as_deref())?;

    let mut config = Config::new()
        .module_name(&args.module_name)
        .per_target_types(args.per_target_types);
    if let Some(lexer_path) = &args.lexer {
        config = config.sources(file_name(&args.grammar), file_name(lexer_path));
    }
    Ok(generate(&spec, &lexer, config))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

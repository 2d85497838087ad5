//! Reading grammar and lexer files, and building their engine.

use std::fs;
use std::path::{Path, PathBuf};

use rbison_compiler::build::{BuildConfig, EngineBuilder};
use rbison_compiler::grammar::{GrammarSpec, extract};
use rbison_core::EngineArtifact;

/// Options shared by commands that need a built engine.
pub struct EngineOptions<'a> {
    pub grammar: &'a Path,
    pub lexer: &'a Path,
    pub build_dir: Option<&'a Path>,
    pub module_name: &'a str,
    pub keep_files: bool,
    pub build_config: Option<&'a Path>,
}

pub fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))
}

/// Grammar spec and lexer text for a pair of files.
pub fn load_grammar(grammar: &Path, lexer: Option<&Path>) -> Result<(GrammarSpec, String), String> {
    let grammar_text = read_file(grammar)?;
    let lexer_text = match lexer {
        Some(path) => read_file(path)?,
        None => String::new(),
    };
    let spec = extract(&grammar_text, &lexer_text)
        .map_err(|e| format!("{}: {}", grammar.display(), e))?;
    Ok((spec, lexer_text))
}

/// Build configuration from the file (if any) overlaid with the flags.
pub fn build_config(options: &EngineOptions<'_>) -> Result<BuildConfig, String> {
    let mut config = match options.build_config {
        Some(path) => BuildConfig::from_json(&read_file(path)?)
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => BuildConfig::new(),
    };
    config = config.module_name(options.module_name);
    if let Some(dir) = options.build_dir {
        config = config.build_dir(PathBuf::from(dir));
    }
    if options.keep_files {
        config = config.keep_files(true);
    }
    Ok(config)
}

/// Load, extract and build; the engine is reused when nothing changed.
pub fn build_engine(options: &EngineOptions<'_>) -> Result<(GrammarSpec, EngineArtifact), String> {
    let (spec, lexer) = load_grammar(options.grammar, Some(options.lexer))?;
    let config = build_config(options)?;
    let artifact = EngineBuilder::new(config)
        .build(&spec, &lexer)
        .map_err(|e| e.to_string())?;
    Ok((spec, artifact))
}

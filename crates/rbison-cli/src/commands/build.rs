use std::path::PathBuf;

use super::grammar_loader::{EngineOptions, build_engine};

pub struct BuildArgs {
    pub grammar: PathBuf,
    pub lexer: PathBuf,
    pub build_dir: Option<PathBuf>,
    pub module_name: String,
    pub keep_files: bool,
    pub build_config: Option<PathBuf>,
}

impl BuildArgs {
    pub fn engine_options(&self) -> EngineOptions<'_> {
        EngineOptions {
            grammar: &self.grammar,
            lexer: &self.lexer,
            build_dir: self.build_dir.as_deref(),
            module_name: &self.module_name,
            keep_files: self.keep_files,
            build_config: self.build_config.as_deref(),
        }
    }
}

pub fn run(args: BuildArgs) {
    match build_engine(&args.engine_options()) {
        Ok((_, artifact)) => {
            println!("{}", artifact.path().display());
            log::info!("signature {}", artifact.signature());
        }
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

//! Turning a grammar and lexer script into a loadable engine.

use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError};

use rbison_core::{EngineArtifact, Signature};

use super::cache::ArtifactCache;
use super::config::BuildConfig;
use super::error::{BuildError, BuildStep};
use super::glue;
use super::toolchain::{CommandRunner, SystemRunner};
use crate::grammar::GrammarSpec;

/// Builds engines, reusing any whose signature is unchanged.
pub struct EngineBuilder<R = SystemRunner> {
    config: BuildConfig,
    runner: R,
    cache: Arc<ArtifactCache>,
}

impl EngineBuilder<SystemRunner> {
    pub fn new(config: BuildConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> EngineBuilder<R> {
    pub fn with_runner(config: BuildConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            cache: ArtifactCache::global(),
        }
    }

    /// Use `cache` instead of the process-wide one.
    pub fn cache(mut self, cache: Arc<ArtifactCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Signature the engine for `spec` and `lexer` would carry.
    pub fn signature(spec: &GrammarSpec, lexer: &str) -> Signature {
        Signature::compute(&glue::render_grammar(spec), lexer)
    }

    /// Return an engine for `spec` and `lexer`, building it if needed.
    pub fn build(&self, spec: &GrammarSpec, lexer: &str) -> Result<EngineArtifact, BuildError> {
        let grammar = glue::render_grammar(spec);
        let signature = Signature::compute(&grammar, lexer);
        let path = self.config.artifact_path();

        let build_lock = self.cache.build_lock(&path);
        let _guard = build_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(artifact) = self.cache.get(&path, &signature) {
            log::debug!("engine {} is up to date", path.display());
            return Ok(artifact);
        }

        if let Some(artifact) = self.adopt(&path, &signature) {
            log::info!("reusing engine {}", path.display());
            self.cache.insert(artifact.clone());
            return Ok(artifact);
        }

        log::info!("building engine {} ({signature})", path.display());
        let artifact = self.compile(&grammar, lexer, &signature, &path)?;
        self.cache.insert(artifact.clone());
        Ok(artifact)
    }

    /// An artifact left by an earlier process, if its sidecar matches.
    fn adopt(&self, path: &Path, signature: &Signature) -> Option<EngineArtifact> {
        if !path.is_file() {
            return None;
        }
        let recorded = fs::read_to_string(EngineArtifact::signature_path_for(path)).ok()?;
        if Signature::from_raw(recorded) != *signature {
            log::debug!("engine {} is stale", path.display());
            return None;
        }
        Some(EngineArtifact::new(
            path.to_path_buf(),
            signature.clone(),
            self.config.module_name.clone(),
        ))
    }

    fn compile(
        &self,
        grammar: &str,
        lexer: &str,
        signature: &Signature,
        path: &Path,
    ) -> Result<EngineArtifact, BuildError> {
        let config = &self.config;
        let build_dir = &config.build_dir;
        fs::create_dir_all(build_dir)
            .map_err(BuildError::io("cannot create build directory", build_dir))?;

        let workdir = tempfile::Builder::new()
            .prefix(".rbison-")
            .keep(config.keep_files)
            .tempdir_in(build_dir)
            .map_err(BuildError::io("cannot create scratch directory in", build_dir))?;
        let dir = workdir.path();
        if config.keep_files {
            log::info!("keeping build files in {}", dir.display());
        }

        write(dir, &config.grammar_file, &glue::grammar_file(grammar, signature))?;
        write(dir, &config.lexer_file, lexer)?;
        write(dir, glue::HOST_HEADER_NAME, glue::HOST_HEADER)?;

        self.step(
            BuildStep::Grammar,
            &config.bison_command,
            std::slice::from_ref(&config.grammar_file),
            dir,
        )?;
        rename_output(BuildStep::Grammar, dir, &config.bison_source_output, &config.parser_source)?;
        rename_output(BuildStep::Grammar, dir, &config.bison_header_output, &config.tokens_header)?;

        self.step(
            BuildStep::Lexer,
            &config.flex_command,
            std::slice::from_ref(&config.lexer_file),
            dir,
        )?;
        rename_output(BuildStep::Lexer, dir, &config.flex_output, &config.lexer_source)?;

        let module_file = EngineArtifact::file_name(&config.module_name);
        let mut args = config.cflags_pre.clone();
        args.extend(config.link_flags.iter().cloned());
        args.push("-I.".to_string());
        args.push(config.parser_source.clone());
        args.push(config.lexer_source.clone());
        args.push("-o".to_string());
        args.push(module_file.clone());
        args.extend(config.cflags_post.iter().cloned());
        self.step(BuildStep::Compile, &config.cc_command, &args, dir)?;

        let staged = dir.join(&module_file);
        if !staged.is_file() {
            return Err(BuildError::MissingOutput {
                step: BuildStep::Compile,
                path: staged,
            });
        }
        fs::rename(&staged, path).map_err(BuildError::io("cannot move engine to", path))?;

        let sidecar = EngineArtifact::signature_path_for(path);
        fs::write(&sidecar, signature.as_str())
            .map_err(BuildError::io("cannot write signature", &sidecar))?;

        Ok(EngineArtifact::new(
            path.to_path_buf(),
            signature.clone(),
            config.module_name.clone(),
        ))
    }

    fn step(
        &self,
        step: BuildStep,
        command: &[String],
        extra: &[String],
        cwd: &Path,
    ) -> Result<(), BuildError> {
        let Some((program, leading)) = command.split_first() else {
            return Err(BuildError::EmptyCommand(step));
        };
        let mut args = leading.to_vec();
        args.extend(extra.iter().cloned());
        let display = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        log::debug!("{step}: {display}");

        let output = self
            .runner
            .run(program, &args, cwd)
            .map_err(|source| BuildError::Spawn {
                step,
                program: program.clone(),
                source,
            })?;
        if !output.stderr.is_empty() {
            log::debug!("{step} stderr:\n{}", output.stderr);
        }
        if !output.success {
            return Err(BuildError::Toolchain {
                step,
                command: display,
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<(), BuildError> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(BuildError::io("cannot write", &path))
}

fn rename_output(step: BuildStep, dir: &Path, from: &str, to: &str) -> Result<(), BuildError> {
    let source = dir.join(from);
    if !source.is_file() {
        return Err(BuildError::MissingOutput { step, path: source });
    }
    let dest = dir.join(to);
    fs::rename(&source, &dest).map_err(BuildError::io("cannot rename", &source))
}

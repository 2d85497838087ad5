//! Engine build configuration.

use std::path::{Path, PathBuf};

use rbison_core::EngineArtifact;
use serde::{Deserialize, Serialize};

use super::error::BuildError;

/// How to turn a grammar and lexer script into a loadable engine.
///
/// Command templates are a program followed by its leading arguments; the
/// builder appends the input file (and, for the C compiler, sources and
/// output). Every field has a default, so a JSON file only needs the
/// fields it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Engine base name; the artifact is `<module_name>-engine`
    pub(crate) module_name: String,
    /// Directory that receives the artifact and the scratch directory
    pub(crate) build_dir: PathBuf,
    /// Keep the scratch directory after the build
    pub(crate) keep_files: bool,

    pub(crate) bison_command: Vec<String>,
    /// Grammar file handed to bison
    pub(crate) grammar_file: String,
    /// Parser source bison writes for `grammar_file`
    pub(crate) bison_source_output: String,
    /// Token header bison writes for `grammar_file`
    pub(crate) bison_header_output: String,
    /// Parser source after renaming
    pub(crate) parser_source: String,
    /// Token header after renaming; lexer scripts include it
    pub(crate) tokens_header: String,

    pub(crate) flex_command: Vec<String>,
    /// Lexer script handed to flex
    pub(crate) lexer_file: String,
    /// Scanner source flex writes
    pub(crate) flex_output: String,
    /// Scanner source after renaming
    pub(crate) lexer_source: String,

    pub(crate) cc_command: Vec<String>,
    /// Flags placed before the sources
    pub(crate) cflags_pre: Vec<String>,
    /// Flags placed after the output
    pub(crate) cflags_post: Vec<String>,
    /// Flags that make the compiler produce a loadable module
    pub(crate) link_flags: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            module_name: "parser".to_string(),
            build_dir: PathBuf::from("."),
            keep_files: false,
            bison_command: strings(&["bison", "-d", "-v", "-t"]),
            grammar_file: "tmp.y".to_string(),
            bison_source_output: "tmp.tab.c".to_string(),
            bison_header_output: "tmp.tab.h".to_string(),
            parser_source: "tmp.bison.c".to_string(),
            tokens_header: "tokens.h".to_string(),
            flex_command: strings(&["flex"]),
            lexer_file: "tmp.l".to_string(),
            flex_output: "lex.yy.c".to_string(),
            lexer_source: "tmp.lex.c".to_string(),
            cc_command: strings(&["cc"]),
            cflags_pre: strings(&["-fPIC"]),
            cflags_post: strings(&["-O3", "-g"]),
            link_flags: strings(&["-shared"]),
        }
    }
}

impl BuildConfig {
    /// Create a new BuildConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration from JSON; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, BuildError> {
        serde_json::from_str(text).map_err(|e| BuildError::Config(e.to_string()))
    }

    /// Set the engine base name.
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Set the directory that receives the artifact.
    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    /// Set whether intermediate files survive the build.
    pub fn keep_files(mut self, value: bool) -> Self {
        self.keep_files = value;
        self
    }

    /// Set the bison command template.
    pub fn bison_command(mut self, command: &[&str]) -> Self {
        self.bison_command = strings(command);
        self
    }

    /// Set the flex command template.
    pub fn flex_command(mut self, command: &[&str]) -> Self {
        self.flex_command = strings(command);
        self
    }

    /// Set the C compiler command template.
    pub fn cc_command(mut self, command: &[&str]) -> Self {
        self.cc_command = strings(command);
        self
    }

    /// Set the flags placed before the sources.
    pub fn cflags_pre(mut self, flags: &[&str]) -> Self {
        self.cflags_pre = strings(flags);
        self
    }

    /// Set the flags placed after the output.
    pub fn cflags_post(mut self, flags: &[&str]) -> Self {
        self.cflags_post = strings(flags);
        self
    }

    /// Set the flags that produce a loadable module.
    pub fn link_flags(mut self, flags: &[&str]) -> Self {
        self.link_flags = strings(flags);
        self
    }

    pub fn get_module_name(&self) -> &str {
        &self.module_name
    }

    pub fn get_build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn get_keep_files(&self) -> bool {
        self.keep_files
    }

    /// Where the artifact for this configuration lives.
    pub fn artifact_path(&self) -> PathBuf {
        self.build_dir.join(EngineArtifact::file_name(&self.module_name))
    }
}

//! Configuration for host module generation.

/// Configuration for [`generate`](super::generate).
#[derive(Clone, Debug)]
pub struct Config {
    /// Base name of the compiled engine
    pub(crate) module_name: String,
    /// Emit one node type per target
    pub(crate) per_target_types: bool,
    /// Grammar file named in the header
    pub(crate) grammar_file: Option<String>,
    /// Lexer file named in the header
    pub(crate) lexer_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_name: "parser".to_string(),
            per_target_types: false,
            grammar_file: None,
            lexer_file: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine base name (`<name>-engine`).
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Set whether to emit a node type for every target.
    pub fn per_target_types(mut self, value: bool) -> Self {
        self.per_target_types = value;
        self
    }

    /// Name the grammar and lexer files in the generated header.
    pub fn sources(mut self, grammar: impl Into<String>, lexer: impl Into<String>) -> Self {
        self.grammar_file = Some(grammar.into());
        self.lexer_file = Some(lexer.into());
        self
    }
}

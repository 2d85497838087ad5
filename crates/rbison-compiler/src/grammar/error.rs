//! Grammar extraction errors.

use rbison_core::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("expected 3 sections separated by `%%` lines, found {found}")]
    Sections { found: usize },

    #[error("unterminated `%{{` block in the declarations section")]
    UnterminatedBlock,

    #[error("`{directive}` expects {expected}")]
    Directive {
        directive: String,
        expected: &'static str,
    },

    #[error("malformed rule ({reason}): {rule}")]
    MalformedRule { rule: String, reason: &'static str },

    #[error("unterminated quoted literal near `{near}`")]
    UnterminatedLiteral { near: String },

    #[error("start target `{0}` has no rules")]
    UnknownStart(String),

    #[error("grammar has no rules")]
    NoRules,
}

impl GrammarError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedGrammar
    }

    pub(crate) fn rule(rule: &str, reason: &'static str) -> Self {
        GrammarError::MalformedRule {
            rule: rule.trim().to_string(),
            reason,
        }
    }
}

//! Grammar description types.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rbison_core::Resolver;
use rbison_core::utils::is_literal_symbol;

use super::error::GrammarError;
use super::lexer::{self, PieceKind};

/// Associativity of a precedence level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    NonAssoc,
    /// `%precedence`: a level without associativity.
    Precedence,
}

impl Associativity {
    pub fn from_directive(directive: &str) -> Option<Self> {
        match directive {
            "%left" => Some(Associativity::Left),
            "%right" => Some(Associativity::Right),
            "%nonassoc" => Some(Associativity::NonAssoc),
            "%precedence" => Some(Associativity::Precedence),
            _ => None,
        }
    }

    pub fn directive(self) -> &'static str {
        match self {
            Associativity::Left => "%left",
            Associativity::Right => "%right",
            Associativity::NonAssoc => "%nonassoc",
            Associativity::Precedence => "%precedence",
        }
    }

    /// Variant name, as written in generated Rust code.
    pub fn variant_name(self) -> &'static str {
        match self {
            Associativity::Left => "Left",
            Associativity::Right => "Right",
            Associativity::NonAssoc => "NonAssoc",
            Associativity::Precedence => "Precedence",
        }
    }
}

/// One precedence level. Levels declared earlier bind less tightly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecedenceRule {
    pub associativity: Associativity,
    pub tokens: Vec<String>,
}

/// One alternative of a production.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alternative {
    symbols: Vec<String>,
    prec: Option<String>,
}

impl Alternative {
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            prec: None,
        }
    }

    /// Parse alternative text such as `MINUS exp %prec NEG`.
    ///
    /// `%empty` and blank text give the empty alternative.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let pieces = lexer::lex(text)?;
        if pieces.iter().any(|p| {
            matches!(
                p.kind,
                PieceKind::Semicolon | PieceKind::Colon | PieceKind::Pipe
            )
        }) {
            return Err(GrammarError::rule(text, "unexpected rule punctuation"));
        }
        Self::from_words(lexer::words(&pieces), text)
    }

    pub(crate) fn from_words(words: Vec<String>, rule: &str) -> Result<Self, GrammarError> {
        let mut symbols = Vec::with_capacity(words.len());
        let mut prec = None;
        let mut words = words.into_iter();
        while let Some(word) = words.next() {
            match word.as_str() {
                "%prec" => {
                    let Some(name) = words.next() else {
                        return Err(GrammarError::rule(rule, "`%prec` without a token"));
                    };
                    prec = Some(name);
                }
                "%empty" => {}
                _ if word.starts_with('{') => {
                    return Err(GrammarError::rule(rule, "embedded actions are not supported"));
                }
                _ => symbols.push(word),
            }
        }
        Ok(Self { symbols, prec })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Token named by `%prec`, if any.
    pub fn prec(&self) -> Option<&str> {
        self.prec.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols.join(" "))?;
        if let Some(prec) = &self.prec {
            if !self.symbols.is_empty() {
                f.write_str(" ")?;
            }
            write!(f, "%prec {prec}")?;
        }
        Ok(())
    }
}

/// Everything the engine builder and code generator need to know about a
/// grammar: tokens, precedence levels, productions and the start target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarSpec {
    pub(crate) tokens: Vec<String>,
    pub(crate) precedences: Vec<PrecedenceRule>,
    pub(crate) productions: IndexMap<String, Vec<Alternative>>,
    pub(crate) start: String,
}

impl GrammarSpec {
    pub fn builder() -> GrammarSpecBuilder {
        GrammarSpecBuilder::default()
    }

    /// Declared tokens, in declaration order, duplicates included.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Declared tokens with later duplicates dropped.
    pub fn unique_tokens(&self) -> Vec<&str> {
        let set: IndexSet<&str> = self.tokens.iter().map(String::as_str).collect();
        set.into_iter().collect()
    }

    pub fn precedences(&self) -> &[PrecedenceRule] {
        &self.precedences
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    /// Targets in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.productions.keys().map(String::as_str)
    }

    pub fn alternatives(&self, target: &str) -> Option<&[Alternative]> {
        self.productions.get(target).map(Vec::as_slice)
    }

    /// `(target, alternatives)` in declaration order.
    pub fn productions(&self) -> impl Iterator<Item = (&str, &[Alternative])> {
        self.productions
            .iter()
            .map(|(target, alts)| (target.as_str(), alts.as_slice()))
    }

    /// Bison declarations and rules, without actions.
    pub fn to_bison(&self) -> String {
        super::render::render(self, |_, _, _| None)
    }
}

impl Resolver for GrammarSpec {
    fn is_target(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    fn is_token(&self, name: &str) -> bool {
        name == "error"
            || is_literal_symbol(name)
            || self.tokens.iter().any(|t| t == name)
            || self
                .precedences
                .iter()
                .any(|rule| rule.tokens.iter().any(|t| t == name))
    }
}

/// Programmatic construction of a [`GrammarSpec`].
///
/// Alternatives are given as text, exactly as they appear in a rules
/// section.
#[derive(Clone, Debug, Default)]
pub struct GrammarSpecBuilder {
    tokens: Vec<String>,
    precedences: Vec<PrecedenceRule>,
    productions: Vec<(String, Vec<String>)>,
    start: Option<String>,
}

impl GrammarSpecBuilder {
    pub fn token(mut self, name: impl Into<String>) -> Self {
        self.tokens.push(name.into());
        self
    }

    pub fn tokens(mut self, names: &[&str]) -> Self {
        self.tokens.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn precedence(mut self, associativity: Associativity, tokens: &[&str]) -> Self {
        self.precedences.push(PrecedenceRule {
            associativity,
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub fn production(mut self, target: impl Into<String>, alternatives: &[&str]) -> Self {
        self.productions.push((
            target.into(),
            alternatives.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }

    pub fn start(mut self, target: impl Into<String>) -> Self {
        self.start = Some(target.into());
        self
    }

    pub fn build(self) -> Result<GrammarSpec, GrammarError> {
        let mut productions: IndexMap<String, Vec<Alternative>> = IndexMap::new();
        for (target, alternatives) in self.productions {
            let alternatives = alternatives
                .iter()
                .map(|text| Alternative::parse(text))
                .collect::<Result<Vec<_>, _>>()?;
            productions.entry(target).or_default().extend(alternatives);
        }
        assemble(self.tokens, self.precedences, productions, self.start)
    }
}

/// Validate the start target and put the pieces together.
pub(crate) fn assemble(
    tokens: Vec<String>,
    precedences: Vec<PrecedenceRule>,
    productions: IndexMap<String, Vec<Alternative>>,
    start: Option<String>,
) -> Result<GrammarSpec, GrammarError> {
    let Some(first) = productions.keys().next() else {
        return Err(GrammarError::NoRules);
    };
    let start = match start {
        Some(start) if productions.contains_key(&start) => start,
        Some(start) => return Err(GrammarError::UnknownStart(start)),
        None => first.clone(),
    };
    Ok(GrammarSpec {
        tokens,
        precedences,
        productions,
        start,
    })
}

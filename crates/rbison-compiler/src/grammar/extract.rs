//! Extraction of a grammar description from bison grammar text.

use indexmap::IndexMap;

use super::error::GrammarError;
use super::lexer::{self, Delimiter};
use super::types::{Alternative, Associativity, GrammarSpec, PrecedenceRule, assemble};

/// Parse bison grammar text into a [`GrammarSpec`].
///
/// The lexer script is not interpreted; it is taken so that both inputs of
/// a parser travel together.
pub fn extract(grammar: &str, _lexer: &str) -> Result<GrammarSpec, GrammarError> {
    let [declarations, rules, _epilogue] = sections(grammar)?;

    let declarations =
        join_continuations(&strip_block_comments(&strip_native_blocks(declarations)?));
    let mut tokens = Vec::new();
    let mut precedences = Vec::new();
    let mut start: Option<String> = None;

    for line in declarations.lines() {
        let mut words = line.split_whitespace();
        let Some(directive) = words.next() else {
            continue;
        };
        let names: Vec<String> = words
            .filter(|w| !w.starts_with('<'))
            .map(str::to_string)
            .collect();

        if directive == "%token" {
            if names.is_empty() {
                return Err(GrammarError::Directive {
                    directive: directive.to_string(),
                    expected: "at least one token name",
                });
            }
            tokens.extend(names.into_iter().filter(|n| is_token_name(n)));
        } else if let Some(associativity) = Associativity::from_directive(directive) {
            if names.is_empty() {
                return Err(GrammarError::Directive {
                    directive: directive.to_string(),
                    expected: "at least one token name",
                });
            }
            precedences.push(PrecedenceRule {
                associativity,
                tokens: names,
            });
        } else if directive == "%start" {
            let [name] = <[String; 1]>::try_from(names).map_err(|_| GrammarError::Directive {
                directive: directive.to_string(),
                expected: "exactly one target",
            })?;
            if let Some(previous) = start.replace(name.clone()) {
                log::warn!("`%start` given more than once; `{name}` replaces `{previous}`");
            }
        } else if directive.starts_with('%') {
            log::debug!("ignoring declaration `{}`", line.trim());
        } else {
            log::debug!("ignoring text in declarations: `{}`", line.trim());
        }
    }

    let productions = extract_rules(rules)?;
    assemble(tokens, precedences, productions, start)
}

fn extract_rules(rules: &str) -> Result<IndexMap<String, Vec<Alternative>>, GrammarError> {
    let pieces = lexer::lex(rules)?;
    let mut productions: IndexMap<String, Vec<Alternative>> = IndexMap::new();

    for statement in lexer::split(&pieces, Delimiter::Semicolon) {
        if lexer::words(statement).is_empty() {
            continue;
        }
        let text = lexer::join(statement);
        let parts = lexer::split(statement, Delimiter::Colon);
        let [head, body] = parts[..] else {
            return Err(GrammarError::rule(&text, "expected exactly one `:`"));
        };

        let target = match &lexer::words(head)[..] {
            [target] => target.clone(),
            [] => return Err(GrammarError::rule(&text, "missing target")),
            _ => return Err(GrammarError::rule(&text, "target must be a single name")),
        };

        let alternatives = lexer::split(body, Delimiter::Pipe)
            .into_iter()
            .map(|alt| Alternative::from_words(lexer::words(alt), &text))
            .collect::<Result<Vec<_>, _>>()?;
        productions.entry(target).or_default().extend(alternatives);
    }

    Ok(productions)
}

/// Declarations, rules and epilogue, split on lines holding only `%%`.
fn sections(grammar: &str) -> Result<[&str; 3], GrammarError> {
    let mut bounds = Vec::new();
    let mut offset = 0;
    for line in grammar.split_inclusive('\n') {
        if line.trim_end() == "%%" {
            bounds.push((offset, offset + line.len()));
        }
        offset += line.len();
    }

    match bounds[..] {
        [(a_start, a_end), (b_start, b_end)] => Ok([
            &grammar[..a_start],
            &grammar[a_end..b_start],
            &grammar[b_end..],
        ]),
        _ => Err(GrammarError::Sections {
            found: bounds.len() + 1,
        }),
    }
}

/// Drop every `%{ ... %}` block of native code.
fn strip_native_blocks(text: &str) -> Result<String, GrammarError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("%{") {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find("%}") else {
            return Err(GrammarError::UnterminatedBlock);
        };
        rest = &rest[open + close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("/*") {
        out.push_str(&rest[..open]);
        match rest[open + 2..].find("*/") {
            Some(close) => {
                out.push(' ');
                rest = &rest[open + 2 + close + 2..];
            }
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.lines()
        .map(|line| line.split("//").next().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A newline followed by indentation continues the previous line.
fn join_continuations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' && matches!(chars.peek(), Some(' ' | '\t')) {
            while matches!(chars.peek(), Some(' ' | '\t')) {
                chars.next();
            }
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

/// `%token` also accepts numeric codes and string aliases; only names are tokens.
fn is_token_name(word: &str) -> bool {
    !word.starts_with(|c: char| c.is_ascii_digit() || c == '"' || c == '\'')
}

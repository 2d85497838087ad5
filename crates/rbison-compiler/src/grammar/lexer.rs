//! Quote-aware lexing of the rules section.
//!
//! Bison rules may contain quoted literals such as `'|'` or `";"`, which
//! must never be taken for rule punctuation. The lexer cuts the text into
//! pieces that cover the source exactly, so any run of pieces can be joined
//! back into the text it came from.

use logos::Logos;

use super::error::GrammarError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceKind {
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Quoted,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    #[regex(r"//[^\n]*", allow_greedy = true)]
    Comment,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    #[token("/")]
    Slash,

    #[regex(r#"[^'";:|/]+"#)]
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece<'s> {
    pub kind: PieceKind,
    pub text: &'s str,
}

/// Rule punctuation that can separate quote-aware fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `;` between rule statements.
    Semicolon,
    /// `:` between a target and its alternatives.
    Colon,
    /// `|` between alternatives.
    Pipe,
}

impl Delimiter {
    fn kind(self) -> PieceKind {
        match self {
            Delimiter::Semicolon => PieceKind::Semicolon,
            Delimiter::Colon => PieceKind::Colon,
            Delimiter::Pipe => PieceKind::Pipe,
        }
    }
}

pub(crate) fn lex(source: &str) -> Result<Vec<Piece<'_>>, GrammarError> {
    let mut lexer = PieceKind::lexer(source);
    let mut pieces = Vec::new();
    while let Some(kind) = lexer.next() {
        let Ok(kind) = kind else {
            let start = lexer.span().start;
            let near: String = source[start..].chars().take(20).collect();
            return Err(GrammarError::UnterminatedLiteral { near });
        };
        pieces.push(Piece {
            kind,
            text: lexer.slice(),
        });
    }
    Ok(pieces)
}

pub(crate) fn split<'p, 's>(pieces: &'p [Piece<'s>], by: Delimiter) -> Vec<&'p [Piece<'s>]> {
    pieces.split(|p| p.kind == by.kind()).collect()
}

pub(crate) fn join(pieces: &[Piece<'_>]) -> String {
    pieces.iter().map(|p| p.text).collect()
}

/// Whitespace-separated words. Quoted literals stay whole, comments separate.
pub(crate) fn words(pieces: &[Piece<'_>]) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for piece in pieces {
        match piece.kind {
            PieceKind::Quoted => current.push_str(piece.text),
            PieceKind::Comment => flush(&mut words, &mut current),
            _ => {
                for c in piece.text.chars() {
                    if c.is_whitespace() {
                        flush(&mut words, &mut current);
                    } else {
                        current.push(c);
                    }
                }
            }
        }
    }
    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Split `text` on every `delimiter` outside quoted literals and comments.
///
/// ```
/// use rbison_compiler::grammar::{Delimiter, split_unquoted};
/// let parts = split_unquoted("a '|' b | c", Delimiter::Pipe).unwrap();
/// assert_eq!(parts, ["a '|' b ", " c"]);
/// ```
pub fn split_unquoted(text: &str, delimiter: Delimiter) -> Result<Vec<String>, GrammarError> {
    let pieces = lex(text)?;
    Ok(split(&pieces, delimiter).into_iter().map(join).collect())
}

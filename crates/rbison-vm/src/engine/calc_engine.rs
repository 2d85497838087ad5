//! Desk calculator engine written in Rust.
//!
//! Reduces the same grammar as the calculator fixtures, in the order a
//! bison parser would, so runs can be exercised without a C toolchain:
//!
//! ```text
//! input : /* empty */ | input line ;
//! line  : NEWLINE | exp NEWLINE | error NEWLINE ;
//! exp   : NUMBER | exp PLUS exp | exp MINUS exp | exp TIMES exp
//!       | exp DIVIDE exp | MINUS exp %prec NEG | exp POW exp
//!       | LPAREN exp RPAREN ;
//! ```
//!
//! `quit` ends the input like the fixture lexer's `yyterminate()`.

use rbison_core::Value;

use super::adapter::{EngineAdapter, EngineExit};
use super::arena::ValueHandle;
use super::dispatch::{Dispatcher, HandlerError};
use super::error::EngineError;
use super::session::{Reduction, Session};

const NEG: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Number,
    Plus,
    Minus,
    Times,
    Divide,
    Pow,
    LParen,
    RParen,
    Newline,
    Unknown,
    End,
}

#[derive(Clone, Debug)]
struct Token {
    kind: Kind,
    text: String,
    value: Option<ValueHandle>,
}

enum Stop {
    /// Recover through `line : error NEWLINE`.
    Error,
    Abort,
}

/// Calculator engine. `chunk` is the read size it asks the session for.
pub(crate) struct CalcEngine {
    chunk: usize,
    buf: Vec<u8>,
    pos: usize,
    line: usize,
    lookahead: Option<Token>,
}

impl CalcEngine {
    pub(crate) fn new() -> Self {
        Self::with_chunk(8)
    }

    pub(crate) fn with_chunk(chunk: usize) -> Self {
        Self {
            chunk,
            buf: Vec::new(),
            pos: 0,
            line: 1,
            lookahead: None,
        }
    }

    fn peek_byte(&mut self, session: &mut Session<'_>, offset: usize) -> Option<u8> {
        while self.pos + offset >= self.buf.len() {
            let chunk = session.read(self.chunk);
            if chunk.is_empty() {
                return None;
            }
            self.buf.drain(..self.pos);
            self.pos = 0;
            self.buf.extend(chunk);
        }
        Some(self.buf[self.pos + offset])
    }

    fn scan(&mut self, session: &mut Session<'_>) -> Token {
        while matches!(self.peek_byte(session, 0), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
        let Some(first) = self.peek_byte(session, 0) else {
            return self.end();
        };

        let mut len = 1;
        let kind = match first {
            b'0'..=b'9' => {
                while let Some(b'0'..=b'9' | b'.') = self.peek_byte(session, len) {
                    len += 1;
                }
                Kind::Number
            }
            b'q' if self.lookahead_is(session, b"quit") => {
                self.buf.drain(..self.pos + 4);
                self.pos = 0;
                // yyterminate() drops whatever the scanner had buffered
                self.buf.clear();
                return self.end();
            }
            b'+' => Kind::Plus,
            b'-' => Kind::Minus,
            b'*' if self.peek_byte(session, 1) == Some(b'*') => {
                len = 2;
                Kind::Pow
            }
            b'*' => Kind::Times,
            b'/' => Kind::Divide,
            b'(' => Kind::LParen,
            b')' => Kind::RParen,
            b'\n' => Kind::Newline,
            _ => Kind::Unknown,
        };

        let bytes = self.buf[self.pos..self.pos + len].to_vec();
        self.pos += len;
        let value = session.token(&bytes);
        let token = Token {
            kind,
            text: String::from_utf8_lossy(&bytes).into_owned(),
            value: Some(value),
        };
        if kind == Kind::Newline {
            self.line += 1;
        }
        token
    }

    fn lookahead_is(&mut self, session: &mut Session<'_>, word: &[u8]) -> bool {
        (0..word.len()).all(|i| self.peek_byte(session, i) == Some(word[i]))
    }

    fn end(&self) -> Token {
        Token {
            kind: Kind::End,
            text: String::new(),
            value: None,
        }
    }

    fn peek(&mut self, session: &mut Session<'_>) -> Kind {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.scan(session));
        }
        self.lookahead.as_ref().map_or(Kind::End, |t| t.kind)
    }

    fn shift(&mut self, session: &mut Session<'_>) -> Token {
        self.peek(session);
        self.lookahead.take().unwrap_or_else(|| self.end())
    }

    fn syntax_error(&mut self, session: &mut Session<'_>) -> Stop {
        let near = self
            .lookahead
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let line = if near == "\n" { self.line - 1 } else { self.line };
        session.syntax_error(line, "syntax error", &near);
        if session.is_halted() {
            Stop::Abort
        } else {
            Stop::Error
        }
    }

    fn reduce(
        &mut self,
        session: &mut Session<'_>,
        target: &str,
        option: usize,
        names: &[&str],
        values: &[Option<ValueHandle>],
    ) -> Result<Option<ValueHandle>, Stop> {
        let names = names.iter().map(|n| n.to_string()).collect();
        match session.reduce(target, option, names, values) {
            Reduction::Value(handle) => Ok(Some(handle)),
            Reduction::Failed => Err(Stop::Error),
            Reduction::Abort => Err(Stop::Abort),
        }
    }

    fn parse_line(&mut self, session: &mut Session<'_>) -> Result<Option<ValueHandle>, Stop> {
        let result = if self.peek(session) == Kind::Newline {
            let newline = self.shift(session);
            self.reduce(session, "line", 0, &["NEWLINE"], &[newline.value])
        } else {
            self.parse_exp(session, 1).and_then(|exp| {
                if self.peek(session) != Kind::Newline {
                    return Err(self.syntax_error(session));
                }
                let newline = self.shift(session);
                self.reduce(session, "line", 1, &["exp", "NEWLINE"], &[exp, newline.value])
            })
        };

        match result {
            Err(Stop::Error) => self.recover(session),
            other => other,
        }
    }

    /// Discard tokens through the next newline, then reduce `error NEWLINE`.
    fn recover(&mut self, session: &mut Session<'_>) -> Result<Option<ValueHandle>, Stop> {
        loop {
            match self.peek(session) {
                Kind::End => return Err(Stop::Abort),
                Kind::Newline => break,
                _ => {
                    self.shift(session);
                }
            }
        }
        let newline = self.shift(session);
        match self.reduce(session, "line", 2, &["error", "NEWLINE"], &[None, newline.value]) {
            Err(Stop::Error) => self.recover(session),
            other => other,
        }
    }

    fn parse_exp(
        &mut self,
        session: &mut Session<'_>,
        min: u8,
    ) -> Result<Option<ValueHandle>, Stop> {
        let mut lhs = self.parse_primary(session)?;
        loop {
            let (prec, right, option, name) = match self.peek(session) {
                Kind::Plus => (1, false, 1, "PLUS"),
                Kind::Minus => (1, false, 2, "MINUS"),
                Kind::Times => (2, false, 3, "TIMES"),
                Kind::Divide => (2, false, 4, "DIVIDE"),
                Kind::Pow => (4, true, 6, "POW"),
                _ => return Ok(lhs),
            };
            if prec < min {
                return Ok(lhs);
            }
            let op = self.shift(session);
            let rhs = self.parse_exp(session, if right { prec } else { prec + 1 })?;
            lhs = self.reduce(
                session,
                "exp",
                option,
                &["exp", name, "exp"],
                &[lhs, op.value, rhs],
            )?;
        }
    }

    fn parse_primary(&mut self, session: &mut Session<'_>) -> Result<Option<ValueHandle>, Stop> {
        match self.peek(session) {
            Kind::Number => {
                let number = self.shift(session);
                self.reduce(session, "exp", 0, &["NUMBER"], &[number.value])
            }
            Kind::Minus => {
                let minus = self.shift(session);
                let operand = self.parse_exp(session, NEG)?;
                self.reduce(session, "exp", 5, &["MINUS", "exp"], &[minus.value, operand])
            }
            Kind::LParen => {
                let open = self.shift(session);
                let inner = self.parse_exp(session, 1)?;
                if self.peek(session) != Kind::RParen {
                    return Err(self.syntax_error(session));
                }
                let close = self.shift(session);
                self.reduce(
                    session,
                    "exp",
                    7,
                    &["LPAREN", "exp", "RPAREN"],
                    &[open.value, inner, close.value],
                )
            }
            _ => Err(self.syntax_error(session)),
        }
    }
}

impl EngineAdapter for CalcEngine {
    fn run(&mut self, session: &mut Session<'_>, _debug: bool) -> Result<EngineExit, EngineError> {
        self.buf.clear();
        self.pos = 0;
        self.line = 1;
        self.lookahead = None;

        let mut input = match self.reduce(session, "input", 0, &[], &[]) {
            Ok(handle) => handle,
            Err(_) => return Ok(EngineExit::Aborted),
        };
        loop {
            if self.peek(session) == Kind::End {
                return Ok(if session.is_halted() {
                    EngineExit::Aborted
                } else {
                    EngineExit::Accepted
                });
            }
            let line = match self.parse_line(session) {
                Ok(line) => line,
                Err(_) if session.is_halted() => return Ok(EngineExit::Aborted),
                Err(_) => return Ok(EngineExit::Rejected),
            };
            input = match self.reduce(session, "input", 1, &["input", "line"], &[input, line]) {
                Ok(handle) => handle,
                Err(_) => return Ok(EngineExit::Aborted),
            };
        }
    }
}

/// Handlers that evaluate the calculator grammar to numbers.
pub(crate) fn evaluator() -> Dispatcher {
    Dispatcher::new()
        .handler("input", |event| {
            Ok(match event.option() {
                0 => Value::Empty,
                _ => event.into_values().pop().unwrap_or_default(),
            })
        })
        .handler("line", |event| {
            Ok(match event.option() {
                1 => event.into_values().swap_remove(0),
                _ => Value::Empty,
            })
        })
        .handler("exp", |event| {
            let number = |i: usize| -> Result<f64, HandlerError> {
                event
                    .value(i)
                    .and_then(|v| v.as_float())
                    .ok_or_else(|| HandlerError::new(format!("term {i} is not a number")))
            };
            let value = match event.option() {
                0 => event
                    .token(0)
                    .unwrap_or_default()
                    .parse::<f64>()
                    .map_err(|e| HandlerError::new(e.to_string()))?,
                1 => number(0)? + number(2)?,
                2 => number(0)? - number(2)?,
                3 => number(0)? * number(2)?,
                4 => {
                    let divisor = number(2)?;
                    if divisor == 0.0 {
                        return Err(HandlerError::new("division by zero"));
                    }
                    number(0)? / divisor
                }
                5 => -number(1)?,
                6 => number(0)?.powf(number(2)?),
                _ => number(1)?,
            };
            Ok(Value::Float(value))
        })
}

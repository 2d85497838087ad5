//! Sources of parser input.

use std::io::{self, BufRead};

/// Supplies input bytes to a run.
///
/// `read` may return fewer bytes than `max`, or more; the session buffers
/// the excess. An empty result ends the input.
///
/// The sources here return at most one line per call. An engine that stops
/// early (a lexer rule calling `yyterminate`) drops what its scanner had
/// buffered, so line-sized reads keep the loss to the rest of that line.
pub trait Input {
    fn read(&mut self, max: usize) -> io::Result<Vec<u8>>;
}

/// Reads one line per call from a buffered reader.
///
/// Suits interactive use: the engine sees each line as soon as it is typed.
#[derive(Debug)]
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Input for ReaderInput<R> {
    fn read(&mut self, _max: usize) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        self.reader.read_until(b'\n', &mut line)?;
        Ok(line)
    }
}

/// In-memory input, handed out a line at a time.
#[derive(Clone, Debug, Default)]
pub struct StrInput {
    bytes: Vec<u8>,
    pos: usize,
}

impl StrInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            pos: 0,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }
}

impl From<&str> for StrInput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Input for StrInput {
    fn read(&mut self, max: usize) -> io::Result<Vec<u8>> {
        let rest = &self.bytes[self.pos..];
        let take = line_len(rest).min(max);
        let chunk = rest[..take].to_vec();
        self.pos += take;
        Ok(chunk)
    }
}

/// Length of the first line of `bytes`, newline included.
fn line_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| i + 1)
}

/// Input backed by a closure, see [`FnInput::new`].
///
/// Whatever the closure returns is handed out a line at a time; the
/// closure is only called again once those lines are used up.
pub struct FnInput<F> {
    read: F,
    pending: Vec<u8>,
}

impl<F> FnInput<F>
where
    F: FnMut(usize) -> io::Result<Vec<u8>>,
{
    /// `read` gets the requested size and returns the next block of input,
    /// empty at the end.
    pub fn new(read: F) -> Self {
        Self {
            read,
            pending: Vec::new(),
        }
    }
}

impl<F> Input for FnInput<F>
where
    F: FnMut(usize) -> io::Result<Vec<u8>>,
{
    fn read(&mut self, max: usize) -> io::Result<Vec<u8>> {
        if self.pending.is_empty() {
            self.pending = (self.read)(max)?;
        }
        let take = line_len(&self.pending).min(max);
        let rest = self.pending.split_off(take);
        Ok(std::mem::replace(&mut self.pending, rest))
    }
}

//! Tree markup: an XML rendering of a parse tree that can be read back.
//!
//! Layout of a node:
//!
//! ```text
//! <exp option="1" color="red">
//!   <exp><exp option="0"><NUMBER>2</NUMBER></exp></exp>
//!   <PLUS>+</PLUS>
//!   <exp><exp option="0"><NUMBER>3</NUMBER></exp></exp>
//! </exp>
//! ```
//!
//! The node element is tagged with its target and carries the option plus
//! the node's attributes. Every term is a wrapper element tagged with the
//! term's symbol, holding either a nested node element or the token text.
//! An empty value is an empty wrapper element. Symbols that are not valid
//! element names (quoted literals such as `'+'`) are written as `term`
//! (or `node` for a node element) with the symbol in a `target` attribute.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Write as _;

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::node::{TreeNode, is_attribute_name};
use crate::value::Value;

const NODE_TAG: &str = "node";
const TERM_TAG: &str = "term";
const SYMBOL_ATTR: &str = "target";
const OPTION_ATTR: &str = "option";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("malformed markup: {0}")]
    Malformed(String),

    #[error("markup contains no node element")]
    Empty,

    #[error("`{0}` is not a target of the grammar")]
    UnknownTarget(String),

    #[error("`{0}` is neither a target nor a token of the grammar")]
    UnknownSymbol(String),

    #[error("invalid option `{value}` on `{target}`")]
    InvalidOption { target: String, value: String },

    #[error("expected {expected} inside `{symbol}`")]
    Unexpected {
        symbol: String,
        expected: &'static str,
    },

    #[error("`{owner}` holds U+{:04X}, which markup cannot represent", u32::from(*.character))]
    Unrepresentable { owner: String, character: char },

    #[error("failed to write markup: {0}")]
    Write(String),
}

impl MarkupError {
    pub fn kind(&self) -> crate::ErrorKind {
        crate::ErrorKind::Markup
    }
}

/// Answers which symbols of a grammar are targets and which are tokens.
pub trait Resolver {
    fn is_target(&self, name: &str) -> bool;
    fn is_token(&self, name: &str) -> bool;
}

/// A resolver built from explicit symbol lists.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    targets: HashSet<String>,
    tokens: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, name: impl Into<String>) -> Self {
        self.targets.insert(name.into());
        self
    }

    pub fn token(mut self, name: impl Into<String>) -> Self {
        self.tokens.insert(name.into());
        self
    }

    pub fn targets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn tokens<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(names.into_iter().map(Into::into));
        self
    }
}

impl Resolver for SymbolTable {
    fn is_target(&self, name: &str) -> bool {
        self.targets.contains(name)
    }

    fn is_token(&self, name: &str) -> bool {
        self.tokens.contains(name)
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn is_target(&self, name: &str) -> bool {
        (**self).is_target(name)
    }

    fn is_token(&self, name: &str) -> bool {
        (**self).is_token(name)
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Serialize a tree as compact markup.
///
/// Token text is written exactly, whitespace included. Other scalar values
/// (numbers, booleans, lists) are written as their display text and read
/// back as tokens.
pub fn to_markup(node: &TreeNode) -> Result<String, MarkupError> {
    write_document(Writer::new(Vec::new()), node)
}

/// Serialize a tree with two-space indentation, for people.
///
/// Indentation goes between elements only and token text is untouched, so
/// the result reads back to the same tree.
pub fn to_pretty_markup(node: &TreeNode) -> Result<String, MarkupError> {
    write_document(Writer::new_with_indent(Vec::new(), b' ', 2), node)
}

fn write_document(mut writer: Writer<Vec<u8>>, node: &TreeNode) -> Result<String, MarkupError> {
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, node)?;
    String::from_utf8(writer.into_inner()).map_err(|e| MarkupError::Write(e.to_string()))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), MarkupError> {
    writer
        .write_event(event)
        .map_err(|e| MarkupError::Write(e.to_string()))
}

/// Element tag for a symbol, plus the symbol attribute when the tag is generic.
fn element_for<'a>(symbol: &'a str, generic: &'static str) -> (&'a str, BytesStart<'a>) {
    if is_attribute_name(symbol) {
        (symbol, BytesStart::new(symbol))
    } else {
        let mut start = BytesStart::new(generic);
        start.push_attribute((SYMBOL_ATTR, symbol));
        (generic, start)
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &TreeNode) -> Result<(), MarkupError> {
    let (tag, mut start) = element_for(node.target(), NODE_TAG);
    let option = node.option().to_string();
    start.push_attribute((OPTION_ATTR, option.as_str()));
    for (key, value) in node.attributes() {
        let value = escape(key, value, true)?;
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(value.into_bytes()),
        });
    }
    if node.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for (name, value) in node.children() {
        write_term(writer, name, value)?;
    }
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn write_term(
    writer: &mut Writer<Vec<u8>>,
    symbol: &str,
    value: &Value,
) -> Result<(), MarkupError> {
    let (tag, start) = element_for(symbol, TERM_TAG);
    match value {
        Value::Empty => emit(writer, Event::Empty(start)),
        Value::Node(child) => {
            emit(writer, Event::Start(start))?;
            write_node(writer, child)?;
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
        scalar => {
            let text = escape(symbol, &scalar.to_string(), false)?;
            emit(writer, Event::Start(start))?;
            // Written even when empty.
            emit(writer, Event::Text(BytesText::from_escaped(text)))?;
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
    }
}

/// Escape markup characters in text or an attribute value.
///
/// Carriage returns, and in attributes newlines and tabs, become character
/// references so XML parsers don't normalize them away. Characters XML
/// cannot hold at all (NUL and most other C0 controls) are an error.
fn escape(owner: &str, text: &str, in_attribute: bool) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\n' | '\t' if in_attribute => {
                let _ = write!(out, "&#{};", u32::from(c));
            }
            '\r' => out.push_str("&#13;"),
            c if is_xml_char(c) => out.push(c),
            character => {
                return Err(MarkupError::Unrepresentable {
                    owner: owner.to_string(),
                    character,
                });
            }
        }
    }
    Ok(out)
}

/// Whether XML 1.0 allows `c` in a document.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

// ============================================================================
// Reading
// ============================================================================

/// Rebuild a tree from markup produced by [`to_markup`].
///
/// The root element must name a target. A term whose symbol is a target is
/// read as a nested node; any other term must be a token of the grammar.
pub fn from_markup<R>(text: &str, resolver: &R) -> Result<TreeNode, MarkupError>
where
    R: Resolver + ?Sized,
{
    let mut reader = Reader::from_str(text);
    loop {
        match read_event(&mut reader)? {
            Event::Start(start) => {
                let header = Header::parse(&start)?;
                return read_node(&mut reader, header, false, resolver);
            }
            Event::Empty(start) => {
                let header = Header::parse(&start)?;
                return read_node(&mut reader, header, true, resolver);
            }
            Event::Text(text) if is_blank(&text)? => continue,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
            Event::Eof => return Err(MarkupError::Empty),
            other => {
                return Err(MarkupError::Malformed(format!(
                    "unexpected {} before the root element",
                    describe(&other)
                )));
            }
        }
    }
}

/// Name and attributes of an element, decoded.
struct Header {
    tag: String,
    symbol: String,
    attributes: Vec<(String, String)>,
}

impl Header {
    fn parse(start: &BytesStart<'_>) -> Result<Self, MarkupError> {
        let tag = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| MarkupError::Malformed(e.to_string()))?
            .to_string();

        let mut symbol = None;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| MarkupError::Malformed(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| MarkupError::Malformed(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| MarkupError::Malformed(e.to_string()))?
                .into_owned();
            if key == SYMBOL_ATTR {
                symbol = Some(value);
            } else {
                attributes.push((key, value));
            }
        }

        Ok(Self {
            symbol: symbol.unwrap_or_else(|| tag.clone()),
            tag,
            attributes,
        })
    }
}

fn read_event<'i>(reader: &mut Reader<&'i [u8]>) -> Result<Event<'i>, MarkupError> {
    reader
        .read_event()
        .map_err(|e| MarkupError::Malformed(e.to_string()))
}

fn is_blank(text: &BytesText<'_>) -> Result<bool, MarkupError> {
    Ok(unescape(text)?.chars().all(char::is_whitespace))
}

fn unescape(text: &BytesText<'_>) -> Result<String, MarkupError> {
    text.unescape()
        .map(|s| s.into_owned())
        .map_err(|e| MarkupError::Malformed(e.to_string()))
}

fn describe(event: &Event<'_>) -> &'static str {
    match event {
        Event::Start(_) | Event::Empty(_) => "element",
        Event::End(_) => "closing tag",
        Event::Text(_) | Event::CData(_) => "text",
        Event::Eof => "end of input",
        _ => "markup",
    }
}

fn read_node<R: Resolver + ?Sized>(
    reader: &mut Reader<&[u8]>,
    header: Header,
    empty: bool,
    resolver: &R,
) -> Result<TreeNode, MarkupError> {
    let target = header.symbol;
    if !resolver.is_target(&target) {
        return Err(MarkupError::UnknownTarget(target));
    }

    let mut option = 0;
    let mut attributes = IndexMap::new();
    for (key, value) in header.attributes {
        if key == OPTION_ATTR {
            option = value.parse().map_err(|_| MarkupError::InvalidOption {
                target: target.clone(),
                value: value.clone(),
            })?;
        } else {
            attributes.insert(key, value);
        }
    }

    let mut names = Vec::new();
    let mut values = Vec::new();
    if !empty {
        loop {
            match read_event(reader)? {
                Event::Start(start) => {
                    let term = Header::parse(&start)?;
                    let value = read_term(reader, &term.symbol, resolver)?;
                    names.push(term.symbol);
                    values.push(value);
                }
                Event::Empty(start) => {
                    let term = Header::parse(&start)?;
                    if !resolver.is_target(&term.symbol) && !resolver.is_token(&term.symbol) {
                        return Err(MarkupError::UnknownSymbol(term.symbol));
                    }
                    names.push(term.symbol);
                    values.push(Value::Empty);
                }
                Event::End(_) => break,
                Event::Text(text) if is_blank(&text)? => continue,
                Event::Comment(_) => continue,
                Event::Eof => {
                    return Err(MarkupError::Malformed(format!(
                        "unclosed element `{}`",
                        header.tag
                    )));
                }
                _ => {
                    return Err(MarkupError::Unexpected {
                        symbol: target,
                        expected: "term elements",
                    });
                }
            }
        }
    }

    let mut node = TreeNode::new(target, option, names, values)
        .map_err(|e| MarkupError::Malformed(e.to_string()))?;
    for (key, value) in attributes {
        node.set_attribute(key, value)
            .map_err(|e| MarkupError::Malformed(e.to_string()))?;
    }
    Ok(node)
}

/// Read the content of a term wrapper up to and including its closing tag.
fn read_term<R: Resolver + ?Sized>(
    reader: &mut Reader<&[u8]>,
    symbol: &str,
    resolver: &R,
) -> Result<Value, MarkupError> {
    let is_target = resolver.is_target(symbol);
    if !is_target && !resolver.is_token(symbol) {
        return Err(MarkupError::UnknownSymbol(symbol.to_string()));
    }

    let mut text = String::new();
    let mut node = None;
    loop {
        match read_event(reader)? {
            Event::Text(chunk) => text.push_str(&unescape(&chunk)?),
            Event::CData(chunk) => text.push_str(&String::from_utf8_lossy(&chunk)),
            Event::Start(start) if is_target && node.is_none() => {
                let header = Header::parse(&start)?;
                node = Some(read_node(reader, header, false, resolver)?);
            }
            Event::Empty(start) if is_target && node.is_none() => {
                let header = Header::parse(&start)?;
                node = Some(read_node(reader, header, true, resolver)?);
            }
            Event::End(_) => break,
            Event::Comment(_) => continue,
            Event::Eof => {
                return Err(MarkupError::Malformed(format!("unclosed term `{symbol}`")));
            }
            _ => {
                return Err(MarkupError::Unexpected {
                    symbol: symbol.to_string(),
                    expected: if is_target { "one node element" } else { "text" },
                });
            }
        }
    }

    match node {
        Some(node) if text.trim().is_empty() => Ok(Value::from(node)),
        Some(_) => Err(MarkupError::Unexpected {
            symbol: symbol.to_string(),
            expected: "a node element without text",
        }),
        None => Ok(Value::Token(text)),
    }
}

//! Parsing of SNBT text into tags.
//!
//! Parsing happens in two passes. A recursive descent first reads the text
//! into raw nodes, each holding the kind its syntax selects and the text of
//! its value. A second pass then builds the tags, which is where literals are
//! range-checked and lists are checked for mixed kinds. Errors from either
//! pass carry the byte offset they refer to.
//!
//! ```
//! use schemnbt::Tag;
//!
//! # fn main() -> schemsnbt::error::Result<()> {
//! let tag = schemsnbt::from_snbt("{X:3,Y:64,Z:129}")?;
//! let compound = tag.as_compound().unwrap();
//! assert_eq!(compound["Y"], Tag::Int(64));
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;
use std::str::FromStr;

use log::trace;
use schemnbt::{ByteArray, Compound, IntArray, List, LongArray, Tag, TagKind, MAX_DEPTH};

use crate::error::{Error, Result};
use crate::parser::{self, Literal};

/// Parse a complete SNBT value. Whitespace around tokens is ignored, and the
/// whole input must be used.
pub fn from_snbt(input: &str) -> Result<Tag> {
    let mut parser = Parser::new(input);
    let node = parser.value()?;

    parser.skip_whitespace();
    if !parser.rest.is_empty() {
        return Err(Error::parse(parser.position(), "unexpected trailing input"));
    }

    let tag = make_tag(node)?;
    trace!("parsed {} bytes of SNBT into a {}", input.len(), tag.kind());
    Ok(tag)
}

/// A value as written in the text, before range and kind checks.
#[derive(Debug)]
struct Node<'a> {
    kind: TagKind,
    raw: Raw<'a>,
    position: usize,
}

#[derive(Debug)]
enum Raw<'a> {
    Number(&'a str),
    String(String),
    Array(Vec<(&'a str, usize)>),
    List(Vec<Node<'a>>),
    Compound(Vec<(String, Node<'a>)>),
}

struct Parser<'a> {
    input: &'a str,
    rest: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            rest: input,
            depth: 0,
        }
    }

    fn position(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    fn offset_of(&self, rest: &str) -> usize {
        self.input.len() - rest.len()
    }

    fn skip_whitespace(&mut self) {
        if let Ok((rest, _)) = parser::whitespace(self.rest) {
            self.rest = rest;
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Consume `c` if it is next, after any whitespace.
    fn eat(&mut self, c: char) -> bool {
        self.skip_whitespace();
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.unexpected(format!("expected '{}'", c)))
        }
    }

    fn unexpected(&self, what: impl Display) -> Error {
        match self.peek() {
            Some(c) => Error::parse(self.position(), format!("{}, found '{}'", what, c)),
            None => Error::parse(self.position(), format!("{}, found end of input", what)),
        }
    }

    /// Convert a nom failure into an error at the offset nom stopped at.
    fn lex_error(&self, err: nom::Err<nom::error::Error<&str>>, what: &str) -> Error {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                Error::parse(self.offset_of(e.input), format!("malformed {}", what))
            }
            nom::Err::Incomplete(_) => {
                Error::parse(self.input.len(), format!("incomplete {}", what))
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::structural(
                self.position(),
                format!("nesting deeper than {} levels", MAX_DEPTH),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn value(&mut self) -> Result<Node<'a>> {
        self.skip_whitespace();
        let position = self.position();

        match self.peek() {
            Some('{') => self.compound(),
            Some('[') => self.list_or_array(),
            Some('"') => {
                let raw = Raw::String(self.string()?);
                Ok(Node {
                    kind: TagKind::String,
                    raw,
                    position,
                })
            }
            Some(_) => {
                if let Ok((rest, b)) = parser::boolean(self.rest) {
                    self.rest = rest;
                    return Ok(Node {
                        kind: TagKind::Byte,
                        raw: Raw::Number(if b { "1" } else { "0" }),
                        position,
                    });
                }

                let literal = self.literal()?;
                Ok(Node {
                    kind: literal.kind,
                    raw: Raw::Number(literal.digits),
                    position,
                })
            }
            None => Err(self.unexpected("expected a value")),
        }
    }

    fn literal(&mut self) -> Result<Literal<'a>> {
        match parser::literal(self.rest) {
            Ok((rest, literal)) => {
                self.rest = rest;
                Ok(literal)
            }
            Err(nom::Err::Error(_)) => Err(self.unexpected("expected a value")),
            Err(e) => Err(self.lex_error(e, "number")),
        }
    }

    /// A double-quoted string with JSON escapes.
    fn string(&mut self) -> Result<String> {
        let position = self.position();
        let (rest, token) = parser::quoted(self.rest).map_err(|e| self.lex_error(e, "string"))?;

        let s = serde_json::from_str(token)
            .map_err(|e| Error::parse(position + e.column().saturating_sub(1), e))?;
        self.rest = rest;
        Ok(s)
    }

    fn key(&mut self) -> Result<String> {
        self.skip_whitespace();
        if self.peek() == Some('"') {
            return self.string();
        }

        match parser::key_token(self.rest) {
            Ok((rest, key)) => {
                self.rest = rest;
                Ok(key.to_owned())
            }
            Err(_) => Err(self.unexpected("expected a key")),
        }
    }

    fn compound(&mut self) -> Result<Node<'a>> {
        let position = self.position();
        self.expect('{')?;
        self.enter()?;

        let mut entries = Vec::new();
        if !self.eat('}') {
            loop {
                let key = self.key()?;
                self.expect(':')?;
                entries.push((key, self.value()?));

                if self.eat('}') {
                    break;
                }
                if !self.eat(',') {
                    return Err(self.unexpected("expected ',' or '}'"));
                }
            }
        }

        self.leave();
        Ok(Node {
            kind: TagKind::Compound,
            raw: Raw::Compound(entries),
            position,
        })
    }

    fn list_or_array(&mut self) -> Result<Node<'a>> {
        let position = self.position();
        self.expect('[')?;

        // A value can never start with a letter followed by ';', so this
        // prefix is unambiguous.
        let array = match self.rest.get(..2) {
            Some("B;") => Some(TagKind::ByteArray),
            Some("I;") => Some(TagKind::IntArray),
            Some("L;") => Some(TagKind::LongArray),
            _ => None,
        };

        match array {
            Some(kind) => {
                self.rest = &self.rest[2..];
                self.array(kind, position)
            }
            None => self.list(position),
        }
    }

    fn array(&mut self, kind: TagKind, position: usize) -> Result<Node<'a>> {
        let (element, suffix) = match kind {
            TagKind::ByteArray => (TagKind::Byte, true),
            TagKind::IntArray => (TagKind::Int, false),
            _ => (TagKind::Long, true),
        };

        let mut values = Vec::new();
        if !self.eat(']') {
            loop {
                self.skip_whitespace();
                let at = self.position();
                let literal = self.literal()?;

                // Elements may leave off their unit suffix.
                let accepted = literal.kind == element || (suffix && literal.kind == TagKind::Int);
                if !accepted {
                    return Err(Error::structural(
                        at,
                        format!("{} cannot hold a {}", kind, literal.kind),
                    ));
                }
                values.push((literal.digits, at));

                if self.eat(']') {
                    break;
                }
                if !self.eat(',') {
                    return Err(self.unexpected("expected ',' or ']'"));
                }
            }
        }

        Ok(Node {
            kind,
            raw: Raw::Array(values),
            position,
        })
    }

    fn list(&mut self, position: usize) -> Result<Node<'a>> {
        self.enter()?;

        let mut items = Vec::new();
        if !self.eat(']') {
            loop {
                items.push(self.value()?);

                if self.eat(']') {
                    break;
                }
                if !self.eat(',') {
                    return Err(self.unexpected("expected ',' or ']'"));
                }
            }
        }

        self.leave();
        Ok(Node {
            kind: TagKind::List,
            raw: Raw::List(items),
            position,
        })
    }
}

fn number<T: FromStr>(digits: &str, kind: TagKind, position: usize) -> Result<T> {
    digits
        .parse()
        .map_err(|_| Error::structural(position, format!("{} does not fit in a {}", digits, kind)))
}

/// Only the `inf` and `nan` words may produce a non-finite float. Any other
/// literal that overflows is out of range.
fn check_finite(finite: bool, digits: &str, kind: TagKind, position: usize) -> Result<()> {
    let word = digits
        .trim_start_matches(|c: char| c == '+' || c == '-')
        .starts_with(|c: char| c.is_ascii_alphabetic());
    if finite || word {
        Ok(())
    } else {
        Err(Error::structural(position, format!("{} does not fit in a {}", digits, kind)))
    }
}

fn array_values<T: FromStr>(values: &[(&str, usize)], kind: TagKind) -> Result<Vec<T>> {
    values
        .iter()
        .map(|(digits, position)| number(digits, kind, *position))
        .collect()
}

/// Build the tag for a raw node, checking ranges and list kinds.
fn make_tag(node: Node<'_>) -> Result<Tag> {
    let Node {
        kind,
        raw,
        position,
    } = node;

    Ok(match raw {
        Raw::Number(digits) => match kind {
            TagKind::Byte => Tag::Byte(number(digits, kind, position)?),
            TagKind::Short => Tag::Short(number(digits, kind, position)?),
            TagKind::Int => Tag::Int(number(digits, kind, position)?),
            TagKind::Long => Tag::Long(number(digits, kind, position)?),
            TagKind::Float => {
                let v: f32 = number(digits, kind, position)?;
                check_finite(v.is_finite(), digits, kind, position)?;
                Tag::Float(v)
            }
            _ => {
                let v: f64 = number(digits, kind, position)?;
                check_finite(v.is_finite(), digits, kind, position)?;
                Tag::Double(v)
            }
        },
        Raw::String(s) => Tag::String(s),
        Raw::Array(values) => match kind {
            TagKind::ByteArray => {
                Tag::ByteArray(ByteArray::new(&array_values(&values, TagKind::Byte)?))
            }
            TagKind::IntArray => {
                Tag::IntArray(IntArray::new(&array_values(&values, TagKind::Int)?))
            }
            _ => Tag::LongArray(LongArray::new(&array_values(&values, TagKind::Long)?)),
        },
        Raw::List(nodes) => {
            let mut items = Vec::with_capacity(nodes.len());
            for node in nodes {
                let at = node.position;
                let tag = make_tag(node)?;
                if let Some(first) = items.first().map(Tag::kind) {
                    if tag.kind() != first {
                        return Err(Error::structural(
                            at,
                            format!("list of {} cannot hold a {}", first, tag.kind()),
                        ));
                    }
                }
                items.push(tag);
            }
            Tag::List(List::from_tags(items).map_err(|e| Error::structural(position, e))?)
        }
        Raw::Compound(entries) => {
            let mut compound = Compound::with_capacity(entries.len());
            for (key, node) in entries {
                compound.insert(key, make_tag(node)?);
            }
            Tag::Compound(compound)
        }
    })
}

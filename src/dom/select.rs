//! A small CSS selector subset.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ("," complex)*
//! complex   := compound (whitespace compound)*     // descendant combinator only
//! compound  := (tag | "*")? ("#" ident | "." ident | attribute)*
//! attribute := "[" ident "]" | "[" ident ("=" | "^=") value "]"
//! value     := ident | '"' ... '"' | "'" ... "'"
//! ```
//!
//! That covers every selector the markup contract uses (`.nav-link[href^="#"]`,
//! `[data-bs-toggle="modal"]`, `#contact-form button`) without pulling in a
//! full selector engine.

use super::{Document, Element, NodeId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{found}' at offset {offset} in selector `{selector}`")]
    Unexpected {
        selector: String,
        found: char,
        offset: usize,
    },
    #[error("unexpected end of selector `{0}`")]
    UnexpectedEnd(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    matcher: AttrMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !el.is(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.id() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|cond| match (&cond.matcher, el.attr(&cond.name)) {
            (_, None) => false,
            (AttrMatch::Exists, Some(_)) => true,
            (AttrMatch::Equals(v), Some(actual)) => actual == v,
            (AttrMatch::Prefix(v), Some(actual)) => actual.starts_with(v.as_str()),
        })
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    /// Alternatives of the list; each is a descendant chain, outermost first.
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        Parser::new(source).parse_list()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element at `node` matches any alternative.
    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|chain| chain_matches(document, node, chain))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn chain_matches(document: &Document, node: NodeId, chain: &[Compound]) -> bool {
    let Some((last, outer)) = chain.split_last() else {
        return false;
    };
    if !document.element(node).is_some_and(|el| last.matches(el)) {
        return false;
    }
    // Descendant combinators only: matching each outer compound against the
    // nearest qualifying ancestor is sufficient.
    let mut cursor = document.parent(node);
    for compound in outer.iter().rev() {
        loop {
            let Some(current) = cursor else {
                return false;
            };
            cursor = document.parent(current);
            if document.element(current).is_some_and(|el| compound.matches(el)) {
                break;
            }
        }
    }
    true
}

impl Document {
    /// Elements under `scope` matching `selector`, in document order.
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    /// First element under `scope` matching `selector`.
    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            selector: self.source.to_string(),
            found,
            offset: self.chars.get(self.pos).map(|(i, _)| *i).unwrap_or(self.source.len()),
        }
    }

    fn end(&self) -> SelectorError {
        SelectorError::UnexpectedEnd(self.source.to_string())
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(self.end()),
        }
    }

    fn parse_list(mut self) -> Result<Selector, SelectorError> {
        if self.source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.parse_complex()?);
            match self.peek() {
                None => break,
                Some(',') => {
                    self.pos += 1;
                }
                Some(c) => return Err(self.unexpected(c)),
            }
        }
        Ok(Selector {
            source: self.source.trim().to_string(),
            alternatives,
        })
    }

    fn parse_complex(&mut self) -> Result<Vec<Compound>, SelectorError> {
        let mut chain = vec![self.parse_compound()?];
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(c) if had_space => {
                    if !starts_compound(c) {
                        return Err(self.unexpected(c));
                    }
                    chain.push(self.parse_compound()?);
                }
                Some(c) => return Err(self.unexpected(c)),
            }
        }
        Ok(chain)
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut empty = true;
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                empty = false;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
                empty = false;
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attribute()?);
                }
                _ => break,
            }
            empty = false;
        }
        if empty {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => self.end(),
            });
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.pos += 1;
        }
        if ident.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => self.end(),
            });
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttrCondition, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let matcher = match self.bump() {
            Some(']') => {
                return Ok(AttrCondition {
                    name,
                    matcher: AttrMatch::Exists,
                });
            }
            Some('=') => AttrMatch::Equals(self.parse_value()?),
            Some('^') => {
                self.expect('=')?;
                AttrMatch::Prefix(self.parse_value()?)
            }
            Some(c) => {
                self.pos -= 1;
                return Err(self.unexpected(c));
            }
            None => return Err(self.end()),
        };
        self.skip_whitespace();
        self.expect(']')?;
        Ok(AttrCondition { name, matcher })
    }

    fn parse_value(&mut self) -> Result<String, SelectorError> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some(c) => value.push(c),
                        None => return Err(self.end()),
                    }
                }
            }
            _ => self.parse_ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn starts_compound(c: char) -> bool {
    is_ident_char(c) || matches!(c, '*' | '#' | '.' | '[')
}

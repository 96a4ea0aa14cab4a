//! A small CSS selector engine.
//!
//! Supports the subset page behaviours rely on: type selectors, `*`, `#id`,
//! `.class`, attribute selectors (`[a]`, `[a="v"]`, `[a^="v"]`, `[a*="v"]`,
//! `[a$="v"]`), compound selectors, the descendant and child combinators, and
//! comma-separated selector lists.
//!
//! Selectors are parsed once (usually when a behaviour is bound) and then
//! matched many times.

use std::fmt;
use std::str::FromStr;

use sitewire_core::{SiteError, SiteResult};

use crate::node::{Element, NodeId};

/// Read access to elements, implemented by the document tree.
pub(crate) trait ElementSource {
    fn element(&self, id: NodeId) -> Option<&Element>;
}

/// A parsed selector list.
///
/// # Examples
///
/// ```
/// use sitewire_dom::Selector;
///
/// let sel = Selector::parse(r##".c-nav__link[href^="#"], a.button"##).unwrap();
/// assert_eq!(sel.to_string(), r##".c-nav__link[href^="#"], a.button"##);
/// assert!(Selector::parse("[href").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    // The combinator stored with part `i` links it to part `i - 1`.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttributeMatch {
    name: String,
    test: Option<(AttributeOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOp {
    Equals,
    Prefix,
    Substring,
    Suffix,
}

impl Selector {
    /// Parses a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidSelector`] when the text is not a selector
    /// in the supported subset.
    pub fn parse(source: &str) -> SiteResult<Self> {
        let mut parser = Parser {
            source,
            chars: source.chars().collect(),
            pos: 0,
        };
        let alternatives = parser.parse_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// The selector text this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, src: &impl ElementSource, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches_at(src, complex.parts.len() - 1, node))
    }
}

impl FromStr for Selector {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches_at(&self, src: &impl ElementSource, index: usize, node: NodeId) -> bool {
        let Some(element) = src.element(node) else {
            return false;
        };
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => element
                .parent
                .is_some_and(|parent| self.matches_at(src, index - 1, parent)),
            Combinator::Descendant => {
                let mut current = element.parent;
                while let Some(ancestor) = current {
                    if self.matches_at(src, index - 1, ancestor) {
                        return true;
                    }
                    current = src.element(ancestor).and_then(|el| el.parent);
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != element.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|attr| attr.matches(element))
    }
}

impl AttributeMatch {
    fn matches(&self, element: &Element) -> bool {
        let Some(actual) = element.attribute(&self.name) else {
            return false;
        };
        match &self.test {
            None => true,
            Some((AttributeOp::Equals, expected)) => actual == *expected,
            Some((AttributeOp::Prefix, expected)) => {
                !expected.is_empty() && actual.starts_with(expected.as_str())
            }
            Some((AttributeOp::Substring, expected)) => {
                !expected.is_empty() && actual.contains(expected.as_str())
            }
            Some((AttributeOp::Suffix, expected)) => {
                !expected.is_empty() && actual.ends_with(expected.as_str())
            }
        }
    }
}

// ============================================================
// Parser
// ============================================================

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> SiteError {
        SiteError::invalid_selector(self.source, reason)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Skips whitespace; returns whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> SiteResult<Vec<Complex>> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            match self.bump() {
                None => break,
                Some(',') => {}
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
        Ok(alternatives)
    }

    fn parse_complex(&mut self) -> SiteResult<Complex> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.parse_compound()?;
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> SiteResult<Compound> {
        let mut compound = Compound::default();
        let mut universal = false;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                universal = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
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
                    compound.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() && !universal {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected a selector, found '{c}'")),
                None => self.error("expected a selector"),
            });
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> SiteResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attribute(&mut self) -> SiteResult<AttributeMatch> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();

        let op = match self.bump() {
            Some(']') => return Ok(AttributeMatch { name, test: None }),
            Some('=') => AttributeOp::Equals,
            Some(c @ ('^' | '*' | '$')) => {
                if self.bump() != Some('=') {
                    return Err(self.error(format!("expected '=' after '{c}'")));
                }
                match c {
                    '^' => AttributeOp::Prefix,
                    '*' => AttributeOp::Substring,
                    _ => AttributeOp::Suffix,
                }
            }
            Some(c) => return Err(self.error(format!("unexpected '{c}' in attribute selector"))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated string"));
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                value
            }
            _ => self.parse_ident()?,
        };
        self.skip_ws();
        if self.bump() != Some(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        Ok(AttributeMatch {
            name,
            test: Some((op, value)),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

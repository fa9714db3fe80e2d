//! Compound selector parsing and matching.
//!
//! Only single compound selectors are supported: an optional tag (or `*`)
//! followed by any number of `#id`, `.class`, `[attr]` and `[attr=value]`
//! parts. Combinators and selector lists are rejected.

use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::error::SelectorError;

use super::ElementRef;

/// Attribute condition inside a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    name: String,
    value: Option<String>,
}

impl AttributeMatch {
    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Required value, or `None` for a presence test.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn matches(&self, element: &ElementRef) -> bool {
        match (&self.value, element.attribute(&self.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => *expected == actual,
        }
    }
}

/// A parsed compound selector.
///
/// # Example
///
/// ```
/// use cel::dom::{ElementRef, Selector};
///
/// let selector: Selector = "input.search[name=q]".parse().expect("valid selector");
/// let element = ElementRef::new("input")
///     .with_attribute("class", "search wide")
///     .with_attribute("name", "q");
/// assert!(selector.matches(&element));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

impl Selector {
    /// Attribute conditions in source order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeMatch] {
        &self.attributes
    }

    /// Returns `true` when the element satisfies every part.
    #[must_use]
    pub fn matches(&self, element: &ElementRef) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != element.tag()) {
            return false;
        }
        if let Some(id) = &self.id {
            if element.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let present = element.classes();
            if !self.classes.iter().all(|class| present.contains(class)) {
                return false;
            }
        }
        self.attributes.iter().all(|attr| attr.matches(element))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }
        let unsupported = || SelectorError::Unsupported {
            selector: text.to_owned(),
        };

        let mut selector = Self::default();
        let mut chars = text.chars().peekable();

        if chars.peek() == Some(&'*') {
            chars.next();
        } else {
            let tag = read_ident(&mut chars);
            if !tag.is_empty() {
                selector.tag = Some(tag.to_ascii_lowercase());
            }
        }

        while let Some(marker) = chars.next() {
            match marker {
                '#' => {
                    let id = read_ident(&mut chars);
                    if id.is_empty() || selector.id.is_some() {
                        return Err(unsupported());
                    }
                    selector.id = Some(id);
                }
                '.' => {
                    let class = read_ident(&mut chars);
                    if class.is_empty() {
                        return Err(unsupported());
                    }
                    selector.classes.push(class);
                }
                '[' => {
                    let attribute = read_attribute(&mut chars).ok_or_else(unsupported)?;
                    selector.attributes.push(attribute);
                }
                _ => return Err(unsupported()),
            }
        }

        Ok(selector)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

/// Reads `name]` or `name=value]` after an opening bracket.
fn read_attribute(chars: &mut Peekable<Chars<'_>>) -> Option<AttributeMatch> {
    let name = read_ident(chars);
    if name.is_empty() {
        return None;
    }
    match chars.next()? {
        ']' => Some(AttributeMatch { name, value: None }),
        '=' => {
            let value = read_attribute_value(chars)?;
            (chars.next()? == ']').then_some(AttributeMatch {
                name,
                value: Some(value),
            })
        }
        _ => None,
    }
}

fn read_attribute_value(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut value = String::new();
    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            loop {
                let c = chars.next()?;
                if c == quote {
                    break;
                }
                value.push(c);
            }
        }
        _ => {
            while let Some(&c) = chars.peek() {
                if c == ']' {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }
    }
    Some(value)
}

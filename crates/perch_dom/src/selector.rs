//! Compound selectors
//!
//! Supports a single compound selector: an optional tag name followed by any
//! number of `#id` and `.class` parts (`div`, `#panel`, `a.trigger.on`).
//! Combinators are not supported.

use smallvec::SmallVec;

use crate::error::{DomError, Result};
use crate::node::Node;

/// A parsed compound selector
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let source = input.trim();
        let invalid = || DomError::InvalidSelector(input.to_string());

        if source.is_empty() || source.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let mut selector = Selector::default();
        let mut rest = source;

        let tag_len = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if !is_ident(tag) {
                return Err(invalid());
            }
            selector.tag = Some(tag.to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let len = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..len];
            if !is_ident(name) {
                return Err(invalid());
            }
            match marker {
                '#' => {
                    if selector.id.is_some() {
                        return Err(invalid());
                    }
                    selector.id = Some(name.to_string());
                }
                _ => selector.classes.push(name.to_string()),
            }
            rest = &body[len..];
        }

        Ok(selector)
    }

    pub fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if node.tag() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.element_id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| node.has_class(c))
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

//! Content-source predicates
//!
//! Overlay content comes from a single configuration string, and these
//! predicates decide what that string is: a reference to an element already
//! in the page, a remote location to fetch, or literal markup.

use std::sync::OnceLock;

use regex::Regex;

fn selector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Optional tag, then one or more #id / .class parts. Bare words are
    // literal text, not selectors.
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9-]*(?:[#.][A-Za-z_][\w-]*)+$|^(?:[#.][A-Za-z_][\w-]*)+$")
            .expect("selector pattern is valid")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            // absolute, protocol-relative, root- or dot-relative
            r"^(?:https?://|//|\.{1,2}/|/)[^\s<>]*$",
            // bare path with at least one segment separator
            r"|^[\w.-]+(?:/[^\s<>]*)+$",
            // bare resource with a query string
            r"|^[\w.-]+\?[^\s<>]*$",
        ))
        .expect("url pattern is valid")
    })
}

/// Is `value` an element selector (`#id`, `.class`, `tag#id`, `tag.a.b`)?
pub fn is_selector(value: &str) -> bool {
    selector_pattern().is_match(value.trim())
}

/// Is `value` something to fetch rather than render?
pub fn is_url(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && url_pattern().is_match(value)
}

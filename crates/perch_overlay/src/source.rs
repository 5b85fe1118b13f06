//! Content source resolution
//!
//! An overlay decides once, at construction, where its content comes from.
//! Candidates are tried in order and the first non-empty one wins:
//!
//! 1. `content` (static markup or selector)
//! 2. `message`
//! 3. `remote`
//! 4. the trigger's `href`
//! 5. the `action` of the trigger's nearest enclosing form
//!
//! The winning string is then classified. `remote` is always fetched; any
//! other candidate is a borrowed element if it looks like a selector, a fetch
//! if it looks like a URL, and literal markup otherwise.

use perch_core::{is_selector, is_url};
use perch_dom::Document;

use crate::config::OverlayConfig;

/// Where the winning candidate came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceOrigin {
    Content,
    Message,
    Remote,
    TriggerLink,
    FormAction,
}

/// How the content is materialized at show time
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    /// Literal markup, used as-is
    Markup(String),
    /// Fetched through the content provider
    Remote(String),
    /// An element already in the page, borrowed while shown
    Fragment(String),
}

/// The source an overlay settled on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSource {
    pub origin: SourceOrigin,
    pub source: ContentSource,
}

impl ResolvedSource {
    pub fn is_remote(&self) -> bool {
        matches!(self.source, ContentSource::Remote(_))
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.source, ContentSource::Fragment(_))
    }
}

/// Links that do not point anywhere
fn is_placeholder_link(href: &str) -> bool {
    href == "#" || href.starts_with("javascript:")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick and classify the content source for `config`
///
/// Returns `None` when no candidate is present; the overlay then shows an
/// empty container.
pub fn resolve_source(config: &OverlayConfig, doc: &Document) -> Option<ResolvedSource> {
    let trigger_link = config
        .trigger
        .and_then(|t| doc.attr(t, "href"))
        .filter(|href| !is_placeholder_link(href.trim()));
    let form_action = config
        .trigger
        .and_then(|t| doc.closest(t, "form"))
        .and_then(|form| doc.attr(form, "action"));

    let candidates: [(SourceOrigin, Option<&str>); 5] = [
        (SourceOrigin::Content, config.content.as_deref()),
        (SourceOrigin::Message, config.message.as_deref()),
        (SourceOrigin::Remote, config.remote.as_deref()),
        (SourceOrigin::TriggerLink, trigger_link),
        (SourceOrigin::FormAction, form_action),
    ];

    let (origin, value) = candidates
        .into_iter()
        .find_map(|(origin, value)| non_empty(value).map(|v| (origin, v)))?;

    let source = if origin == SourceOrigin::Remote {
        ContentSource::Remote(value.to_string())
    } else if is_selector(value) {
        ContentSource::Fragment(value.to_string())
    } else if is_url(value) {
        ContentSource::Remote(value.to_string())
    } else {
        ContentSource::Markup(value.to_string())
    };

    tracing::debug!("resolved content source {:?} from {:?}", source, origin);
    Some(ResolvedSource { origin, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_dom::NodeId;

    fn link(doc: &mut Document, href: &str) -> NodeId {
        let a = doc.create_element("a");
        doc.set_attr(a, "href", href).unwrap();
        let body = doc.body();
        doc.append_child(body, a).unwrap();
        a
    }

    #[test]
    fn test_precedence() {
        let mut doc = Document::new();
        let trigger = link(&mut doc, "/from-link.html");

        let full = OverlayConfig::new()
            .trigger(trigger)
            .content("<b>static</b>")
            .message("message")
            .remote("/remote.html");
        let resolved = resolve_source(&full, &doc).unwrap();
        assert_eq!(resolved.origin, SourceOrigin::Content);
        assert_eq!(resolved.source, ContentSource::Markup("<b>static</b>".into()));

        let no_content = OverlayConfig {
            content: Some("   ".into()),
            ..full.clone()
        };
        assert_eq!(
            resolve_source(&no_content, &doc).unwrap().origin,
            SourceOrigin::Message
        );

        let remote_only = OverlayConfig::new()
            .trigger(trigger)
            .remote("/remote.html");
        assert_eq!(
            resolve_source(&remote_only, &doc).unwrap().source,
            ContentSource::Remote("/remote.html".into())
        );

        let link_only = OverlayConfig::new().trigger(trigger);
        let resolved = resolve_source(&link_only, &doc).unwrap();
        assert_eq!(resolved.origin, SourceOrigin::TriggerLink);
        assert_eq!(resolved.source, ContentSource::Remote("/from-link.html".into()));
    }

    #[test]
    fn test_form_action_fallback() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        doc.set_attr(form, "action", "/submit").unwrap();
        let button = doc.create_element("input");
        let body = doc.body();
        doc.append_child(body, form).unwrap();
        doc.append_child(form, button).unwrap();

        let resolved = resolve_source(&OverlayConfig::new().trigger(button), &doc).unwrap();
        assert_eq!(resolved.origin, SourceOrigin::FormAction);
        assert!(resolved.is_remote());
    }

    #[test]
    fn test_selector_link_is_fragment() {
        let mut doc = Document::new();
        let trigger = link(&mut doc, "#details");
        let resolved = resolve_source(&OverlayConfig::new().trigger(trigger), &doc).unwrap();
        assert_eq!(resolved.source, ContentSource::Fragment("#details".into()));
        assert!(resolved.is_fragment());
    }

    #[test]
    fn test_placeholder_link_is_skipped() {
        let mut doc = Document::new();
        let trigger = link(&mut doc, "#");
        assert_eq!(resolve_source(&OverlayConfig::new().trigger(trigger), &doc), None);
    }

    #[test]
    fn test_nothing_resolves_to_none() {
        let doc = Document::new();
        assert_eq!(resolve_source(&OverlayConfig::new(), &doc), None);
    }

    #[test]
    fn test_idempotent() {
        let doc = Document::new();
        let config = OverlayConfig::new().message("Hello");
        assert_eq!(resolve_source(&config, &doc), resolve_source(&config, &doc));
    }
}

//! Tab navigator
//!
//! Markup convention: the navigator root's first child holds the link
//! triggers, its second child holds the panels.
//!
//! ```text
//! div.tabs
//! ├── ul                      triggers
//! │   ├── a[href="#intro"]
//! │   └── a[href="/more.html"]
//! └── div.perch-tab-content   panels
//!     ├── div#intro
//!     └── div#perch-tab-1     created, filled remotely on first select
//! ```
//!
//! A trigger whose `href` fragment names a panel inside the navigator shows
//! that panel. Any other trigger gets an empty panel that is filled from the
//! content provider the first time it is selected. The first tab starts
//! open.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use perch_core::{Component, EventKind, ListenerId, UiEvent};
use perch_dom::{NodeId, SharedDocument, HIDDEN_CLASS};
use perch_overlay::{ContentProvider, FetchReply, OverlaySystem, LOADING_CLASS};

use crate::TRIGGER_CLASS;

/// Class of the panel container
pub const TAB_CONTENT_CLASS: &str = "perch-tab-content";

/// Class marking the open tab's trigger
pub const OPEN_TAB_CLASS: &str = "on";

/// One trigger and the panel it opens
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tab {
    pub trigger: NodeId,
    pub panel: NodeId,
    /// Where the panel's content comes from when it was not in the page
    pub remote: Option<String>,
}

struct NavigatorInner {
    base: Component,
    root: NodeId,
    tabs: Vec<Tab>,
    open: Cell<Option<usize>>,
    document: SharedDocument,
    provider: Rc<dyn ContentProvider>,
    event_loop: perch_core::EventLoop,
}

/// Handle to a tab navigator
#[derive(Clone)]
pub struct TabNavigator {
    inner: Rc<NavigatorInner>,
}

/// Split an `href` into the panel id it names, if any
fn fragment_id(href: &str) -> Option<&str> {
    href.split_once('#')
        .map(|(_, id)| id.trim())
        .filter(|id| !id.is_empty())
}

impl TabNavigator {
    /// Wire up the navigator rooted at `root`
    pub fn new(system: &OverlaySystem, root: NodeId) -> Self {
        let tabs = Self::discover(system.document(), root);

        let inner = Rc::new(NavigatorInner {
            base: Component::new("tab-navigator"),
            root,
            tabs,
            open: Cell::new(None),
            document: system.document().clone(),
            provider: Rc::clone(&system.services().provider),
            event_loop: system.event_loop().clone(),
        });

        for (index, tab) in inner.tabs.iter().enumerate() {
            let weak = Rc::downgrade(&inner);
            system.router().on(tab.trigger, EventKind::Click, move |event| {
                if let Some(inner) = weak.upgrade() {
                    TabNavigator { inner }.select_with(index, Some(event));
                }
            });
        }

        let navigator = Self { inner };
        if !navigator.inner.tabs.is_empty() {
            navigator.open_tab(0);
        }

        tracing::debug!(
            "tab navigator {:?} with {} tab(s)",
            root,
            navigator.inner.tabs.len()
        );
        navigator
    }

    /// Find triggers and match or create their panels
    fn discover(document: &SharedDocument, root: NodeId) -> Vec<Tab> {
        let mut doc = document.borrow_mut();
        let Some(&trigger_list) = doc.children(root).first() else {
            tracing::warn!("tab navigator {:?} has no trigger list", root);
            return Vec::new();
        };
        let content = match doc.children(root).get(1).copied() {
            Some(content) => content,
            None => {
                let content = doc.create_element("div");
                if let Err(err) = doc.append_child(root, content) {
                    tracing::warn!("cannot create tab content: {}", err);
                    return Vec::new();
                }
                content
            }
        };
        let _ = doc.add_class(content, TAB_CONTENT_CLASS);

        let triggers = match doc.query_all_within(trigger_list, "a") {
            Ok(triggers) => triggers,
            Err(err) => {
                tracing::warn!("cannot list tab triggers: {}", err);
                return Vec::new();
            }
        };

        let mut tabs = Vec::with_capacity(triggers.len());
        for (index, trigger) in triggers.into_iter().enumerate() {
            let _ = doc.add_class(trigger, TRIGGER_CLASS);
            let href = doc.attr(trigger, "href").unwrap_or_default().to_string();

            let existing = fragment_id(&href)
                .and_then(|id| doc.query_within(root, &format!("#{}", id)).ok().flatten());

            let tab = match existing {
                Some(panel) => Tab {
                    trigger,
                    panel,
                    remote: None,
                },
                None => {
                    let panel = doc.create_element("div");
                    let _ = doc.set_attr(panel, "id", format!("perch-tab-{}", index));
                    let _ = doc.append_child(content, panel);
                    let remote = Some(href).filter(|h| !h.is_empty() && h != "#");
                    Tab {
                        trigger,
                        panel,
                        remote,
                    }
                }
            };
            let _ = doc.add_class(tab.panel, HIDDEN_CLASS);
            tabs.push(tab);
        }
        tabs
    }

    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.inner.tabs
    }

    pub fn len(&self) -> usize {
        self.inner.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tabs.is_empty()
    }

    /// Index of the open tab
    pub fn open_index(&self) -> Option<usize> {
        self.inner.open.get()
    }

    pub fn component(&self) -> &Component {
        &self.inner.base
    }

    /// Listen for `select`
    pub fn on<F>(&self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&str) + 'static,
    {
        self.inner.base.on(name, listener)
    }

    /// Legacy `onSelect` callback
    pub fn on_select<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.base.set_callback("onSelect", callback);
    }

    pub fn select(&self, index: usize) -> bool {
        self.select_with(index, None)
    }

    /// Open tab `index`, closing the open one
    ///
    /// Returns false for the already open tab or an index out of range.
    pub fn select_with(&self, index: usize, event: Option<&mut UiEvent>) -> bool {
        if let Some(event) = event {
            self.inner.base.prevent(event);
        }
        if index >= self.inner.tabs.len() {
            tracing::warn!("no tab {} (have {})", index, self.inner.tabs.len());
            return false;
        }
        if self.inner.open.get() == Some(index) {
            return false;
        }

        if let Some(open) = self.inner.open.get() {
            self.close_tab(open);
        }
        self.open_tab(index);

        self.inner.base.trigger("select");
        self.inner.base.callbacks("onSelect");
        true
    }

    fn close_tab(&self, index: usize) {
        let tab = &self.inner.tabs[index];
        let mut doc = self.inner.document.borrow_mut();
        let _ = doc.add_class(tab.panel, HIDDEN_CLASS);
        let _ = doc.remove_class(tab.trigger, OPEN_TAB_CLASS);
    }

    fn open_tab(&self, index: usize) {
        let tab = &self.inner.tabs[index];
        let needs_content = {
            let mut doc = self.inner.document.borrow_mut();
            let _ = doc.remove_class(tab.panel, HIDDEN_CLASS);
            let _ = doc.add_class(tab.trigger, OPEN_TAB_CLASS);
            doc.html(tab.panel).map(|html| html.is_empty()).unwrap_or(false)
                && !doc.has_class(tab.panel, LOADING_CLASS)
        };
        self.inner.open.set(Some(index));

        if let (true, Some(url)) = (needs_content, &tab.remote) {
            self.load(tab.panel, url);
        }
    }

    fn load(&self, panel: NodeId, url: &str) {
        let _ = self
            .inner
            .document
            .borrow_mut()
            .add_class(panel, LOADING_CLASS);

        let alive: Weak<NavigatorInner> = Rc::downgrade(&self.inner);
        let deliver_to = alive.clone();
        let owned_url = url.to_string();
        let reply = FetchReply::new(
            url,
            self.inner.event_loop.clone(),
            Rc::new(move || alive.strong_count() > 0),
            Box::new(move |result| {
                let Some(inner) = deliver_to.upgrade() else {
                    return;
                };
                let mut doc = inner.document.borrow_mut();
                let _ = doc.remove_class(panel, LOADING_CLASS);
                match result {
                    Ok(markup) => {
                        let _ = doc.set_html(panel, markup);
                        tracing::debug!("tab panel {:?} loaded {}", panel, owned_url);
                    }
                    Err(err) => tracing::warn!("{}; tab panel left empty", err),
                }
            }),
        );
        self.inner.provider.fetch(url, reply);
    }
}

impl std::fmt::Debug for TabNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabNavigator")
            .field("root", &self.inner.root)
            .field("tabs", &self.inner.tabs.len())
            .field("open", &self.inner.open.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_id() {
        assert_eq!(fragment_id("#intro"), Some("intro"));
        assert_eq!(fragment_id("/page.html#part"), Some("part"));
        assert_eq!(fragment_id("/page.html"), None);
        assert_eq!(fragment_id("#"), None);
    }

    #[test]
    fn test_missing_trigger_list_is_empty() {
        let system = OverlaySystem::new();
        let root = {
            let mut doc = system.document().borrow_mut();
            let root = doc.create_element("div");
            let body = doc.body();
            doc.append_child(body, root).unwrap();
            root
        };
        let navigator = TabNavigator::new(&system, root);
        assert!(navigator.is_empty());
        assert_eq!(navigator.open_index(), None);
        assert!(!navigator.select(0));
    }
}

//! Floating overlay instance
//!
//! An [`Overlay`] owns one container built at construction and drives it
//! through the [`OverlayState`] lifecycle. `show` renders the resolved
//! content into the slot, attaches the container to the body and, with
//! effects on, fades it in before the `show` notification fires. `hide`
//! reverses this and returns borrowed page content to where it came from.
//!
//! Handles are cheap to clone and share one instance. Event loop tasks and
//! router handlers hold [`WeakOverlay`]s so they never keep an overlay alive.
//!
//! # Example
//!
//! ```rust
//! use perch_overlay::{OverlayConfig, OverlayKind, OverlaySystem};
//!
//! let system = OverlaySystem::new();
//! let overlay = system.overlay(
//!     OverlayKind::Tooltip,
//!     OverlayConfig::new().message("Hello").fx(false),
//! );
//!
//! let _ = overlay.show();
//! assert!(overlay.is_active());
//! assert_eq!(system.document().borrow().html(overlay.content_slot()).unwrap(), "Hello");
//!
//! let _ = overlay.hide();
//! assert!(!overlay.is_active());
//! assert!(!system.document().borrow().is_attached(overlay.container()));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use perch_core::{
    Component, ComponentId, EventKind, ListenerId, StateTransitions, TaskId, UiEvent,
};
use perch_dom::{NodeId, HIDDEN_CLASS};

use crate::config::{Dimension, Effects, Length, OverlayConfig, OverlayKind, PositionSpec};
use crate::layout::OverlayLayout;
use crate::provider::FetchReply;
use crate::source::{resolve_source, ContentSource, ResolvedSource};
use crate::state::{overlay_events, OverlayState};
use crate::system::OverlayServices;
use crate::transition::{Completer, Transition};

/// Container class while the enter fade runs
pub const FX_SHOWING_CLASS: &str = "perch-fx-showing";

/// Container class while the exit fade runs
pub const FX_HIDING_CLASS: &str = "perch-fx-hiding";

/// Content slot class while a remote fetch is outstanding
pub const LOADING_CLASS: &str = "perch-loading";

/// What was last placed into the content slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderedContent {
    Markup(String),
    /// A page element moved into the slot
    Fragment(NodeId),
}

/// Where a borrowed fragment lived before its first show
#[derive(Clone, Copy, Debug)]
struct BorrowRecord {
    original_parent: Option<NodeId>,
    original_visible: bool,
}

/// Mutable per-instance state
#[derive(Default)]
struct OverlayFields {
    state: OverlayState,
    last_rendered: Option<RenderedContent>,
    borrowed: Option<BorrowRecord>,
    width: Option<Length>,
    height: Option<Length>,
    z_index: i32,
    fetch_generation: u64,
    animation: Option<TaskId>,
    show_waiters: Vec<Completer>,
    hide_waiters: Vec<Completer>,
}

struct OverlayInner {
    base: Component,
    kind: OverlayKind,
    layout: OverlayLayout,
    services: OverlayServices,
    source: Option<ResolvedSource>,
    /// `None` when effects are off
    effects: Option<Effects>,
    closeable: bool,
    trigger: Option<NodeId>,
    position: PositionSpec,
    position_supplied: bool,
    fields: RefCell<OverlayFields>,
}

/// Log and swallow a failed document update
fn dom_ok<T>(result: perch_dom::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("overlay document update failed: {}", err);
            None
        }
    }
}

/// Handle to one overlay instance
#[derive(Clone)]
pub struct Overlay {
    inner: Rc<OverlayInner>,
}

/// Non-owning handle, see [`Overlay::downgrade`]
#[derive(Clone)]
pub struct WeakOverlay {
    inner: Weak<OverlayInner>,
}

impl WeakOverlay {
    pub fn upgrade(&self) -> Option<Overlay> {
        self.inner.upgrade().map(|inner| Overlay { inner })
    }
}

impl std::fmt::Debug for WeakOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakOverlay")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Overlay {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Build the layout and resolve the content source
    pub(crate) fn new(kind: OverlayKind, config: OverlayConfig, services: OverlayServices) -> Self {
        let (layout, source) = {
            let mut doc = services.document.borrow_mut();
            let layout = OverlayLayout::build(&mut doc, kind, &config, &services.zorder);
            (layout, resolve_source(&config, &doc))
        };

        let position_supplied = config.position.is_some();
        let mut position = config.position.clone().unwrap_or_default();
        position.context = position.context.or(config.trigger);
        position.hold = position.hold || config.hold;

        let base = Component::new(kind.name());
        if let Some(callback) = config.on_show.clone() {
            base.set_callback_rc("onShow", callback);
        }
        if let Some(callback) = config.on_hide.clone() {
            base.set_callback_rc("onHide", callback);
        }

        let overlay = Self {
            inner: Rc::new(OverlayInner {
                base,
                kind,
                layout,
                services,
                source,
                effects: config.fx.then_some(config.effects),
                closeable: config.close_button,
                trigger: config.trigger,
                position,
                position_supplied,
                fields: RefCell::new(OverlayFields {
                    width: config.width.clone(),
                    height: config.height.clone(),
                    z_index: layout.z_index,
                    ..Default::default()
                }),
            }),
        };

        if let Some(button) = layout.close_button {
            let weak = overlay.downgrade();
            overlay
                .inner
                .services
                .router
                .on(button, EventKind::Click, move |event| {
                    if let Some(overlay) = weak.upgrade() {
                        let _ = overlay.hide_with(Some(event));
                    }
                });
        }
        if overlay.inner.closeable {
            overlay.inner.services.escape.register(&overlay);
        }

        tracing::debug!(
            "created {}#{} (source: {:?}, fx: {})",
            kind.name(),
            overlay.id().id(),
            overlay.inner.source.as_ref().map(|s| &s.source),
            config.fx
        );

        overlay
    }

    pub fn downgrade(&self) -> WeakOverlay {
        WeakOverlay {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Same underlying instance
    pub fn ptr_eq(&self, other: &Overlay) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn id(&self) -> ComponentId {
        self.inner.base.id()
    }

    pub fn kind(&self) -> OverlayKind {
        self.inner.kind
    }

    /// The composed base capability
    pub fn component(&self) -> &Component {
        &self.inner.base
    }

    pub fn state(&self) -> OverlayState {
        self.inner.fields.borrow().state
    }

    /// Attached and fully shown
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    pub fn container(&self) -> NodeId {
        self.inner.layout.container
    }

    pub fn content_slot(&self) -> NodeId {
        self.inner.layout.content_slot
    }

    pub fn close_button(&self) -> Option<NodeId> {
        self.inner.layout.close_button
    }

    pub fn cone(&self) -> Option<NodeId> {
        self.inner.layout.cone
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.inner.trigger
    }

    /// Closeable overlays have a close button and answer to Escape
    pub fn is_closeable(&self) -> bool {
        self.inner.closeable
    }

    /// Most recently assigned z-index
    pub fn z_index(&self) -> i32 {
        self.inner.fields.borrow().z_index
    }

    /// Content source chosen at construction
    pub fn source(&self) -> Option<&ResolvedSource> {
        self.inner.source.as_ref()
    }

    pub fn last_rendered(&self) -> Option<RenderedContent> {
        self.inner.fields.borrow().last_rendered.clone()
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Listen for `show` / `hide`
    pub fn on<F>(&self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&str) + 'static,
    {
        self.inner.base.on(name, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.base.off(id)
    }

    fn emit(&self, name: &str, legacy: &str) {
        self.inner.base.trigger(name);
        self.inner.base.callbacks(legacy);
    }

    // =========================================================================
    // Show
    // =========================================================================

    pub fn show(&self) -> Transition {
        self.show_with(None)
    }

    /// Show in response to `event`, suppressing its default action
    ///
    /// Ignored unless the overlay is inactive.
    pub fn show_with(&self, event: Option<&mut UiEvent>) -> Transition {
        if let Some(event) = event {
            self.inner.base.prevent(event);
        }
        let state = self.state();
        if state != OverlayState::Inactive {
            tracing::debug!(
                "{}#{} show ignored in {:?}",
                self.kind().name(),
                self.id().id(),
                state
            );
            return Transition::ignored();
        }

        self.render_content();

        let services = &self.inner.services;
        let container = self.container();
        let z_index = services.zorder.next();
        {
            let mut doc = services.document.borrow_mut();
            let body = doc.body();
            dom_ok(doc.append_child(body, container));
            dom_ok(doc.set_style(container, "z-index", z_index.to_string()));
        }

        let (transition, completer) = Transition::pending();
        {
            let mut fields = self.inner.fields.borrow_mut();
            fields.z_index = z_index;
            fields.show_waiters.push(completer);
        }

        match self.inner.effects {
            Some(effects) => {
                self.apply(overlay_events::SHOW);
                {
                    let mut doc = services.document.borrow_mut();
                    dom_ok(doc.add_class(container, FX_SHOWING_CLASS));
                    dom_ok(doc.set_style(container, "opacity", "0"));
                    dom_ok(doc.remove_class(container, HIDDEN_CLASS));
                }
                let weak = self.downgrade();
                let task = services.event_loop.post_after(effects.enter_ms, move || {
                    if let Some(overlay) = weak.upgrade() {
                        overlay.finish_show();
                    }
                });
                self.inner.fields.borrow_mut().animation = Some(task);
            }
            None => {
                self.apply(overlay_events::SHOW_IMMEDIATE);
                dom_ok(
                    services
                        .document
                        .borrow_mut()
                        .remove_class(container, HIDDEN_CLASS),
                );
                self.finish_show();
            }
        }

        transition
    }

    fn finish_show(&self) {
        self.inner.fields.borrow_mut().animation = None;
        if self.inner.effects.is_some() {
            {
                let mut doc = self.inner.services.document.borrow_mut();
                dom_ok(doc.remove_class(self.container(), FX_SHOWING_CLASS));
                dom_ok(doc.set_style(self.container(), "opacity", "1"));
            }
            self.apply(overlay_events::ANIMATION_COMPLETE);
        }

        self.refresh_position();
        if self.inner.closeable {
            self.inner.services.escape.notify_shown(self.id());
        }
        self.emit("show", "onShow");

        let waiters = std::mem::take(&mut self.inner.fields.borrow_mut().show_waiters);
        for waiter in waiters {
            waiter.complete();
        }
    }

    // =========================================================================
    // Hide
    // =========================================================================

    pub fn hide(&self) -> Transition {
        self.hide_with(None)
    }

    /// Hide in response to `event`, suppressing its default action
    ///
    /// Ignored unless the overlay is active.
    pub fn hide_with(&self, event: Option<&mut UiEvent>) -> Transition {
        if let Some(event) = event {
            self.inner.base.prevent(event);
        }
        let state = self.state();
        if !state.is_active() {
            tracing::debug!(
                "{}#{} hide ignored in {:?}",
                self.kind().name(),
                self.id().id(),
                state
            );
            return Transition::ignored();
        }

        let services = &self.inner.services;
        if self.inner.closeable {
            services.escape.notify_hidden(self.id());
        }
        self.cancel_fetch();

        let (transition, completer) = Transition::pending();
        self.inner.fields.borrow_mut().hide_waiters.push(completer);

        let container = self.container();
        match self.inner.effects {
            Some(effects) => {
                self.apply(overlay_events::HIDE);
                {
                    let mut doc = services.document.borrow_mut();
                    dom_ok(doc.add_class(container, FX_HIDING_CLASS));
                    dom_ok(doc.set_style(container, "opacity", "0"));
                }
                let weak = self.downgrade();
                let task = services.event_loop.post_after(effects.exit_ms, move || {
                    if let Some(overlay) = weak.upgrade() {
                        overlay.finish_hide();
                    }
                });
                self.inner.fields.borrow_mut().animation = Some(task);
            }
            None => {
                self.apply(overlay_events::HIDE_IMMEDIATE);
                self.finish_hide();
            }
        }

        transition
    }

    fn finish_hide(&self) {
        self.inner.fields.borrow_mut().animation = None;
        let container = self.container();
        if self.inner.effects.is_some() {
            {
                let mut doc = self.inner.services.document.borrow_mut();
                dom_ok(doc.remove_class(container, FX_HIDING_CLASS));
                dom_ok(doc.remove_style(container, "opacity"));
            }
            self.apply(overlay_events::ANIMATION_COMPLETE);
        }

        dom_ok(
            self.inner
                .services
                .document
                .borrow_mut()
                .add_class(container, HIDDEN_CLASS),
        );
        self.emit("hide", "onHide");
        dom_ok(self.inner.services.document.borrow_mut().detach(container));
        self.restore_fragment();

        let waiters = std::mem::take(&mut self.inner.fields.borrow_mut().hide_waiters);
        for waiter in waiters {
            waiter.complete();
        }
    }

    fn apply(&self, event: u32) -> bool {
        let mut fields = self.inner.fields.borrow_mut();
        match fields.state.on_event(event) {
            Some(next) => {
                tracing::debug!(
                    "{}#{} {:?} -> {:?}",
                    self.inner.kind.name(),
                    self.inner.base.id().id(),
                    fields.state,
                    next
                );
                fields.state = next;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    fn render_content(&self) {
        let Some(resolved) = &self.inner.source else {
            return;
        };
        match &resolved.source {
            ContentSource::Markup(markup) => {
                dom_ok(
                    self.inner
                        .services
                        .document
                        .borrow_mut()
                        .set_html(self.content_slot(), markup.as_str()),
                );
                self.inner.fields.borrow_mut().last_rendered =
                    Some(RenderedContent::Markup(markup.clone()));
            }
            ContentSource::Remote(url) => self.start_fetch(url),
            ContentSource::Fragment(selector) => self.borrow_fragment(selector),
        }
    }

    fn start_fetch(&self, url: &str) {
        let generation = {
            let mut fields = self.inner.fields.borrow_mut();
            fields.fetch_generation += 1;
            fields.fetch_generation
        };
        dom_ok(
            self.inner
                .services
                .document
                .borrow_mut()
                .add_class(self.content_slot(), LOADING_CLASS),
        );

        let weak = self.downgrade();
        let is_current = {
            let weak = weak.clone();
            Rc::new(move || {
                weak.upgrade()
                    .is_some_and(|o| o.inner.fields.borrow().fetch_generation == generation)
            })
        };
        let owned_url = url.to_string();
        let reply = FetchReply::new(
            url,
            self.inner.services.event_loop.clone(),
            is_current,
            Box::new(move |result| {
                if let Some(overlay) = weak.upgrade() {
                    overlay.finish_fetch(&owned_url, result);
                }
            }),
        );

        tracing::debug!("{}#{} fetching {}", self.kind().name(), self.id().id(), url);
        self.inner.services.provider.fetch(url, reply);
    }

    fn finish_fetch(&self, url: &str, result: crate::Result<String>) {
        let slot = self.content_slot();
        match result {
            Ok(markup) => {
                {
                    let mut doc = self.inner.services.document.borrow_mut();
                    dom_ok(doc.set_html(slot, markup.as_str()));
                    dom_ok(doc.remove_class(slot, LOADING_CLASS));
                }
                self.inner.fields.borrow_mut().last_rendered =
                    Some(RenderedContent::Markup(markup));
                tracing::debug!("{}#{} loaded {}", self.kind().name(), self.id().id(), url);
                if self.inner.position_supplied {
                    self.refresh_position();
                }
            }
            Err(err) => {
                dom_ok(
                    self.inner
                        .services
                        .document
                        .borrow_mut()
                        .remove_class(slot, LOADING_CLASS),
                );
                tracing::warn!("{}; keeping previous content", err);
            }
        }
    }

    /// Invalidate any outstanding fetch
    fn cancel_fetch(&self) {
        self.inner.fields.borrow_mut().fetch_generation += 1;
        dom_ok(
            self.inner
                .services
                .document
                .borrow_mut()
                .remove_class(self.content_slot(), LOADING_CLASS),
        );
    }

    fn borrow_fragment(&self, selector: &str) {
        let mut doc = self.inner.services.document.borrow_mut();
        let fragment = match doc.query(selector) {
            Ok(Some(fragment)) => fragment,
            Ok(None) => {
                tracing::debug!("fragment {} not in document; keeping slot content", selector);
                return;
            }
            Err(err) => {
                tracing::warn!("cannot borrow {}: {}", selector, err);
                return;
            }
        };

        let mut fields = self.inner.fields.borrow_mut();
        if fields.borrowed.is_none() {
            fields.borrowed = Some(BorrowRecord {
                original_parent: doc.parent(fragment),
                original_visible: !doc.has_class(fragment, HIDDEN_CLASS),
            });
        }
        dom_ok(doc.remove_class(fragment, HIDDEN_CLASS));
        dom_ok(doc.replace_children(self.content_slot(), fragment));
        fields.last_rendered = Some(RenderedContent::Fragment(fragment));
    }

    /// Put a copy of the borrowed fragment back where it was found
    fn restore_fragment(&self) {
        let Some(ResolvedSource {
            source: ContentSource::Fragment(selector),
            ..
        }) = &self.inner.source
        else {
            return;
        };
        let (fragment, record) = {
            let fields = self.inner.fields.borrow();
            match (&fields.last_rendered, fields.borrowed) {
                (Some(RenderedContent::Fragment(fragment)), Some(record)) => (*fragment, record),
                _ => return,
            }
        };

        let mut doc = self.inner.services.document.borrow_mut();
        match doc.query(selector) {
            Ok(None) => {}
            Ok(Some(_)) => return,
            Err(err) => {
                tracing::warn!("cannot restore {}: {}", selector, err);
                return;
            }
        }

        let Some(copy) = dom_ok(doc.clone_subtree(fragment)) else {
            return;
        };
        let parent = record
            .original_parent
            .filter(|parent| doc.contains(*parent))
            .unwrap_or_else(|| doc.body());
        dom_ok(doc.append_child(parent, copy));
        if !record.original_visible {
            dom_ok(doc.add_class(copy, HIDDEN_CLASS));
        }
        tracing::debug!("restored {} to its original parent", selector);
    }

    // =========================================================================
    // Size & position
    // =========================================================================

    /// Get (`None`) or set a dimension
    ///
    /// Setting applies the value to the container and refreshes the position.
    pub fn size(&self, dimension: Dimension, value: Option<Length>) -> Option<Length> {
        let Some(value) = value else {
            let fields = self.inner.fields.borrow();
            return match dimension {
                Dimension::Width => fields.width.clone(),
                Dimension::Height => fields.height.clone(),
            };
        };

        {
            let mut fields = self.inner.fields.borrow_mut();
            match dimension {
                Dimension::Width => fields.width = Some(value.clone()),
                Dimension::Height => fields.height = Some(value.clone()),
            }
        }
        dom_ok(self.inner.services.document.borrow_mut().set_style(
            self.container(),
            dimension.css_property(),
            value.to_css(),
        ));
        self.refresh_position();
        Some(value)
    }

    pub fn width(&self) -> Option<Length> {
        self.size(Dimension::Width, None)
    }

    pub fn set_width(&self, width: impl Into<Length>) -> &Self {
        self.size(Dimension::Width, Some(width.into()));
        self
    }

    pub fn height(&self) -> Option<Length> {
        self.size(Dimension::Height, None)
    }

    pub fn set_height(&self, height: impl Into<Length>) -> &Self {
        self.size(Dimension::Height, Some(height.into()));
        self
    }

    /// Run the positioning service against the container
    pub fn refresh_position(&self) {
        let mut spec = self.inner.position.clone();
        spec.element = Some(self.container());
        let mut doc = self.inner.services.document.borrow_mut();
        self.inner.services.positioner.position(&mut doc, &spec);
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.inner.fields.borrow();
        f.debug_struct("Overlay")
            .field("id", &self.inner.base.id())
            .field("kind", &self.inner.kind)
            .field("state", &fields.state)
            .field("z_index", &fields.z_index)
            .field("container", &self.inner.layout.container)
            .finish()
    }
}

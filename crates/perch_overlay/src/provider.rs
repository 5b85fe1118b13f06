//! Remote content provider seam
//!
//! Fetching is delegated to a [`ContentProvider`]. The overlay hands it a
//! [`FetchReply`] that is tied to the overlay's current fetch generation:
//! once the overlay hides (or starts a newer fetch) the reply is stale and
//! resolving it does nothing.
//!
//! Replies always complete on the event loop, never re-entrantly inside the
//! provider call.

use std::cell::RefCell;
use std::rc::Rc;

use perch_core::EventLoop;
use rustc_hash::FxHashMap;

use crate::error::{OverlayError, Result};

/// Completion callback carried by a [`FetchReply`]
pub type Deliver = Box<dyn FnOnce(Result<String>)>;

/// One outstanding fetch
pub struct FetchReply {
    url: String,
    event_loop: EventLoop,
    is_current: Rc<dyn Fn() -> bool>,
    deliver: Deliver,
}

impl FetchReply {
    /// Reply that calls `deliver` unless `is_current` says it went stale
    ///
    /// Overlays build these themselves; other widgets fetching through the
    /// same provider use this directly.
    pub fn new(
        url: impl Into<String>,
        event_loop: EventLoop,
        is_current: Rc<dyn Fn() -> bool>,
        deliver: Deliver,
    ) -> Self {
        Self {
            url: url.into(),
            event_loop,
            is_current,
            deliver,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The requesting overlay no longer wants this reply
    ///
    /// Providers may check this to abandon work early.
    pub fn is_cancelled(&self) -> bool {
        !(self.is_current)()
    }

    /// Complete the fetch
    ///
    /// The result is delivered on the next loop turn, and dropped if the
    /// reply has gone stale by then.
    pub fn resolve(self, result: Result<String>) {
        let FetchReply {
            url,
            event_loop,
            is_current,
            deliver,
        } = self;

        event_loop.post(move || {
            if is_current() {
                deliver(result);
            } else {
                tracing::debug!("dropping stale reply for {}", url);
            }
        });
    }
}

impl std::fmt::Debug for FetchReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchReply")
            .field("url", &self.url)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Asynchronous source of remote markup
pub trait ContentProvider {
    /// Start fetching `url`; resolve `reply` when done
    fn fetch(&self, url: &str, reply: FetchReply);
}

// =============================================================================
// Built-in providers
// =============================================================================

/// Provider that fails every request
///
/// The default when nothing better is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableProvider;

impl ContentProvider for UnavailableProvider {
    fn fetch(&self, url: &str, reply: FetchReply) {
        reply.resolve(Err(OverlayError::fetch(url, "no content provider configured")));
    }
}

/// In-memory provider answering from a table after a fixed latency
///
/// Unknown URLs fail with a "not found" fetch error.
pub struct MemoryProvider {
    event_loop: EventLoop,
    latency_ms: u64,
    responses: RefCell<FxHashMap<String, std::result::Result<String, String>>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryProvider {
    pub fn new(event_loop: EventLoop) -> Self {
        Self {
            event_loop,
            latency_ms: 0,
            responses: RefCell::new(FxHashMap::default()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Delay every reply by `latency_ms` of loop time
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Serve `markup` for `url`
    pub fn insert(&self, url: impl Into<String>, markup: impl Into<String>) {
        self.responses
            .borrow_mut()
            .insert(url.into(), Ok(markup.into()));
    }

    /// Fail requests for `url` with `reason`
    pub fn fail(&self, url: impl Into<String>, reason: impl Into<String>) {
        self.responses
            .borrow_mut()
            .insert(url.into(), Err(reason.into()));
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ContentProvider for MemoryProvider {
    fn fetch(&self, url: &str, reply: FetchReply) {
        self.requests.borrow_mut().push(url.to_string());

        let result = match self.responses.borrow().get(url) {
            Some(Ok(markup)) => Ok(markup.clone()),
            Some(Err(reason)) => Err(OverlayError::fetch(url, reason.clone())),
            None => Err(OverlayError::fetch(url, "not found")),
        };

        self.event_loop
            .post_after(self.latency_ms, move || reply.resolve(result));
    }
}

impl std::fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("latency_ms", &self.latency_ms)
            .field("responses", &self.responses.borrow().len())
            .field("requests", &self.requests.borrow().len())
            .finish()
    }
}

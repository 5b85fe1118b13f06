//! Perch Core
//!
//! Foundational pieces shared by every Perch widget:
//!
//! - **Component**: the base capability composed into widgets (event emission,
//!   legacy callbacks, default prevention)
//! - **Events**: the input event model routed through the document
//! - **Ordering**: an injectable z-index service that only ever counts up
//! - **Event Loop**: a single-threaded cooperative scheduler with a virtual clock
//! - **Predicates**: selector / URL classification used by content resolution
//!
//! # Example
//!
//! ```rust
//! use perch_core::{Component, EventLoop, ZOrder};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let zorder = ZOrder::new();
//! let first = zorder.next();
//! assert!(zorder.next() > first);
//!
//! let component = Component::new("tooltip");
//! let fired = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&fired);
//! component.on("show", move |_| counter.set(counter.get() + 1));
//! component.trigger("show");
//! assert_eq!(fired.get(), 1);
//!
//! let event_loop = EventLoop::new();
//! event_loop.post_after(200, || {});
//! event_loop.advance(200);
//! assert!(event_loop.is_idle());
//! ```

pub mod component;
pub mod events;
pub mod fsm;
pub mod scheduler;
pub mod utils;
pub mod zorder;

pub use component::{Component, ComponentId, LegacyCallback, Listener, ListenerId};
pub use events::{EventKind, Key, UiEvent};
pub use fsm::StateTransitions;
pub use scheduler::{EventLoop, Task, TaskId};
pub use utils::{is_selector, is_url};
pub use zorder::ZOrder;

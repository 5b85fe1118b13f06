//! Perch document model
//!
//! A small retained element tree that widgets build into and borrow from:
//!
//! - [`Document`]: slotmap arena of elements with attach/detach/clone
//! - [`Selector`]: compound `tag#id.class` matching for queries
//! - [`EventRouter`]: node- and document-scoped event handlers with bubbling
//!
//! # Example
//!
//! ```rust
//! use perch_dom::{shared_document, HIDDEN_CLASS};
//!
//! let document = shared_document();
//! let mut doc = document.borrow_mut();
//!
//! let panel = doc.create_element("div");
//! doc.set_attr(panel, "id", "help").unwrap();
//! doc.add_class(panel, HIDDEN_CLASS).unwrap();
//! doc.set_html(panel, "<p>Help text</p>").unwrap();
//!
//! let body = doc.body();
//! doc.append_child(body, panel).unwrap();
//!
//! assert_eq!(doc.query("#help").unwrap(), Some(panel));
//! assert!(doc.is_attached(panel));
//! assert!(!doc.is_visible(panel));
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod router;
pub mod selector;

pub use document::{shared_document, Document, SharedDocument, HIDDEN_CLASS};
pub use error::{DomError, Result};
pub use node::{Node, NodeId};
pub use router::{EventRouter, Handler, HandlerId};
pub use selector::Selector;

//! Overlay shell construction
//!
//! Builds the container, optional close button and cone, and the content
//! slot. This happens once per overlay; later show/hide cycles only change
//! contents, classes and size of these nodes.
//!
//! ```text
//! div.perch-<kind>            z-index from the ordering service
//! ├── div.perch-cone          (cone)
//! ├── div.btn.close           (close_button, its own z-index)
//! └── div.perch-<kind>-content
//! ```

use perch_core::ZOrder;
use perch_dom::{Document, NodeId, HIDDEN_CLASS};

use crate::config::{OverlayConfig, OverlayKind};

/// Class of the decorative pointer
pub const CONE_CLASS: &str = "perch-cone";

/// Classes of the close button
pub const CLOSE_CLASSES: &str = "btn close";

/// Nodes making up one overlay's shell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayLayout {
    pub container: NodeId,
    pub content_slot: NodeId,
    pub close_button: Option<NodeId>,
    pub cone: Option<NodeId>,
    /// z-index given to the container at build time
    pub z_index: i32,
}

impl OverlayLayout {
    /// Build the shell, detached and hidden
    pub fn build(
        doc: &mut Document,
        kind: OverlayKind,
        config: &OverlayConfig,
        zorder: &ZOrder,
    ) -> Self {
        let container = doc.create_element("div");
        let z_index = zorder.next();
        // Fresh nodes; these cannot fail.
        let _ = doc.add_class(container, &kind.container_class());
        let _ = doc.add_class(container, HIDDEN_CLASS);
        let _ = doc.set_style(container, "z-index", z_index.to_string());

        if let Some(classes) = &config.classes {
            let _ = doc.add_class(container, classes);
        }
        if let Some(width) = &config.width {
            let _ = doc.set_style(container, "width", width.to_css());
        }
        if let Some(height) = &config.height {
            let _ = doc.set_style(container, "height", height.to_css());
        }

        let close_button = config.close_button.then(|| {
            let button = doc.create_element("div");
            let _ = doc.add_class(button, CLOSE_CLASSES);
            let _ = doc.set_style(button, "z-index", zorder.next().to_string());
            let _ = doc.prepend_child(container, button);
            button
        });

        let cone = config.cone.then(|| {
            let cone = doc.create_element("div");
            let _ = doc.add_class(cone, CONE_CLASS);
            let _ = doc.prepend_child(container, cone);
            cone
        });

        let content_slot = doc.create_element("div");
        let _ = doc.add_class(content_slot, &kind.content_class());
        let _ = doc.append_child(container, content_slot);

        tracing::debug!(
            "built {} layout (close: {}, cone: {})",
            kind.name(),
            close_button.is_some(),
            cone.is_some()
        );

        Self {
            container,
            content_slot,
            close_button,
            cone,
            z_index,
        }
    }
}

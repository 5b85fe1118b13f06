//! Overlay configuration
//!
//! Every optional feature is an explicit field. Absent fields mean "feature
//! not present"; nothing here can make construction fail.
//!
//! Configs are built fluently or loaded from TOML:
//!
//! ```rust
//! use perch_overlay::{Length, OverlayConfig};
//!
//! let config = OverlayConfig::from_toml_str(r#"
//!     message = "Saved!"
//!     classes = "notice wide"
//!     width = 300
//!     close_button = true
//!     fx = false
//! "#).unwrap();
//!
//! assert_eq!(config.message.as_deref(), Some("Saved!"));
//! assert_eq!(config.width, Some(Length::Px(300.0)));
//! assert!(config.close_button);
//! assert!(!config.fx);
//!
//! let same = OverlayConfig::new()
//!     .message("Saved!")
//!     .classes("notice wide")
//!     .width(300)
//!     .close_button(true)
//!     .fx(false);
//! assert_eq!(same.width, config.width);
//! ```

use std::rc::Rc;

use perch_core::LegacyCallback;
use perch_dom::NodeId;
use serde::Deserialize;

use crate::error::Result;

// =============================================================================
// OverlayKind
// =============================================================================

/// Which floating widget an overlay is; drives its class names
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayKind {
    /// Small hint attached to a trigger
    #[default]
    Tooltip,
    /// Floating panel opened from a trigger
    Layer,
    /// Centered dialog over a dimmed page
    Modal,
    /// Inline editor
    EditInPlace,
}

impl OverlayKind {
    pub fn name(&self) -> &'static str {
        match self {
            OverlayKind::Tooltip => "tooltip",
            OverlayKind::Layer => "layer",
            OverlayKind::Modal => "modal",
            OverlayKind::EditInPlace => "edit-in-place",
        }
    }

    /// Class applied to the container
    pub fn container_class(&self) -> String {
        format!("perch-{}", self.name())
    }

    /// Class applied to the content slot
    pub fn content_class(&self) -> String {
        format!("perch-{}-content", self.name())
    }
}

// =============================================================================
// Length
// =============================================================================

/// A width or height value
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Length {
    /// Pixels
    Px(f32),
    /// Raw CSS (`"300px"`, `"50%"`, `"auto"`)
    Css(String),
}

impl Length {
    /// CSS text for the inline style; bare numbers are pixels
    pub fn to_css(&self) -> String {
        match self {
            Length::Px(px) => format!("{}px", px),
            Length::Css(text) => {
                let text = text.trim();
                if text.parse::<f32>().is_ok() {
                    format!("{}px", text)
                } else {
                    text.to_string()
                }
            }
        }
    }
}

impl From<f32> for Length {
    fn from(px: f32) -> Self {
        Length::Px(px)
    }
}

impl From<i32> for Length {
    fn from(px: i32) -> Self {
        Length::Px(px as f32)
    }
}

impl From<&str> for Length {
    fn from(css: &str) -> Self {
        Length::Css(css.to_string())
    }
}

impl From<String> for Length {
    fn from(css: String) -> Self {
        Length::Css(css)
    }
}

/// Which size property to read or write
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn css_property(&self) -> &'static str {
        match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
        }
    }
}

// =============================================================================
// PositionSpec
// =============================================================================

/// Configuration handed verbatim to the positioning service
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionSpec {
    /// The element being placed; filled in with the container once shown
    #[serde(skip)]
    pub element: Option<NodeId>,
    /// Anchor element; defaults to the overlay's trigger
    #[serde(skip)]
    pub context: Option<NodeId>,
    /// Anchor points, e.g. `"lt lb"` (element point, anchor point)
    pub points: Option<String>,
    /// Horizontal offset from the anchor point
    pub offset_x: f32,
    /// Vertical offset from the anchor point
    pub offset_y: f32,
    /// Suppress automatic repositioning
    pub hold: bool,
}

impl PositionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(mut self, points: impl Into<String>) -> Self {
        self.points = Some(points.into());
        self
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn context(mut self, anchor: NodeId) -> Self {
        self.context = Some(anchor);
        self
    }

    pub fn hold(mut self, hold: bool) -> Self {
        self.hold = hold;
        self
    }
}

// =============================================================================
// Effects
// =============================================================================

/// Fade timings used when effects are enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Effects {
    /// Fade-in duration
    pub enter_ms: u64,
    /// Fade-out duration
    pub exit_ms: u64,
}

impl Effects {
    /// The usual "fast" fade
    pub const FAST_MS: u64 = 200;

    pub fn new(enter_ms: u64, exit_ms: u64) -> Self {
        Self { enter_ms, exit_ms }
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(Self::FAST_MS, Self::FAST_MS)
    }
}

// =============================================================================
// OverlayConfig
// =============================================================================

/// Configuration for one overlay instance
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Element that activates the overlay
    #[serde(skip)]
    pub trigger: Option<NodeId>,
    /// Static content: markup, or a selector of an element to borrow
    pub content: Option<String>,
    /// Message text
    #[serde(alias = "msg")]
    pub message: Option<String>,
    /// Remote location to fetch content from
    #[serde(alias = "ajax")]
    pub remote: Option<String>,
    /// Extra classes for the container, space separated
    pub classes: Option<String>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    /// Add a close button and make the overlay respond to Escape
    pub close_button: bool,
    /// Prepend the decorative pointer element
    pub cone: bool,
    /// Animate show/hide
    pub fx: bool,
    /// Fade timings when `fx` is on
    pub effects: Effects,
    /// Positioning configuration; absent means defaults
    pub position: Option<PositionSpec>,
    /// Suppress automatic repositioning
    pub hold: bool,
    /// Legacy `onShow` callback
    #[serde(skip)]
    pub on_show: Option<LegacyCallback>,
    /// Legacy `onHide` callback
    #[serde(skip)]
    pub on_hide: Option<LegacyCallback>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            trigger: None,
            content: None,
            message: None,
            remote: None,
            classes: None,
            width: None,
            height: None,
            close_button: false,
            cone: false,
            fx: true,
            effects: Effects::default(),
            position: None,
            hold: false,
            on_show: None,
            on_hide: None,
        }
    }
}

impl std::fmt::Debug for OverlayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayConfig")
            .field("trigger", &self.trigger)
            .field("content", &self.content)
            .field("message", &self.message)
            .field("remote", &self.remote)
            .field("classes", &self.classes)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("close_button", &self.close_button)
            .field("cone", &self.cone)
            .field("fx", &self.fx)
            .field("effects", &self.effects)
            .field("position", &self.position)
            .field("hold", &self.hold)
            .field("on_show", &self.on_show.is_some())
            .field("on_hide", &self.on_hide.is_some())
            .finish()
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the plain-data fields from TOML
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn trigger(mut self, trigger: NodeId) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn remote(mut self, url: impl Into<String>) -> Self {
        self.remote = Some(url.into());
        self
    }

    pub fn classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    pub fn width(mut self, width: impl Into<Length>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<Length>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn close_button(mut self, close_button: bool) -> Self {
        self.close_button = close_button;
        self
    }

    pub fn cone(mut self, cone: bool) -> Self {
        self.cone = cone;
        self
    }

    pub fn fx(mut self, fx: bool) -> Self {
        self.fx = fx;
        self
    }

    pub fn effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    pub fn position(mut self, position: PositionSpec) -> Self {
        self.position = Some(position);
        self
    }

    pub fn hold(mut self, hold: bool) -> Self {
        self.hold = hold;
        self
    }

    /// Legacy callback run when the overlay becomes visible
    pub fn on_show<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_show = Some(Rc::new(callback));
        self
    }

    /// Legacy callback run when the overlay is hidden
    pub fn on_hide<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_hide = Some(Rc::new(callback));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverlayConfig::default();
        assert!(config.fx);
        assert!(!config.close_button);
        assert!(!config.cone);
        assert!(!config.hold);
        assert!(config.position.is_none());
        assert_eq!(config.effects, Effects::new(200, 200));
    }

    #[test]
    fn test_toml_aliases_and_nested_tables() {
        let config = OverlayConfig::from_toml_str(
            r#"
            msg = "Hi"
            ajax = "/help.html"
            height = "50%"
            hold = true

            [effects]
            enter_ms = 120

            [position]
            points = "lt lb"
            offset_y = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.message.as_deref(), Some("Hi"));
        assert_eq!(config.remote.as_deref(), Some("/help.html"));
        assert_eq!(config.height, Some(Length::Css("50%".into())));
        assert!(config.hold);
        assert!(config.fx);
        assert_eq!(config.effects, Effects::new(120, 200));

        let position = config.position.unwrap();
        assert_eq!(position.points.as_deref(), Some("lt lb"));
        assert_eq!(position.offset_y, 4.0);
        assert_eq!(position.element, None);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = OverlayConfig::from_toml_str("close_button = \"yes\"").unwrap_err();
        assert!(matches!(err, crate::OverlayError::Config(_)));
    }

    #[test]
    fn test_length_css() {
        assert_eq!(Length::from(300).to_css(), "300px");
        assert_eq!(Length::from(12.5f32).to_css(), "12.5px");
        assert_eq!(Length::from("300").to_css(), "300px");
        assert_eq!(Length::from("300px").to_css(), "300px");
        assert_eq!(Length::from("50%").to_css(), "50%");
    }

    #[test]
    fn test_kind_classes() {
        assert_eq!(OverlayKind::Modal.container_class(), "perch-modal");
        assert_eq!(
            OverlayKind::EditInPlace.content_class(),
            "perch-edit-in-place-content"
        );
    }
}

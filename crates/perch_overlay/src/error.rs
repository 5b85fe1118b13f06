//! Overlay error types

use perch_dom::DomError;
use thiserror::Error;

/// Errors surfaced by the overlay subsystem
///
/// Show/hide themselves never fail; these come from configuration parsing,
/// remote content replies and document misuse.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Configuration text could not be parsed
    #[error("Invalid overlay configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Remote content could not be fetched
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Document operation failed
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl OverlayError {
    /// Shorthand for a fetch failure
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

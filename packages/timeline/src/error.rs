//! Typed errors for feed decoding.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep the failure
//! surface strongly typed. Per-item conversion failures are not errors; they
//! drop the item and are only visible as a shorter output list.

use thiserror::Error;

/// Errors that can occur while decoding a significant-events feed.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// The feed contained one or more events but none could be lifted into
    /// the typed model. This signals a structural or version mismatch with
    /// the endpoint, not a partial failure.
    #[error("feed contained events but none could be typed")]
    NoTypedEvents,

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

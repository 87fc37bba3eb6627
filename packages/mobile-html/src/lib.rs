//! Parsoid-to-mobile HTML document transform.
//!
//! Converts a Parsoid HTML article document into a sanitized, restructured
//! document for a constrained mobile webview:
//!
//! - [`transform`] - the two-phase pipeline: a single classification walk
//!   (`prepare`) that queues structural work, then a deferred mutation phase
//!   (`finalize`) that drains the queues in fixed priority order and wraps
//!   the result in the `#pcs` container.
//! - [`legacy`] - adapter that synthesizes a Parsoid-shaped document from
//!   the older MobileView / MobileSections JSON payloads, so the same
//!   pipeline runs on every source format.
//! - [`dom`] - helpers over the `rcdom` tree shared by both.
//!
//! The transform mutates the document in place and is fully synchronous;
//! one pipeline value owns its queues for exactly one document.

pub mod dom;
pub mod error;
pub mod legacy;
pub mod metadata;
pub mod transform;

pub use error::TransformError;
pub use metadata::{LeadImage, PageMetadata};
pub use transform::{transform, transform_to_string, DocumentTransform};

//! Feed model - raw serde shapes and the typed event model.
//!
//! The endpoint's timeline records are loosely structured: which fields are
//! present depends on the record's `outputType` tag, and historical feeds
//! vary. Decoding happens in two steps:
//!
//! 1. [`raw`] deserializes the feed as-is, with every per-event field
//!    optional.
//! 2. [`event`] / [`template`] lift raw records into closed enums with the
//!    fields each variant actually requires. Lifting a record is fallible
//!    and soft: a record missing required fields is dropped.
//!
//! The only hard failure is the whole-feed invariant: events in, none typed
//! out means the feed shape is not what this model understands.

pub mod event;
pub mod raw;
pub mod template;

pub use event::{
    AddedText, DeletedText, LargeChange, NewTalkPageTopic, NewTemplates, SmallChange, TypedChange,
    TypedEvent, VandalismRevert,
};
pub use raw::{EventOutputType, RawChange, RawEvent, RawFeed, SnippetType, Summary};
pub use template::{
    ArticleDescription, BookCitation, JournalCitation, NewsCitation, Template, WebsiteCitation,
};

use tracing::debug;

use crate::error::TimelineError;

/// A fully decoded significant-events feed: pagination cursor, summary
/// block, and the typed event timeline in original feed order.
#[derive(Debug, Clone)]
pub struct SignificantEvents {
    /// Pagination cursor for the next page, if any
    pub next_rv_start_id: Option<u64>,
    /// Content hash supplied by the endpoint, if any
    pub sha: Option<String>,
    /// Aggregate summary block
    pub summary: Summary,
    /// Typed events, in the feed's original (chronological) order
    pub events: Vec<TypedEvent>,
}

impl SignificantEvents {
    /// Decode a feed from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let raw: RawFeed = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Lift an already-deserialized raw feed into the typed model.
    ///
    /// Zero raw events is valid (the caller has paged past the end) and
    /// yields an empty event list. One or more raw events with zero typed
    /// results is a structural mismatch and fails the whole feed.
    pub fn from_raw(raw: RawFeed) -> Result<Self, TimelineError> {
        let raw_count = raw.events.len();
        let mut events = Vec::with_capacity(raw_count);

        for raw_event in &raw.events {
            match TypedEvent::from_raw(raw_event) {
                Some(event) => events.push(event),
                None => {
                    debug!(output_type = ?raw_event.output_type, "dropping untypable event");
                }
            }
        }

        if events.is_empty() && raw_count > 0 {
            return Err(TimelineError::NoTypedEvents);
        }

        Ok(Self {
            next_rv_start_id: raw.next_rv_start_id,
            sha: raw.sha,
            summary: raw.summary,
            events,
        })
    }
}

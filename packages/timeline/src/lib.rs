//! Typed decoding and display derivation for article significant-events feeds.
//!
//! The significant-events endpoint returns a loosely-structured JSON timeline
//! of revision activity for an article. This crate lifts that feed into a
//! closed typed model and derives display-ready content from it:
//!
//! - [`models`] - raw feed shapes (serde) and the typed event/change/template
//!   model, with partial-failure-tolerant lifting
//! - [`view`] - day-grouped timeline sections, small-edit collapsing, and
//!   per-event display derivation (descriptions, detail cards, layout
//!   heights, user attribution)
//!
//! Decoding is all-or-nothing at the feed level (a feed with events where
//! none can be typed is a structural error) but best-effort per item: a
//! single malformed event, change, or template is dropped, never surfaced.
//!
//! All calendar math is UTC. Anything relative to "now" takes an explicit
//! `DateTime<Utc>` so callers (and tests) control the clock.

pub mod error;
pub mod models;
pub mod view;

pub use error::TimelineError;
pub use models::{
    AddedText, DeletedText, LargeChange, NewTalkPageTopic, NewTemplates, SignificantEvents,
    SmallChange, SnippetType, Summary, Template, TypedChange, TypedEvent, VandalismRevert,
};
pub use view::{
    ChangeDetail, LargeEvent, LargeEventKind, RenderContext, SectionHeader, SmallEvent, Theme,
    TimelineEvent, TimelineViewModel, UserType,
};

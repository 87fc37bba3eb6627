//! Display derivation - day-grouped sections and per-event content.
//!
//! The view layer turns the typed event list into what a timeline screen
//! renders:
//! - [`section`] - calendar-day grouping (UTC), small-edit collapsing
//! - [`event`] - per-event derived content: descriptions, detail cards,
//!   layout heights, user attribution
//! - [`context`] - the opaque rendering context (text scale + theme) and
//!   the single-slot caches keyed on it
//! - [`strings`] - display string templates and date/number formatting
//! - [`layout`] - deterministic text-metrics approximation for card heights
//!
//! Derivation functions only exist on the variants that support them: small
//! events cannot reach large-event code paths by construction.

pub mod builder;
pub mod context;
pub mod event;
pub mod layout;
pub mod section;
pub mod strings;

pub use builder::TimelineViewModel;
pub use context::{ContextCache, RenderContext, Theme};
pub use event::{
    ButtonsToDisplay, ChangeDetail, LargeEvent, LargeEventKind, Reference, SmallEvent, Snippet,
    TimelineEvent, UserType,
};
pub use section::SectionHeader;

//! Raw feed shapes, deserialized as the endpoint sends them.
//!
//! Every per-event field is optional here; the typed constructors in
//! [`super::event`] decide what each output type actually requires.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::HashMap;

/// The significant-events feed as returned by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeed {
    /// Pagination cursor, absent on the last page
    #[serde(rename = "nextRvStartId", default)]
    pub next_rv_start_id: Option<u64>,
    #[serde(default)]
    pub sha: Option<String>,
    pub summary: Summary,
    #[serde(rename = "timeline", default)]
    pub events: Vec<RawEvent>,
}

/// Aggregate summary of the covered revision range.
#[derive(Debug, Clone, Deserialize)]
pub struct Summary {
    #[serde(rename = "earliestTimestamp")]
    pub earliest_timestamp: String,
    #[serde(rename = "numChanges")]
    pub num_changes: u64,
    #[serde(rename = "numUsers")]
    pub num_users: u64,
}

/// Declared output type of a timeline record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventOutputType {
    #[serde(rename = "large-change")]
    Large,
    #[serde(rename = "small-change")]
    Small,
    #[serde(rename = "new-talk-page-topic")]
    NewTalkPageTopic,
    #[serde(rename = "vandalism-revert")]
    VandalismRevert,
}

/// Declared output type of a significant change within a large event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChangeOutputType {
    #[serde(rename = "added-text")]
    AddedText,
    #[serde(rename = "deleted-text")]
    DeletedText,
    #[serde(rename = "new-template")]
    NewTemplate,
}

/// How an added-text snippet relates to the diff line it came from.
///
/// The endpoint encodes this as a sparse integer tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetType {
    AddedLine,
    AddedAndDeletedInLine,
    AddedAndDeletedInMovedLine,
}

impl<'de> Deserialize<'de> for SnippetType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            1 => Ok(SnippetType::AddedLine),
            3 => Ok(SnippetType::AddedAndDeletedInLine),
            5 => Ok(SnippetType::AddedAndDeletedInMovedLine),
            other => Err(de::Error::custom(format!(
                "unknown snippet type tag: {other}"
            ))),
        }
    }
}

/// One undifferentiated timeline record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "outputType")]
    pub output_type: EventOutputType,
    #[serde(rename = "revid", default)]
    pub rev_id: Option<u64>,
    #[serde(rename = "parentid", default)]
    pub parent_id: Option<u64>,
    #[serde(rename = "timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(rename = "userid", default)]
    pub user_id: Option<u64>,
    #[serde(rename = "userGroups", default)]
    pub user_groups: Option<Vec<String>>,
    #[serde(rename = "userEditCount", default)]
    pub user_edit_count: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub sections: Option<Vec<String>>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(rename = "significantChanges", default)]
    pub changes: Option<Vec<RawChange>>,
}

/// One undifferentiated change record inside a large event.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChange {
    #[serde(rename = "outputType")]
    pub output_type: ChangeOutputType,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(rename = "snippetType", default)]
    pub snippet_type: Option<SnippetType>,
    #[serde(rename = "characterCount", default)]
    pub character_count: Option<u64>,
    /// Template parameter dictionaries, keyed by raw parameter name
    #[serde(rename = "templates", default)]
    pub templates: Option<Vec<HashMap<String, String>>>,
}

//! Typed events and changes, lifted from raw timeline records.
//!
//! Each variant's constructor takes the raw record and returns `None` when a
//! field that output type requires is missing. A `Large` event additionally
//! requires every nested change to convert; one failed change drops the
//! whole event (a count mismatch between raw and typed change lists is the
//! failure signal).

use tracing::debug;

use super::raw::{ChangeOutputType, EventOutputType, RawChange, RawEvent, SnippetType};
use super::template::Template;

/// A timeline event the feed could be lifted into.
#[derive(Debug, Clone)]
pub enum TypedEvent {
    Large(LargeChange),
    Small(SmallChange),
    VandalismRevert(VandalismRevert),
    NewTalkPageTopic(NewTalkPageTopic),
}

impl TypedEvent {
    /// Lift one raw record, dispatching on its declared output type.
    pub fn from_raw(raw: &RawEvent) -> Option<TypedEvent> {
        match raw.output_type {
            EventOutputType::Large => LargeChange::from_raw(raw).map(TypedEvent::Large),
            EventOutputType::Small => SmallChange::from_raw(raw).map(TypedEvent::Small),
            EventOutputType::VandalismRevert => {
                VandalismRevert::from_raw(raw).map(TypedEvent::VandalismRevert)
            }
            EventOutputType::NewTalkPageTopic => {
                NewTalkPageTopic::from_raw(raw).map(TypedEvent::NewTalkPageTopic)
            }
        }
    }

    /// The event's ISO-8601 timestamp string.
    pub fn timestamp(&self) -> &str {
        match self {
            TypedEvent::Large(e) => &e.timestamp,
            TypedEvent::Small(e) => &e.timestamp,
            TypedEvent::VandalismRevert(e) => &e.timestamp,
            TypedEvent::NewTalkPageTopic(e) => &e.timestamp,
        }
    }
}

/// An edit large enough to describe change-by-change.
#[derive(Debug, Clone)]
pub struct LargeChange {
    pub rev_id: u64,
    pub parent_id: u64,
    pub timestamp: String,
    pub user: String,
    pub user_id: u64,
    pub user_groups: Option<Vec<String>>,
    pub user_edit_count: Option<u64>,
    pub changes: Vec<TypedChange>,
}

impl LargeChange {
    fn from_raw(raw: &RawEvent) -> Option<Self> {
        let rev_id = raw.rev_id?;
        let parent_id = raw.parent_id?;
        let timestamp = raw.timestamp.clone()?;
        let user = raw.user.clone()?;
        let user_id = raw.user_id?;
        let raw_changes = raw.changes.as_ref()?;

        let changes: Vec<TypedChange> = raw_changes
            .iter()
            .filter_map(TypedChange::from_raw)
            .collect();

        // One untypable nested change invalidates the whole event.
        if changes.len() != raw_changes.len() {
            debug!(rev_id, "dropping large change with untypable nested change");
            return None;
        }

        Some(Self {
            rev_id,
            parent_id,
            timestamp,
            user,
            user_id,
            user_groups: raw.user_groups.clone(),
            user_edit_count: raw.user_edit_count,
            changes,
        })
    }
}

/// An edit below the significance threshold; carried only for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallChange {
    pub rev_id: u64,
    pub parent_id: u64,
    pub timestamp: String,
}

impl SmallChange {
    fn from_raw(raw: &RawEvent) -> Option<Self> {
        Some(Self {
            rev_id: raw.rev_id?,
            parent_id: raw.parent_id?,
            timestamp: raw.timestamp.clone()?,
        })
    }
}

/// A revert of suspected vandalism.
#[derive(Debug, Clone)]
pub struct VandalismRevert {
    pub rev_id: u64,
    pub parent_id: u64,
    pub timestamp: String,
    pub user: String,
    pub user_id: u64,
    pub sections: Vec<String>,
    pub user_groups: Option<Vec<String>>,
    pub user_edit_count: Option<u64>,
}

impl VandalismRevert {
    fn from_raw(raw: &RawEvent) -> Option<Self> {
        Some(Self {
            rev_id: raw.rev_id?,
            parent_id: raw.parent_id?,
            timestamp: raw.timestamp.clone()?,
            user: raw.user.clone()?,
            user_id: raw.user_id?,
            sections: raw.sections.clone()?,
            user_groups: raw.user_groups.clone(),
            user_edit_count: raw.user_edit_count,
        })
    }
}

/// A new topic opened on the article's talk page.
#[derive(Debug, Clone)]
pub struct NewTalkPageTopic {
    pub rev_id: u64,
    pub parent_id: u64,
    pub timestamp: String,
    pub user: String,
    pub user_id: u64,
    pub section: Option<String>,
    pub snippet: String,
    pub user_groups: Option<Vec<String>>,
    pub user_edit_count: Option<u64>,
}

impl NewTalkPageTopic {
    fn from_raw(raw: &RawEvent) -> Option<Self> {
        Some(Self {
            rev_id: raw.rev_id?,
            parent_id: raw.parent_id?,
            timestamp: raw.timestamp.clone()?,
            user: raw.user.clone()?,
            user_id: raw.user_id?,
            section: raw.section.clone(),
            snippet: raw.snippet.clone()?,
            user_groups: raw.user_groups.clone(),
            user_edit_count: raw.user_edit_count,
        })
    }
}

/// A significant change carried by a [`LargeChange`].
#[derive(Debug, Clone)]
pub enum TypedChange {
    AddedText(AddedText),
    DeletedText(DeletedText),
    NewTemplate(NewTemplates),
}

impl TypedChange {
    fn from_raw(raw: &RawChange) -> Option<TypedChange> {
        match raw.output_type {
            ChangeOutputType::AddedText => AddedText::from_raw(raw).map(TypedChange::AddedText),
            ChangeOutputType::DeletedText => {
                DeletedText::from_raw(raw).map(TypedChange::DeletedText)
            }
            ChangeOutputType::NewTemplate => {
                NewTemplates::from_raw(raw).map(TypedChange::NewTemplate)
            }
        }
    }

    /// Section names this change touched.
    pub fn sections(&self) -> &[String] {
        match self {
            TypedChange::AddedText(c) => &c.sections,
            TypedChange::DeletedText(c) => &c.sections,
            TypedChange::NewTemplate(c) => &c.sections,
        }
    }
}

/// Prose added to the article.
#[derive(Debug, Clone)]
pub struct AddedText {
    pub sections: Vec<String>,
    pub snippet: Option<String>,
    pub snippet_type: SnippetType,
    pub character_count: u64,
}

impl AddedText {
    fn from_raw(raw: &RawChange) -> Option<Self> {
        Some(Self {
            sections: raw.sections.clone(),
            snippet: raw.snippet.clone(),
            snippet_type: raw.snippet_type?,
            character_count: raw.character_count?,
        })
    }
}

/// Prose removed from the article.
#[derive(Debug, Clone)]
pub struct DeletedText {
    pub sections: Vec<String>,
    pub character_count: u64,
}

impl DeletedText {
    fn from_raw(raw: &RawChange) -> Option<Self> {
        Some(Self {
            sections: raw.sections.clone(),
            character_count: raw.character_count?,
        })
    }
}

/// Templates added in one change, parsed best-effort.
///
/// Unlike missing required fields, an unrecognized or malformed template is
/// not a conversion failure; it is simply absent from `templates`.
#[derive(Debug, Clone)]
pub struct NewTemplates {
    pub sections: Vec<String>,
    pub templates: Vec<Template>,
}

impl NewTemplates {
    fn from_raw(raw: &RawChange) -> Option<Self> {
        let raw_templates = raw.templates.as_ref()?;
        let templates = raw_templates
            .iter()
            .filter_map(Template::from_raw)
            .collect();

        Some(Self {
            sections: raw.sections.clone(),
            templates,
        })
    }
}

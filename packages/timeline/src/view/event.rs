//! Per-event display derivation.
//!
//! A [`TimelineEvent`] wraps a typed feed event with everything a timeline
//! screen derives from it: the one-line description, the side-scrolling
//! detail cards, the estimated card height, and the user attribution line.
//! Context-dependent derivations are cached per event against the last seen
//! [`RenderContext`]; asking again under the same context returns the cached
//! value.
//!
//! Small events never carry detail cards or attribution, so those methods
//! only exist on [`LargeEvent`].

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{
    LargeChange, NewTalkPageTopic, SmallChange, Template, TypedChange, TypedEvent, VandalismRevert,
};

use super::context::{ContextCache, RenderContext};
use super::{layout, strings};

/// One renderable timeline entry.
#[derive(Debug)]
pub enum TimelineEvent {
    Small(SmallEvent),
    Large(Box<LargeEvent>),
}

impl TimelineEvent {
    /// Lift a typed feed event into its display form.
    ///
    /// Returns `None` (with a debug log) when the event's timestamp does not
    /// parse as ISO-8601; an event with no position on the timeline cannot be
    /// displayed.
    pub fn from_typed(event: TypedEvent) -> Option<TimelineEvent> {
        let timestamp = match DateTime::parse_from_rfc3339(event.timestamp()) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(error) => {
                debug!(timestamp = event.timestamp(), %error, "dropping event with unparsable timestamp");
                return None;
            }
        };

        Some(match event {
            TypedEvent::Small(change) => TimelineEvent::Small(SmallEvent {
                changes: vec![change],
                timestamp,
            }),
            TypedEvent::Large(change) => {
                TimelineEvent::Large(Box::new(LargeEvent::from_large_change(change, timestamp)))
            }
            TypedEvent::VandalismRevert(revert) => {
                TimelineEvent::Large(Box::new(LargeEvent::from_vandalism_revert(revert, timestamp)))
            }
            TypedEvent::NewTalkPageTopic(topic) => {
                TimelineEvent::Large(Box::new(LargeEvent::from_talk_page_topic(topic, timestamp)))
            }
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            TimelineEvent::Small(event) => event.timestamp,
            TimelineEvent::Large(event) => event.timestamp,
        }
    }

    pub fn is_small(&self) -> bool {
        matches!(self, TimelineEvent::Small(_))
    }
}

/// One or more collapsed small edits, displayed as a single row.
#[derive(Debug)]
pub struct SmallEvent {
    pub changes: Vec<SmallChange>,
    /// Timestamp of the first (most recent) collapsed change.
    pub timestamp: DateTime<Utc>,
}

impl SmallEvent {
    pub fn event_description(&self) -> String {
        strings::small_change_description(self.changes.len())
    }

    /// Relative within the current UTC day, wall-clock time otherwise.
    pub fn display_timestamp(&self, now: DateTime<Utc>) -> String {
        display_timestamp(self.timestamp, now)
    }
}

/// What distinguishes the three large-row shapes from each other.
#[derive(Debug)]
pub enum LargeEventKind {
    LargeChange { changes: Vec<TypedChange> },
    VandalismRevert { sections: Vec<String> },
    NewTalkPageTopic { section: Option<String>, snippet: String },
}

/// How the editing user is attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Standard,
    Anonymous,
    Bot,
}

/// Which action buttons the row offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonsToDisplay {
    ThankAndViewChanges { user_id: u64, revision_id: u64 },
    ViewDiscussion { section_name: Option<String> },
}

/// A snippet card in the side-scrolling detail strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
}

/// A reference card in the side-scrolling detail strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// "New book reference", "New website reference", ...
    pub type_title: String,
    /// Assembled plain-text citation.
    pub description: String,
    /// Year parsed out of the citation's access date, when present.
    pub access_date_year: Option<String>,
}

/// One card in the side-scrolling detail strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeDetail {
    Snippet(Snippet),
    Reference(Reference),
}

/// A fully-attributed event row: large edit, vandalism revert, or new talk
/// page topic.
#[derive(Debug)]
pub struct LargeEvent {
    pub kind: LargeEventKind,
    pub timestamp: DateTime<Utc>,
    pub rev_id: u64,
    pub parent_id: u64,
    pub user: String,
    pub user_id: u64,
    pub user_type: UserType,
    pub user_edit_count: Option<u64>,
    pub buttons: ButtonsToDisplay,
    description: ContextCache<String>,
    details: ContextCache<Vec<ChangeDetail>>,
    height: ContextCache<f32>,
    user_info: ContextCache<String>,
}

impl LargeEvent {
    fn from_large_change(change: LargeChange, timestamp: DateTime<Utc>) -> Self {
        let user_type = user_type(change.user_id, change.user_groups.as_deref());
        Self {
            kind: LargeEventKind::LargeChange {
                changes: change.changes,
            },
            timestamp,
            rev_id: change.rev_id,
            parent_id: change.parent_id,
            buttons: ButtonsToDisplay::ThankAndViewChanges {
                user_id: change.user_id,
                revision_id: change.rev_id,
            },
            user: change.user,
            user_id: change.user_id,
            user_type,
            user_edit_count: change.user_edit_count,
            description: ContextCache::default(),
            details: ContextCache::default(),
            height: ContextCache::default(),
            user_info: ContextCache::default(),
        }
    }

    fn from_vandalism_revert(revert: VandalismRevert, timestamp: DateTime<Utc>) -> Self {
        let user_type = user_type(revert.user_id, revert.user_groups.as_deref());
        Self {
            kind: LargeEventKind::VandalismRevert {
                sections: revert.sections,
            },
            timestamp,
            rev_id: revert.rev_id,
            parent_id: revert.parent_id,
            buttons: ButtonsToDisplay::ThankAndViewChanges {
                user_id: revert.user_id,
                revision_id: revert.rev_id,
            },
            user: revert.user,
            user_id: revert.user_id,
            user_type,
            user_edit_count: revert.user_edit_count,
            description: ContextCache::default(),
            details: ContextCache::default(),
            height: ContextCache::default(),
            user_info: ContextCache::default(),
        }
    }

    fn from_talk_page_topic(topic: NewTalkPageTopic, timestamp: DateTime<Utc>) -> Self {
        let user_type = user_type(topic.user_id, topic.user_groups.as_deref());
        Self {
            buttons: ButtonsToDisplay::ViewDiscussion {
                section_name: topic.section.as_deref().map(strip_section_title),
            },
            kind: LargeEventKind::NewTalkPageTopic {
                section: topic.section,
                snippet: topic.snippet,
            },
            timestamp,
            rev_id: topic.rev_id,
            parent_id: topic.parent_id,
            user: topic.user,
            user_id: topic.user_id,
            user_type,
            user_edit_count: topic.user_edit_count,
            description: ContextCache::default(),
            details: ContextCache::default(),
            height: ContextCache::default(),
            user_info: ContextCache::default(),
        }
    }

    /// Section names this event touched, order-preserving and deduplicated,
    /// with wikitext heading markers and HTML stripped.
    pub fn sections_set(&self) -> Vec<String> {
        let raw: Vec<&str> = match &self.kind {
            LargeEventKind::LargeChange { changes } => changes
                .iter()
                .flat_map(|change| change.sections().iter().map(String::as_str))
                .collect(),
            LargeEventKind::VandalismRevert { sections } => {
                sections.iter().map(String::as_str).collect()
            }
            LargeEventKind::NewTalkPageTopic { section, .. } => {
                section.iter().map(String::as_str).collect()
            }
        };

        let mut seen = Vec::new();
        for title in raw {
            let stripped = strip_section_title(title);
            if !stripped.is_empty() && !seen.contains(&stripped) {
                seen.push(stripped);
            }
        }
        seen
    }

    /// One-line event description, cached per context.
    ///
    /// A large edit whose merged description comes out empty stays empty;
    /// that only happens for degenerate change lists and is logged.
    pub fn event_description(&mut self, ctx: RenderContext) -> String {
        let kind = &self.kind;
        let sections = self.sections_set();
        let rev_id = self.rev_id;
        self.description.get_or_insert_with(ctx, || {
            let base = match kind {
                LargeEventKind::NewTalkPageTopic { .. } => {
                    return strings::NEW_TALK_TOPIC_DESCRIPTION.to_string();
                }
                LargeEventKind::VandalismRevert { .. } => {
                    strings::VANDALISM_REVERT_DESCRIPTION.to_string()
                }
                LargeEventKind::LargeChange { changes } => {
                    let merged = strings::join_descriptions(&individual_descriptions(changes));
                    if merged.is_empty() {
                        debug!(rev_id, "large change produced no description");
                        return merged;
                    }
                    merged
                }
            };
            match strings::section_phrase(&sections) {
                Some(phrase) => format!("{base}{phrase}"),
                None => base,
            }
        })
    }

    /// [`event_description`](Self::event_description) with section names
    /// italicized, for HTML surfaces. Not cached.
    ///
    /// Only the trailing section phrase is rewritten; a section name that
    /// also happens to appear in the body of the description stays plain.
    pub fn event_description_html(&mut self, ctx: RenderContext) -> String {
        let description = self.event_description(ctx);
        let sections = self.sections_set();
        let Some(phrase) = strings::section_phrase(&sections) else {
            return description;
        };
        let Some(prefix) = description.strip_suffix(phrase.as_str()) else {
            return description;
        };
        let mut html_phrase = phrase;
        for section in &sections {
            html_phrase = html_phrase.replace(section.as_str(), &format!("<i>{section}</i>"));
        }
        format!("{prefix}{html_phrase}")
    }

    /// Side-scrolling detail cards, cached per context.
    pub fn change_details(&mut self, ctx: RenderContext) -> Vec<ChangeDetail> {
        let kind = &self.kind;
        self.details.get_or_insert_with(ctx, || match kind {
            LargeEventKind::NewTalkPageTopic { snippet, .. } => {
                vec![ChangeDetail::Snippet(Snippet {
                    text: snippet.clone(),
                })]
            }
            LargeEventKind::VandalismRevert { .. } => Vec::new(),
            LargeEventKind::LargeChange { changes } => {
                let mut details = Vec::new();
                for change in changes {
                    match change {
                        TypedChange::AddedText(added) => {
                            if let Some(snippet) = &added.snippet {
                                details.push(ChangeDetail::Snippet(Snippet {
                                    text: snippet.clone(),
                                }));
                            }
                        }
                        // Deleted text has nothing left to show.
                        TypedChange::DeletedText(_) => {}
                        TypedChange::NewTemplate(new_templates) => {
                            for template in &new_templates.templates {
                                details.push(change_detail_for_template(template));
                            }
                        }
                    }
                }
                details
            }
        })
    }

    /// Estimated height of the side-scrolling strip, cached per context.
    ///
    /// Zero when there are no detail cards. Snippet cards are capped at
    /// three lines of text, unless a reference card is present, in which
    /// case the tallest reference sets the cap.
    pub fn side_scrolling_height(&mut self, ctx: RenderContext) -> f32 {
        let details = self.change_details(ctx);
        self.height
            .get_or_insert_with(ctx, || strip_height(&details, ctx))
    }

    /// "Edited by ..." attribution line, cached per context.
    pub fn user_info(&mut self, ctx: RenderContext) -> String {
        let user = self.user.clone();
        let user_type = self.user_type;
        let edit_count = self.user_edit_count;
        self.user_info.get_or_insert_with(ctx, || match user_type {
            UserType::Standard => strings::user_info_standard(&user, edit_count),
            UserType::Bot => strings::user_info_bot(&user),
            UserType::Anonymous => strings::user_info_anonymous(),
        })
    }

    /// Attribution line with the user name linked to their user page.
    /// Not cached; only the article-insert snippet consumes it.
    pub fn user_info_html(&self) -> String {
        let link = format!("<a href='./User:{0}'>{0}</a>", self.user);
        match self.user_type {
            UserType::Standard => strings::user_info_standard(&link, self.user_edit_count),
            UserType::Bot => strings::user_info_bot(&link),
            UserType::Anonymous => strings::user_info_anonymous(),
        }
    }

    /// Relative within the current UTC day, wall-clock time otherwise.
    pub fn display_timestamp(&self, now: DateTime<Utc>) -> String {
        display_timestamp(self.timestamp, now)
    }

    /// One `<li>` for injecting a recent-changes teaser into article HTML.
    ///
    /// The first injected item carries a distinct id so styling can anchor
    /// on it. Returns `None` when the event has no description to show.
    pub fn article_insert_snippet(
        &mut self,
        ctx: RenderContext,
        now: DateTime<Utc>,
        is_first: bool,
    ) -> Option<String> {
        let description = self.event_description_html(ctx);
        if description.is_empty() {
            return None;
        }
        let id = if is_first {
            "significant-changes-first-list"
        } else {
            "significant-changes-list"
        };
        Some(format!(
            "<li id='{id}'><p id='significant-changes-timestamp'>{}</p>\
             <p id='significant-changes-description'>{description}</p>\
             <p id='significant-changes-userInfo'>{}</p></li>",
            strings::relative_timestamp(self.timestamp, now),
            self.user_info_html(),
        ))
    }
}

fn display_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if timestamp.date_naive() == now.date_naive() {
        strings::relative_timestamp(timestamp, now)
    } else {
        strings::short_time_utc(timestamp)
    }
}

fn user_type(user_id: u64, user_groups: Option<&[String]>) -> UserType {
    let is_bot = user_groups
        .map(|groups| groups.iter().any(|group| group == "bot"))
        .unwrap_or(false);
    if is_bot {
        UserType::Bot
    } else if user_id == 0 {
        UserType::Anonymous
    } else {
        UserType::Standard
    }
}

/// Strip wikitext heading markers (`== Title ==`) and HTML from a section
/// title.
pub fn strip_section_title(title: &str) -> String {
    let mut text = layout::strip_html(title);
    loop {
        let trimmed = text
            .trim()
            .trim_start_matches('=')
            .trim_end_matches('=')
            .trim()
            .to_string();
        if trimmed == text {
            break;
        }
        text = trimmed;
    }
    text
}

// Description priority: references first, then added text, deleted text,
// article description.
const PRIORITY_REFERENCES: u8 = 0;
const PRIORITY_ADDED_TEXT: u8 = 1;
const PRIORITY_DELETED_TEXT: u8 = 2;
const PRIORITY_ARTICLE_DESCRIPTION: u8 = 3;

/// One sentence per change kind, ordered by display priority.
fn individual_descriptions(changes: &[TypedChange]) -> Vec<String> {
    let mut prioritized: Vec<(u8, String)> = Vec::new();
    let mut reference_count = 0usize;

    for change in changes {
        match change {
            TypedChange::AddedText(added) => prioritized.push((
                PRIORITY_ADDED_TEXT,
                strings::added_text_description(added.character_count),
            )),
            TypedChange::DeletedText(deleted) => prioritized.push((
                PRIORITY_DELETED_TEXT,
                strings::deleted_text_description(deleted.character_count),
            )),
            TypedChange::NewTemplate(new_templates) => {
                let citations = new_templates
                    .templates
                    .iter()
                    .filter(|t| t.is_citation())
                    .count();
                reference_count += citations;
                if new_templates
                    .templates
                    .iter()
                    .any(|t| matches!(t, Template::ArticleDescription(_)))
                {
                    prioritized.push((
                        PRIORITY_ARTICLE_DESCRIPTION,
                        strings::ARTICLE_DESCRIPTION_UPDATED.to_string(),
                    ));
                }
            }
        }
    }

    if reference_count > 0 {
        let description = if prioritized.is_empty() {
            if reference_count == 1 {
                strings::SINGLE_REFERENCE_ADDED.to_string()
            } else {
                strings::MULTIPLE_REFERENCES_ADDED.to_string()
            }
        } else {
            strings::references_added_description(reference_count)
        };
        prioritized.push((PRIORITY_REFERENCES, description));
    }

    prioritized.sort_by_key(|(priority, _)| *priority);
    prioritized.into_iter().map(|(_, text)| text).collect()
}

fn change_detail_for_template(template: &Template) -> ChangeDetail {
    match template {
        Template::ArticleDescription(description) => ChangeDetail::Snippet(Snippet {
            text: description.text.clone(),
        }),
        Template::Book(book) => {
            let mut text = String::new();
            if let Some(last) = &book.last_name {
                text.push_str(last);
                if let Some(first) = &book.first_name {
                    text.push_str(", ");
                    text.push_str(first);
                }
                if let Some(year) = &book.year_published {
                    text.push_str(&format!(" ({year})"));
                }
                text.push_str(". ");
            }
            text.push_str(&book.title);
            text.push_str(". ");
            match (&book.location_published, &book.publisher) {
                (Some(location), Some(publisher)) => {
                    text.push_str(&format!("{location}: {publisher}. "));
                }
                (None, Some(publisher)) => text.push_str(&format!("{publisher}. ")),
                (Some(location), None) => text.push_str(&format!("{location}. ")),
                (None, None) => {}
            }
            if let Some(pages) = &book.pages_cited {
                text.push_str(&format!("pp. {pages} "));
            }
            if let Some(isbn) = &book.isbn {
                text.push_str(&format!("ISBN: {isbn}"));
            }
            ChangeDetail::Reference(Reference {
                type_title: strings::BOOK_REFERENCE_TITLE.to_string(),
                description: text.trim_end().to_string(),
                access_date_year: None,
            })
        }
        Template::Journal(journal) => {
            let mut text = String::new();
            if let Some(last) = &journal.last_name {
                text.push_str(last);
                if let Some(first) = &journal.first_name {
                    text.push_str(", ");
                    text.push_str(first);
                }
                if let Some(date) = &journal.source_date {
                    text.push_str(&format!(" ({date})"));
                }
                text.push_str(". ");
            }
            text.push_str(&format!("\"{}\" ", journal.title));
            text.push_str(&journal.journal);
            text.push_str(". ");
            if let Some(volume) = &journal.volume_number {
                text.push_str(&strings::journal_volume(volume));
            }
            if let Some(pages) = &journal.pages {
                text.push_str(&format!("pp. {pages} "));
            }
            if let Some(database) = &journal.database {
                text.push_str(&strings::journal_database(database));
            }
            ChangeDetail::Reference(Reference {
                type_title: strings::JOURNAL_REFERENCE_TITLE.to_string(),
                description: text.trim_end().to_string(),
                access_date_year: None,
            })
        }
        Template::News(news) => {
            let mut text = String::new();
            if let Some(last) = &news.last_name {
                text.push_str(last);
                if let Some(first) = &news.first_name {
                    text.push_str(", ");
                    text.push_str(first);
                }
                if let Some(date) = &news.source_date {
                    text.push_str(&format!(" ({date})"));
                }
                text.push_str(". ");
            }
            text.push_str(&format!("\"{}\" ", news.title));
            if let Some(publication) = &news.publication {
                text.push_str(&format!("{publication}. "));
            }
            if let Some(access_date) = &news.access_date {
                text.push_str(&strings::retrieved_date(access_date));
            }
            ChangeDetail::Reference(Reference {
                type_title: strings::NEWS_REFERENCE_TITLE.to_string(),
                description: text.trim_end().to_string(),
                access_date_year: news
                    .access_date
                    .as_deref()
                    .and_then(strings::year_of_date_string),
            })
        }
        Template::Website(website) => {
            let mut text = format!("\"{}\" ", website.title);
            if let Some(publisher) = &website.publisher {
                text.push_str(&format!("{publisher}. "));
            }
            if let Some(archive_date) = &website.archive_date {
                text.push_str(&strings::archived_from_original(archive_date));
            }
            ChangeDetail::Reference(Reference {
                type_title: strings::WEBSITE_REFERENCE_TITLE.to_string(),
                description: text.trim_end().to_string(),
                access_date_year: website
                    .access_date
                    .as_deref()
                    .and_then(strings::year_of_date_string),
            })
        }
    }
}

/// Height of the side-scrolling strip for one event's detail cards.
fn strip_height(details: &[ChangeDetail], ctx: RenderContext) -> f32 {
    if details.is_empty() {
        return 0.0;
    }

    let width = layout::available_width();
    let scale = ctx.text_scale;

    let reference_heights: Vec<f32> = details
        .iter()
        .filter_map(|detail| match detail {
            ChangeDetail::Reference(reference) => {
                let title = layout::text_block_height(reference.type_title.len(), width, scale);
                let description =
                    layout::text_block_height(reference.description.len(), width, scale);
                Some(title + layout::REFERENCE_TITLE_DESCRIPTION_SPACING + description)
            }
            ChangeDetail::Snippet(_) => None,
        })
        .collect();

    let three_lines = 3.0 * layout::line_height(scale);
    let tallest_reference = reference_heights.iter().copied().fold(0.0f32, f32::max);
    // Snippets wrap to at most three lines, unless a taller reference card
    // already sets the strip height.
    let snippet_cap = if tallest_reference > 0.0 {
        tallest_reference.max(three_lines)
    } else {
        three_lines
    };

    let mut tallest = tallest_reference;
    for detail in details {
        if let ChangeDetail::Snippet(snippet) = detail {
            let height = layout::text_block_height(
                layout::visible_text_len(&snippet.text),
                width,
                scale,
            );
            tallest = tallest.max(height.min(snippet_cap));
        }
    }

    tallest + layout::CELL_TOP_PADDING + layout::CELL_BOTTOM_PADDING
        + layout::ADDITIONAL_POINTS_FOR_SHADOW
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddedText, DeletedText, NewTemplates, SnippetType};

    fn added(count: u64, snippet: Option<&str>) -> TypedChange {
        TypedChange::AddedText(AddedText {
            sections: vec!["==History==".to_string()],
            snippet: snippet.map(str::to_string),
            snippet_type: SnippetType::AddedLine,
            character_count: count,
        })
    }

    fn deleted(count: u64) -> TypedChange {
        TypedChange::DeletedText(DeletedText {
            sections: vec![],
            character_count: count,
        })
    }

    fn large_event(changes: Vec<TypedChange>) -> LargeEvent {
        LargeEvent::from_large_change(
            LargeChange {
                rev_id: 10,
                parent_id: 9,
                timestamp: "2024-03-10T08:00:00Z".to_string(),
                user: "Editor".to_string(),
                user_id: 7,
                user_groups: None,
                user_edit_count: Some(1234),
                changes,
            },
            "2024-03-10T08:00:00Z".parse().unwrap(),
        )
    }

    #[test]
    fn test_user_type_derivation() {
        assert_eq!(user_type(7, None), UserType::Standard);
        assert_eq!(user_type(0, None), UserType::Anonymous);
        let groups = vec!["bot".to_string(), "extendedconfirmed".to_string()];
        assert_eq!(user_type(7, Some(&groups)), UserType::Bot);
        // Bot wins over anonymous.
        assert_eq!(user_type(0, Some(&groups)), UserType::Bot);
    }

    #[test]
    fn test_strip_section_title() {
        assert_eq!(strip_section_title("== History =="), "History");
        assert_eq!(strip_section_title("===Early <i>life</i>==="), "Early life");
        assert_eq!(strip_section_title("Plain"), "Plain");
    }

    #[test]
    fn test_description_merging_and_priority() {
        let mut event = large_event(vec![
            added(120, None),
            deleted(30),
            TypedChange::NewTemplate(NewTemplates {
                sections: vec![],
                templates: vec![
                    Template::from_raw(
                        &[
                            ("name".to_string(), "cite web".to_string()),
                            ("title".to_string(), "T".to_string()),
                            ("url".to_string(), "https://example.org".to_string()),
                        ]
                        .into_iter()
                        .collect(),
                    )
                    .unwrap(),
                ],
            }),
        ]);
        let description = event.event_description(RenderContext::default());
        // References sort first; sections from the added-text change follow.
        assert_eq!(
            description,
            "1 reference added, 120 characters added and 30 characters deleted in the History section"
        );
    }

    #[test]
    fn test_description_html_italicizes_only_the_section_phrase() {
        // A section literally named "characters" must not get wrapped where
        // the word appears in the change sentence itself.
        let mut event = large_event(vec![TypedChange::AddedText(AddedText {
            sections: vec!["== characters ==".to_string()],
            snippet: None,
            snippet_type: SnippetType::AddedLine,
            character_count: 120,
        })]);
        assert_eq!(
            event.event_description_html(RenderContext::default()),
            "120 characters added in the <i>characters</i> section"
        );
    }

    #[test]
    fn test_lone_reference_description() {
        let mut event = large_event(vec![TypedChange::NewTemplate(NewTemplates {
            sections: vec![],
            templates: vec![
                Template::from_raw(
                    &[
                        ("name".to_string(), "cite web".to_string()),
                        ("title".to_string(), "T".to_string()),
                        ("url".to_string(), "https://example.org".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                )
                .unwrap(),
            ],
        })]);
        assert_eq!(
            event.event_description(RenderContext::default()),
            strings::SINGLE_REFERENCE_ADDED
        );
    }

    #[test]
    fn test_change_details_skip_deleted_text() {
        let mut event = large_event(vec![
            added(120, Some("<ins>new text</ins>")),
            deleted(30),
        ]);
        let details = event.change_details(RenderContext::default());
        assert_eq!(details.len(), 1);
        assert!(matches!(details[0], ChangeDetail::Snippet(_)));
    }

    #[test]
    fn test_height_zero_without_details() {
        let mut event = large_event(vec![deleted(30)]);
        assert_eq!(event.side_scrolling_height(RenderContext::default()), 0.0);
    }

    #[test]
    fn test_height_caps_snippet_at_three_lines() {
        let long = "x".repeat(2000);
        let mut event = large_event(vec![added(2000, Some(&long))]);
        let ctx = RenderContext::default();
        let height = event.side_scrolling_height(ctx);
        let expected = 3.0 * layout::line_height(ctx.text_scale)
            + layout::CELL_TOP_PADDING
            + layout::CELL_BOTTOM_PADDING
            + layout::ADDITIONAL_POINTS_FOR_SHADOW;
        assert_eq!(height, expected);
    }

    #[test]
    fn test_reference_card_raises_snippet_cap() {
        let long = "x".repeat(2000);
        let ctx = RenderContext::default();

        let mut capped = large_event(vec![added(2000, Some(&long))]);
        let capped_height = capped.side_scrolling_height(ctx);

        let book = TypedChange::NewTemplate(NewTemplates {
            sections: vec![],
            templates: vec![
                Template::from_raw(
                    &[
                        ("name".to_string(), "cite book".to_string()),
                        ("title".to_string(), "The Domestic Dog".to_string()),
                        ("last".to_string(), "Serpell".to_string()),
                        ("first".to_string(), "James".to_string()),
                        ("year".to_string(), "2017".to_string()),
                        (
                            "publisher".to_string(),
                            "Cambridge University Press".to_string(),
                        ),
                        ("isbn".to_string(), "978-1-107-02414-4".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                )
                .unwrap(),
            ],
        });
        let mut with_reference = large_event(vec![added(2000, Some(&long)), book]);
        let raised_height = with_reference.side_scrolling_height(ctx);

        // The taller reference card lifts the snippet cap past three lines.
        assert!(raised_height > capped_height);
    }

    #[test]
    fn test_article_insert_snippet_marks_first_item() {
        let mut event = large_event(vec![added(120, None)]);
        let now = "2024-03-10T09:00:00Z".parse().unwrap();
        let ctx = RenderContext::default();
        let first = event.article_insert_snippet(ctx, now, true).unwrap();
        assert!(first.starts_with("<li id='significant-changes-first-list'>"));
        assert!(first.contains("1 hour ago"));
        let rest = event.article_insert_snippet(ctx, now, false).unwrap();
        assert!(rest.starts_with("<li id='significant-changes-list'>"));
    }

    #[test]
    fn test_display_timestamp_relative_same_day_only() {
        let event_time: DateTime<Utc> = "2024-03-10T08:00:00Z".parse().unwrap();
        let same_day: DateTime<Utc> = "2024-03-10T10:30:00Z".parse().unwrap();
        let later_day: DateTime<Utc> = "2024-03-12T10:30:00Z".parse().unwrap();
        assert_eq!(display_timestamp(event_time, same_day), "2 hours ago");
        assert_eq!(display_timestamp(event_time, later_day), "08:00");
    }
}

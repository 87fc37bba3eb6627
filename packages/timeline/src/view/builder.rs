//! Assembles the full timeline view model from a decoded feed.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::SignificantEvents;

use super::context::RenderContext;
use super::event::TimelineEvent;
use super::section::{self, SectionHeader};
use super::strings;

/// Everything a timeline screen needs, derived once for a context.
#[derive(Debug)]
pub struct TimelineViewModel {
    /// Pagination cursor carried through from the feed
    pub next_rv_start_id: Option<u64>,
    /// Feed content hash carried through from the feed
    pub sha: Option<String>,
    /// Day sections, newest first
    pub sections: Vec<SectionHeader>,
    /// "N changes by M editors in the last D days", when the summary
    /// timestamp parses
    pub summary_text: Option<String>,
    /// Up to three `<li>` teasers for injecting into article HTML
    pub article_insert_snippets: Vec<String>,
    /// Display timestamp of the most recent event
    pub last_updated_timestamp: Option<String>,
}

const MAX_ARTICLE_INSERT_SNIPPETS: usize = 3;

impl TimelineViewModel {
    /// Build the view model for one presentation context.
    ///
    /// `now` anchors all relative phrasing ("Today", "2 hours ago"); callers
    /// pass the current time, tests pass a fixed one.
    pub fn build(feed: SignificantEvents, ctx: RenderContext, now: DateTime<Utc>) -> Self {
        let summary_text = match DateTime::parse_from_rfc3339(&feed.summary.earliest_timestamp) {
            Ok(earliest) => {
                let days = now
                    .signed_duration_since(earliest.with_timezone(&Utc))
                    .num_days();
                Some(strings::summary_sentence(
                    feed.summary.num_changes,
                    feed.summary.num_users,
                    days,
                ))
            }
            Err(error) => {
                debug!(
                    timestamp = feed.summary.earliest_timestamp,
                    %error,
                    "summary timestamp did not parse"
                );
                None
            }
        };

        let mut sections = section::group_by_day(feed.events, now);
        section::collapse_small_events(&mut sections);
        let mut sections = section::collapse_small_runs(sections, now);

        let mut article_insert_snippets = Vec::new();
        let mut last_updated_timestamp = None;

        for section in &mut sections {
            for event in &mut section.events {
                if last_updated_timestamp.is_none() {
                    last_updated_timestamp = Some(match event {
                        TimelineEvent::Small(small) => small.display_timestamp(now),
                        TimelineEvent::Large(large) => large.display_timestamp(now),
                    });
                }
                if let TimelineEvent::Large(large) = event {
                    // Warm the caches so first render does no derivation.
                    large.event_description(ctx);
                    large.side_scrolling_height(ctx);
                    large.user_info(ctx);

                    if article_insert_snippets.len() < MAX_ARTICLE_INSERT_SNIPPETS {
                        let is_first = article_insert_snippets.is_empty();
                        if let Some(snippet) = large.article_insert_snippet(ctx, now, is_first) {
                            article_insert_snippets.push(snippet);
                        }
                    }
                }
            }
        }

        Self {
            next_rv_start_id: feed.next_rv_start_id,
            sha: feed.sha,
            sections,
            summary_text,
            article_insert_snippets,
            last_updated_timestamp,
        }
    }
}

//! Calendar-day sections and small-edit collapsing.
//!
//! The timeline renders newest-first, one section per UTC calendar day.
//! Within a section, runs of consecutive small edits collapse into a single
//! row; across sections, runs of consecutive all-small days collapse into a
//! single date-range section. All day math is UTC.

use chrono::{DateTime, NaiveDate, Utc};
use std::hash::{Hash, Hasher};

use crate::models::TypedEvent;

use super::event::{SmallEvent, TimelineEvent};
use super::strings;

/// One day's worth of timeline rows, or a collapsed date-range of
/// small-only days.
#[derive(Debug)]
pub struct SectionHeader {
    /// The UTC day the section covers; section identity.
    pub day: NaiveDate,
    /// Timestamp of the section's first (most recent) event.
    pub timestamp: DateTime<Utc>,
    /// "Today", "Yesterday", "5 days ago", or a full date.
    pub title: String,
    /// Always the full date; a range like "March 3 - March 1, 2024" for
    /// collapsed small-only runs.
    pub subtitle: String,
    /// Covered interval when this section collapses several days.
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub events: Vec<TimelineEvent>,
}

impl PartialEq for SectionHeader {
    fn eq(&self, other: &Self) -> bool {
        self.day == other.day
    }
}

impl Eq for SectionHeader {}

impl Hash for SectionHeader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.day.hash(state);
    }
}

impl SectionHeader {
    fn new(day: NaiveDate, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            day,
            timestamp,
            title: strings::relative_day_title(day, now.date_naive()),
            subtitle: strings::month_day_year(day),
            date_range: None,
            events: Vec::new(),
        }
    }

    pub fn contains_only_small_events(&self) -> bool {
        self.events.iter().all(TimelineEvent::is_small)
    }
}

/// Group typed events into day sections, newest first.
///
/// The feed arrives newest-first already; a section flushes whenever the UTC
/// day changes. Events whose timestamps do not parse are dropped inside
/// [`TimelineEvent::from_typed`].
pub fn group_by_day(events: Vec<TypedEvent>, now: DateTime<Utc>) -> Vec<SectionHeader> {
    let mut sections: Vec<SectionHeader> = Vec::new();
    let mut current: Option<SectionHeader> = None;

    for typed in events {
        let Some(event) = TimelineEvent::from_typed(typed) else {
            continue;
        };
        let day = event.timestamp().date_naive();

        match &mut current {
            Some(section) if section.day == day => section.events.push(event),
            _ => {
                if let Some(done) = current.take() {
                    sections.push(done);
                }
                let mut section = SectionHeader::new(day, event.timestamp(), now);
                section.events.push(event);
                current = Some(section);
            }
        }
    }

    if let Some(done) = current.take() {
        sections.push(done);
    }
    sections
}

/// Collapse consecutive small events within each section into single rows.
///
/// A buffered run flushes when a large event interrupts it and at the end of
/// the section, so large rows keep their position between small runs.
pub fn collapse_small_events(sections: &mut Vec<SectionHeader>) {
    for section in sections {
        let events = std::mem::take(&mut section.events);
        let mut collapsed: Vec<TimelineEvent> = Vec::new();
        let mut run: Option<SmallEvent> = None;

        for event in events {
            match event {
                TimelineEvent::Small(small) => match &mut run {
                    Some(buffer) => buffer.changes.extend(small.changes),
                    None => run = Some(small),
                },
                TimelineEvent::Large(_) => {
                    if let Some(buffer) = run.take() {
                        collapsed.push(TimelineEvent::Small(buffer));
                    }
                    collapsed.push(event);
                }
            }
        }

        if let Some(buffer) = run.take() {
            collapsed.push(TimelineEvent::Small(buffer));
        }
        section.events = collapsed;
    }
}

/// Merge runs of two or more consecutive small-only day sections into one
/// date-range section.
///
/// The merged section keeps the first (most recent) day's identity and
/// title; its subtitle becomes a range from the newest day down to the
/// oldest, and its single small row carries every collapsed change.
pub fn collapse_small_runs(sections: Vec<SectionHeader>, now: DateTime<Utc>) -> Vec<SectionHeader> {
    let mut out: Vec<SectionHeader> = Vec::new();
    let mut run: Vec<SectionHeader> = Vec::new();

    for section in sections {
        if section.contains_only_small_events() {
            run.push(section);
        } else {
            flush_small_run(&mut run, &mut out, now);
            out.push(section);
        }
    }
    flush_small_run(&mut run, &mut out, now);
    out
}

fn flush_small_run(
    run: &mut Vec<SectionHeader>,
    out: &mut Vec<SectionHeader>,
    now: DateTime<Utc>,
) {
    if run.len() < 2 {
        out.append(run);
        return;
    }

    let members = std::mem::take(run);
    let newest_ts = members
        .iter()
        .flat_map(|s| s.events.iter().map(TimelineEvent::timestamp))
        .max()
        .unwrap_or(now);
    let oldest_ts = members
        .iter()
        .flat_map(|s| s.events.iter().map(TimelineEvent::timestamp))
        .min()
        .unwrap_or(now);

    let mut changes = Vec::new();
    let mut head_day = None;
    let mut head_title = None;
    for section in members {
        if head_day.is_none() {
            head_day = Some(section.day);
            head_title = Some(section.title);
        }
        for event in section.events {
            if let TimelineEvent::Small(small) = event {
                changes.extend(small.changes);
            }
        }
    }
    let day = head_day.unwrap_or_else(|| now.date_naive());

    let today = now.date_naive();
    let newest_day = newest_ts.date_naive();
    // Newest end of the range reads relatively when it is recent.
    let newest_label = if (today - newest_day).num_days() <= 1 {
        strings::relative_day_title(newest_day, today)
    } else {
        strings::month_day(newest_day)
    };
    let subtitle = format!(
        "{newest_label} - {}",
        strings::month_day_year(oldest_ts.date_naive())
    );

    out.push(SectionHeader {
        day,
        timestamp: newest_ts,
        title: head_title.unwrap_or_default(),
        subtitle,
        date_range: Some((oldest_ts, newest_ts)),
        events: vec![TimelineEvent::Small(SmallEvent {
            changes,
            timestamp: newest_ts,
        })],
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SmallChange, TypedEvent};

    fn small(rev_id: u64, timestamp: &str) -> TypedEvent {
        TypedEvent::Small(SmallChange {
            rev_id,
            parent_id: rev_id - 1,
            timestamp: timestamp.to_string(),
        })
    }

    fn large(rev_id: u64, timestamp: &str) -> TypedEvent {
        let json = format!(
            r#"{{"outputType": "large-change", "revid": {rev_id}, "parentid": {},
                "timestamp": "{timestamp}", "user": "Editor", "userid": 7,
                "significantChanges": [
                    {{"outputType": "deleted-text", "sections": [], "characterCount": 40}}
                ]}}"#,
            rev_id - 1
        );
        let raw: crate::models::RawEvent = serde_json::from_str(&json).unwrap();
        TypedEvent::from_raw(&raw).unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2024-03-10T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_group_by_day_splits_on_utc_day_boundary() {
        // Two events the same UTC day, one the day before: two sections.
        let events = vec![
            small(30, "2024-03-10T10:00:00Z"),
            small(20, "2024-03-10T00:30:00Z"),
            small(10, "2024-03-09T23:30:00Z"),
        ];
        let sections = group_by_day(events, now());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].events.len(), 2);
        assert_eq!(sections[0].title, "Today");
        assert_eq!(sections[1].events.len(), 1);
        assert_eq!(sections[1].title, "Yesterday");
    }

    #[test]
    fn test_group_by_day_drops_unparsable_timestamps() {
        let events = vec![
            small(30, "2024-03-10T10:00:00Z"),
            small(20, "not a timestamp"),
        ];
        let sections = group_by_day(events, now());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].events.len(), 1);
    }

    #[test]
    fn test_collapse_small_events_flushes_before_large() {
        // small, small, large, small collapses to [small x2, large, small].
        let events = vec![
            small(50, "2024-03-10T11:00:00Z"),
            small(40, "2024-03-10T10:00:00Z"),
            large(30, "2024-03-10T09:00:00Z"),
            small(20, "2024-03-10T08:00:00Z"),
        ];
        let mut sections = group_by_day(events, now());
        collapse_small_events(&mut sections);

        let rows = &sections[0].events;
        assert_eq!(rows.len(), 3);
        match &rows[0] {
            TimelineEvent::Small(run) => assert_eq!(run.changes.len(), 2),
            other => panic!("expected collapsed small run, got {other:?}"),
        }
        assert!(matches!(rows[1], TimelineEvent::Large(_)));
        match &rows[2] {
            TimelineEvent::Small(run) => assert_eq!(run.changes.len(), 1),
            other => panic!("expected trailing small run, got {other:?}"),
        }
    }

    #[test]
    fn test_collapse_small_runs_merges_consecutive_small_days() {
        let events = vec![
            large(60, "2024-03-10T09:00:00Z"),
            small(50, "2024-03-08T10:00:00Z"),
            small(40, "2024-03-07T10:00:00Z"),
            small(30, "2024-03-06T10:00:00Z"),
        ];
        let mut sections = group_by_day(events, now());
        collapse_small_events(&mut sections);
        let sections = collapse_small_runs(sections, now());

        assert_eq!(sections.len(), 2);
        let merged = &sections[1];
        assert!(merged.date_range.is_some());
        assert_eq!(merged.subtitle, "March 8 - March 6, 2024");
        match &merged.events[0] {
            TimelineEvent::Small(run) => assert_eq!(run.changes.len(), 3),
            other => panic!("expected merged small run, got {other:?}"),
        }
    }

    #[test]
    fn test_single_small_day_is_not_merged() {
        let events = vec![
            large(60, "2024-03-10T09:00:00Z"),
            small(50, "2024-03-08T10:00:00Z"),
            large(40, "2024-03-07T10:00:00Z"),
        ];
        let mut sections = group_by_day(events, now());
        collapse_small_events(&mut sections);
        let sections = collapse_small_runs(sections, now());

        assert_eq!(sections.len(), 3);
        assert!(sections.iter().all(|s| s.date_range.is_none()));
    }

    #[test]
    fn test_section_identity_is_the_utc_day() {
        let a = group_by_day(vec![small(10, "2024-03-09T01:00:00Z")], now());
        let b = group_by_day(vec![small(99, "2024-03-09T23:00:00Z")], now());
        assert_eq!(a[0], b[0]);
    }
}

//! Display string templates and date/number formatting.
//!
//! One place for every user-facing sentence fragment so the wording stays
//! auditable. English-only; the joining rules (two items joined by "and",
//! longer lists comma-joined with a final "and") match that.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub const NEW_TALK_TOPIC_DESCRIPTION: &str = "New discussion about this article";
pub const VANDALISM_REVERT_DESCRIPTION: &str = "Suspected vandalism reverted";
pub const ARTICLE_DESCRIPTION_UPDATED: &str = "Article description updated";
pub const SINGLE_REFERENCE_ADDED: &str = "Reference added";
pub const MULTIPLE_REFERENCES_ADDED: &str = "Multiple references added";

pub const BOOK_REFERENCE_TITLE: &str = "New book reference";
pub const JOURNAL_REFERENCE_TITLE: &str = "New journal reference";
pub const NEWS_REFERENCE_TITLE: &str = "New news reference";
pub const WEBSITE_REFERENCE_TITLE: &str = "New website reference";

pub fn added_text_description(character_count: u64) -> String {
    if character_count == 1 {
        "1 character added".to_string()
    } else {
        format!("{} characters added", format_count(character_count))
    }
}

pub fn deleted_text_description(character_count: u64) -> String {
    if character_count == 1 {
        "1 character deleted".to_string()
    } else {
        format!("{} characters deleted", format_count(character_count))
    }
}

pub fn references_added_description(count: usize) -> String {
    if count == 1 {
        "1 reference added".to_string()
    } else {
        format!("{count} references added")
    }
}

pub fn small_change_description(count: usize) -> String {
    if count == 1 {
        "1 small change made".to_string()
    } else {
        format!("{count} small changes made")
    }
}

pub fn summary_sentence(num_changes: u64, num_users: u64, days: i64) -> String {
    format!(
        "{} changes by {} editors in the last {} days",
        format_count(num_changes),
        format_count(num_users),
        days.max(0)
    )
}

pub fn journal_volume(volume: &str) -> String {
    format!("Volume {volume}. ")
}

pub fn journal_database(database: &str) -> String {
    format!("via {database}")
}

pub fn retrieved_date(date: &str) -> String {
    format!("Retrieved {date}. ")
}

pub fn archived_from_original(archive_date: &str) -> String {
    format!("Archived from the original on {archive_date}.")
}

pub fn user_info_standard(user: &str, edit_count: Option<u64>) -> String {
    match edit_count {
        Some(count) => format!("Edited by {user} ({} edits)", format_count(count)),
        None => format!("Edited by {user}"),
    }
}

pub fn user_info_bot(user: &str) -> String {
    format!("Edited by bot {user}")
}

pub fn user_info_anonymous() -> String {
    "Edited by an anonymous user".to_string()
}

/// " in the X section" / " in the X and Y sections" / " in N sections".
///
/// The leading space lets callers append directly to a sentence. Returns
/// `None` for an empty list.
pub fn section_phrase(sections: &[String]) -> Option<String> {
    match sections {
        [] => None,
        [one] => Some(format!(" in the {one} section")),
        [one, two] => Some(format!(" in the {one} and {two} sections")),
        many => Some(format!(" in {} sections", many.len())),
    }
}

/// Join already-ordered description sentences: "a", "a and b",
/// "a, b and c".
pub fn join_descriptions(descriptions: &[String]) -> String {
    match descriptions {
        [] => String::new(),
        [one] => one.clone(),
        [one, two] => format!("{one} and {two}"),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}

/// Group digits with commas: 1234567 -> "1,234,567".
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "January 5, 2024"
pub fn month_day_year(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date), date.day(), date.year())
}

/// "January 5"
pub fn month_day(date: NaiveDate) -> String {
    format!("{} {}", month_name(date), date.day())
}

fn month_name(date: NaiveDate) -> &'static str {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    MONTHS[date.month0() as usize]
}

/// "14:05" (UTC wall clock).
pub fn short_time_utc(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}

/// Section title: "Today", "Yesterday", "N days ago", or the full date for
/// anything older than a month.
pub fn relative_day_title(day: NaiveDate, today: NaiveDate) -> String {
    match (today - day).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n if (2..30).contains(&n) => format!("{n} days ago"),
        _ => month_day_year(day),
    }
}

/// Fully relative timestamp: "just now", "N minutes ago", "N hours ago",
/// "N days ago", or the full date for anything older than a month.
pub fn relative_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(timestamp);
    let minutes = delta.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{minutes} minutes ago")
        };
    }
    let hours = delta.num_hours();
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        };
    }
    let days = delta.num_days();
    if days < 30 {
        return if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        };
    }
    month_day_year(timestamp.date_naive())
}

/// Parse the handful of date spellings citation access dates arrive in and
/// return the year, best-effort.
pub fn year_of_date_string(raw: &str) -> Option<String> {
    const FORMATS: [&str; 3] = ["%B %d, %Y", "%d %B %Y", "%Y-%m-%d"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
        .map(|date| date.year().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_groups_digits() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_references_added_singularizes() {
        assert_eq!(references_added_description(1), "1 reference added");
        assert_eq!(references_added_description(2), "2 references added");
    }

    #[test]
    fn test_join_descriptions() {
        let a = "a".to_string();
        let b = "b".to_string();
        let c = "c".to_string();
        assert_eq!(join_descriptions(&[]), "");
        assert_eq!(join_descriptions(&[a.clone()]), "a");
        assert_eq!(join_descriptions(&[a.clone(), b.clone()]), "a and b");
        assert_eq!(join_descriptions(&[a, b, c]), "a, b and c");
    }

    #[test]
    fn test_section_phrase_counts() {
        let one = vec!["History".to_string()];
        let two = vec!["History".to_string(), "Legacy".to_string()];
        let three = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(section_phrase(&[]), None);
        assert_eq!(section_phrase(&one).unwrap(), " in the History section");
        assert_eq!(
            section_phrase(&two).unwrap(),
            " in the History and Legacy sections"
        );
        assert_eq!(section_phrase(&three).unwrap(), " in 3 sections");
    }

    #[test]
    fn test_relative_day_title() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(relative_day_title(today, today), "Today");
        assert_eq!(
            relative_day_title(today.pred_opt().unwrap(), today),
            "Yesterday"
        );
        assert_eq!(
            relative_day_title(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), today),
            "5 days ago"
        );
        assert_eq!(
            relative_day_title(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), today),
            "January 2, 2023"
        );
    }

    #[test]
    fn test_year_of_date_string() {
        assert_eq!(year_of_date_string("March 5, 2021").as_deref(), Some("2021"));
        assert_eq!(year_of_date_string("5 March 2021").as_deref(), Some("2021"));
        assert_eq!(year_of_date_string("2021-03-05").as_deref(), Some("2021"));
        assert_eq!(year_of_date_string("sometime"), None);
    }
}

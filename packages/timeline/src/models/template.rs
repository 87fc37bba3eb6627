//! Citation and description templates, parsed from raw parameter maps.
//!
//! Template parameters have accumulated many historical spellings (a book
//! citation's author surname may arrive as `last`, `last1`, `author`, ...).
//! Each logical field is therefore an ordered alias list, looked up
//! first-non-empty-wins, so the priority order stays auditable in one place.

use std::collections::HashMap;

/// A recognized template added by an edit.
#[derive(Debug, Clone)]
pub enum Template {
    ArticleDescription(ArticleDescription),
    Book(BookCitation),
    Journal(JournalCitation),
    News(NewsCitation),
    Website(WebsiteCitation),
}

impl Template {
    /// Recognize and parse one raw template dictionary.
    ///
    /// Matching is by case-insensitive substring on the template name:
    /// `cite` plus `book`/`journal`/`web`/`news`, or `short description`.
    /// Anything else, or a matched template missing its required fields,
    /// yields `None`.
    pub fn from_raw(dict: &HashMap<String, String>) -> Option<Template> {
        let name = dict.get("name")?.to_lowercase();

        if name.contains("cite") {
            if name.contains("book") {
                return BookCitation::from_raw(dict).map(Template::Book);
            }
            if name.contains("journal") {
                return JournalCitation::from_raw(dict).map(Template::Journal);
            }
            if name.contains("web") {
                return WebsiteCitation::from_raw(dict).map(Template::Website);
            }
            if name.contains("news") {
                return NewsCitation::from_raw(dict).map(Template::News);
            }
            return None;
        }

        if name.contains("short description") {
            return ArticleDescription::from_raw(dict).map(Template::ArticleDescription);
        }

        None
    }

    /// Whether this template counts as a reference (any citation kind).
    pub fn is_citation(&self) -> bool {
        !matches!(self, Template::ArticleDescription(_))
    }
}

/// Look up `key` exactly, treating an empty value as absent.
fn non_empty(dict: &HashMap<String, String>, key: &str) -> Option<String> {
    dict.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Case-insensitive variant of [`non_empty`], for parameters that appear
/// with arbitrary capitalization (`url`/`URL`, `isbn`/`ISBN`).
fn non_empty_ci(dict: &HashMap<String, String>, key: &str) -> Option<String> {
    dict.iter()
        .find(|(k, v)| k.eq_ignore_ascii_case(key) && !v.is_empty())
        .map(|(_, v)| v.clone())
}

/// First non-empty value among `keys`, tried in order.
fn first_non_empty(dict: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty(dict, key))
}

/// First non-empty value among `keys`, case-insensitive per key.
fn first_non_empty_ci(dict: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty_ci(dict, key))
}

const BOOK_LAST_NAME_ALIASES: &[&str] = &[
    "last",
    "last1",
    "author",
    "author1",
    "author1-last",
    "author-last",
    "surname1",
    "author-last1",
    "subject1",
    "surname",
    "subject",
];

const BOOK_FIRST_NAME_ALIASES: &[&str] = &[
    "first",
    "given",
    "author-first",
    "first1",
    "given1",
    "author-first1",
    "author1-first",
];

/// Template:Cite_book
#[derive(Debug, Clone)]
pub struct BookCitation {
    pub title: String,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub year_published: Option<String>,
    pub location_published: Option<String>,
    pub publisher: Option<String>,
    pub pages_cited: Option<String>,
    pub isbn: Option<String>,
}

impl BookCitation {
    fn from_raw(dict: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            title: non_empty(dict, "title")?,
            last_name: first_non_empty(dict, BOOK_LAST_NAME_ALIASES),
            first_name: first_non_empty(dict, BOOK_FIRST_NAME_ALIASES),
            year_published: non_empty(dict, "year"),
            location_published: first_non_empty(dict, &["location", "place"]),
            publisher: first_non_empty(
                dict,
                &["publisher", "distributor", "institution", "newsgroup"],
            ),
            pages_cited: first_non_empty(dict, &["pages", "pp"]),
            isbn: first_non_empty_ci(dict, &["isbn", "isbn13"]),
        })
    }
}

/// Template:Cite_journal
#[derive(Debug, Clone)]
pub struct JournalCitation {
    pub title: String,
    pub journal: String,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub source_date: Option<String>,
    pub url: Option<String>,
    pub volume_number: Option<String>,
    pub pages: Option<String>,
    pub database: Option<String>,
}

impl JournalCitation {
    fn from_raw(dict: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            title: non_empty(dict, "title")?,
            journal: non_empty(dict, "journal")?,
            last_name: first_non_empty(dict, &["last", "author", "author1", "authors", "last1"]),
            first_name: first_non_empty(dict, &["first", "first1"]),
            source_date: non_empty(dict, "date"),
            url: non_empty_ci(dict, "url"),
            volume_number: non_empty(dict, "volume"),
            pages: non_empty(dict, "pages"),
            database: non_empty(dict, "via"),
        })
    }
}

/// Template:Cite_news
#[derive(Debug, Clone)]
pub struct NewsCitation {
    pub title: String,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub source_date: Option<String>,
    pub url: Option<String>,
    pub publication: Option<String>,
    pub access_date: Option<String>,
}

impl NewsCitation {
    fn from_raw(dict: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            title: non_empty(dict, "title")?,
            last_name: first_non_empty(dict, &["last", "last1", "author", "author1", "authors"]),
            first_name: first_non_empty(dict, &["first", "first1"]),
            source_date: non_empty(dict, "date"),
            url: non_empty_ci(dict, "url"),
            publication: first_non_empty(
                dict,
                &["work", "journal", "magazine", "periodical", "newspaper", "website"],
            ),
            access_date: first_non_empty(dict, &["access-date", "accessdate"]),
        })
    }
}

/// Template:Cite_web
#[derive(Debug, Clone)]
pub struct WebsiteCitation {
    pub title: String,
    pub url: String,
    pub publisher: Option<String>,
    pub access_date: Option<String>,
    pub archive_date: Option<String>,
    pub archive_url: Option<String>,
}

impl WebsiteCitation {
    fn from_raw(dict: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            title: non_empty(dict, "title")?,
            url: non_empty_ci(dict, "url")?,
            publisher: first_non_empty(dict, &["publisher", "website", "work"]),
            access_date: first_non_empty(dict, &["access-date", "accessdate"]),
            archive_date: first_non_empty(dict, &["archive-date", "archivedate"]),
            archive_url: first_non_empty(dict, &["archive-url", "archiveurl"]),
        })
    }
}

/// Template:Short_description (the article description lives in the first
/// positional parameter).
#[derive(Debug, Clone)]
pub struct ArticleDescription {
    pub text: String,
}

impl ArticleDescription {
    fn from_raw(dict: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            text: non_empty(dict, "1")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_book_last_name_alias_priority() {
        // Both aliases present: `last` outranks `author1`.
        let template = Template::from_raw(&dict(&[
            ("name", "Cite book"),
            ("title", "A History"),
            ("author1", "Secondary"),
            ("last", "Primary"),
        ]))
        .unwrap();
        match template {
            Template::Book(book) => assert_eq!(book.last_name.as_deref(), Some("Primary")),
            other => panic!("expected book citation, got {other:?}"),
        }

        // Without `last`, `author` outranks `surname`.
        let template = Template::from_raw(&dict(&[
            ("name", "cite book"),
            ("title", "A History"),
            ("surname", "Secondary"),
            ("author", "Primary"),
        ]))
        .unwrap();
        match template {
            Template::Book(book) => assert_eq!(book.last_name.as_deref(), Some("Primary")),
            other => panic!("expected book citation, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_alias_value_is_skipped() {
        let template = Template::from_raw(&dict(&[
            ("name", "cite book"),
            ("title", "A History"),
            ("last", ""),
            ("author", "Fallback"),
        ]))
        .unwrap();
        match template {
            Template::Book(book) => assert_eq!(book.last_name.as_deref(), Some("Fallback")),
            other => panic!("expected book citation, got {other:?}"),
        }
    }

    #[test]
    fn test_website_requires_title_and_url_case_insensitive() {
        assert!(Template::from_raw(&dict(&[("name", "cite web"), ("title", "T")])).is_none());

        let template = Template::from_raw(&dict(&[
            ("name", "cite web"),
            ("title", "T"),
            ("URL", "https://example.org"),
        ]))
        .unwrap();
        match template {
            Template::Website(web) => assert_eq!(web.url, "https://example.org"),
            other => panic!("expected website citation, got {other:?}"),
        }
    }

    #[test]
    fn test_short_description_uses_positional_parameter() {
        let template = Template::from_raw(&dict(&[
            ("name", "Short description"),
            ("1", "English rock band"),
        ]))
        .unwrap();
        match template {
            Template::ArticleDescription(desc) => assert_eq!(desc.text, "English rock band"),
            other => panic!("expected article description, got {other:?}"),
        }
        assert!(!template_is_citation(&dict(&[
            ("name", "Short description"),
            ("1", "x"),
        ])));
    }

    fn template_is_citation(raw: &HashMap<String, String>) -> bool {
        Template::from_raw(raw).map(|t| t.is_citation()).unwrap_or(false)
    }

    #[test]
    fn test_unrecognized_template_yields_none() {
        assert!(Template::from_raw(&dict(&[("name", "Infobox person")])).is_none());
        assert!(Template::from_raw(&dict(&[("title", "no name key")])).is_none());
    }
}

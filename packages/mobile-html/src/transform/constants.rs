//! Classification tables for the transform.
//!
//! These are the fixed, auditable rule sets the prepare phase dispatches on.
//! Keeping them in one module means a rule change never hides inside walk
//! logic.

use regex::Regex;
use std::sync::OnceLock;

/// Element ids removed outright.
pub const FORBIDDEN_ELEMENT_IDS: &[&str] = &["coordinates"];

/// Class tokens removed outright on any element.
pub const FORBIDDEN_ELEMENT_CLASSES: &[&str] = &[
    "geo-nondefault",
    "geo-multi-punct",
    "hide-when-compact",
    "noexcerpt",
    "nomobile",
    "noprint",
    "sortkey",
];

/// Class substrings removed outright on any element.
pub const FORBIDDEN_ELEMENT_CLASS_SUBSTRINGS: &[&str] = &["navbox"];

/// Extra forbidden class tokens for `div` elements.
pub const FORBIDDEN_DIV_CLASSES: &[&str] = &["infobox", "magnify"];

/// Extra forbidden class tokens for `span` elements.
pub const FORBIDDEN_SPAN_CLASSES: &[&str] = &["Z3988"];

/// The only `rel` value that keeps a `link` element alive.
pub const KEPT_LINK_REL: &str = "dc:isVersionOf";

/// `typeof` marker of a references-list extension wrapper.
pub const REFERENCE_WRAPPER_TYPEOF: &str = "mw:Extension/references";

/// `div` classes that qualify as infobox candidates (`table` always does).
pub const INFOBOX_DIV_CLASSES: &[&str] = &["infobox_v3"];

/// Classes that disqualify an otherwise-eligible infobox candidate.
/// `pcs-collapse-table-content` marks an already-collapsed table, so a
/// finalized document never re-queues it.
pub const INFOBOX_EXCLUSION_CLASSES: &[&str] = &["metadata", "pcs-collapse-table-content"];
pub const INFOBOX_EXCLUSION_CLASS_SUBSTRINGS: &[&str] = &["mbox-small"];

/// Ancestor classes that opt a subtree out of image widening and scaling.
pub const WIDEN_EXCLUSION_CLASSES: &[&str] = &["noresize", "tsingle"];

/// Thumbnail bucket widths, widest first.
pub const IMAGE_WIDTH_BUCKETS: &[u32] = &[1280, 960, 640, 320];

/// Images smaller than this are left alone.
pub const MIN_IMAGE_SIZE: u32 = 64;

/// Attributes dropped per tag during the walk.
pub const ATTRIBUTE_REMOVAL_TABLE: &[(&str, &[&str])] = &[
    ("img", &["usemap"]),
    ("a", &["data-mw"]),
    ("span", &["data-mw"]),
    ("div", &["data-mw"]),
    ("table", &["data-mw"]),
];

/// Attributes to drop for one tag, per the removal table.
pub fn attributes_to_remove(tag: &str) -> &'static [&'static str] {
    ATTRIBUTE_REMOVAL_TABLE
        .iter()
        .find(|(entry, _)| *entry == tag)
        .map(|(_, attrs)| *attrs)
        .unwrap_or(&[])
}

fn synthetic_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^mw[\w-]{2,3}$").expect("static pattern"))
}

/// Whether an id is a synthetic Parsoid-internal anchor.
pub fn is_synthetic_id(id: &str) -> bool {
    synthetic_id_pattern().is_match(id)
}

fn thumb_width_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/(\d+)px-").expect("static pattern"))
}

/// The embedded width token of a thumbnail URL, e.g. `/640px-` -> 640.
pub fn thumb_url_width(url: &str) -> Option<u32> {
    thumb_width_pattern()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .and_then(|token| token.as_str().parse().ok())
}

/// Rewrite a thumbnail URL's embedded width token.
pub fn rewrite_thumb_url_width(url: &str, width: u32) -> String {
    thumb_width_pattern()
        .replace(url, format!("/{width}px-").as_str())
        .into_owned()
}

fn style_property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)([a-z-]+)\s*:\s*([^;]+)").expect("static pattern")
    })
}

/// Whether an inline style hides the element.
///
/// A style we cannot make sense of counts as hidden (fail safe: a hidden
/// candidate is skipped, never collapsed wrongly).
pub fn style_is_hidden(style: &str) -> bool {
    for captures in style_property_pattern().captures_iter(style) {
        let property = captures[1].to_ascii_lowercase();
        let value = captures[2].trim().to_ascii_lowercase();
        if property == "display" && value.starts_with("none") {
            return true;
        }
        if property == "visibility" && value.starts_with("hidden") {
            return true;
        }
    }
    false
}

/// Whether an inline style sets a concrete background color, which makes
/// the element a theme-exclusion scope owner.
pub fn style_sets_background(style: &str) -> bool {
    for captures in style_property_pattern().captures_iter(style) {
        let property = captures[1].to_ascii_lowercase();
        if property != "background" && property != "background-color" {
            continue;
        }
        let value = captures[2].trim().to_ascii_lowercase();
        if !matches!(value.as_str(), "transparent" | "inherit" | "initial" | "unset" | "none") {
            return true;
        }
    }
    false
}

//! Legacy-to-Parsoid adapter.
//!
//! The MobileView API and the paired Lead/Remaining MobileSections endpoints
//! predate Parsoid HTML. Both describe an article as a flat list of
//! sections with raw HTML bodies, with page facts under legacy field names.
//! This module synthesizes a Parsoid-shaped document from either shape so
//! the transform pipeline can run unchanged on top.
//!
//! Pure and deterministic: same input, same document; no I/O beyond the
//! in-memory parse.

use serde::Deserialize;

use markup5ever_rcdom::{Handle, RcDom};

use crate::dom;
use crate::error::TransformError;

/// Envelope of a MobileView API response.
#[derive(Debug, Clone, Deserialize)]
pub struct MobileViewResponse {
    pub mobileview: MobileView,
}

/// The legacy MobileView payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MobileView {
    #[serde(default)]
    pub sections: Vec<LegacySection>,
    #[serde(default)]
    pub normalizedtitle: Option<String>,
    #[serde(default)]
    pub displaytitle: Option<String>,
    /// Page id, under the legacy name `id`
    #[serde(default)]
    pub id: Option<u64>,
    /// Namespace, under the legacy name `ns`
    #[serde(default)]
    pub ns: Option<i64>,
    #[serde(default)]
    pub lastmodified: Option<String>,
}

/// Lead half of a MobileSections pair; carries the page facts.
#[derive(Debug, Clone, Deserialize)]
pub struct MobileSectionsLead {
    #[serde(default)]
    pub sections: Vec<LegacySection>,
    #[serde(default)]
    pub normalizedtitle: Option<String>,
    #[serde(default)]
    pub displaytitle: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub ns: Option<i64>,
    #[serde(default)]
    pub lastmodified: Option<String>,
}

/// Remaining half of a MobileSections pair; sections only.
#[derive(Debug, Clone, Deserialize)]
pub struct MobileSectionsRemaining {
    #[serde(default)]
    pub sections: Vec<LegacySection>,
}

/// One legacy section entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySection {
    pub id: i64,
    /// Table-of-contents depth; drives the synthesized heading level
    #[serde(default)]
    pub toclevel: Option<u8>,
    #[serde(default)]
    pub anchor: Option<String>,
    /// Heading title line, raw HTML
    #[serde(default)]
    pub line: Option<String>,
    /// Section body, raw HTML
    #[serde(default)]
    pub text: Option<String>,
}

struct PageFacts<'a> {
    title: Option<&'a str>,
    page_id: Option<u64>,
    namespace: Option<i64>,
    modified: Option<&'a str>,
}

/// Build a Parsoid-shaped document from a MobileView payload.
pub fn document_from_mobile_view(
    view: &MobileView,
    domain: &str,
) -> Result<RcDom, TransformError> {
    let facts = PageFacts {
        title: view
            .normalizedtitle
            .as_deref()
            .or(view.displaytitle.as_deref()),
        page_id: view.id,
        namespace: view.ns,
        modified: view.lastmodified.as_deref(),
    };
    build_document(&facts, &view.sections, domain)
}

/// Build a Parsoid-shaped document from a Lead/Remaining MobileSections
/// pair. Lead sections come first, in order.
pub fn document_from_mobile_sections(
    lead: &MobileSectionsLead,
    remaining: &MobileSectionsRemaining,
    domain: &str,
) -> Result<RcDom, TransformError> {
    let facts = PageFacts {
        title: lead
            .normalizedtitle
            .as_deref()
            .or(lead.displaytitle.as_deref()),
        page_id: lead.id,
        namespace: lead.ns,
        modified: lead.lastmodified.as_deref(),
    };
    let sections: Vec<LegacySection> = lead
        .sections
        .iter()
        .chain(remaining.sections.iter())
        .cloned()
        .collect();
    build_document(&facts, &sections, domain)
}

fn build_document(
    facts: &PageFacts<'_>,
    sections: &[LegacySection],
    domain: &str,
) -> Result<RcDom, TransformError> {
    let dom =
        dom::parse_html_document("<!DOCTYPE html><html><head></head><body></body></html>")?;
    let head = dom::find_head(&dom.document).ok_or(TransformError::MissingHead)?;
    let body = dom::find_body(&dom.document).ok_or(TransformError::MissingBody)?;

    inject_head_metadata(&head, facts, domain);

    // Placeholder ids must be unique and increasing across the whole
    // document, not per section.
    let mut reference_counter = 1u32;
    for section in sections {
        let element = build_section(section, &mut reference_counter)?;
        dom::append_child(&body, &element);
    }

    Ok(dom)
}

/// Map legacy field names onto the Parsoid head metadata shape.
fn inject_head_metadata(head: &Handle, facts: &PageFacts<'_>, domain: &str) {
    if let Some(namespace) = facts.namespace {
        let meta = dom::create_element(
            "meta",
            &[
                ("property", "mw:pageNamespace"),
                ("content", namespace.to_string().as_str()),
            ],
        );
        dom::append_child(head, &meta);
    }
    if let Some(page_id) = facts.page_id {
        let meta = dom::create_element(
            "meta",
            &[
                ("property", "mw:pageId"),
                ("content", page_id.to_string().as_str()),
            ],
        );
        dom::append_child(head, &meta);
    }
    if let Some(modified) = facts.modified {
        let meta = dom::create_element(
            "meta",
            &[("property", "dc:modified"), ("content", modified)],
        );
        dom::append_child(head, &meta);
    }
    if let Some(title) = facts.title {
        let canonical = format!("//{domain}/wiki/{}", title.replace(' ', "_"));
        let link = dom::create_element(
            "link",
            &[("rel", "dc:isVersionOf"), ("href", canonical.as_str())],
        );
        dom::append_child(head, &link);

        let title_element = dom::create_element("title", &[]);
        dom::append_child(&title_element, &dom::create_text(title));
        dom::append_child(head, &title_element);
    }
    let base_href = format!("//{domain}/wiki/");
    let base = dom::create_element("base", &[("href", base_href.as_str())]);
    dom::append_child(head, &base);
}

fn build_section(
    section: &LegacySection,
    reference_counter: &mut u32,
) -> Result<Handle, TransformError> {
    let element = dom::create_element(
        "section",
        &[("data-mw-section-id", section.id.to_string().as_str())],
    );

    // Section 0 is the content root: raw HTML, no synthesized heading.
    if section.id != 0 {
        if let Some(line) = &section.line {
            let level = section.toclevel.unwrap_or(1).clamp(1, 5) + 1;
            let tag = format!("h{level}");
            let heading = dom::create_element(&tag, &[]);
            if let Some(anchor) = &section.anchor {
                dom::set_attr(&heading, "id", anchor);
            }
            for node in dom::parse_fragment_nodes(line)? {
                dom::append_child(&heading, &node);
            }
            dom::append_child(&element, &heading);
        }
    }

    if let Some(text) = &section.text {
        for node in dom::parse_fragment_nodes(text)? {
            dom::append_child(&element, &node);
        }
    }

    rewrite_wiki_links(&element);
    wrap_image_anchors(&element);
    wrap_reference_lists(&element, reference_counter);

    Ok(element)
}

/// `/wiki/Foo` -> `./Foo`, the relative form the pipeline expects.
fn rewrite_wiki_links(root: &Handle) {
    for anchor in collect_matching(root, |node| {
        dom::is_element_named(node, "a")
            && dom::get_attr(node, "href").is_some_and(|href| href.starts_with("/wiki/"))
    }) {
        if let Some(href) = dom::get_attr(&anchor, "href") {
            if let Some(rest) = href.strip_prefix("/wiki/") {
                dom::set_attr(&anchor, "href", &format!("./{rest}"));
            }
        }
    }
}

/// Wrap anchors whose only content is an image in `<figure>`.
fn wrap_image_anchors(root: &Handle) {
    for anchor in collect_matching(root, |node| {
        if !dom::is_element_named(node, "a") {
            return false;
        }
        let elements = dom::child_elements(node);
        elements.len() == 1
            && dom::is_element_named(&elements[0], "img")
            && dom::text_content(node).trim().is_empty()
    }) {
        if dom::parent_of(&anchor)
            .is_some_and(|parent| dom::is_element_named(&parent, "figure"))
        {
            continue;
        }
        let figure = dom::create_element("figure", &[]);
        dom::insert_before(&anchor, &figure);
        dom::append_child(&figure, &anchor);
    }
}

/// Wrap bare `<ol class="references">` lists in the references-extension
/// wrapper shape, assigning synthetic monotonically increasing `about` ids.
fn wrap_reference_lists(root: &Handle, counter: &mut u32) {
    for list in collect_matching(root, |node| {
        dom::is_element_named(node, "ol") && dom::has_class(node, "references")
    }) {
        let already_wrapped = dom::parent_of(&list).is_some_and(|parent| {
            dom::get_attr(&parent, "typeof")
                .is_some_and(|value| value.contains("mw:Extension/references"))
        });
        if already_wrapped {
            continue;
        }
        let about = format!("#mwt{counter}");
        *counter += 1;
        let wrapper = dom::create_element(
            "div",
            &[
                ("typeof", "mw:Extension/references"),
                ("about", about.as_str()),
            ],
        );
        dom::insert_before(&list, &wrapper);
        dom::append_child(&wrapper, &list);
    }
}

/// Collect matching nodes first, mutate after; wrapping during a walk would
/// corrupt the walk.
fn collect_matching(root: &Handle, predicate: impl Fn(&Handle) -> bool) -> Vec<Handle> {
    fn recurse(node: &Handle, predicate: &impl Fn(&Handle) -> bool, out: &mut Vec<Handle>) {
        if predicate(node) {
            out.push(node.clone());
        }
        let children = node.children.borrow().clone();
        for child in &children {
            recurse(child, predicate, out);
        }
    }
    let mut out = Vec::new();
    recurse(root, &predicate, &mut out);
    out
}

//! Phase 2: structural mutation.
//!
//! Drains the queues in the documented priority order, one structural edit
//! per item, then performs the terminal wrap/inject step. After this phase
//! every queue is empty and the transform value is spent.

use markup5ever_rcdom::{Handle, NodeData};
use tracing::debug;
use url::Url;

use crate::dom;
use crate::error::TransformError;

use super::{images, DocumentTransform};

const EDIT_SECTION_LINK_CLASS: &str = "pcs-edit-section-link";
const SECTION_HIDDEN_CLASS: &str = "pcs-section-hidden";
const REFERENCE_PLACEHOLDER_CLASS: &str = "mw-references-placeholder";
const COLLAPSED_TABLE_CONTENT_CLASS: &str = "pcs-collapse-table-content";

impl DocumentTransform<'_> {
    /// Drain every queue in priority order, then wrap and inject.
    pub fn finalize(&mut self, document: &Handle, body: &Handle) -> Result<(), TransformError> {
        for node in self.removals.drain(..) {
            dom::detach(&node);
        }
        for node in self.references.drain(..) {
            replace_reference_wrapper(&node);
        }
        for node in self.infoboxes.drain(..) {
            collapse_infobox(&node);
        }
        for node in self.red_links.drain(..) {
            replace_red_link(&node);
        }
        for (node, widen) in self.lazy_images.drain(..) {
            images::replace_with_placeholder(&node, widen);
        }

        // Snapshot keeps section processing order stable even though each
        // step mutates the tree.
        let sections: Vec<(i64, Handle)> = std::mem::take(&mut self.sections);
        let headers: Vec<(i64, Handle)> = std::mem::take(&mut self.headers);
        for (id, section) in &sections {
            let header = headers
                .iter()
                .find(|(header_id, _)| header_id == id)
                .map(|(_, header)| header.clone());
            self.finalize_section(*id, section, header);
        }

        self.wrap_and_inject(document, body)
    }

    fn finalize_section(&self, id: i64, section: &Handle, header: Option<Handle>) {
        // Lead section: hoist the first substantial paragraph to the front.
        if id <= 0 {
            hoist_intro_paragraph(section);
        }

        if let Some(header) = header {
            self.wrap_section_header(id, &header);
        }

        if section_is_reference_only(section) {
            dom::add_class(section, SECTION_HIDDEN_CLASS);
        }
    }

    /// Wrap the section's header in an edit-affordance container with a
    /// section-edit link.
    fn wrap_section_header(&self, id: i64, header: &Handle) {
        let wrapper = dom::create_element("div", &[("class", "pcs-edit-section-header")]);
        dom::insert_before(header, &wrapper);
        dom::append_child(&wrapper, header);

        if let Some(title) = &self.meta.link_title {
            let href = format!("/w/index.php?title={title}&action=edit&section={id}");
            let link = dom::create_element(
                "a",
                &[
                    ("href", href.as_str()),
                    ("class", EDIT_SECTION_LINK_CLASS),
                    ("data-id", id.to_string().as_str()),
                ],
            );
            let container =
                dom::create_element("span", &[("class", "pcs-edit-section-link-container")]);
            dom::append_child(&container, &link);
            dom::append_child(&wrapper, &container);
        }
    }

    /// Terminal step: move every body child into a `#pcs` container, then
    /// inject stylesheets, metas, and bootstrap scripts.
    fn wrap_and_inject(&self, document: &Handle, body: &Handle) -> Result<(), TransformError> {
        let container = dom::create_element("div", &[("id", "pcs")]);
        let children: Vec<Handle> = body.children.borrow().clone();
        for child in &children {
            dom::append_child(&container, child);
        }

        let start = dom::create_element("script", &[]);
        dom::append_child(&start, &dom::create_text("pcs.c1.Page.onBodyStart();"));
        dom::append_child(body, &start);
        dom::append_child(body, &container);
        let end = dom::create_element("script", &[]);
        dom::append_child(&end, &dom::create_text("pcs.c1.Page.onBodyEnd();"));
        dom::append_child(body, &end);

        let head = dom::find_head(document).ok_or(TransformError::MissingHead)?;
        let base = Url::parse(&self.meta.base_uri)?;

        for stylesheet in ["data/css/mobile/base", "data/css/mobile/site", "data/css/mobile/pcs"] {
            let href = base.join(stylesheet)?;
            let link = dom::create_element(
                "link",
                &[("rel", "stylesheet"), ("href", href.as_str())],
            );
            dom::append_child(&head, &link);
        }

        let viewport = dom::create_element(
            "meta",
            &[
                ("name", "viewport"),
                (
                    "content",
                    "width=device-width, user-scalable=no, initial-scale=1.0",
                ),
            ],
        );
        dom::append_child(&head, &viewport);

        let mut protections: Vec<(&String, &Vec<String>)> = self.meta.protection.iter().collect();
        protections.sort_by_key(|(action, _)| action.as_str());
        for (action, levels) in protections {
            let property = format!("mw:pageProtection:{action}");
            let meta = dom::create_element(
                "meta",
                &[
                    ("property", property.as_str()),
                    ("content", levels.join(",").as_str()),
                ],
            );
            dom::append_child(&head, &meta);
        }

        if let Some(pronunciation) = &self.meta.pronunciation_url {
            let meta = dom::create_element(
                "meta",
                &[
                    ("property", "mw:pronunciation"),
                    ("content", pronunciation.as_str()),
                ],
            );
            dom::append_child(&head, &meta);
        }

        if let Some(lead_image) = &self.meta.lead_image {
            let meta = dom::create_element(
                "meta",
                &[
                    ("property", "mw:leadImage"),
                    ("content", lead_image.source.as_str()),
                ],
            );
            dom::append_child(&head, &meta);
        }

        let script_url = base.join("data/javascript/mobile/pcs")?;
        let script = dom::create_element("script", &[("src", script_url.as_str())]);
        dom::append_child(&head, &script);

        debug!("finalize phase complete");
        Ok(())
    }
}

/// Swap the references wrapper for a placeholder div keeping only `about`.
fn replace_reference_wrapper(node: &Handle) {
    let placeholder =
        dom::create_element("div", &[("class", REFERENCE_PLACEHOLDER_CLASS)]);
    if let Some(about) = dom::get_attr(node, "about") {
        dom::set_attr(&placeholder, "about", &about);
    }
    dom::replace_with(node, &placeholder);
}

/// Wrap an infobox candidate in a collapsed-table container.
fn collapse_infobox(node: &Handle) {
    if dom::parent_of(node).is_none() {
        // Already gone: an ancestor was removed earlier in the drain.
        return;
    }

    let title = if dom::has_class(node, "infobox") || dom::has_class(node, "infobox_v3") {
        "Quick facts"
    } else {
        "More information"
    };

    let container = dom::create_element("div", &[("class", "pcs-collapse-table-container")]);
    dom::insert_before(node, &container);

    let header = dom::create_element(
        "div",
        &[("class", "pcs-collapse-table-collapsed-container")],
    );
    let strong = dom::create_element("strong", &[]);
    dom::append_child(&strong, &dom::create_text(title));
    dom::append_child(&header, &strong);
    dom::append_child(&container, &header);

    dom::add_class(node, COLLAPSED_TABLE_CONTENT_CLASS);
    dom::append_child(&container, node);

    let footer = dom::create_element(
        "div",
        &[("class", "pcs-collapse-table-collapsed-bottom")],
    );
    dom::append_child(&footer, &dom::create_text("Close"));
    dom::append_child(&container, &footer);
}

/// Replace a red-link anchor with a span carrying the same classes and
/// children.
fn replace_red_link(node: &Handle) {
    let span = dom::create_element("span", &[]);
    if let Some(class) = dom::get_attr(node, "class") {
        dom::set_attr(&span, "class", &class);
    }
    let children: Vec<Handle> = node.children.borrow().clone();
    for child in &children {
        dom::append_child(&span, child);
    }
    dom::replace_with(node, &span);
}

/// Hoist the first substantial paragraph of the lead section to the front.
///
/// A paragraph qualifies when its text, after stripping bracketed and
/// parenthesized runs, still has non-whitespace content. Coordinate lines
/// and pronunciation-only paragraphs fail that probe.
fn hoist_intro_paragraph(section: &Handle) {
    let children: Vec<Handle> = section.children.borrow().clone();
    let candidate = children.iter().find(|child| {
        dom::is_element_named(child, "p")
            && !strip_parentheticals(&dom::text_content(child))
                .trim()
                .is_empty()
    });
    let Some(paragraph) = candidate else {
        return;
    };
    if children
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .is_some_and(|first| std::rc::Rc::ptr_eq(first, paragraph))
    {
        // Already the first element.
        return;
    }
    dom::prepend_child(section, paragraph);
}

/// Remove `(...)` and `[...]` runs, tracking nesting.
fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// A section is reference-only when every element child apart from the
/// header wrapper is a reference placeholder, and any text is whitespace.
fn section_is_reference_only(section: &Handle) -> bool {
    let mut saw_reference = false;
    for child in section.children.borrow().iter() {
        match &child.data {
            NodeData::Element { .. } => {
                if dom::has_class(child, "pcs-edit-section-header") {
                    continue;
                }
                if dom::has_class(child, REFERENCE_PLACEHOLDER_CLASS) {
                    saw_reference = true;
                    continue;
                }
                return false;
            }
            NodeData::Text { contents } => {
                if !contents.borrow().trim().is_empty() {
                    return false;
                }
            }
            _ => {}
        }
    }
    saw_reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PageMetadata;
    use crate::transform;

    fn meta() -> PageMetadata {
        let mut meta = PageMetadata::with_base_uri("https://en.wikipedia.org/api/rest_v1/");
        meta.link_title = Some("Dog".to_string());
        meta
    }

    #[test]
    fn test_reference_placeholder_round_trip() {
        let html = r##"<body><section data-mw-section-id="2">
            <p>before</p>
            <div typeof="mw:Extension/references" about="#mwt7"><ol></ol></div>
            <p>after</p>
        </section></body>"##;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        let section = dom::find_first(&body, "section").unwrap();
        let elements = dom::child_elements(&section);
        // Same position: between the two paragraphs.
        assert!(dom::is_element_named(&elements[0], "p"));
        assert!(dom::has_class(&elements[1], REFERENCE_PLACEHOLDER_CLASS));
        assert_eq!(dom::get_attr(&elements[1], "about").unwrap(), "#mwt7");
        assert!(dom::is_element_named(&elements[2], "p"));
        assert!(dom::find_first(&section, "ol").is_none());
    }

    #[test]
    fn test_infobox_collapse_wrap() {
        let html = r#"<body><section data-mw-section-id="0">
            <table class="infobox"><tbody><tr><td>facts</td></tr></tbody></table>
        </section></body>"#;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        let container = dom::find_first(&body, "div")
            .filter(|d| dom::has_class(d, "pcs-collapse-table-container"));
        let container = container.unwrap_or_else(|| {
            dom::find_first(&body, "section")
                .and_then(|s| {
                    dom::child_elements(&s)
                        .into_iter()
                        .find(|d| dom::has_class(d, "pcs-collapse-table-container"))
                })
                .unwrap()
        });
        let text = dom::text_content(&container);
        assert!(text.contains("Quick facts"));
        assert!(text.contains("Close"));
        let table = dom::find_first(&container, "table").unwrap();
        assert!(dom::has_class(&table, COLLAPSED_TABLE_CONTENT_CLASS));
    }

    #[test]
    fn test_red_link_becomes_span() {
        let html = r#"<body><p><a class="new" href="./Missing">Missing page</a></p></body>"#;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        assert!(dom::find_first(&body, "a").is_none());
        let span = dom::find_first(&body, "span").unwrap();
        assert!(dom::has_class(&span, "new"));
        assert_eq!(dom::text_content(&span), "Missing page");
    }

    #[test]
    fn test_wrap_and_inject_preserves_body_children() {
        let html = r#"<body><section data-mw-section-id="0"><p>a</p></section><section data-mw-section-id="1"><h2>H</h2><p>b</p></section></body>"#;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        let children = dom::child_elements(&body);
        // onBodyStart script, #pcs, onBodyEnd script.
        assert_eq!(children.len(), 3);
        assert_eq!(dom::get_attr(&children[1], "id").unwrap(), "pcs");
        let sections = dom::child_elements(&children[1]);
        assert_eq!(sections.len(), 2);
        assert!(dom::is_element_named(&sections[0], "section"));

        let serialized = dom::serialize_document(&dom).unwrap();
        assert!(serialized.contains("pcs.c1.Page.onBodyStart();"));
        assert!(serialized.contains("pcs.c1.Page.onBodyEnd();"));
        assert!(serialized.contains("data/css/mobile/pcs"));
        assert!(serialized.contains("name=\"viewport\""));
    }

    #[test]
    fn test_section_edit_header() {
        let html = r#"<body><section data-mw-section-id="3"><h2>History</h2><p>x</p></section></body>"#;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        let section = dom::find_first(&body, "section").unwrap();
        let wrapper = dom::child_elements(&section)
            .into_iter()
            .find(|d| dom::has_class(d, "pcs-edit-section-header"))
            .unwrap();
        assert!(dom::find_first(&wrapper, "h2").is_some());
        let link = dom::find_first(&wrapper, "a").unwrap();
        assert_eq!(
            dom::get_attr(&link, "href").unwrap(),
            "/w/index.php?title=Dog&action=edit&section=3"
        );
    }

    #[test]
    fn test_reference_only_section_hidden() {
        let html = r##"<body>
            <section data-mw-section-id="5">
                <h2>References</h2>
                <div typeof="mw:Extension/references" about="#mwt9"></div>
            </section>
            <section data-mw-section-id="6"><h2>Legacy</h2><p>text</p></section>
        </body>"##;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        let pcs = dom::child_elements(&body)
            .into_iter()
            .find(|d| dom::get_attr(d, "id").as_deref() == Some("pcs"))
            .unwrap();
        let sections = dom::child_elements(&pcs);
        assert!(dom::has_class(&sections[0], SECTION_HIDDEN_CLASS));
        assert!(!dom::has_class(&sections[1], SECTION_HIDDEN_CLASS));
    }

    #[test]
    fn test_lead_intro_paragraph_hoisted() {
        let html = r#"<body><section data-mw-section-id="0">
            <p>(coordinates only)</p>
            <table class="infobox"><tbody><tr><td>box</td></tr></tbody></table>
            <p id="intro">A dog is a domesticated animal.</p>
        </section></body>"#;
        let dom = dom::parse_html_document(html).unwrap();
        transform::transform(&dom, &meta()).unwrap();

        let body = dom::find_body(&dom.document).unwrap();
        let section = dom::find_first(&body, "section").unwrap();
        let first = dom::child_elements(&section).remove(0);
        assert_eq!(dom::get_attr(&first, "id").as_deref(), Some("intro"));
    }

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(
            strip_parentheticals("Dog (Canis familiaris) [1] text"),
            "Dog   text"
        );
        assert_eq!(strip_parentheticals("(all gone)").trim(), "");
    }
}

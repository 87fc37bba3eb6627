//! Element classification: one disposition per visited node.
//!
//! Classification is a pure function of the node's tag, id, class list, and
//! inline style at visit time. It never touches the tree; the prepare walk
//! queues the result and the finalize phase acts on it.

use markup5ever_rcdom::Handle;

use crate::dom;

use super::constants;

/// Closed tag dispatch, resolved once per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Anchor,
    Div,
    Heading,
    Image,
    Link,
    Script,
    Section,
    Source,
    Span,
    Table,
    Other,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> ElementKind {
        match tag {
            "a" => ElementKind::Anchor,
            "div" => ElementKind::Div,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => ElementKind::Heading,
            "img" => ElementKind::Image,
            "link" => ElementKind::Link,
            "script" => ElementKind::Script,
            "section" => ElementKind::Section,
            "source" => ElementKind::Source,
            "span" => ElementKind::Span,
            "table" => ElementKind::Table,
            _ => ElementKind::Other,
        }
    }
}

/// What the finalize phase should do with a node. Computed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Remove,
    Reference,
    InfoboxCandidate,
    RedLink,
    LazyLoadImage,
    SectionBoundary,
    HeaderCandidate,
    PassThrough,
}

/// Classify one element, in the fixed precedence order: forced removal,
/// reference wrapper, then tag-specific handling.
pub fn classify(node: &Handle, kind: ElementKind) -> Disposition {
    if is_forced_removal(node, kind) {
        return Disposition::Remove;
    }

    if dom::get_attr(node, "typeof")
        .is_some_and(|value| value.contains(constants::REFERENCE_WRAPPER_TYPEOF))
    {
        return Disposition::Reference;
    }

    match kind {
        ElementKind::Anchor if dom::has_class(node, "new") => Disposition::RedLink,
        ElementKind::Section => Disposition::SectionBoundary,
        ElementKind::Heading => Disposition::HeaderCandidate,
        ElementKind::Image if has_parseable_dimensions(node) => Disposition::LazyLoadImage,
        ElementKind::Div | ElementKind::Table if is_infobox_candidate(node, kind) => {
            Disposition::InfoboxCandidate
        }
        _ => Disposition::PassThrough,
    }
}

fn is_forced_removal(node: &Handle, kind: ElementKind) -> bool {
    if let Some(id) = dom::get_attr(node, "id") {
        if constants::FORBIDDEN_ELEMENT_IDS.contains(&id.as_str()) {
            return true;
        }
    }

    let classes = dom::classes(node);
    if classes
        .iter()
        .any(|class| constants::FORBIDDEN_ELEMENT_CLASSES.contains(&class.as_str()))
    {
        return true;
    }
    if classes.iter().any(|class| {
        constants::FORBIDDEN_ELEMENT_CLASS_SUBSTRINGS
            .iter()
            .any(|substring| class.contains(substring))
    }) {
        return true;
    }

    match kind {
        ElementKind::Div => classes
            .iter()
            .any(|class| constants::FORBIDDEN_DIV_CLASSES.contains(&class.as_str())),
        ElementKind::Span => {
            if classes
                .iter()
                .any(|class| constants::FORBIDDEN_SPAN_CLASSES.contains(&class.as_str()))
            {
                return true;
            }
            let text = dom::text_content(node);
            let trimmed = text.trim();
            // Empty attribute-less spans and bare citation brackets carry
            // no content. Spans with attributes stay: lazy-load
            // placeholders are empty by design.
            let no_attrs = match &node.data {
                markup5ever_rcdom::NodeData::Element { attrs, .. } => attrs.borrow().is_empty(),
                _ => true,
            };
            (trimmed.is_empty() && no_attrs && dom::child_elements(node).is_empty())
                || trimmed == "["
                || trimmed == "]"
        }
        ElementKind::Link => {
            dom::get_attr(node, "rel").as_deref() != Some(constants::KEPT_LINK_REL)
        }
        _ => false,
    }
}

fn has_parseable_dimensions(node: &Handle) -> bool {
    parse_dimension(node, "width").is_some() && parse_dimension(node, "height").is_some()
}

/// Numeric value of a width/height attribute.
pub fn parse_dimension(node: &Handle, attr: &str) -> Option<u32> {
    dom::get_attr(node, attr)?.trim().parse().ok()
}

fn is_infobox_candidate(node: &Handle, kind: ElementKind) -> bool {
    let classes = dom::classes(node);

    // A div must opt in by class; a table is eligible as-is.
    if kind == ElementKind::Div
        && !classes
            .iter()
            .any(|class| constants::INFOBOX_DIV_CLASSES.contains(&class.as_str()))
    {
        return false;
    }

    if classes
        .iter()
        .any(|class| constants::INFOBOX_EXCLUSION_CLASSES.contains(&class.as_str()))
    {
        return false;
    }
    if classes.iter().any(|class| {
        constants::INFOBOX_EXCLUSION_CLASS_SUBSTRINGS
            .iter()
            .any(|substring| class.contains(substring))
    }) {
        return false;
    }

    if let Some(style) = dom::get_attr(node, "style") {
        if constants::style_is_hidden(&style) {
            return false;
        }
    }
    true
}

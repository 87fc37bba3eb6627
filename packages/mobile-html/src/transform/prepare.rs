//! Phase 1: classification walk.
//!
//! Visits element and comment nodes in pre-order, computes one disposition
//! per element, queues structural work, and applies the attribute-only side
//! effects (URL scheme stripping, theme scoping, attribute table removal,
//! synthetic id stripping). Tree shape never changes during this phase.

use std::rc::Rc;

use markup5ever_rcdom::{Handle, NodeData};
use tracing::trace;

use crate::dom;
use crate::dom::walk::{walk, Visitor};

use super::classify::{classify, Disposition, ElementKind};
use super::{constants, images, DocumentTransform};

impl DocumentTransform<'_> {
    /// Run the classification walk over the document body.
    pub fn prepare(&mut self, body: &Handle) {
        walk(body, self);
        trace!(
            removals = self.removals.len(),
            references = self.references.len(),
            infoboxes = self.infoboxes.len(),
            red_links = self.red_links.len(),
            lazy_images = self.lazy_images.len(),
            sections = self.sections.len(),
            "prepare phase complete"
        );
    }

    fn visit_element(&mut self, node: &Handle) {
        let Some(tag) = dom::element_name(node) else {
            return;
        };
        let kind = ElementKind::from_tag(&tag);

        match classify(node, kind) {
            Disposition::Remove => {
                self.removals.push(node.clone());
                return;
            }
            Disposition::Reference => self.references.push(node.clone()),
            Disposition::InfoboxCandidate => self.infoboxes.push(node.clone()),
            Disposition::RedLink => self.red_links.push(node.clone()),
            Disposition::LazyLoadImage => self.visit_image(node),
            Disposition::SectionBoundary => self.register_section(node),
            Disposition::HeaderCandidate => self.register_header(node),
            Disposition::PassThrough => {}
        }

        match kind {
            ElementKind::Anchor => rewrite_anchor(node),
            ElementKind::Link | ElementKind::Script | ElementKind::Source => {
                strip_scheme_attr(node, "href");
                strip_scheme_attr(node, "src");
            }
            _ => {}
        }

        self.apply_theme_scope(node);
        self.apply_widen_scope(node);

        for attr in constants::attributes_to_remove(&tag) {
            dom::remove_attr(node, attr);
        }
        if let Some(id) = dom::get_attr(node, "id") {
            if constants::is_synthetic_id(&id) {
                dom::remove_attr(node, "id");
            }
        }
    }

    /// Down-scale the image in place (attribute mutation only) and queue it
    /// for placeholder replacement. Widening is decided now, while the
    /// ancestor scope is known, and applied in finalize.
    fn visit_image(&mut self, node: &Handle) {
        // The usemap check happens before the attribute removal table drops
        // the attribute.
        let has_usemap = dom::get_attr(node, "usemap").is_some();
        let excluded = self.widen_scope.is_some();

        if !excluded {
            images::scale_down(node);
        }
        let widen = !excluded && !has_usemap;
        self.lazy_images.push((node.clone(), widen));
    }

    fn register_section(&mut self, node: &Handle) {
        let Some(id) = dom::get_attr(node, "data-mw-section-id")
            .and_then(|value| value.trim().parse::<i64>().ok())
        else {
            return;
        };
        if !self.sections.iter().any(|(existing, _)| *existing == id) {
            self.sections.push((id, node.clone()));
        }
        self.section_stack.push((id, node.clone()));
    }

    /// First header wins; a section has at most one registered header.
    fn register_header(&mut self, node: &Handle) {
        let Some((section_id, _)) = self.section_stack.last() else {
            return;
        };
        let section_id = *section_id;
        if !self.headers.iter().any(|(id, _)| *id == section_id) {
            self.headers.push((section_id, node.clone()));
        }
    }

    /// Inside an active theme-exclusion scope every element is tagged
    /// `notheme`; otherwise an element whose inline style sets a concrete
    /// background becomes the new scope owner (first one wins).
    fn apply_theme_scope(&mut self, node: &Handle) {
        if self.theme_scope.is_some() {
            dom::add_class(node, "notheme");
            return;
        }
        if let Some(style) = dom::get_attr(node, "style") {
            if constants::style_sets_background(&style) {
                dom::add_class(node, "notheme");
                self.theme_scope = Some(node.clone());
            }
        }
    }

    fn apply_widen_scope(&mut self, node: &Handle) {
        if self.widen_scope.is_some() {
            return;
        }
        let classes = dom::classes(node);
        if classes
            .iter()
            .any(|class| constants::WIDEN_EXCLUSION_CLASSES.contains(&class.as_str()))
        {
            self.widen_scope = Some(node.clone());
        }
    }
}

impl Visitor for DocumentTransform<'_> {
    fn enter(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Comment { .. } => self.removals.push(node.clone()),
            NodeData::Element { .. } => self.visit_element(node),
            _ => {}
        }
    }

    fn leave(&mut self, node: &Handle) {
        if self
            .theme_scope
            .as_ref()
            .is_some_and(|owner| Rc::ptr_eq(owner, node))
        {
            self.theme_scope = None;
        }
        if self
            .widen_scope
            .as_ref()
            .is_some_and(|owner| Rc::ptr_eq(owner, node))
        {
            self.widen_scope = None;
        }
        if self
            .section_stack
            .last()
            .is_some_and(|(_, section)| Rc::ptr_eq(section, node))
        {
            self.section_stack.pop();
        }
    }
}

/// Strip the scheme from the href and clear `rel` unless it marks an
/// external or nofollow link. Queueing as a red link happened in
/// classification; this is the attribute side of anchor handling.
fn rewrite_anchor(node: &Handle) {
    strip_scheme_attr(node, "href");
    if let Some(rel) = dom::get_attr(node, "rel") {
        if !rel.contains("nofollow") && !rel.contains("mw:ExtLink") {
            dom::remove_attr(node, "rel");
        }
    }
}

/// `https://host/path` -> `//host/path`; leaves everything else alone.
fn strip_scheme_attr(node: &Handle, attr: &str) {
    let Some(value) = dom::get_attr(node, attr) else {
        return;
    };
    let stripped = if let Some(rest) = value.strip_prefix("https://") {
        format!("//{rest}")
    } else if let Some(rest) = value.strip_prefix("http://") {
        format!("//{rest}")
    } else {
        return;
    };
    dom::set_attr(node, attr, &stripped);
}

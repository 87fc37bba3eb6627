//! The document transform pipeline.
//!
//! Two phases over one owned document:
//!
//! 1. [`prepare`](DocumentTransform::prepare) - a single pre-order walk that
//!    classifies every element and comment, queues structural work, and
//!    performs only same-node attribute mutation. Mutating tree shape while
//!    the walk is in progress would corrupt the walk, so nothing structural
//!    happens here.
//! 2. [`finalize`](DocumentTransform::finalize) - drains the queues in a
//!    fixed priority order (removals, references, infoboxes, red links,
//!    lazy images, then the snapshotted section list) performing one
//!    structural mutation per item, then wraps the body in the `#pcs`
//!    container and injects stylesheets, metas, and bootstrap scripts.
//!
//! One [`DocumentTransform`] value owns all queues and scope markers for
//! exactly one document; it is not reused.

pub mod classify;
pub mod constants;
pub mod images;

mod finalize;
mod prepare;

use markup5ever_rcdom::{Handle, RcDom};

use crate::dom;
use crate::error::TransformError;
use crate::metadata::PageMetadata;

/// One transform run's working state.
pub struct DocumentTransform<'a> {
    meta: &'a PageMetadata,
    removals: Vec<Handle>,
    references: Vec<Handle>,
    infoboxes: Vec<Handle>,
    red_links: Vec<Handle>,
    /// Image plus its widen eligibility, decided at visit time.
    lazy_images: Vec<(Handle, bool)>,
    /// Section registry in registration order, first-wins per id.
    sections: Vec<(i64, Handle)>,
    /// First-wins header per section id.
    headers: Vec<(i64, Handle)>,
    theme_scope: Option<Handle>,
    widen_scope: Option<Handle>,
    /// Ids of the sections currently being descended into.
    section_stack: Vec<(i64, Handle)>,
}

impl<'a> DocumentTransform<'a> {
    pub fn new(meta: &'a PageMetadata) -> Self {
        Self {
            meta,
            removals: Vec::new(),
            references: Vec::new(),
            infoboxes: Vec::new(),
            red_links: Vec::new(),
            lazy_images: Vec::new(),
            sections: Vec::new(),
            headers: Vec::new(),
            theme_scope: None,
            widen_scope: None,
            section_stack: Vec::new(),
        }
    }

    /// True when every work queue and the section registry have been
    /// drained.
    pub fn queues_empty(&self) -> bool {
        self.pending_structural_work() == 0 && self.sections.is_empty()
    }

    /// Queued structural mutations across the five work queues. The section
    /// registry is counted separately: sections persist in the output, so a
    /// re-classification of a finalized document registers them again.
    pub fn pending_structural_work(&self) -> usize {
        self.removals.len()
            + self.references.len()
            + self.infoboxes.len()
            + self.red_links.len()
            + self.lazy_images.len()
    }
}

/// Transform a parsed Parsoid document into mobile-ready form, in place.
pub fn transform(dom: &RcDom, meta: &PageMetadata) -> Result<(), TransformError> {
    let body = dom::find_body(&dom.document).ok_or(TransformError::MissingBody)?;
    let mut run = DocumentTransform::new(meta);
    run.prepare(&body);
    run.finalize(&dom.document, &body)
}

/// Parse, transform, and serialize in one call.
pub fn transform_to_string(html: &str, meta: &PageMetadata) -> Result<String, TransformError> {
    let dom = dom::parse_html_document(html)?;
    transform(&dom, meta)?;
    Ok(dom::serialize_document(&dom)?)
}

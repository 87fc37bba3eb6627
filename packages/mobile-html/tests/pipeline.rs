//! End-to-end pipeline tests over a realistic article document.

use mobile_html::dom;
use mobile_html::transform::{self, DocumentTransform};
use mobile_html::PageMetadata;

const ARTICLE: &str = r##"<!DOCTYPE html>
<html>
<head><title>Dog</title></head>
<body>
    <section data-mw-section-id="0">
        <span id="coordinates">57&#176;N 2&#176;W</span>
        <table class="infobox"><tbody><tr><td>Canis familiaris</td></tr></tbody></table>
        <p id="intro">The dog is a domesticated descendant of the wolf.</p>
        <!-- parser metadata -->
    </section>
    <section data-mw-section-id="1">
        <h2 id="History">History</h2>
        <p>Dogs were domesticated <a rel="mw:WikiLink" href="./Prehistory">long ago</a>
           by <a class="new" href="./Unknown_people">unknown people</a>.</p>
        <img src="//upload.wikimedia.org/thumb/a/ab/Dog.jpg/1024px-Dog.jpg"
             width="1024" height="768">
        <div class="navbox-styles"><p>navigation</p></div>
    </section>
    <section data-mw-section-id="2">
        <h2 id="References">References</h2>
        <div typeof="mw:Extension/references" about="#mwt7"><ol><li>ref one</li></ol></div>
    </section>
</body>
</html>"##;

fn metadata() -> PageMetadata {
    let mut meta = PageMetadata::with_base_uri("https://en.wikipedia.org/api/rest_v1/");
    meta.link_title = Some("Dog".to_string());
    meta
}

#[test]
fn test_transform_produces_pcs_wrapped_document() {
    let html = transform::transform_to_string(ARTICLE, &metadata()).unwrap();

    assert!(html.contains(r#"<div id="pcs">"#));
    assert!(html.contains("pcs.c1.Page.onBodyStart();"));
    assert!(html.contains("pcs.c1.Page.onBodyEnd();"));
    assert!(html.contains("data/css/mobile/base"));
    assert!(html.contains("data/css/mobile/site"));
    assert!(html.contains("data/css/mobile/pcs"));

    // Forced removals are gone.
    assert!(!html.contains("coordinates"));
    assert!(!html.contains("navbox"));
    assert!(!html.contains("parser metadata"));

    // The infobox is collapsed, the image lazy, the reference list a
    // placeholder, the red link a span.
    assert!(html.contains("pcs-collapse-table-container"));
    assert!(html.contains("Quick facts"));
    assert!(html.contains("pcs-lazy-load-placeholder"));
    assert!(html.contains(r##"class="mw-references-placeholder" about="#mwt7""##));
    assert!(!html.contains(r#"class="new" href"#));
}

#[test]
fn test_queue_exhaustion_and_body_child_preservation() {
    let dom = dom::parse_html_document(ARTICLE).unwrap();
    let body = dom::find_body(&dom.document).unwrap();
    let original_ids: Vec<String> = dom::child_elements(&body)
        .iter()
        .filter_map(|child| dom::get_attr(child, "data-mw-section-id"))
        .collect();

    let meta = metadata();
    let mut run = DocumentTransform::new(&meta);
    run.prepare(&body);
    run.finalize(&dom.document, &body).unwrap();
    assert!(run.queues_empty());

    // Every original body child lives in #pcs exactly once, in order.
    let pcs = dom::child_elements(&body)
        .into_iter()
        .find(|child| dom::get_attr(child, "id").as_deref() == Some("pcs"))
        .unwrap();
    let wrapped_ids: Vec<String> = dom::child_elements(&pcs)
        .iter()
        .filter_map(|child| dom::get_attr(child, "data-mw-section-id"))
        .collect();
    assert_eq!(wrapped_ids, original_ids);
}

#[test]
fn test_finalized_document_is_a_classification_fixed_point() {
    let dom = dom::parse_html_document(ARTICLE).unwrap();
    let body = dom::find_body(&dom.document).unwrap();
    let meta = metadata();

    let mut first = DocumentTransform::new(&meta);
    first.prepare(&body);
    first.finalize(&dom.document, &body).unwrap();

    // Re-classifying the finalized document queues no further structural
    // work: every remaining node is pass-through.
    let mut second = DocumentTransform::new(&meta);
    second.prepare(&body);
    assert_eq!(second.pending_structural_work(), 0);
}

#[test]
fn test_scaled_image_is_in_the_placeholder() {
    let html = transform::transform_to_string(ARTICLE, &metadata()).unwrap();
    // 1024 scales to the 960 bucket; the placeholder carries the rewritten
    // source and dimensions.
    assert!(html.contains("/960px-Dog.jpg"));
    assert!(html.contains(r#"data-width="960""#));
    assert!(html.contains(r#"data-height="720""#));
}

#[test]
fn test_reference_only_section_is_hidden() {
    let html = transform::transform_to_string(ARTICLE, &metadata()).unwrap();
    assert!(html.contains("pcs-section-hidden"));
}

#[test]
fn test_legacy_document_feeds_the_same_pipeline() {
    let payload = r#"{
        "mobileview": {
            "normalizedtitle": "Dog",
            "id": 4269567,
            "ns": 0,
            "sections": [
                {"id": 0, "text": "<p>The <a href=\"/wiki/Dog\">dog</a>.</p>"},
                {"id": 1, "toclevel": 1, "anchor": "Refs", "line": "Refs",
                 "text": "<ol class=\"references\"><li>r</li></ol>"}
            ]
        }
    }"#;
    let response: mobile_html::legacy::MobileViewResponse =
        serde_json::from_str(payload).unwrap();
    let dom =
        mobile_html::legacy::document_from_mobile_view(&response.mobileview, "en.wikipedia.org")
            .unwrap();

    transform::transform(&dom, &metadata()).unwrap();
    let html = dom::serialize_document(&dom).unwrap();

    assert!(html.contains(r#"<div id="pcs">"#));
    // The synthesized reference wrapper became a placeholder with its
    // synthetic id.
    assert!(html.contains(r##"class="mw-references-placeholder" about="#mwt1""##));
    assert!(html.contains(r#"href="./Dog""#));
}

//! Page metadata supplied alongside the document being transformed.

use serde::Deserialize;
use std::collections::HashMap;

/// Configuration and page facts the transform consumes.
///
/// `base_uri` is required (stylesheet and script URLs are resolved against
/// it); everything else is optional and simply skipped when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMetadata {
    /// Base REST API URI, e.g. `https://en.wikipedia.org/api/rest_v1/`
    #[serde(rename = "baseURI")]
    pub base_uri: String,
    /// Canonical title used to build section-edit URLs
    #[serde(rename = "linkTitle", default)]
    pub link_title: Option<String>,
    #[serde(rename = "displayTitle", default)]
    pub display_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "descriptionSource", default)]
    pub description_source: Option<String>,
    /// Protection levels keyed by action (`edit`, `move`, ...)
    #[serde(default)]
    pub protection: HashMap<String, Vec<String>>,
    #[serde(rename = "leadImage", default)]
    pub lead_image: Option<LeadImage>,
    #[serde(rename = "pronunciationURL", default)]
    pub pronunciation_url: Option<String>,
    #[serde(rename = "pageId", default)]
    pub page_id: Option<u64>,
    #[serde(default)]
    pub revision: Option<u64>,
    #[serde(default)]
    pub namespace: Option<i64>,
    /// Last-modified timestamp, ISO-8601
    #[serde(default)]
    pub modified: Option<String>,
}

impl PageMetadata {
    /// Minimal metadata: just the base URI.
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            link_title: None,
            display_title: None,
            description: None,
            description_source: None,
            protection: HashMap::new(),
            lead_image: None,
            pronunciation_url: None,
            page_id: None,
            revision: None,
            namespace: None,
            modified: None,
        }
    }
}

/// The article's lead image, as the summary endpoint describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadImage {
    pub source: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_decodes_with_defaults() {
        let meta: PageMetadata = serde_json::from_str(
            r#"{"baseURI": "https://en.wikipedia.org/api/rest_v1/"}"#,
        )
        .unwrap();
        assert!(meta.link_title.is_none());
        assert!(meta.protection.is_empty());
    }

    #[test]
    fn test_metadata_decodes_full_block() {
        let meta: PageMetadata = serde_json::from_str(
            r#"{
                "baseURI": "https://en.wikipedia.org/api/rest_v1/",
                "linkTitle": "Dog",
                "displayTitle": "Dog",
                "protection": {"edit": ["autoconfirmed"]},
                "leadImage": {"source": "https://upload.wikimedia.org/a.jpg", "width": 640},
                "pageId": 4269567,
                "namespace": 0
            }"#,
        )
        .unwrap();
        assert_eq!(meta.link_title.as_deref(), Some("Dog"));
        assert_eq!(meta.protection["edit"], ["autoconfirmed"]);
        assert_eq!(meta.lead_image.unwrap().width, Some(640));
    }
}

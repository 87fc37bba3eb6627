//! Error types for the document transform and legacy adapter.

use thiserror::Error;

/// Failures that abort a transform or adapter run.
///
/// Cosmetic problems (malformed inline CSS, a widen attempt that cannot
/// complete) never surface here; they are absorbed with safe defaults and
/// logged at debug level.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Reading or writing document bytes failed
    #[error("document I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The parsed document has no `<body>` element
    #[error("document has no body element")]
    MissingBody,

    /// The parsed document has no `<head>` element
    #[error("document has no head element")]
    MissingHead,

    /// The configured base API URI does not parse
    #[error("invalid base URI: {0}")]
    BaseUri(#[from] url::ParseError),
}

//! Error types for HTML post-processing.

use std::error::Error as StdError;

/// Fatal error for one post-process call. No partial output is produced.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PostProcessError {
    /// The fragment could not be parsed.
    #[error("PostProcess: invalid HTML, {0}")]
    Parse(#[from] quick_xml::Error),

    /// The fragment contains bytes that are not valid in its encoding.
    #[error("PostProcess: invalid HTML, {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Writing the processed tree back to markup failed.
    #[error("PostProcess: error rendering processed HTML, {0}")]
    Render(#[from] std::fmt::Error),
}

/// Error building [`MarkupSettings`](crate::MarkupSettings).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The base URL is empty.
    #[error("application URL cannot be empty")]
    EmptyUrl,

    /// The pattern derived from the base URL did not compile.
    #[error("invalid issue URL pattern")]
    Pattern(#[from] regex::Error),
}

/// Outcome of a failed commit lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The revision does not exist in the repository. Expected and silent.
    #[error("no such revision: {0}")]
    NotFound(String),

    /// The lookup itself failed.
    #[error("commit lookup failed: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

impl LookupError {
    /// Wrap a backend failure.
    pub fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

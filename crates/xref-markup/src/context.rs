//! Per-call post-processing context.

use std::collections::HashMap;
use std::path::Path;

use crate::lookup::CommitResolver;
use crate::processor::ProcessorChain;
use crate::settings::MarkupSettings;

/// Repository metadata keyed by name (`user`, `repo`, `style`, ...).
pub type Metas = HashMap<String, String>;

/// Owner of the current repository.
pub const META_USER: &str = "user";
/// Name of the current repository.
pub const META_REPO: &str = "repo";
/// Issue naming style, see [`IssueStyle`].
pub const META_STYLE: &str = "style";
/// External issue tracker URL template, e.g. `https://tracker.example/{user}/{index}`.
pub const META_FORMAT: &str = "format";
/// Filesystem path of the repository, used for commit lookups.
pub const META_REPO_PATH: &str = "repoPath";

/// How issues of the current repository are referenced in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueStyle {
    /// `#123`
    #[default]
    Numeric,
    /// `ABC-123`
    Alphanumeric,
}

impl IssueStyle {
    /// Parse the `style` metadata value; anything unknown is numeric.
    #[must_use]
    pub fn from_meta(value: Option<&str>) -> Self {
        match value {
            Some("alphanumeric") => Self::Alphanumeric,
            _ => Self::Numeric,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Alphanumeric => "alphanumeric",
        }
    }
}

/// Everything a processor may consult while rewriting one document.
///
/// Nothing in here is mutated during a call.
pub(crate) struct RenderContext<'a> {
    pub(crate) settings: &'a MarkupSettings,
    pub(crate) metas: Option<&'a Metas>,
    pub(crate) url_prefix: &'a str,
    pub(crate) wiki: bool,
    pub(crate) resolver: &'a dyn CommitResolver,
    pub(crate) chain: &'a ProcessorChain,
}

impl RenderContext<'_> {
    /// Metadata value, treating absent metadata like a missing key.
    pub(crate) fn meta(&self, key: &str) -> Option<&str> {
        self.metas?.get(key).map(String::as_str)
    }

    /// Metadata value that must be present and non-empty.
    pub(crate) fn required_meta(&self, key: &str) -> Option<&str> {
        self.meta(key).filter(|value| !value.is_empty())
    }

    pub(crate) fn repo_path(&self) -> Option<&Path> {
        self.required_meta(META_REPO_PATH).map(Path::new)
    }
}

//! Process-wide settings derived from the application base URL.

use regex::Regex;

use crate::error::SettingsError;
use crate::url::host;

/// Settings shared by every post-process call.
///
/// Built once at startup from the application base URL and passed into the
/// [`PostProcessor`](crate::PostProcessor). The full issue URL pattern depends
/// on the base URL, so it is compiled here rather than on each call.
#[derive(Debug, Clone)]
pub struct MarkupSettings {
    app_url: String,
    app_host: Option<String>,
    issue_full_pattern: Regex,
}

impl MarkupSettings {
    /// Build settings for the application served at `app_url`.
    ///
    /// A trailing `/` is added to the URL when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if `app_url` is empty.
    pub fn new(app_url: &str) -> Result<Self, SettingsError> {
        if app_url.is_empty() {
            return Err(SettingsError::EmptyUrl);
        }
        let mut app_url = app_url.to_owned();
        if !app_url.ends_with('/') {
            app_url.push('/');
        }

        let issue_full_pattern = Regex::new(&format!(
            r"{}[[:word:]]+/[[:word:]]+/(?:issues|pulls)/((?:[[:word:]]{{1,10}}-)?[1-9][0-9]*)([\?|#][^[:space:]]+.([^[:space:]]+)?)?(?-u:\b)",
            regex::escape(&app_url)
        ))?;

        Ok(Self {
            app_host: host(&app_url).map(str::to_owned),
            app_url,
            issue_full_pattern,
        })
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    pub(crate) fn issue_full_pattern(&self) -> &Regex {
        &self.issue_full_pattern
    }

    /// Whether `url` points at this application.
    ///
    /// Root-relative paths are always same-domain; absolute URLs must share
    /// the base URL's host.
    #[must_use]
    pub fn is_same_domain(&self, url: &str) -> bool {
        if url.starts_with('/') {
            return true;
        }
        match (host(url), self.app_host.as_deref()) {
            (Some(host), Some(app_host)) => host == app_host,
            _ => false,
        }
    }
}

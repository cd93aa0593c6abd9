//! Entry points: parse, rewrite, serialize.

use crate::context::{Metas, RenderContext};
use crate::error::PostProcessError;
use crate::lookup::{CommitResolver, NoCommits};
use crate::parser::FragmentParser;
use crate::processor::ProcessorChain;
use crate::serializer::HtmlSerializer;
use crate::settings::MarkupSettings;
use crate::walker::walk;

/// Rewrites references in rendered HTML fragments into links.
///
/// Holds the process-wide settings and the commit resolver; every call
/// builds its own document, so one instance can serve concurrent callers.
///
/// # Example
///
/// ```
/// use xref_markup::{MarkupSettings, PostProcessor};
///
/// let settings = MarkupSettings::new("https://git.example/").unwrap();
/// let processor = PostProcessor::new(settings);
///
/// let html = processor.post_process("<p>ping @alice</p>", "", None, false).unwrap();
/// assert_eq!(html, r#"<p>ping <a href="https://git.example/alice">@alice</a></p>"#);
/// ```
pub struct PostProcessor {
    settings: MarkupSettings,
    resolver: Box<dyn CommitResolver>,
}

impl PostProcessor {
    /// Create a post-processor that never links short commit hashes.
    #[must_use]
    pub fn new(settings: MarkupSettings) -> Self {
        Self {
            settings,
            resolver: Box::new(NoCommits),
        }
    }

    /// Use `resolver` to confirm short commit hashes.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl CommitResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &MarkupSettings {
        &self.settings
    }

    /// Rewrite `html` with the default chain.
    ///
    /// Relative shortlinks resolve against `url_prefix`; `wiki` places them
    /// under `wiki/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `html` cannot be parsed or serialized.
    pub fn post_process(
        &self,
        html: &str,
        url_prefix: &str,
        metas: Option<&Metas>,
        wiki: bool,
    ) -> Result<String, PostProcessError> {
        self.process_with(&ProcessorChain::default(), html, url_prefix, metas, wiki)
    }

    /// Rewrite a rendered commit message.
    ///
    /// Shortlinks are not recognized. With a non-empty `default_link`, every
    /// text node that is not already part of a link points there, including
    /// the empty node left in front of a leading reference.
    ///
    /// # Errors
    ///
    /// Returns an error if `html` cannot be parsed or serialized.
    pub fn render_commit_message(
        &self,
        html: &str,
        url_prefix: &str,
        default_link: &str,
        metas: Option<&Metas>,
    ) -> Result<String, PostProcessError> {
        let chain = ProcessorChain::commit_message(Some(default_link));
        self.process_with(&chain, html, url_prefix, metas, false)
    }

    /// Rewrite a repository description: bare URLs only, opened in a new
    /// window without a referrer.
    ///
    /// # Errors
    ///
    /// Returns an error if `html` cannot be parsed or serialized.
    pub fn render_description(
        &self,
        html: &str,
        url_prefix: &str,
        metas: Option<&Metas>,
    ) -> Result<String, PostProcessError> {
        self.process_with(&ProcessorChain::description(), html, url_prefix, metas, false)
    }

    /// Rewrite `html` with an explicit processor chain.
    ///
    /// # Errors
    ///
    /// Returns an error if `html` cannot be parsed or serialized. No partial
    /// output is produced.
    pub fn process_with(
        &self,
        chain: &ProcessorChain,
        html: &str,
        url_prefix: &str,
        metas: Option<&Metas>,
        wiki: bool,
    ) -> Result<String, PostProcessError> {
        let mut doc = FragmentParser::new().parse(html)?;

        let ctx = RenderContext {
            settings: &self.settings,
            metas,
            url_prefix,
            wiki,
            resolver: self.resolver.as_ref(),
            chain,
        };
        let root = doc.root();
        walk(&mut doc, root, &ctx);

        let output = HtmlSerializer::new().serialize(&doc)?;
        tracing::debug!(
            chain = chain.kind().as_str(),
            input_len = html.len(),
            output_len = output.len(),
            "Post-processed HTML"
        );
        Ok(output)
    }
}

impl std::fmt::Debug for PostProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessor")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

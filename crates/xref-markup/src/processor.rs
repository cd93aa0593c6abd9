//! Processors and the chains that order them.
//!
//! A processor looks for the leftmost occurrence of its pattern in the
//! current payload of a text node. The chain runs every processor once per
//! text node, in order; after a splice the node only holds the text before
//! the match, so later processors see that prefix and the rest is picked up
//! when the walker reaches the new sibling nodes.

use std::fmt::Write;

use regex::{Captures, Match};

use crate::context::{
    IssueStyle, META_FORMAT, META_REPO, META_STYLE, META_USER, Metas, RenderContext,
};
use crate::error::LookupError;
use crate::fragment::Fragment;
use crate::patterns::{
    ANY_SHA1_PATTERN, CROSS_REFERENCE_PATTERN, EMAIL_PATTERN, ISSUE_ALPHANUMERIC_PATTERN,
    ISSUE_NUMERIC_PATTERN, MENTION_PATTERN, SHA1_CURRENT_PATTERN, SHORT_LINK_PATTERN,
    TEMPLATE_KEY_PATTERN, find_link, short_sha,
};
use crate::shortlink::{self, ShortLinkProps};
use crate::tree::{Document, NodeId};
use crate::url::join;

/// What a processor does with a text node it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Replace `start..end` of the payload with `replacement`.
    Splice {
        start: usize,
        end: usize,
        replacement: Fragment,
    },
    /// Turn the whole node into a link to `href`.
    Wrap { href: String },
}

impl Outcome {
    fn splice(range: Match<'_>, replacement: Fragment) -> Self {
        Self::Splice {
            start: range.start(),
            end: range.end(),
            replacement,
        }
    }
}

/// A single text matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processor {
    /// `[[name|link|key=value]]` links and images.
    ShortLink,
    /// Issue and pull request URLs on the application host.
    FullIssue,
    /// URLs containing a full commit hash.
    FullCommit,
    /// Bare `http`/`https` URLs.
    Link,
    /// `@user` mentions.
    Mention,
    /// `#123` or `ABC-123` references into the current repository.
    IssueIndex,
    /// `owner/repo#123` references.
    CrossReference,
    /// Abbreviated or full commit hashes confirmed by the commit resolver.
    ShortCommit,
    /// Email addresses.
    Email,
    /// Whatever text is left becomes a link to the given URL.
    DefaultLink(String),
    /// Bare URLs opened in a new window without a referrer.
    DescriptionLink,
}

impl Processor {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShortLink => "short_link",
            Self::FullIssue => "full_issue",
            Self::FullCommit => "full_commit",
            Self::Link => "link",
            Self::Mention => "mention",
            Self::IssueIndex => "issue_index",
            Self::CrossReference => "cross_reference",
            Self::ShortCommit => "short_commit",
            Self::Email => "email",
            Self::DefaultLink(_) => "default_link",
            Self::DescriptionLink => "description_link",
        }
    }

    pub(crate) fn find(&self, text: &str, ctx: &RenderContext<'_>) -> Option<Outcome> {
        match self {
            Self::ShortLink => short_link(text, ctx),
            Self::FullIssue => full_issue(text, ctx),
            Self::FullCommit => full_commit(text, ctx),
            Self::Link => {
                let (start, end) = find_link(text)?;
                let uri = &text[start..end];
                Some(Outcome::Splice {
                    start,
                    end,
                    replacement: Fragment::link(uri, uri),
                })
            }
            Self::Mention => {
                let m = MENTION_PATTERN.captures(text)?.get(1)?;
                let href = join(ctx.settings.app_url(), &[&m.as_str()[1..]]);
                Some(Outcome::splice(m, Fragment::link(href, m.as_str())))
            }
            Self::IssueIndex => issue_index(text, ctx),
            Self::CrossReference => {
                let m = CROSS_REFERENCE_PATTERN.captures(text)?.get(1)?;
                let (repo, index) = m.as_str().split_once('#')?;
                let href = join(ctx.settings.app_url(), &[repo, "issues", index]);
                Some(Outcome::splice(m, Fragment::link(href, m.as_str())))
            }
            Self::ShortCommit => short_commit(text, ctx),
            Self::Email => {
                let m = EMAIL_PATTERN.captures(text)?.get(1)?;
                let href = format!("mailto:{}", m.as_str());
                Some(Outcome::splice(m, Fragment::link(href, m.as_str())))
            }
            Self::DefaultLink(href) => Some(Outcome::Wrap { href: href.clone() }),
            Self::DescriptionLink => {
                let (start, end) = find_link(text)?;
                let uri = &text[start..end];
                Some(Outcome::Splice {
                    start,
                    end,
                    replacement: Fragment::description_link(uri, uri),
                })
            }
        }
    }
}

fn short_link(text: &str, ctx: &RenderContext<'_>) -> Option<Outcome> {
    let caps = SHORT_LINK_PATTERN.captures(text)?;
    let whole = caps.get(0)?;
    let props = ShortLinkProps::parse(&caps[1]);
    let replacement = shortlink::render(&props, &caps[2], ctx);
    Some(Outcome::splice(whole, replacement))
}

fn full_issue(text: &str, ctx: &RenderContext<'_>) -> Option<Outcome> {
    ctx.metas?;
    let caps = ctx.settings.issue_full_pattern().captures(text)?;
    let whole = caps.get(0)?;
    let link = whole.as_str();
    let index = &caps[1];

    // `.../{owner}/{repo}/issues/{index}`
    let mut segments = link.rsplit('/').skip(2);
    let repo = segments.next()?;
    let owner = segments.next()?;

    let label = if ctx.meta(META_USER) == Some(owner) && ctx.meta(META_REPO) == Some(repo) {
        format!("#{index}")
    } else {
        format!("{owner}/{repo}#{index}")
    };
    Some(Outcome::splice(whole, Fragment::link(link, label)))
}

fn full_commit(text: &str, ctx: &RenderContext<'_>) -> Option<Outcome> {
    ctx.metas?;
    let caps = ANY_SHA1_PATTERN.captures(text)?;
    let whole = caps.get(0)?;

    let mut url = whole.as_str();
    let mut end = whole.end();
    let mut subpath = caps.get(2).map_or("", |m| m.as_str());
    let mut fragment = caps.get(3).map_or("", |m| &m.as_str()[1..]);

    // A trailing `.` most likely ends the sentence.
    if let Some(trimmed) = url.strip_suffix('.') {
        url = trimmed;
        end -= 1;
        if let Some(trimmed) = fragment.strip_suffix('.') {
            fragment = trimmed;
        } else if let Some(trimmed) = subpath.strip_suffix('.') {
            subpath = trimmed;
        }
    }

    let mut label = format!("{}{subpath}", short_sha(&caps[1]));
    if !fragment.is_empty() {
        let _ = write!(label, " ({fragment})");
    }

    Some(Outcome::Splice {
        start: whole.start(),
        end,
        replacement: Fragment::code_link(url, label),
    })
}

fn issue_index(text: &str, ctx: &RenderContext<'_>) -> Option<Outcome> {
    let metas = ctx.metas?;
    let style = IssueStyle::from_meta(ctx.meta(META_STYLE));
    let pattern = match style {
        IssueStyle::Numeric => &*ISSUE_NUMERIC_PATTERN,
        IssueStyle::Alphanumeric => &*ISSUE_ALPHANUMERIC_PATTERN,
    };

    let m = pattern.captures(text)?.get(1)?;
    let id = m.as_str();
    let index = match style {
        IssueStyle::Numeric => &id[1..],
        IssueStyle::Alphanumeric => id,
    };

    let href = match metas.get(META_FORMAT) {
        Some(format) => expand_template(format, metas, index),
        None => join(
            ctx.settings.app_url(),
            &[
                ctx.meta(META_USER).unwrap_or_default(),
                ctx.meta(META_REPO).unwrap_or_default(),
                "issues",
                index,
            ],
        ),
    };
    Some(Outcome::splice(m, Fragment::link(href, id)))
}

/// Fill `{key}` placeholders from `metas`, with `{index}` set to `index`.
///
/// Unknown placeholders are left as they are.
fn expand_template(template: &str, metas: &Metas, index: &str) -> String {
    TEMPLATE_KEY_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            if key == "index" {
                return index.to_owned();
            }
            metas
                .get(key)
                .map_or_else(|| caps[0].to_owned(), String::clone)
        })
        .into_owned()
}

fn short_commit(text: &str, ctx: &RenderContext<'_>) -> Option<Outcome> {
    let user = ctx.required_meta(META_USER)?;
    let repo = ctx.required_meta(META_REPO)?;
    let repo_path = ctx.repo_path()?;

    let m = SHA1_CURRENT_PATTERN.captures(text)?.get(1)?;
    let hash = m.as_str();

    // A hex word is only a commit if the repository says so.
    match ctx.resolver.resolve(repo_path, hash) {
        Ok(()) => {}
        Err(LookupError::NotFound(_)) => return None,
        Err(e) => {
            tracing::debug!(hash, repo_path = %repo_path.display(), error = %e, "Commit lookup failed");
            return None;
        }
    }

    let href = join(ctx.settings.app_url(), &[user, repo, "commit", hash]);
    Some(Outcome::splice(m, Fragment::code_link(href, short_sha(hash))))
}

/// Which entry point a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    /// General post-processing.
    Default,
    /// Commit messages: no shortlinks, optional default link.
    CommitMessage,
    /// Descriptions: safe bare links only.
    Description,
}

impl ChainKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CommitMessage => "commit_message",
            Self::Description => "description",
        }
    }
}

/// Ordered list of processors; earlier ones have first claim on the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorChain {
    kind: ChainKind,
    processors: Vec<Processor>,
}

impl ProcessorChain {
    /// Chain for commit messages.
    ///
    /// With a non-empty `default_link`, any text left over after the other
    /// processors becomes a link to it.
    #[must_use]
    pub fn commit_message(default_link: Option<&str>) -> Self {
        let mut processors = vec![
            Processor::FullIssue,
            Processor::FullCommit,
            Processor::Link,
            Processor::Mention,
            Processor::IssueIndex,
            Processor::CrossReference,
            Processor::ShortCommit,
            Processor::Email,
        ];
        if let Some(link) = default_link.filter(|link| !link.is_empty()) {
            processors.push(Processor::DefaultLink(link.to_owned()));
        }
        Self {
            kind: ChainKind::CommitMessage,
            processors,
        }
    }

    /// Chain for descriptions.
    #[must_use]
    pub fn description() -> Self {
        Self {
            kind: ChainKind::Description,
            processors: vec![Processor::DescriptionLink],
        }
    }

    #[must_use]
    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    #[must_use]
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Run every processor once against the text node `node`.
    pub(crate) fn run(&self, doc: &mut Document, node: NodeId, ctx: &RenderContext<'_>) {
        for processor in &self.processors {
            // A wrap turns the node into an element.
            let Some(text) = doc.text(node) else {
                return;
            };
            let Some(outcome) = processor.find(text, ctx) else {
                continue;
            };

            tracing::trace!(processor = processor.name(), "Matched");
            match outcome {
                Outcome::Splice {
                    start,
                    end,
                    replacement,
                } => doc.splice(node, start, end, replacement),
                Outcome::Wrap { href } => doc.wrap_in_link(node, &href),
            }
        }
    }
}

impl Default for ProcessorChain {
    /// Chain for general post-processing.
    fn default() -> Self {
        Self {
            kind: ChainKind::Default,
            processors: vec![
                Processor::ShortLink,
                Processor::FullIssue,
                Processor::FullCommit,
                Processor::Link,
                Processor::Mention,
                Processor::IssueIndex,
                Processor::CrossReference,
                Processor::ShortCommit,
                Processor::Email,
            ],
        }
    }
}

//! Post-processing of rendered HTML.
//!
//! Rewrites references in HTML produced by a markdown renderer into links:
//! `@user` mentions, `#123` and `owner/repo#123` issue references, issue and
//! commit URLs, commit hashes, `[[shortlinks]]`, bare URLs and email
//! addresses.
//!
//! # Architecture
//!
//! - [`FragmentParser`] parses the fragment into an arena [`Document`]
//! - a walker visits every text node outside `a`, `code` and `pre`
//! - a [`ProcessorChain`] runs each [`Processor`] once per text node; a match
//!   is spliced into the tree and the remaining text becomes a new sibling
//!   that is visited next
//! - [`HtmlSerializer`] writes the tree back without the wrapper element
//!
//! Short commit hashes are only linked when a [`CommitResolver`] confirms
//! them; the `xref-vcs` crate provides one backed by git.
//!
//! # Example
//!
//! ```
//! use xref_markup::{MarkupSettings, Metas, PostProcessor};
//!
//! let processor = PostProcessor::new(MarkupSettings::new("https://git.example").unwrap());
//!
//! let mut metas = Metas::new();
//! metas.insert("user".to_owned(), "acme".to_owned());
//! metas.insert("repo".to_owned(), "widget".to_owned());
//!
//! let html = processor
//!     .post_process("<p>Closes #12</p>", "/acme/widget", Some(&metas), false)
//!     .unwrap();
//! assert_eq!(
//!     html,
//!     r#"<p>Closes <a href="https://git.example/acme/widget/issues/12">#12</a></p>"#
//! );
//! ```

mod context;
mod entities;
mod error;
mod fragment;
mod lookup;
mod parser;
mod patterns;
mod post_process;
mod processor;
mod serializer;
mod settings;
mod shortlink;
mod tree;
pub mod url;
mod walker;

pub use context::{
    IssueStyle, META_FORMAT, META_REPO, META_REPO_PATH, META_STYLE, META_USER, Metas,
};
pub use error::{LookupError, PostProcessError, SettingsError};
pub use fragment::Fragment;
pub use lookup::{CommitResolver, NoCommits};
pub use parser::FragmentParser;
pub use patterns::{find_all_mentions, is_link};
pub use post_process::PostProcessor;
pub use processor::{ChainKind, Processor, ProcessorChain};
pub use serializer::HtmlSerializer;
pub use settings::MarkupSettings;
pub use tree::{Children, Document, Element, NodeId, NodeKind};

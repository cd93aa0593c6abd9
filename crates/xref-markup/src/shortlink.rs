//! `[[...]]` shortlinks.
//!
//! The body is split on `|`. Pieces without `=` are positional and fill
//! `name` and `link`; `key=value` pieces are named. GitHub order
//! (`[[text|link]]`) is preferred, MediaWiki order (`[[link|text]]`) is
//! recognized when only the first piece looks like an absolute link.

use std::borrow::Cow;
use std::mem;

use crate::context::RenderContext;
use crate::entities::unescape;
use crate::fragment::Fragment;
use crate::patterns::is_link;
use crate::url::{base_name, escape_path_segment, extension, join};

/// Extensions rendered as images, matched case-sensitively.
const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".tif", ".tiff", ".webp", ".gif", ".bmp", ".ico", ".svg",
];

/// Arguments of one shortlink.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ShortLinkProps {
    pub(crate) name: String,
    pub(crate) link: String,
    pub(crate) title: String,
    pub(crate) alt: String,
}

impl ShortLinkProps {
    /// Parse the text between `[[` and `]]`.
    pub(crate) fn parse(body: &str) -> Self {
        let mut props = Self::default();

        for piece in body.split('|') {
            let Some((key, value)) = piece.split_once('=') else {
                props.push_positional(piece);
                continue;
            };

            let value = unescape(value);
            let value = strip_smart_quotes(&value).to_owned();
            match key {
                "name" => props.name = value,
                "link" => props.link = value,
                "title" => props.title = value,
                "alt" => props.alt = value,
                _ => {}
            }
        }

        props
    }

    fn push_positional(&mut self, piece: &str) {
        if !self.name.is_empty() {
            self.link = piece.trim().to_owned();
        } else if is_link(piece) {
            // Two link-shaped pieces: the first one is the text.
            if !self.link.is_empty() {
                self.name = mem::take(&mut self.link);
            }
            self.link = piece.trim().to_owned();
        } else {
            self.name = piece.to_owned();
        }
    }
}

/// Strip one pair of symmetric typographic quotes.
fn strip_smart_quotes(value: &str) -> &str {
    for (open, close) in [('\u{201c}', '\u{201d}'), ('\u{2018}', '\u{2019}')] {
        if let Some(inner) = value
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    value
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Build the link or image for a parsed shortlink.
///
/// `suffix` is the word glued to the closing brackets (`[[Page]]s`) and is
/// appended to the display name.
pub(crate) fn render(props: &ShortLinkProps, suffix: &str, ctx: &RenderContext<'_>) -> Fragment {
    let link = first_non_empty(&[props.link.as_str(), props.name.as_str()]);
    let mut name = first_non_empty(&[props.title.as_str(), props.name.as_str(), link]).to_owned();
    name.push_str(suffix);

    let image = extension(link).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext));
    let absolute = is_link(link);

    let mut link = link.to_owned();
    if !absolute {
        link = link.replace(' ', if image { "+" } else { "-" });
        if !link.contains('/') {
            link = escape_path_segment(&link);
        }
    }

    if !image {
        if !absolute {
            if ctx.wiki {
                link = join("wiki", &[&link]);
            }
            link = join(ctx.url_prefix, &[&link]);
        }
        return Fragment::link(link, name);
    }

    if !absolute {
        let mut prefix = Cow::Borrowed(ctx.url_prefix);
        if ctx.settings.is_same_domain(ctx.url_prefix) {
            prefix = Cow::Owned(ctx.url_prefix.replacen("/src/", "/raw/", 1));
        }
        if ctx.wiki {
            link = join("wiki", &["raw", &link]);
        }
        link = join(&prefix, &[&link]);
    }

    let title = first_non_empty(&[props.title.as_str(), props.alt.as_str(), base_name(&name)]);
    let alt = first_non_empty(&[props.alt.as_str(), name.as_str()]);
    Fragment::image_link(&link, title, alt)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lookup::NoCommits;
    use crate::processor::ProcessorChain;
    use crate::settings::MarkupSettings;

    fn props(name: &str, link: &str) -> ShortLinkProps {
        ShortLinkProps {
            name: name.to_owned(),
            link: link.to_owned(),
            ..ShortLinkProps::default()
        }
    }

    fn render_with(body: &str, suffix: &str, url_prefix: &str, wiki: bool) -> Fragment {
        let settings = MarkupSettings::new("https://git.example/").unwrap();
        let chain = ProcessorChain::default();
        let ctx = RenderContext {
            settings: &settings,
            metas: None,
            url_prefix,
            wiki,
            resolver: &NoCommits,
            chain: &chain,
        };
        render(&ShortLinkProps::parse(body), suffix, &ctx)
    }

    #[test]
    fn test_parse_github_order() {
        assert_eq!(ShortLinkProps::parse("Home|Main-Page"), props("Home", "Main-Page"));
    }

    #[test]
    fn test_parse_mediawiki_order() {
        assert_eq!(
            ShortLinkProps::parse("http://example.com/x|Example"),
            props("Example", "http://example.com/x")
        );
    }

    #[test]
    fn test_parse_two_links_keeps_github_order() {
        assert_eq!(
            ShortLinkProps::parse("https://a.example|https://b.example"),
            props("https://a.example", "https://b.example")
        );
    }

    #[test]
    fn test_parse_named_values() {
        let parsed = ShortLinkProps::parse("Cat|cat.png|alt=Meow &amp; purr|title=\u{201c}Kitty\u{201d}");
        assert_eq!(parsed.name, "Cat");
        assert_eq!(parsed.link, "cat.png");
        assert_eq!(parsed.alt, "Meow & purr");
        assert_eq!(parsed.title, "Kitty");
    }

    #[test]
    fn test_strip_smart_quotes_requires_pair() {
        assert_eq!(strip_smart_quotes("\u{2018}x\u{2019}"), "x");
        assert_eq!(strip_smart_quotes("\u{201c}x"), "\u{201c}x");
        assert_eq!(strip_smart_quotes("plain"), "plain");
    }

    #[test]
    fn test_render_relative_link() {
        assert_eq!(
            render_with("Getting Started", "", "/acme/widget/wiki", false),
            Fragment::link("/acme/widget/wiki/Getting-Started", "Getting Started")
        );
    }

    #[test]
    fn test_render_suffix_appended_to_name() {
        assert_eq!(
            render_with("Page", "s", "/p", false),
            Fragment::link("/p/Page", "Pages")
        );
    }

    #[test]
    fn test_render_escapes_single_segment() {
        assert_eq!(
            render_with("Q?A", "", "/p", false),
            Fragment::link("/p/Q%3FA", "Q?A")
        );
    }

    #[test]
    fn test_render_wiki_link() {
        assert_eq!(
            render_with("Home", "", "/acme/widget", true),
            Fragment::link("/acme/widget/wiki/Home", "Home")
        );
    }

    #[test]
    fn test_render_absolute_link() {
        assert_eq!(
            render_with("http://example.com/x|Example", "", "/p", false),
            Fragment::link("http://example.com/x", "Example")
        );
    }

    #[test]
    fn test_render_image_same_domain_uses_raw() {
        assert_eq!(
            render_with("Cat|cat pic.png|alt=Meow", "", "/acme/widget/src/branch/main", false),
            Fragment::image_link("/acme/widget/raw/branch/main/cat+pic.png", "Meow", "Meow")
        );
    }

    #[test]
    fn test_render_image_other_domain_keeps_src() {
        assert_eq!(
            render_with("cat.png", "", "https://cdn.example/src/x", false),
            Fragment::image_link("https://cdn.example/src/x/cat.png", "cat.png", "cat.png")
        );
    }

    #[test]
    fn test_render_wiki_image() {
        assert_eq!(
            render_with("images/cat.png", "", "/acme/widget", true),
            Fragment::image_link(
                "/acme/widget/wiki/raw/images/cat.png",
                "cat.png",
                "images/cat.png"
            )
        );
    }

    #[test]
    fn test_render_image_extension_case_sensitive() {
        assert_eq!(
            render_with("cat.PNG", "", "/p", false),
            Fragment::link("/p/cat.PNG", "cat.PNG")
        );
    }
}

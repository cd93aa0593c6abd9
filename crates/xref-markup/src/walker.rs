//! Document traversal.

use crate::context::RenderContext;
use crate::tree::{Document, NodeId, NodeKind};

/// Elements whose content is final and never rewritten.
const SKIPPED_ELEMENTS: &[&str] = &["a", "code", "pre"];

enum Step {
    Process,
    Descend,
    Skip,
}

/// Run the context's processor chain over every text node below `root`.
///
/// Siblings are followed through live links, so nodes a splice inserts after
/// the current text node are visited in the same pass and the leftover text
/// goes through the whole chain again.
pub(crate) fn walk(doc: &mut Document, root: NodeId, ctx: &RenderContext<'_>) {
    let mut ancestors: Vec<NodeId> = Vec::new();
    let mut next = doc.first_child(root);

    loop {
        let Some(node) = next else {
            match ancestors.pop() {
                Some(parent) => {
                    next = doc.next_sibling(parent);
                    continue;
                }
                None => break,
            }
        };

        let step = match doc.kind(node) {
            NodeKind::Text(_) => Step::Process,
            NodeKind::Element(element) if SKIPPED_ELEMENTS.contains(&element.tag.as_str()) => {
                Step::Skip
            }
            NodeKind::Element(_) => Step::Descend,
            NodeKind::Comment(_) => Step::Skip,
        };

        match step {
            Step::Process => {
                ctx.chain.run(doc, node, ctx);
                next = doc.next_sibling(node);
            }
            Step::Descend => {
                ancestors.push(node);
                next = doc.first_child(node);
            }
            Step::Skip => next = doc.next_sibling(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lookup::NoCommits;
    use crate::parser::FragmentParser;
    use crate::processor::{Processor, ProcessorChain};
    use crate::serializer::HtmlSerializer;
    use crate::settings::MarkupSettings;

    fn walk_html(html: &str, chain: &ProcessorChain) -> String {
        let settings = MarkupSettings::new("https://git.example/").unwrap();
        let ctx = RenderContext {
            settings: &settings,
            metas: None,
            url_prefix: "",
            wiki: false,
            resolver: &NoCommits,
            chain,
        };
        let mut doc = FragmentParser::new().parse(html).unwrap();
        let root = doc.root();
        walk(&mut doc, root, &ctx);
        HtmlSerializer::new().serialize(&doc).unwrap()
    }

    #[test]
    fn test_every_match_in_a_run_is_processed() {
        assert_eq!(
            walk_html("<p>@a and @b and @c</p>", &ProcessorChain::default()),
            "<p><a href=\"https://git.example/a\">@a</a> and \
             <a href=\"https://git.example/b\">@b</a> and \
             <a href=\"https://git.example/c\">@c</a></p>"
        );
    }

    #[test]
    fn test_skipped_elements_untouched() {
        let html = "<pre>@a</pre><p><code>@b</code> <a href=\"/x\">@c</a></p>";
        assert_eq!(walk_html(html, &ProcessorChain::default()), html);
    }

    #[test]
    fn test_nested_elements_visited() {
        assert_eq!(
            walk_html("<ul><li><em>@a</em></li></ul>@b", &ProcessorChain::default()),
            "<ul><li><em><a href=\"https://git.example/a\">@a</a></em></li></ul>\
             <a href=\"https://git.example/b\">@b</a>"
        );
    }

    #[test]
    fn test_default_link_wraps_leftover_text() {
        let chain = ProcessorChain::commit_message(Some("/commit/1"));
        assert_eq!(
            walk_html("fix @a", &chain),
            "<a href=\"/commit/1\">fix </a><a href=\"https://git.example/a\">@a</a>"
        );
        assert_eq!(chain.processors().len(), 9);
        assert!(matches!(chain.processors().last(), Some(Processor::DefaultLink(_))));
    }
}

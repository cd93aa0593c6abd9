//! Lenient HTML fragment parser built on the `quick-xml` reader.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::{decode_entity, normalize_references};
use crate::error::PostProcessError;
use crate::tree::{Document, Element, NodeId, NodeKind};

/// Wrapper element placed around every fragment before parsing.
pub(crate) const WRAPPER_TAG: &str = "body";

/// Elements that never have content or an end tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Start tags that end an open `p`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Elements an open `p` cannot be closed across.
const PARAGRAPH_SCOPE: &[&str] = &["button", "caption", "object", "table", "td", "template", "th"];

/// Start tags, the open elements they end implicitly, and the elements
/// bounding the search for those.
const IMPLIED_ENDS: &[(&[&str], &[&str], &[&str])] = &[
    (&["li"], &["li"], &["ol", "ul", "menu", "table", "td", "th"]),
    (&["dt", "dd"], &["dt", "dd"], &["dl", "table", "td", "th"]),
    (&["tr"], &["tr", "td", "th"], &["table", "thead", "tbody", "tfoot"]),
    (&["td", "th"], &["td", "th"], &["tr", "table"]),
    (
        &["thead", "tbody", "tfoot"],
        &["thead", "tbody", "tfoot", "tr", "td", "th"],
        &["table"],
    ),
    (&["option"], &["option"], &["select", "datalist", "optgroup"]),
    (&["optgroup"], &["option", "optgroup"], &["select"]),
];

/// Pop the outermost open element in `ends` found before reaching `scope`.
fn close_within(doc: &Document, open: &mut Vec<NodeId>, ends: &[&str], scope: &[&str]) {
    let mut outermost = None;
    for (pos, &id) in open.iter().enumerate().rev() {
        let Some(tag) = doc.tag(id) else { break };
        if ends.contains(&tag) {
            outermost = Some(pos);
        } else if scope.contains(&tag) {
            break;
        }
    }
    if let Some(pos) = outermost {
        open.truncate(pos);
    }
}

/// Close the open elements that a `tag` start tag ends in HTML.
fn close_implied(doc: &Document, open: &mut Vec<NodeId>, tag: &str) {
    if CLOSES_PARAGRAPH.contains(&tag) {
        close_within(doc, open, &["p"], PARAGRAPH_SCOPE);
    }
    if let Some((_, ends, scope)) = IMPLIED_ENDS.iter().find(|(tags, ..)| tags.contains(&tag)) {
        close_within(doc, open, ends, scope);
    }
}

/// Parse rendered HTML fragments into a [`Document`].
pub struct FragmentParser;

impl FragmentParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a fragment.
    ///
    /// The fragment is wrapped in `<body>` so that text at the top level has
    /// a parent; the wrapper becomes the document root. Void elements never
    /// take children and end tags without a matching open element are ignored.
    /// Elements are closed implicitly as in HTML: `<li>` ends an open `li`,
    /// block elements end an open `p`, and so on. Anything still open at the
    /// end of input is closed as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader rejects the markup.
    pub fn parse(&self, html: &str) -> Result<Document, PostProcessError> {
        let html = normalize_references(html);
        let wrapped = format!("<{WRAPPER_TAG}>{html}</{WRAPPER_TAG}>");

        let mut reader = Reader::from_str(&wrapped);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        self.build(&mut reader)
    }

    fn build<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<Document, PostProcessError> {
        let mut doc = Document::new(WRAPPER_TAG);
        let mut open: Vec<NodeId> = Vec::new();
        let mut in_wrapper = false;
        let mut buf = Vec::new();

        loop {
            let parent = open.last().copied().unwrap_or(doc.root());
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if !in_wrapper {
                        in_wrapper = true;
                    } else {
                        let element = self.decode_element(reader, &e)?;
                        close_implied(&doc, &mut open, &element.tag);
                        let parent = open.last().copied().unwrap_or(doc.root());
                        let void = is_void(&element.tag);
                        let id = doc.append(parent, NodeKind::Element(element));
                        if !void {
                            open.push(id);
                        }
                    }
                }
                Event::Empty(e) => {
                    let element = self.decode_element(reader, &e)?;
                    close_implied(&doc, &mut open, &element.tag);
                    let parent = open.last().copied().unwrap_or(doc.root());
                    doc.append(parent, NodeKind::Element(element));
                }
                Event::End(e) => {
                    let tag = self.decode_name(reader, e.name().as_ref())?;
                    let matching = open
                        .iter()
                        .rposition(|&id| doc.tag(id) == Some(tag.as_str()));
                    if let Some(pos) = matching {
                        open.truncate(pos);
                    }
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    doc.append_text(parent, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    doc.append_text(parent, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e);
                    doc.append_text(parent, &text);
                }
                Event::Comment(e) => {
                    let comment = reader.decoder().decode(&e)?.into_owned();
                    doc.append(parent, NodeKind::Comment(comment));
                }
                Event::Eof => return Ok(doc),
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn decode_element<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<Element, PostProcessError> {
        let tag = self.decode_name(reader, e.name().as_ref())?;
        let mut attrs = Vec::new();
        for attr in e.html_attributes().flatten() {
            let key = self.decode_name(reader, attr.key.as_ref())?;
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            attrs.push((key, value));
        }
        Ok(Element { tag, attrs })
    }

    fn decode_name<R: BufRead>(
        &self,
        reader: &Reader<R>,
        name: &[u8],
    ) -> Result<String, PostProcessError> {
        Ok(reader.decoder().decode(name)?.to_ascii_lowercase())
    }
}

impl Default for FragmentParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element<'a>(doc: &'a Document, id: NodeId) -> &'a Element {
        match doc.kind(id) {
            NodeKind::Element(element) => element,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_element() {
        let doc = FragmentParser::new().parse("<p>Hello</p>").unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.tag(p), Some("p"));
        assert_eq!(doc.text(doc.first_child(p).unwrap()), Some("Hello"));
    }

    #[test]
    fn test_parse_top_level_text() {
        let doc = FragmentParser::new().parse("just text").unwrap();

        let text = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.text(text), Some("just text"));
        assert_eq!(doc.next_sibling(text), None);
    }

    #[test]
    fn test_parse_nested_elements() {
        let doc = FragmentParser::new()
            .parse("<p><strong>Bold</strong> text</p>")
            .unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.tag(children[0]), Some("strong"));
        assert_eq!(doc.text(children[1]), Some(" text"));
    }

    #[test]
    fn test_parse_merges_text_around_references() {
        let doc = FragmentParser::new()
            .parse("<p>Tom &amp; Jerry&#39;s &lt;show&gt;</p>")
            .unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        let text = doc.first_child(p).unwrap();
        assert_eq!(doc.text(text), Some("Tom & Jerry's <show>"));
        assert_eq!(doc.next_sibling(text), None);
    }

    #[test]
    fn test_parse_html_entities() {
        let doc = FragmentParser::new()
            .parse("<p>Hello&nbsp;World&mdash;Test</p>")
            .unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        let text = doc.text(doc.first_child(p).unwrap()).unwrap();
        assert!(text.contains('\u{00a0}'));
        assert!(text.contains('\u{2014}'));
    }

    #[test]
    fn test_parse_void_elements_without_close() {
        let doc = FragmentParser::new()
            .parse("<p>Before<br>After<img src=\"a.png\" alt=x></p>")
            .unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 4);
        assert_eq!(doc.tag(children[1]), Some("br"));
        assert_eq!(doc.text(children[2]), Some("After"));
        let img = element(&doc, children[3]);
        assert_eq!(img.attr("src"), Some("a.png"));
        assert_eq!(img.attr("alt"), Some("x"));
    }

    #[test]
    fn test_parse_self_closing() {
        let doc = FragmentParser::new().parse("<p>a<br />b</p>").unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        let tags: Vec<_> = doc.children(p).map(|id| doc.tag(id)).collect();
        assert_eq!(tags, vec![None, Some("br"), None]);
    }

    #[test]
    fn test_parse_attributes_keep_order() {
        let doc = FragmentParser::new()
            .parse(r#"<a href="/x?a=1&amp;b=2" class="c">x</a>"#)
            .unwrap();

        let a = element(&doc, doc.first_child(doc.root()).unwrap());
        assert_eq!(
            a.attrs,
            vec![
                ("href".to_owned(), "/x?a=1&b=2".to_owned()),
                ("class".to_owned(), "c".to_owned()),
            ]
        );
    }

    #[test]
    fn test_parse_unmatched_end_tag_ignored() {
        let doc = FragmentParser::new().parse("<p>one</em> two</p>").unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.text(doc.first_child(p).unwrap()), Some("one two"));
    }

    #[test]
    fn test_parse_unclosed_element_closed_at_end() {
        let doc = FragmentParser::new().parse("<p>open").unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.tag(p), Some("p"));
        assert_eq!(doc.text(doc.first_child(p).unwrap()), Some("open"));
    }

    #[test]
    fn test_parse_implied_end_tags() {
        let doc = FragmentParser::new()
            .parse("<ul><li>a<li>b</ul><p>one<p>two<div>three</div>")
            .unwrap();

        let root: Vec<_> = doc.children(doc.root()).collect();
        let tags: Vec<_> = root.iter().map(|&id| doc.tag(id)).collect();
        assert_eq!(tags, vec![Some("ul"), Some("p"), Some("p"), Some("div")]);
        let items: Vec<_> = doc.children(root[0]).map(|id| doc.tag(id)).collect();
        assert_eq!(items, vec![Some("li"), Some("li")]);
    }

    #[test]
    fn test_parse_implied_end_tags_respect_scope() {
        let doc = FragmentParser::new()
            .parse("<ul><li>a<ul><li>b</ul><li>c</ul>")
            .unwrap();

        let ul = doc.first_child(doc.root()).unwrap();
        let items: Vec<_> = doc.children(ul).collect();
        assert_eq!(items.len(), 2);
        let nested = doc.children(items[0]).nth(1).unwrap();
        assert_eq!(doc.tag(nested), Some("ul"));
    }

    #[test]
    fn test_parse_implied_table_cells() {
        let doc = FragmentParser::new()
            .parse("<table><tr><td>a<td>b<tr><td>c</table>")
            .unwrap();

        let table = doc.first_child(doc.root()).unwrap();
        let rows: Vec<_> = doc.children(table).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(doc.children(rows[0]).count(), 2);
        assert_eq!(doc.children(rows[1]).count(), 1);
    }

    #[test]
    fn test_parse_comment_preserved() {
        let doc = FragmentParser::new().parse("<!-- note -->text").unwrap();

        let comment = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.kind(comment), &NodeKind::Comment(" note ".to_owned()));
    }

    #[test]
    fn test_parse_uppercase_tags_lowercased() {
        let doc = FragmentParser::new().parse("<P>x</P>").unwrap();

        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.tag(p), Some("p"));
    }
}

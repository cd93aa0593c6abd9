//! HTML serializer for processed documents.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::fmt::{self, Write};

use crate::parser::is_void;
use crate::tree::{Document, NodeId, NodeKind};

/// Serialize a [`Document`] back to an HTML fragment.
pub struct HtmlSerializer;

impl HtmlSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the document without its wrapper element.
    pub fn serialize(&self, doc: &Document) -> Result<String, fmt::Error> {
        let mut out = String::with_capacity(4096);
        for child in doc.children(doc.root()) {
            serialize_node(doc, child, &mut out)?;
        }
        Ok(out)
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_node(doc: &Document, id: NodeId, out: &mut String) -> fmt::Result {
    match doc.kind(id) {
        NodeKind::Text(text) => escape_into(text, false, out),
        NodeKind::Comment(comment) => write!(out, "<!--{comment}-->")?,
        NodeKind::Element(element) => {
            write!(out, "<{}", element.tag)?;
            for (key, value) in &element.attrs {
                write!(out, " {key}=\"")?;
                escape_into(value, true, out);
                out.push('"');
            }

            if is_void(&element.tag) {
                out.push_str("/>");
                return Ok(());
            }
            out.push('>');

            for child in doc.children(id) {
                serialize_node(doc, child, out)?;
            }

            write!(out, "</{}>", element.tag)?;
        }
    }
    Ok(())
}

/// Escape HTML special characters; quotes only inside attribute values.
fn escape_into(text: &str, escape_quotes: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if escape_quotes => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fragment::Fragment;
    use crate::parser::FragmentParser;
    use crate::tree::Element;

    fn roundtrip(html: &str) -> String {
        let doc = FragmentParser::new().parse(html).unwrap();
        HtmlSerializer::new().serialize(&doc).unwrap()
    }

    #[test]
    fn test_serialize_skips_wrapper() {
        let mut doc = Document::new("body");
        let p = doc.append(doc.root(), NodeKind::Element(Element::new("p")));
        doc.append_text(p, "Hello");

        assert_eq!(HtmlSerializer::new().serialize(&doc).unwrap(), "<p>Hello</p>");
    }

    #[test]
    fn test_serialize_inserted_fragment() {
        let mut doc = Document::new("body");
        let p = doc.append(doc.root(), NodeKind::Element(Element::new("p")));
        doc.append_text(p, "see ");
        let text = doc.first_child(p).unwrap();
        doc.insert_fragment_after(text, Fragment::code_link("/c/1", "1"));

        assert_eq!(
            HtmlSerializer::new().serialize(&doc).unwrap(),
            r#"<p>see <a href="/c/1"><code class="nohighlight">1</code></a></p>"#
        );
    }

    #[test]
    fn test_roundtrip_canonical_markup() {
        let html = "<h1>Title</h1>\n<p>Some <em>text</em> and <strong>more</strong>.</p>\n\
                    <ul>\n<li>one</li>\n<li>two</li>\n</ul>\n";
        assert_eq!(roundtrip(html), html);
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(
            roundtrip("<p>a &lt; b &amp; c &gt; d</p>"),
            "<p>a &lt; b &amp; c &gt; d</p>"
        );
    }

    #[test]
    fn test_escape_attribute_quotes() {
        assert_eq!(
            roundtrip(r#"<span title="say &quot;hi&quot;">x</span>"#),
            r#"<span title="say &quot;hi&quot;">x</span>"#
        );
    }

    #[test]
    fn test_void_elements() {
        assert_eq!(roundtrip("<p>a<br>b<hr/></p>"), "<p>a<br/>b<hr/></p>");
    }

    #[test]
    fn test_comment_roundtrip() {
        assert_eq!(roundtrip("<!-- keep -->x"), "<!-- keep -->x");
    }

    #[test]
    fn test_empty_element_keeps_end_tag() {
        assert_eq!(roundtrip("<p></p><div/>"), "<p></p><div></div>");
    }
}

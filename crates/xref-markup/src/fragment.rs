//! Owned subtrees produced by processors before they are spliced in.

/// A detached node with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    Text(String),
}

impl Fragment {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Add an attribute. No-op on text fragments.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((key.into(), value.into()));
        }
        self
    }

    /// Add a child. No-op on text fragments.
    #[must_use]
    pub fn with_child(mut self, child: Fragment) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// `<a href="{href}">{content}</a>`
    #[must_use]
    pub fn link(href: impl Into<String>, content: impl Into<String>) -> Self {
        Self::element("a")
            .with_attr("href", href)
            .with_child(Self::text(content))
    }

    /// `<a href="{href}"><code class="nohighlight">{content}</code></a>`
    #[must_use]
    pub fn code_link(href: impl Into<String>, content: impl Into<String>) -> Self {
        let code = Self::element("code")
            .with_attr("class", "nohighlight")
            .with_child(Self::text(content));
        Self::element("a").with_attr("href", href).with_child(code)
    }

    /// Link that opens in a new window without sending a referrer.
    #[must_use]
    pub fn description_link(href: impl Into<String>, content: impl Into<String>) -> Self {
        Self::element("a")
            .with_attr("href", href)
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer")
            .with_child(Self::text(content))
    }

    /// Anchor to `src` wrapping an `<img>`; `alt` is omitted when empty.
    #[must_use]
    pub fn image_link(src: &str, title: &str, alt: &str) -> Self {
        let mut img = Self::element("img")
            .with_attr("src", src)
            .with_attr("title", title);
        if !alt.is_empty() {
            img = img.with_attr("alt", alt);
        }
        Self::element("a").with_attr("href", src).with_child(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_link_structure() {
        let fragment = Fragment::code_link("/c/abc", "abc");
        let Fragment::Element {
            tag,
            attrs,
            children,
        } = fragment
        else {
            panic!("expected element");
        };
        assert_eq!(tag, "a");
        assert_eq!(attrs, vec![("href".to_owned(), "/c/abc".to_owned())]);
        assert_eq!(
            children,
            vec![
                Fragment::element("code")
                    .with_attr("class", "nohighlight")
                    .with_child(Fragment::text("abc"))
            ]
        );
    }

    #[test]
    fn test_image_link_without_alt() {
        let fragment = Fragment::image_link("/raw/a.png", "a.png", "");
        let expected = Fragment::element("a").with_attr("href", "/raw/a.png").with_child(
            Fragment::element("img")
                .with_attr("src", "/raw/a.png")
                .with_attr("title", "a.png"),
        );
        assert_eq!(fragment, expected);
    }

    #[test]
    fn test_text_ignores_attrs() {
        assert_eq!(
            Fragment::text("x").with_attr("k", "v"),
            Fragment::text("x")
        );
    }
}

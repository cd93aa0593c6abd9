//! Character reference handling for the XML-based fragment parser.
//!
//! The XML reader only knows the five predefined entities. Named HTML5
//! entities are rewritten to their characters before parsing and ampersands that do not
//! start a reference are escaped so the reader sees them as literal text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// An ampersand, optionally followed by a complete character reference.
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7};|#[xX][0-9a-fA-F]{1,6};|[a-zA-Z][a-zA-Z0-9]*;)?")
        .expect("invalid reference regex")
});

const XML_PREDEFINED: &[&str] = &["amp;", "lt;", "gt;", "quot;", "apos;"];

/// Prepare raw HTML for the XML reader.
///
/// Named HTML5 entities become Unicode, the XML predefined entities and
/// numeric references are kept for the reader, and everything else starting
/// with `&` is escaped as `&amp;`.
pub(crate) fn normalize_references(html: &str) -> Cow<'_, str> {
    if !html.contains('&') {
        return Cow::Borrowed(html);
    }
    REFERENCE_PATTERN.replace_all(html, |caps: &Captures| {
        let Some(reference) = caps.get(1).map(|m| m.as_str()) else {
            return "&amp;".to_owned();
        };
        if reference.starts_with('#') || XML_PREDEFINED.contains(&reference) {
            return caps[0].to_owned();
        }
        let name = &reference[..reference.len() - 1];
        named_entity(name).unwrap_or_else(|| format!("&amp;{reference}"))
    })
}

/// Decode the body of a reference reported by the reader (`amp`, `#39`, ...).
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            decode_numeric(&s[1..]).map_or_else(|| format!("&{entity};"), String::from)
        }
        s => named_entity(s).unwrap_or_else(|| format!("&{entity};")),
    }
}

/// Decode every complete character reference in already-parsed text.
pub(crate) fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    REFERENCE_PATTERN.replace_all(text, |caps: &Captures| match caps.get(1) {
        Some(reference) => {
            let body = reference.as_str();
            decode_entity(&body[..body.len() - 1])
        }
        None => "&".to_owned(),
    })
}

fn decode_numeric(digits: &str) -> Option<char> {
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => digits.parse::<u32>().ok(),
    };
    code.and_then(char::from_u32)
}

/// Decode a named HTML reference such as `eacute` using the HTML5 entity set.
///
/// Every HTML5 entity expands to one or two characters; anything longer is
/// a legacy prefix match (`&notit;` decoding as `¬it;`) and is rejected.
fn named_entity(name: &str) -> Option<String> {
    let reference = format!("&{name};");
    let decoded = html_escape::decode_html_entities(&reference);
    if decoded == reference.as_str() || decoded.chars().count() > 2 {
        return None;
    }
    Some(decoded.into_owned())
}

//! Pattern catalog.
//!
//! Every pattern except the shortlink and the URL patterns is anchored to
//! whitespace, the start or end of the text, or one of `(`, `[`, `)`, `]`, so
//! it never matches inside a larger token. None of the patterns validate that
//! the referenced user, issue or commit exists.
//!
//! Whitespace and word classes are ASCII-only: a non-breaking space is not a
//! boundary and `@zoë` is not a mention.

use std::sync::LazyLock;

use regex::Regex;

/// `@user` mentions.
pub(crate) static MENTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[[:space:]]|^|\(|\[)(@[0-9a-zA-Z\-_\.]+)(?:[[:space:]]|$|\)|\])",
    )
    .expect("invalid mention regex")
});

/// Numeric issue references such as `#1287`.
pub(crate) static ISSUE_NUMERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[[:space:]]|^|\(|\[)(#[0-9]+)(?:[[:space:]]|$|\)|\]|:|\.([[:space:]]|$))",
    )
    .expect("invalid numeric issue regex")
});

/// Alphanumeric issue references such as `ABC-1234`.
pub(crate) static ISSUE_ALPHANUMERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[[:space:]]|^|\(|\[)([A-Z]{1,10}-[1-9][0-9]*)(?:[[:space:]]|$|\)|\]|:|\.([[:space:]]|$))",
    )
    .expect("invalid alphanumeric issue regex")
});

/// Issue references into another repository, e.g. `gogits/gogs#12345`.
pub(crate) static CROSS_REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[[:space:]]|^|\(|\[)([0-9a-zA-Z\-_\.]+/[0-9a-zA-Z\-_\.]+#[0-9]+)(?:[[:space:]]|$|\)|\]|\.([[:space:]]|$))",
    )
    .expect("invalid cross reference regex")
});

/// Bare commit hashes, abbreviated (7 characters) up to full length.
pub(crate) static SHA1_CURRENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[[:space:]]|^|\(|\[)([0-9a-f]{7,40})(?:[[:space:]]|$|\)|\]|\.([[:space:]]|$))",
    )
    .expect("invalid sha1 regex")
});

/// `[[name|link|key=value]]` shortlinks with an optional word suffix.
pub(crate) static SHORT_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(.*?)\]\]([[:word:]]*)").expect("invalid shortlink regex")
});

/// URLs containing a full commit hash after four path components.
pub(crate) static ANY_SHA1_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:[^[:space:]]+/){4}([0-9a-f]{40})(/[^#[:space:]]+)?(#[^[:space:]]+)?",
    )
    .expect("invalid commit url regex")
});

static VALID_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][[:word:]-]+://").expect("invalid link regex"));

/// Email addresses, as accepted by `CommonMark` autolinks and HTML5 email inputs.
pub(crate) static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[[:space:]]|^|\(|\[)([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9]{2,}(?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+)(?:[[:space:]]|$|\)|\]|\.([[:space:]]|$))",
    )
    .expect("invalid email regex")
});

/// Candidate `http`/`https` URLs before trailing punctuation is trimmed.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^[:space:]<>"`]+"#).expect("invalid url regex"));

/// `{key}` placeholders in external issue tracker templates.
pub(crate) static TEMPLATE_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([[:word:]]+)\}").expect("invalid template regex"));

/// Characters that end a sentence rather than a URL.
const LINK_END_PUNCTUATION: &[u8] = b"?!.,:;*_~'\"";

/// Whether `link` starts with a URL scheme (`scheme://`).
///
/// # Examples
///
/// ```
/// use xref_markup::is_link;
///
/// assert!(is_link("https://example.com"));
/// assert!(is_link("ftp://files.example.com"));
/// assert!(!is_link("cat.png"));
/// ```
pub fn is_link(link: &str) -> bool {
    VALID_LINK_PATTERN.is_match(link)
}

/// All user names mentioned as `@name` in `content`, without the `@`.
///
/// # Examples
///
/// ```
/// use xref_markup::find_all_mentions;
///
/// assert_eq!(find_all_mentions("@alice and @bob.smith"), vec!["alice", "bob.smith"]);
/// ```
pub fn find_all_mentions(content: &str) -> Vec<&str> {
    MENTION_PATTERN
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| &m.as_str()[1..])
        .collect()
}

/// Leftmost `http`/`https` URL in `text` as a byte range.
///
/// Trailing sentence punctuation and closing brackets without a matching
/// opener inside the URL are not part of the match.
pub(crate) fn find_link(text: &str) -> Option<(usize, usize)> {
    LINK_PATTERN.find_iter(text).find_map(|m| {
        let candidate = m.as_str();
        let scheme_end = candidate.find("://")? + 3;
        let end = link_end(candidate);
        (end > scheme_end).then_some((m.start(), m.start() + end))
    })
}

fn link_end(url: &str) -> usize {
    let bytes = url.as_bytes();
    let mut end = bytes.len();

    while end > 0 {
        let last = bytes[end - 1];
        let opener = match last {
            b')' => Some(b'('),
            b']' => Some(b'['),
            _ => None,
        };

        if LINK_END_PUNCTUATION.contains(&last) {
            end -= 1;
        } else if let Some(opener) = opener {
            let opening = bytes[..end].iter().filter(|&&b| b == opener).count();
            let closing = bytes[..end].iter().filter(|&&b| b == last).count();
            if closing <= opening {
                break;
            }
            end -= 1;
        } else {
            break;
        }
    }

    end
}

/// Abbreviate a commit hash to ten characters.
pub(crate) fn short_sha(sha: &str) -> &str {
    sha.get(..10).unwrap_or(sha)
}

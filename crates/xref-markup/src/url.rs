//! URL and path string helpers.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in a single path segment.
///
/// Unreserved characters and `$ & + : = @` are kept, everything else
/// (including `/`, `?`, `;` and `,`) is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Join URL path segments onto `base`.
///
/// Exactly one `/` separates each part regardless of leading or trailing
/// slashes, and empty segments are skipped.
///
/// # Examples
///
/// ```
/// use xref_markup::url::join;
///
/// assert_eq!(join("https://git.example/", &["acme", "/widget/"]), "https://git.example/acme/widget");
/// assert_eq!(join("wiki", &["raw", "cat.png"]), "wiki/raw/cat.png");
/// ```
pub fn join(base: &str, segments: &[&str]) -> String {
    let mut joined = base.trim_end_matches('/').to_owned();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(segment);
    }
    joined
}

/// Percent-encode `segment` for use as one path segment.
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Host (with port) of an absolute URL, `None` for relative references.
pub(crate) fn host(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    Some(host)
}

/// Last element of a slash-separated path.
///
/// Trailing slashes are ignored; an empty path yields `.` and a path of only
/// slashes yields `/`.
pub(crate) fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Extension of the last path element including the dot, if any.
pub(crate) fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map(|pos| &name[pos..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_normalizes_slashes() {
        assert_eq!(
            join("https://git.example", &["acme", "widget", "issues", "42"]),
            "https://git.example/acme/widget/issues/42"
        );
        assert_eq!(join("https://git.example/", &["/alice"]), "https://git.example/alice");
    }

    #[test]
    fn test_join_skips_empty_segments() {
        assert_eq!(join("/prefix/", &["", "page"]), "/prefix/page");
    }

    #[test]
    fn test_join_relative_base_has_no_leading_slash() {
        assert_eq!(join("", &["wiki", "Home"]), "wiki/Home");
        assert_eq!(join("wiki", &["raw", "a/b.png"]), "wiki/raw/a/b.png");
    }

    #[test]
    fn test_join_keeps_inner_slashes() {
        assert_eq!(join("https://x", &["org/repo", "issues"]), "https://x/org/repo/issues");
    }

    #[test]
    fn test_escape_path_segment() {
        assert_eq!(escape_path_segment("Page-One"), "Page-One");
        assert_eq!(escape_path_segment("a?b#c"), "a%3Fb%23c");
        assert_eq!(escape_path_segment("x+y=z@w"), "x+y=z@w");
        assert_eq!(escape_path_segment("ünï"), "%C3%BCn%C3%AF");
    }

    #[test]
    fn test_host() {
        assert_eq!(host("https://git.example/acme"), Some("git.example"));
        assert_eq!(host("http://localhost:3000"), Some("localhost:3000"));
        assert_eq!(host("https://user@git.example?q"), Some("git.example"));
        assert_eq!(host("/relative/path"), None);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/cat.png"), "cat.png");
        assert_eq!(base_name("Cat"), "Cat");
        assert_eq!(base_name("dir/"), "dir");
        assert_eq!(base_name(""), ".");
        assert_eq!(base_name("//"), "/");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("images/cat.png"), Some(".png"));
        assert_eq!(extension("v1.2/readme"), None);
        assert_eq!(extension("archive.tar.gz"), Some(".gz"));
        assert_eq!(extension("Page"), None);
    }
}

//! URI helpers

/// True if the URI starts with a `scheme://` prefix
pub fn uri_has_scheme(uri: &str) -> bool {
    match uri.find("://") {
        Some(0) | None => false,
        Some(end) => {
            let scheme = &uri[..end];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
    }
}

/// File name suffix of a URI, without the dot
///
/// Only the last path segment is considered. A leading dot (hidden file) is
/// not a suffix separator. For URIs with a scheme, the query string and
/// fragment are ignored.
pub fn uri_suffix(uri: &str) -> Option<&str> {
    let path = if uri_has_scheme(uri) {
        uri.split(['?', '#']).next().unwrap_or(uri)
    } else {
        uri
    };

    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some(&base[dot + 1..]).filter(|s| !s.is_empty()),
    }
}

/// Join a base path and a relative URI with a single `/`
///
/// An empty side yields the other side unchanged.
pub fn build_uri(base: &str, uri: &str) -> String {
    if base.is_empty() {
        return uri.to_string();
    }
    if uri.is_empty() {
        return base.to_string();
    }

    let mut result = String::with_capacity(base.len() + uri.len() + 1);
    result.push_str(base);
    if !base.ends_with('/') {
        result.push('/');
    }
    result.push_str(uri);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_schemes() {
        assert!(uri_has_scheme("http://example.com/a.mp3"));
        assert!(uri_has_scheme("file:///music/a.mp3"));
        assert!(!uri_has_scheme("Artist/Album/a.mp3"));
        assert!(!uri_has_scheme("/music/a.mp3"));
        assert!(!uri_has_scheme("://nothing"));
        assert!(!uri_has_scheme("weird dir/x://y"));
    }

    #[test]
    fn suffix_of_last_segment() {
        assert_eq!(uri_suffix("Artist/Album/01 Song.mp3"), Some("mp3"));
        assert_eq!(uri_suffix("a.b/file"), None);
        assert_eq!(uri_suffix("dir/.hidden"), None);
        assert_eq!(uri_suffix("dir/trailing."), None);
        assert_eq!(uri_suffix("song.tar.FLAC"), Some("FLAC"));
    }

    #[test]
    fn suffix_ignores_query_for_remote_uris() {
        assert_eq!(uri_suffix("http://host/stream.ogg?token=a.b"), Some("ogg"));
        assert_eq!(uri_suffix("http://host/live"), None);
    }

    #[test]
    fn builds_uris() {
        assert_eq!(build_uri("base", "a/b.mp3"), "base/a/b.mp3");
        assert_eq!(build_uri("base/", "b.mp3"), "base/b.mp3");
        assert_eq!(build_uri("", "b.mp3"), "b.mp3");
        assert_eq!(build_uri("base", ""), "base");
    }
}

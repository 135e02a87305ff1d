//! Prefix matching and fixed-precedence dispatch.
//!
//! Matching is a byte-for-byte, case-sensitive prefix compare. No `..` or
//! percent-decoding normalization is applied to the request path.

use crate::config::BasePath;

/// Returns true when `path` lives under `base`.
pub fn matches(path: &str, base: &BasePath) -> bool {
    path.starts_with(base.as_str())
}

/// Returns what follows `base` in `path`, or `None` when it does not match.
pub fn strip<'a>(path: &'a str, base: &BasePath) -> Option<&'a str> {
    path.strip_prefix(base.as_str())
}

/// Last element of a slash-separated path, ignoring trailing slashes.
///
/// An empty path yields `.` and a path made only of slashes yields `/`.
pub fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// The single operation a remainder resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Liveness,
    Version,
    Crash,
    Quit,
    Count,
    Sensitive,
    ListUrls,
    Template,
}

impl Route {
    /// Picks the handler for a stripped remainder; first match wins.
    pub fn dispatch(remainder: &str) -> Self {
        match remainder {
            "" | "/" => Route::Liveness,
            "version" => Route::Version,
            "crash" => Route::Crash,
            "quit" => Route::Quit,
            "count" => Route::Count,
            r if r.starts_with("sensitive/") => Route::Sensitive,
            r if r.starts_with("list/") => Route::ListUrls,
            _ => Route::Template,
        }
    }

    /// Short tag used in request logs.
    pub fn label(self) -> &'static str {
        match self {
            Route::Liveness => "LIVENESS",
            Route::Version => "VERSION",
            Route::Crash => "CRASH",
            Route::Quit => "QUIT",
            Route::Count => "COUNT",
            Route::Sensitive => "SENSITIVE",
            Route::ListUrls => "LIST",
            Route::Template => "TEMPLATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match_and_strip() {
        let base = BasePath::new("demo");
        assert!(matches("/demo/", &base));
        assert!(matches("/demo/count", &base));
        assert!(!matches("/demo", &base));
        assert!(!matches("/Demo/count", &base));
        assert!(!matches("/other/count", &base));
        assert_eq!(strip("/demo/", &base), Some(""));
        assert_eq!(strip("/demo/count", &base), Some("count"));
        assert_eq!(strip("/elsewhere", &base), None);
    }

    #[test]
    fn test_root_prefix_matches_everything() {
        let base = BasePath::default();
        assert_eq!(strip("/", &base), Some(""));
        assert_eq!(strip("/sensitive/secret", &base), Some("sensitive/secret"));
    }

    #[test]
    fn test_no_normalization() {
        let base = BasePath::new("demo");
        assert!(!matches("/x/../demo/count", &base));
        assert_eq!(strip("/demo/%63ount", &base), Some("%63ount"));
    }

    #[test]
    fn test_dispatch_precedence() {
        assert_eq!(Route::dispatch(""), Route::Liveness);
        assert_eq!(Route::dispatch("/"), Route::Liveness);
        assert_eq!(Route::dispatch("version"), Route::Version);
        assert_eq!(Route::dispatch("crash"), Route::Crash);
        assert_eq!(Route::dispatch("quit"), Route::Quit);
        assert_eq!(Route::dispatch("count"), Route::Count);
        assert_eq!(Route::dispatch("sensitive/x"), Route::Sensitive);
        assert_eq!(Route::dispatch("list/host"), Route::ListUrls);
        assert_eq!(Route::dispatch("sensitive"), Route::Template);
        assert_eq!(Route::dispatch("count/"), Route::Template);
        assert_eq!(Route::dispatch("index.html"), Route::Template);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/demo/sensitive/secret"), "secret");
        assert_eq!(base_name("../../etc/passwd"), "passwd");
        assert_eq!(base_name("/list/host/"), "host");
        assert_eq!(base_name("plain"), "plain");
        assert_eq!(base_name(""), ".");
        assert_eq!(base_name("///"), "/");
    }
}

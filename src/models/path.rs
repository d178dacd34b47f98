use serde::Serialize;

/// Logical location within the storage namespace, derived from a console
/// path.
///
/// An empty `bucket` denotes the namespace root (no bucket selected). A
/// `prefix` that is empty or ends with `/` is a directory view; any other
/// prefix references a single object and is not a navigable location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    pub bucket: String,
    pub prefix: String,
}

impl NavigationTarget {
    pub fn root() -> Self {
        Self {
            bucket: String::new(),
            prefix: String::new(),
        }
    }

    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Directory views are empty or separator-terminated; anything else is
    /// a leaf object reference.
    pub fn is_directory(&self) -> bool {
        self.prefix.is_empty() || self.prefix.ends_with('/')
    }
}

/// Joins a bucket and prefix into a console path under `route_prefix`.
/// An empty bucket yields the namespace root path.
pub fn encode_path(route_prefix: &str, bucket: &str, prefix: &str) -> String {
    if bucket.is_empty() {
        return format!("{route_prefix}/");
    }
    if prefix.is_empty() {
        format!("{route_prefix}/{bucket}/")
    } else {
        format!("{route_prefix}/{bucket}/{prefix}")
    }
}

/// Splits a console path into its navigation target: first segment after
/// `route_prefix` is the bucket, the remainder is the prefix. The bare
/// route prefix decodes to the namespace root.
pub fn decode_path(route_prefix: &str, path: &str) -> NavigationTarget {
    let rest = path.strip_prefix(route_prefix).unwrap_or(path);
    let rest = rest.strip_prefix('/').unwrap_or(rest);

    if rest.is_empty() {
        return NavigationTarget::root();
    }

    match rest.split_once('/') {
        Some((bucket, prefix)) => NavigationTarget::new(bucket, prefix),
        None => NavigationTarget::new(rest, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: &str = "/browser";

    #[test]
    fn round_trip_identity() {
        let cases = [
            ("docs", ""),
            ("docs", "reports/"),
            ("docs", "reports/2024/"),
            ("media", "a/b/c/photo.jpg"),
            ("", ""),
        ];
        for (bucket, prefix) in cases {
            let target = decode_path(ROUTE, &encode_path(ROUTE, bucket, prefix));
            assert_eq!(target, NavigationTarget::new(bucket, prefix));
        }
    }

    #[test]
    fn bare_route_prefix_is_root() {
        assert!(decode_path(ROUTE, "/browser/").is_root());
        assert!(decode_path(ROUTE, "/browser").is_root());
        assert_eq!(encode_path(ROUTE, "", ""), "/browser/");
    }

    #[test]
    fn trailing_separator_marks_directories() {
        assert!(decode_path(ROUTE, "/browser/docs/reports/").is_directory());
        assert!(decode_path(ROUTE, "/browser/docs/").is_directory());
        assert!(!decode_path(ROUTE, "/browser/docs/reports/q1.pdf").is_directory());
    }

    #[test]
    fn bucket_without_trailing_separator_still_decodes() {
        let target = decode_path(ROUTE, "/browser/docs");
        assert_eq!(target.bucket, "docs");
        assert_eq!(target.prefix, "");
    }
}

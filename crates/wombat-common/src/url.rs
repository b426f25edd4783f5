//! URL resolution utilities.
//!
//! Image sources and stylesheet references are resolved against the page
//! location before fetching.

/// Resolve a potentially relative URL against a base URL.
///
/// Absolute URLs (including `data:` and `file:`) pass through untouched.
/// Protocol-relative URLs inherit the base's scheme, absolute paths replace
/// the base's path, and anything else is joined onto the base directory.
///
/// NOTE: This is a simplified implementation; it does not normalize `.` and
/// `..` segments.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    if href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("data:")
        || href.starts_with("file:")
    {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    if href.starts_with("//") {
        // Protocol-relative URL - prepend scheme from base
        if base.starts_with("https:") {
            format!("https:{href}")
        } else {
            format!("http:{href}")
        }
    } else if href.starts_with('/') {
        // Absolute path - join with origin. Find the first slash after the
        // scheme and take everything before it as the origin.
        base.find("://").map_or_else(
            || href.to_string(),
            |scheme_end| {
                let after_scheme = &base[scheme_end + 3..];
                after_scheme.find('/').map_or_else(
                    || format!("{base}{href}"),
                    |path_start| {
                        let origin = &base[..scheme_end + 3 + path_start];
                        format!("{origin}{href}")
                    },
                )
            },
        )
    } else {
        // Relative path - join with base directory
        let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
        format!("{base_dir}/{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_passthrough() {
        assert_eq!(
            resolve_url("https://example.com/a.png", Some("https://other.com/page")),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_data_url_passthrough() {
        assert_eq!(
            resolve_url("data:image/png;base64,AA==", Some("https://other.com/")),
            "data:image/png;base64,AA=="
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            resolve_url("//cdn.example.com/a.png", Some("https://site.com/page")),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(
            resolve_url("/img/a.png", Some("https://site.com/articles/one.html")),
            "https://site.com/img/a.png"
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            resolve_url("a.png", Some("https://site.com/articles/one.html")),
            "https://site.com/articles/a.png"
        );
    }

    #[test]
    fn test_no_base() {
        assert_eq!(resolve_url("a.png", None), "a.png");
    }
}

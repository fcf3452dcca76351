//! Target URL validation and normalization.

use url::Url;

/// Longest target URL accepted.
pub const MAX_TARGET_URL_LENGTH: usize = 2048;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("Target URL is required")]
    Empty,

    #[error("Target URL is not an absolute URL: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS target URLs are allowed")]
    UnsupportedProtocol,

    #[error("Target URL must include a host")]
    MissingHost,

    #[error("Target URL exceeds {MAX_TARGET_URL_LENGTH} characters")]
    TooLong,
}

/// Parses a target URL and returns its canonical form.
///
/// Surrounding whitespace is trimmed, the scheme must be `http` or `https`,
/// the host is lower-cased, and default ports and fragments are dropped.
/// Path and query are preserved.
///
/// # Errors
///
/// See [`TargetUrlError`].
pub fn normalize_target_url(input: &str) -> Result<String, TargetUrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TargetUrlError::Empty);
    }
    if input.len() > MAX_TARGET_URL_LENGTH {
        return Err(TargetUrlError::TooLong);
    }

    let mut url = Url::parse(input).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TargetUrlError::UnsupportedProtocol);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(TargetUrlError::MissingHost)?
        .to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    url.set_fragment(None);

    // Url already drops a port equal to the scheme default when parsing.
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_path() {
        assert_eq!(
            normalize_target_url("https://example.com/x").unwrap(),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_lowercases_host_and_drops_default_port() {
        assert_eq!(
            normalize_target_url("HTTPS://EXAMPLE.COM:443/Path?q=A").unwrap(),
            "https://example.com/Path?q=A"
        );
    }

    #[test]
    fn test_keeps_custom_port_and_query() {
        assert_eq!(
            normalize_target_url("http://localhost:8080/a?b=c").unwrap(),
            "http://localhost:8080/a?b=c"
        );
    }

    #[test]
    fn test_drops_fragment_and_trims() {
        assert_eq!(
            normalize_target_url("  https://example.com/page#top  ").unwrap(),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(normalize_target_url("   "), Err(TargetUrlError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            normalize_target_url("/just/a/path"),
            Err(TargetUrlError::InvalidFormat(_))
        ));
        assert!(matches!(
            normalize_target_url("example.com"),
            Err(TargetUrlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for input in ["javascript:alert(1)", "data:text/plain,hi", "ftp://example.com/f"] {
            assert_eq!(
                normalize_target_url(input),
                Err(TargetUrlError::UnsupportedProtocol),
                "{input}"
            );
        }
    }

    #[test]
    fn test_rejects_overlong() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_TARGET_URL_LENGTH));
        assert_eq!(normalize_target_url(&url), Err(TargetUrlError::TooLong));
    }
}

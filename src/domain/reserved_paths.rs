//! Reserved path prefixes that are never treated as short codes.

/// Default prefixes guarding the service's own routes and typical CMS paths.
pub const DEFAULT_RESERVED_PREFIXES: &[&str] = &["wp-", "admin", "api", "health", "static"];

/// Case-insensitive prefix guard shared by the resolver and slug validation.
#[derive(Debug, Clone)]
pub struct ReservedPaths {
    prefixes: Vec<String>,
}

impl ReservedPaths {
    /// Builds a guard from a list of prefixes. Blank entries are ignored.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(|p| p.as_ref().trim().trim_start_matches('/').to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        Self { prefixes }
    }

    /// Returns true if `path` (already stripped of slashes) starts with a
    /// reserved prefix.
    pub fn is_reserved(&self, path: &str) -> bool {
        let path = path.to_ascii_lowercase();
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for ReservedPaths {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_PREFIXES)
    }
}

//! Path handling shared by both readers.
//!
//! Both readers derive package identifiers and trimmed file names through
//! this module, which keeps the two sides of a merge keyed identically.

/// Package identifier used for files that sit at the top of the profile.
pub const ROOT_PACKAGE: &str = ".";

/// Strips a project-root prefix from profile file paths.
///
/// Fixed at construction; `trim` never allocates when no prefix applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootTrim {
    prefix: Option<String>,
}

impl RootTrim {
    /// Trim nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Trim `module` (and the separator that follows it) from every path.
    ///
    /// Leading `./` and trailing `/` are ignored, so `./github.com/acme/x/`
    /// and `github.com/acme/x` behave the same. An empty module trims nothing.
    pub fn new(module: &str) -> Self {
        let cleaned = module.trim();
        let cleaned = cleaned.strip_prefix("./").unwrap_or(cleaned);
        let cleaned = cleaned.trim_end_matches('/');
        if cleaned.is_empty() {
            return Self::none();
        }
        Self {
            prefix: Some(cleaned.to_string()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Project-relative form of `path`.
    ///
    /// Paths outside the prefix, and the prefix itself, are returned as-is.
    pub fn trim<'a>(&self, path: &'a str) -> &'a str {
        let Some(prefix) = self.prefix.as_deref() else {
            return path;
        };
        match path.strip_prefix(prefix) {
            Some(rest) => rest.strip_prefix('/').unwrap_or(path),
            None => path,
        }
    }
}

/// Package identifier of a profile file path: its directory part, as Go's
/// `path.Dir` reports it. A bare file name belongs to [`ROOT_PACKAGE`].
pub fn package_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ROOT_PACKAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_strips_module_and_separator() {
        let trim = RootTrim::new("github.com/acme/project");
        assert_eq!(
            trim.trim("github.com/acme/project/internal/cover.go"),
            "internal/cover.go"
        );
        assert_eq!(trim.trim("github.com/acme/project/main.go"), "main.go");
    }

    #[test]
    fn test_trim_leaves_foreign_paths() {
        let trim = RootTrim::new("github.com/acme/project");
        assert_eq!(
            trim.trim("github.com/acme/projectx/a.go"),
            "github.com/acme/projectx/a.go"
        );
        assert_eq!(trim.trim("other/a.go"), "other/a.go");
        assert_eq!(trim.trim("github.com/acme/project"), "github.com/acme/project");
    }

    #[test]
    fn test_new_normalizes_prefix() {
        assert_eq!(RootTrim::new("./github.com/acme/x/").prefix(), Some("github.com/acme/x"));
        assert_eq!(RootTrim::new("  ").prefix(), None);
        assert_eq!(RootTrim::none().trim("a/b.go"), "a/b.go");
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("github.com/acme/x/a.go"), "github.com/acme/x");
        assert_eq!(package_of("main.go"), ROOT_PACKAGE);
        assert_eq!(package_of("/abs.go"), "/");
        assert_eq!(package_of("/src/abs.go"), "/src");
    }
}

use std::collections::HashSet;

use crate::error::{RepublishError, Result};

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a tag pattern; it must contain a `{version}` placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains("{version}") {
            return Err(RepublishError::config(format!(
                "tag pattern '{}' must contain a {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace("{version}", version)
    }
}

/// The full set of tags to apply: explicit tags first, then the version tag.
///
/// Blank entries are dropped and duplicates keep their first position.
pub fn resolve_tags(explicit: &[String], version_tag: Option<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    explicit
        .iter()
        .map(|tag| tag.trim().to_string())
        .chain(version_tag)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Requested tags already present in `existing`, sorted.
pub fn tag_collisions(requested: &[String], existing: &[String]) -> Vec<String> {
    let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut collisions: Vec<String> = requested
        .iter()
        .filter(|tag| existing.contains(tag.as_str()))
        .cloned()
        .collect();
    collisions.sort();
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format("1.2.3"), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(pattern.format("1.2.3"), "release-1.2.3");
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("latest").is_err());
    }

    #[test]
    fn test_resolve_tags_dedupes_and_orders() {
        let tags = resolve_tags(
            &strings(&["stable", " latest ", "stable", ""]),
            Some("v1.2.3".to_string()),
        );
        assert_eq!(tags, strings(&["stable", "latest", "v1.2.3"]));
    }

    #[test]
    fn test_resolve_tags_version_already_explicit() {
        let tags = resolve_tags(&strings(&["v1.2.3"]), Some("v1.2.3".to_string()));
        assert_eq!(tags, strings(&["v1.2.3"]));
    }

    #[test]
    fn test_resolve_tags_empty() {
        assert!(resolve_tags(&[], None).is_empty());
    }

    #[test]
    fn test_tag_collisions_sorted() {
        let collisions = tag_collisions(
            &strings(&["v2.0.0", "stable", "v1.0.0"]),
            &strings(&["v1.0.0", "v2.0.0", "v0.9.0"]),
        );
        assert_eq!(collisions, strings(&["v1.0.0", "v2.0.0"]));
    }

    #[test]
    fn test_tag_collisions_none() {
        assert!(tag_collisions(&strings(&["v3.0.0"]), &strings(&["v1.0.0"])).is_empty());
    }
}

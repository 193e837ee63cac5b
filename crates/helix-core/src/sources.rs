use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A public forum the discovery step searches for painpoint posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumSource {
    /// Human-readable name, e.g. `"r/smallbusiness"`.
    pub name: String,
    /// Site filter appended to search queries, e.g. `"reddit.com/r/smallbusiness"`.
    pub site: String,
    /// Category tag stamped onto ideas discovered from this forum.
    pub category: String,
}

impl ForumSource {
    /// Generate a URL-safe platform slug from the forum name.
    #[must_use]
    pub fn platform_slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' || c == '/' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// The full discovery source catalog: forums crossed with phrase patterns.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCatalog {
    pub forums: Vec<ForumSource>,
    /// Painpoint phrasing patterns, quoted verbatim into search queries.
    pub patterns: Vec<String>,
}

impl SourceCatalog {
    /// The compiled-in catalog used when no YAML override is configured.
    #[must_use]
    pub fn builtin() -> Self {
        let forum = |name: &str, site: &str, category: &str| ForumSource {
            name: name.to_string(),
            site: site.to_string(),
            category: category.to_string(),
        };

        Self {
            forums: vec![
                forum("r/smallbusiness", "reddit.com/r/smallbusiness", "business"),
                forum("r/Entrepreneur", "reddit.com/r/Entrepreneur", "business"),
                forum("r/startups", "reddit.com/r/startups", "startup"),
                forum("r/SaaS", "reddit.com/r/SaaS", "saas"),
                forum("Hacker News", "news.ycombinator.com", "tech"),
                forum("Indie Hackers", "indiehackers.com", "maker"),
            ],
            patterns: vec![
                "i wish there was a tool".to_string(),
                "is there an app for".to_string(),
                "how do i automate".to_string(),
                "struggling to manage".to_string(),
                "biggest pain point".to_string(),
            ],
        }
    }
}

/// Load and validate the source catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourceCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: SourceCatalog = serde_yaml::from_str(&content)?;

    validate_sources(&catalog)?;

    Ok(catalog)
}

/// Load the catalog from `path` if the file exists, else fall back to the
/// compiled-in catalog.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be parsed or validated.
pub fn load_sources_or_builtin(path: &Path) -> Result<SourceCatalog, ConfigError> {
    if path.exists() {
        load_sources(path)
    } else {
        Ok(SourceCatalog::builtin())
    }
}

fn validate_sources(catalog: &SourceCatalog) -> Result<(), ConfigError> {
    if catalog.forums.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must list at least one forum".to_string(),
        ));
    }
    if catalog.patterns.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must list at least one phrase pattern".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for forum in &catalog.forums {
        if forum.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "forum name must be non-empty".to_string(),
            ));
        }
        if forum.site.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "forum '{}' has an empty site filter",
                forum.name
            )));
        }
        if forum.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "forum '{}' has an empty category",
                forum.name
            )));
        }

        let lower_name = forum.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate forum name: '{}'",
                forum.name
            )));
        }
    }

    for pattern in &catalog.patterns {
        if pattern.trim().is_empty() {
            return Err(ConfigError::Validation(
                "phrase patterns must be non-empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = SourceCatalog::builtin();
        validate_sources(&catalog).expect("builtin catalog should validate");
        assert!(!catalog.forums.is_empty());
        assert!(!catalog.patterns.is_empty());
    }

    #[test]
    fn platform_slug_simple_name() {
        let forum = ForumSource {
            name: "Hacker News".to_string(),
            site: "news.ycombinator.com".to_string(),
            category: "tech".to_string(),
        };
        assert_eq!(forum.platform_slug(), "hacker-news");
    }

    #[test]
    fn platform_slug_subreddit_path() {
        let forum = ForumSource {
            name: "r/SaaS".to_string(),
            site: "reddit.com/r/SaaS".to_string(),
            category: "saas".to_string(),
        };
        assert_eq!(forum.platform_slug(), "r-saas");
    }

    #[test]
    fn parse_valid_yaml() {
        let yaml = r"
forums:
  - name: r/startups
    site: reddit.com/r/startups
    category: startup
patterns:
  - i wish there was a tool
";
        let catalog: SourceCatalog = serde_yaml::from_str(yaml).expect("parse");
        validate_sources(&catalog).expect("validate");
        assert_eq!(catalog.forums.len(), 1);
        assert_eq!(catalog.patterns.len(), 1);
    }

    #[test]
    fn validate_rejects_duplicate_forum_names() {
        let mut catalog = SourceCatalog::builtin();
        let dup = catalog.forums[0].clone();
        catalog.forums.push(dup);
        let err = validate_sources(&catalog).unwrap_err();
        assert!(err.to_string().contains("duplicate forum name"));
    }

    #[test]
    fn validate_rejects_empty_patterns() {
        let mut catalog = SourceCatalog::builtin();
        catalog.patterns.clear();
        let err = validate_sources(&catalog).unwrap_err();
        assert!(err.to_string().contains("phrase pattern"));
    }

    #[test]
    fn validate_rejects_blank_site() {
        let mut catalog = SourceCatalog::builtin();
        catalog.forums[0].site = "  ".to_string();
        let err = validate_sources(&catalog).unwrap_err();
        assert!(err.to_string().contains("empty site filter"));
    }
}

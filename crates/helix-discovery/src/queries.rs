//! Deterministic search-query generation from the source catalog.

use helix_core::SourceCatalog;
use sha2::{Digest, Sha256};

/// One generated search query, tagged with its originating forum.
#[derive(Debug, Clone)]
pub struct GeneratedQuery {
    /// Full query string, e.g. `"\"pain point\" site:reddit.com/r/startups"`.
    pub text: String,
    /// Platform slug stamped onto ideas discovered via this query.
    pub platform: String,
    /// Category tag from the forum entry.
    pub category: String,
}

/// Produce the fixed, ordered query list: one query per forum × pattern.
///
/// Purely deterministic over the catalog contents; no side effects and no
/// failure mode.
#[must_use]
pub fn generate_queries(catalog: &SourceCatalog) -> Vec<GeneratedQuery> {
    let mut queries = Vec::with_capacity(catalog.forums.len() * catalog.patterns.len());
    for forum in &catalog.forums {
        for pattern in &catalog.patterns {
            queries.push(GeneratedQuery {
                text: format!("\"{pattern}\" site:{}", forum.site),
                platform: forum.platform_slug(),
                category: forum.category.clone(),
            });
        }
    }
    queries
}

/// Stable dedup key for a discovered post: sha256 of the normalized URL.
///
/// Normalization lowercases the URL and strips the fragment and any
/// trailing slash, so re-discovering the same post under a cosmetically
/// different link maps to the same key.
#[must_use]
pub fn make_dedup_key(url: &str) -> String {
    let trimmed = url.trim();
    let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);
    let normalized = without_fragment.trim_end_matches('/').to_lowercase();
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_count_is_forums_times_patterns() {
        let catalog = SourceCatalog::builtin();
        let queries = generate_queries(&catalog);
        assert_eq!(
            queries.len(),
            catalog.forums.len() * catalog.patterns.len()
        );
    }

    #[test]
    fn queries_are_ordered_forum_major() {
        let catalog = SourceCatalog::builtin();
        let queries = generate_queries(&catalog);
        // All patterns for the first forum come before any for the second.
        let first_platform = &queries[0].platform;
        let per_forum = catalog.patterns.len();
        assert!(queries[..per_forum]
            .iter()
            .all(|q| &q.platform == first_platform));
        assert_ne!(&queries[per_forum].platform, first_platform);
    }

    #[test]
    fn query_text_quotes_pattern_and_filters_site() {
        let catalog = SourceCatalog::builtin();
        let queries = generate_queries(&catalog);
        let q = &queries[0];
        assert!(q.text.starts_with('"'), "pattern should be quoted: {}", q.text);
        assert!(q.text.contains(" site:"), "missing site filter: {}", q.text);
    }

    #[test]
    fn generation_is_deterministic() {
        let catalog = SourceCatalog::builtin();
        let a: Vec<String> = generate_queries(&catalog).into_iter().map(|q| q.text).collect();
        let b: Vec<String> = generate_queries(&catalog).into_iter().map(|q| q.text).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn dedup_key_ignores_case_fragment_and_trailing_slash() {
        let a = make_dedup_key("https://reddit.com/r/startups/comments/ABC123/");
        let b = make_dedup_key("https://reddit.com/r/startups/comments/abc123#top");
        assert_eq!(a, b);
    }

    #[test]
    fn dedup_key_differs_for_different_posts() {
        let a = make_dedup_key("https://reddit.com/r/startups/comments/abc123");
        let b = make_dedup_key("https://reddit.com/r/startups/comments/def456");
        assert_ne!(a, b);
    }

    #[test]
    fn dedup_key_is_hex_sha256() {
        let key = make_dedup_key("https://example.com/post");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

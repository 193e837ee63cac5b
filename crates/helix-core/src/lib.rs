pub mod app_config;
pub mod config;
pub mod sources;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sources::{load_sources, ForumSource, SourceCatalog};

/// Build-effort classification attached to every analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Classify an estimated build time in weeks.
    ///
    /// Monotonic in weeks: two weeks or less is `Simple`, exactly three is
    /// `Medium`, four or more is `Complex`.
    #[must_use]
    pub fn from_build_weeks(weeks: i32) -> Self {
        match weeks {
            i32::MIN..=2 => Complexity::Simple,
            3 => Complexity::Medium,
            _ => Complexity::Complex,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }

    /// Parse the lowercase database representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Complexity::Simple),
            "medium" => Some(Complexity::Medium),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file at {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_weeks_or_less_is_simple() {
        assert_eq!(Complexity::from_build_weeks(0), Complexity::Simple);
        assert_eq!(Complexity::from_build_weeks(1), Complexity::Simple);
        assert_eq!(Complexity::from_build_weeks(2), Complexity::Simple);
    }

    #[test]
    fn three_weeks_is_medium() {
        assert_eq!(Complexity::from_build_weeks(3), Complexity::Medium);
    }

    #[test]
    fn four_or_more_weeks_is_complex() {
        assert_eq!(Complexity::from_build_weeks(4), Complexity::Complex);
        assert_eq!(Complexity::from_build_weeks(12), Complexity::Complex);
    }

    #[test]
    fn parse_round_trips_as_str() {
        for c in [Complexity::Simple, Complexity::Medium, Complexity::Complex] {
            assert_eq!(Complexity::parse(c.as_str()), Some(c));
        }
        assert_eq!(Complexity::parse("unknown"), None);
    }
}

//! Pure discovery logic: query generation, painpoint-indicator extraction,
//! and the build-effort heuristics stamped onto new candidates.
//!
//! Everything here is deterministic and side-effect free; the pipeline crate
//! wires these functions to the search client and the database.

mod heuristics;
mod indicators;
mod queries;

pub use heuristics::{estimate_build_weeks, suggest_tech_stack, DEFAULT_TECH_STACK};
pub use indicators::{extract_indicators, INDICATOR_PHRASES};
pub use queries::{generate_queries, make_dedup_key, GeneratedQuery};

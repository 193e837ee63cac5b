//! Scoring prompt construction.

use crate::types::IdeaBrief;

const MAX_DESCRIPTION_BYTES: usize = 2_000;

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Build the scoring prompt for one idea.
///
/// Embeds the idea's fields and a fixed rubric, and instructs the model to
/// answer with a single JSON object matching the schema
/// [`crate::parse_scores`] expects.
#[must_use]
pub fn build_scoring_prompt(brief: &IdeaBrief) -> String {
    let description = truncate_to_char_boundary(&brief.description, MAX_DESCRIPTION_BYTES);

    format!(
        "You are a startup analyst evaluating a software opportunity discovered from a \
public forum post.\n\
\n\
Idea: {title}\n\
Category: {category}\n\
Estimated build time: {weeks} weeks\n\
Suggested stack: {stack}\n\
Description: {description}\n\
\n\
Score the opportunity on these dimensions, each 0-100:\n\
- severity: how painful the underlying problem is for the people describing it\n\
- feasibility: how realistic it is for a small team to build and ship this\n\
- competition_gap: how underserved the space is (100 = no good solution exists)\n\
- viability: how likely a paid product here sustains itself\n\
- revenue_potential: earning potential relative to comparable micro-SaaS products\n\
\n\
Also classify complexity as \"simple\", \"medium\", or \"complex\", and write a \
two-sentence explanation of the scores.\n\
\n\
Respond with a single JSON object and nothing else:\n\
{{\"severity\": 0, \"feasibility\": 0, \"competition_gap\": 0, \"viability\": 0, \
\"revenue_potential\": 0, \"complexity\": \"simple\", \"explanation\": \"...\"}}",
        title = brief.title,
        category = brief.category,
        weeks = brief.estimated_build_weeks,
        stack = brief.estimated_tech_stack,
        description = description,
    )
}

//! Aggregate statistics over the top-N scored ideas.

use helix_db::ScoredIdeaRow;
use rust_decimal::{Decimal, RoundingStrategy};

/// Mean estimated build time in weeks, rounded to one decimal place.
///
/// Returns zero for an empty slice.
#[must_use]
pub fn mean_build_weeks(rows: &[ScoredIdeaRow]) -> Decimal {
    if rows.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = rows.iter().map(|r| i64::from(r.estimated_build_weeks)).sum();
    let mean = Decimal::from(sum) / Decimal::from(rows.len());
    mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Most frequent tech-stack string; ties break to the first-seen stack.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn top_tech_stack(rows: &[ScoredIdeaRow]) -> Option<String> {
    // Counts keyed in first-seen order so max_by_key's "last wins on ties"
    // is neutralized by taking the earliest maximum.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for row in rows {
        match counts
            .iter_mut()
            .find(|(stack, _)| *stack == row.estimated_tech_stack)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((&row.estimated_tech_stack, 1)),
        }
    }

    let best = counts.iter().map(|(_, c)| *c).max()?;
    counts
        .iter()
        .find(|(_, c)| *c == best)
        .map(|(stack, _)| (*stack).to_string())
}

/// Highest single revenue-potential score; zero for an empty slice.
#[must_use]
pub fn max_revenue_potential(rows: &[ScoredIdeaRow]) -> i32 {
    rows.iter().map(|r| r.revenue_potential).max().unwrap_or(0)
}

/// Number of rows whose analysis classified the build as simple.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn simple_count(rows: &[ScoredIdeaRow]) -> i32 {
    rows.iter().filter(|r| r.complexity == "simple").count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(weeks: i32, stack: &str, revenue: i32, complexity: &str) -> ScoredIdeaRow {
        ScoredIdeaRow {
            id: 1,
            title: "Idea".to_string(),
            description: "Description".to_string(),
            source_platform: "r-startups".to_string(),
            source_url: "https://example.com/post".to_string(),
            category: "startup".to_string(),
            estimated_build_weeks: weeks,
            estimated_tech_stack: stack.to_string(),
            discovered_at: Utc::now(),
            analysis_id: 1,
            severity: 60,
            feasibility: 60,
            competition_gap: 60,
            viability: 60,
            revenue_potential: revenue,
            overall_score: 66,
            complexity: complexity.to_string(),
            explanation: "explanation".to_string(),
            is_fallback: false,
        }
    }

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(mean_build_weeks(&[]), Decimal::ZERO);
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        let rows = vec![
            row(1, "A", 10, "simple"),
            row(2, "A", 10, "simple"),
            row(2, "A", 10, "simple"),
        ];
        // 5/3 = 1.666... -> 1.7
        assert_eq!(mean_build_weeks(&rows).to_string(), "1.7");
    }

    #[test]
    fn mean_midpoint_rounds_away_from_zero() {
        let rows = vec![row(1, "A", 10, "simple"), row(2, "A", 10, "simple")];
        // 3/2 = 1.5 -> 1.5 stays exact at one decimal
        assert_eq!(mean_build_weeks(&rows).to_string(), "1.5");

        let rows = vec![
            row(1, "A", 10, "simple"),
            row(1, "A", 10, "simple"),
            row(2, "A", 10, "simple"),
            row(3, "A", 10, "simple"),
        ];
        // 7/4 = 1.75 -> 1.8
        assert_eq!(mean_build_weeks(&rows).to_string(), "1.8");
    }

    #[test]
    fn top_tech_stack_of_empty_slice_is_none() {
        assert!(top_tech_stack(&[]).is_none());
    }

    #[test]
    fn top_tech_stack_picks_the_mode() {
        let rows = vec![
            row(1, "A", 10, "simple"),
            row(1, "B", 10, "simple"),
            row(1, "B", 10, "simple"),
        ];
        assert_eq!(top_tech_stack(&rows).as_deref(), Some("B"));
    }

    #[test]
    fn top_tech_stack_ties_break_to_first_seen() {
        let rows = vec![
            row(1, "A", 10, "simple"),
            row(1, "B", 10, "simple"),
            row(1, "B", 10, "simple"),
            row(1, "A", 10, "simple"),
        ];
        assert_eq!(top_tech_stack(&rows).as_deref(), Some("A"));
    }

    #[test]
    fn max_revenue_potential_of_empty_slice_is_zero() {
        assert_eq!(max_revenue_potential(&[]), 0);
    }

    #[test]
    fn max_revenue_potential_finds_the_peak() {
        let rows = vec![
            row(1, "A", 30, "simple"),
            row(1, "A", 90, "complex"),
            row(1, "A", 55, "medium"),
        ];
        assert_eq!(max_revenue_potential(&rows), 90);
    }

    #[test]
    fn simple_count_counts_only_simple_rows() {
        let rows = vec![
            row(1, "A", 10, "simple"),
            row(3, "A", 10, "medium"),
            row(2, "A", 10, "simple"),
            row(5, "A", 10, "complex"),
        ];
        assert_eq!(simple_count(&rows), 2);
    }
}

//! Keyword heuristics stamped onto candidates at discovery time.
//!
//! Both estimates are naive by contract: they look for keyword presence in
//! the description and nothing else. The scoring step refines them later;
//! these exist so unscored ideas still render usefully in the dashboard.

/// Stack suggested when no preset keyword matches.
pub const DEFAULT_TECH_STACK: &str = "Next.js + Node.js + PostgreSQL";

/// Estimate build time in weeks from description keywords.
///
/// First matching bucket wins, scanning simplest to most complex:
/// forms/landing pages (1), dashboards/trackers (2), integrations/
/// automations (3), marketplaces/platforms (4). Descriptions matching no
/// bucket default to 3 weeks.
#[must_use]
pub fn estimate_build_weeks(description: &str) -> i32 {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["form", "landing page", "checklist", "reminder"]) {
        1
    } else if has(&["dashboard", "tracker", "report", "chart"]) {
        2
    } else if has(&["integration", "sync", "automate", "automation", "api"]) {
        3
    } else if has(&["marketplace", "platform", "multi-tenant", "machine learning"]) {
        4
    } else {
        3
    }
}

/// Suggest one of four fixed stack presets from description keywords.
///
/// Falls back to [`DEFAULT_TECH_STACK`] when nothing matches.
#[must_use]
pub fn suggest_tech_stack(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["mobile", "ios", "android", "on the go"]) {
        "React Native + Expo + Firebase"
    } else if has(&["ai", "gpt", "chatbot", "summariz"]) {
        "Next.js + FastAPI + OpenAI API"
    } else if has(&["store", "shop", "ecommerce", "inventory"]) {
        "Next.js + Stripe + PostgreSQL"
    } else if has(&["extension", "browser", "scrape"]) {
        "TypeScript + Browser Extension APIs + Supabase"
    } else {
        DEFAULT_TECH_STACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_keyword_estimates_one_week() {
        assert_eq!(estimate_build_weeks("A simple intake form for gyms"), 1);
    }

    #[test]
    fn dashboard_keyword_estimates_two_weeks() {
        assert_eq!(
            estimate_build_weeks("A dashboard showing daily revenue"),
            2
        );
    }

    #[test]
    fn integration_keyword_estimates_three_weeks() {
        assert_eq!(
            estimate_build_weeks("Sync orders between Shopify and QuickBooks"),
            3
        );
    }

    #[test]
    fn marketplace_keyword_estimates_four_weeks() {
        assert_eq!(
            estimate_build_weeks("A marketplace connecting tutors with parents"),
            4
        );
    }

    #[test]
    fn unmatched_description_defaults_to_three_weeks() {
        assert_eq!(estimate_build_weeks("Something nobody has words for"), 3);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(estimate_build_weeks("A DASHBOARD for landlords"), 2);
    }

    #[test]
    fn simplest_bucket_wins_on_mixed_keywords() {
        // "form" (1 week) appears alongside "integration" (3 weeks).
        assert_eq!(
            estimate_build_weeks("A form that posts to our integration"),
            1
        );
    }

    #[test]
    fn mobile_keywords_pick_the_native_preset() {
        assert_eq!(
            suggest_tech_stack("An iOS app for dog walkers"),
            "React Native + Expo + Firebase"
        );
    }

    #[test]
    fn ai_keywords_pick_the_llm_preset() {
        assert_eq!(
            suggest_tech_stack("A GPT chatbot that summarizes contracts"),
            "Next.js + FastAPI + OpenAI API"
        );
    }

    #[test]
    fn commerce_keywords_pick_the_stripe_preset() {
        assert_eq!(
            suggest_tech_stack("Inventory management for small shops"),
            "Next.js + Stripe + PostgreSQL"
        );
    }

    #[test]
    fn browser_keywords_pick_the_extension_preset() {
        assert_eq!(
            suggest_tech_stack("A browser extension to clip recipes"),
            "TypeScript + Browser Extension APIs + Supabase"
        );
    }

    #[test]
    fn unmatched_description_gets_the_default_stack() {
        assert_eq!(
            suggest_tech_stack("Help people find hiking partners"),
            DEFAULT_TECH_STACK
        );
    }
}

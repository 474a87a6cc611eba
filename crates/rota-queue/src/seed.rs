//! Keyword rules mapping unstructured text to seed suggestions.
//! Ordered, first match wins; pure so it can be tested without file I/O.

/// A single keyword-matching rule.
#[derive(Debug, Clone)]
pub struct SeedRule {
    pub keywords: Vec<&'static str>,
    /// Distinct keywords that must appear before the rule fires.
    pub min_hits: usize,
    pub suggestion: &'static str,
}

/// Built-in rule table, most specific first.
pub fn default_rules() -> Vec<SeedRule> {
    vec![
        SeedRule {
            keywords: vec!["webhook", "callback", "endpoint"],
            min_hits: 2,
            suggestion: "Wire an inbound webhook receiver into intake",
        },
        SeedRule {
            keywords: vec!["rss", "feed", "digest"],
            min_hits: 2,
            suggestion: "Build an RSS digest exporter for recent threads",
        },
        SeedRule {
            keywords: vec!["timeout", "hang", "stall"],
            min_hits: 1,
            suggestion: "Add timeout instrumentation around external calls",
        },
        SeedRule {
            keywords: vec!["duplicate", "dedup", "repeated"],
            min_hits: 1,
            suggestion: "Extend title dedup to cover near-miss phrasing",
        },
        SeedRule {
            keywords: vec!["cache", "preload", "warm"],
            min_hits: 1,
            suggestion: "Create a session cache warmup for hot files",
        },
    ]
}

/// Evaluate rules in order against free text; first rule whose keyword
/// hit count reaches `min_hits` wins.
pub fn evaluate<'a>(rules: &'a [SeedRule], text: &str) -> Option<&'a SeedRule> {
    let lower = text.to_lowercase();
    rules.iter().find(|rule| {
        let hits = rule
            .keywords
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count();
        hits >= rule.min_hits
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let rules = default_rules();
        let hit = evaluate(&rules, "the RSS feed keeps timing out").unwrap();
        // Both the feed rule and the timeout rule match; feed is earlier.
        assert!(hit.suggestion.contains("RSS"));
    }

    #[test]
    fn min_hits_enforced() {
        let rules = default_rules();
        // One keyword from a min_hits=2 rule is not enough.
        assert!(evaluate(&rules, "a webhook was mentioned").is_none());
        assert!(evaluate(&rules, "webhook endpoint is flaky").is_some());
    }

    #[test]
    fn case_insensitive() {
        let rules = default_rules();
        assert!(evaluate(&rules, "DUPLICATE entries again").is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let rules = default_rules();
        assert!(evaluate(&rules, "nothing relevant here").is_none());
    }
}

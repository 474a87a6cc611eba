//! Actionability filter for externally captured intelligence entries.
//!
//! Only a narrow slice of observations is worth a queue slot: concrete,
//! imperative build instructions. Everything observational, philosophical,
//! or meta ("should be added to the queue") is discarded rather than
//! promoted — vague items pollute the backlog.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Actionable text shorter than this is noise.
pub const MIN_ACTIONABLE_LEN: usize = 20;
/// Derived titles are capped at this many characters.
pub const TITLE_MAX_LEN: usize = 60;

/// Entry types eligible for promotion.
const ELIGIBLE_TYPES: &[&str] = &["integration_target", "pattern", "tool_idea"];

/// Imperative verbs that mark a concrete build instruction.
const IMPERATIVE_VERBS: &[&str] = &[
    "add", "build", "fix", "implement", "create", "write", "wire", "port", "refactor", "extend",
    "automate", "expose", "integrate",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntelEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub actionable: String,
    /// Origin tick.
    #[serde(default)]
    pub session: u64,
}

fn observational_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(enables|reflects|is a form of|suggests|shows that|demonstrates|monitor|observe|watch)\b",
        )
        .unwrap()
    })
}

fn meta_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(should be added to the queue|add(ed)? to (the )?queue|queue this)")
            .unwrap()
    })
}

impl IntelEntry {
    /// Whether this entry clears the promotion filter.
    pub fn is_actionable(&self) -> bool {
        if !ELIGIBLE_TYPES.contains(&self.kind.as_str()) {
            return false;
        }
        let text = self.actionable.trim();
        if text.len() <= MIN_ACTIONABLE_LEN {
            return false;
        }
        let Some(first_word) = text.split_whitespace().next() else {
            return false;
        };
        let first = first_word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if !IMPERATIVE_VERBS.contains(&first.as_str()) {
            return false;
        }
        if observational_re().is_match(text) || meta_re().is_match(text) {
            return false;
        }
        true
    }

    /// Derive a queue title from the actionable text: cut at the first
    /// sentence boundary if one lands inside the cap, otherwise at the last
    /// word boundary before it. Never mid-word.
    pub fn derive_title(&self) -> String {
        let text = self.actionable.trim();
        if let Some(end) = text.find(['.', '!', '?']) {
            if end > 0 && end <= TITLE_MAX_LEN {
                return text[..end].trim_end().to_string();
            }
        }
        if text.len() <= TITLE_MAX_LEN {
            return text.to_string();
        }
        let mut limit = TITLE_MAX_LEN + 1;
        while !text.is_char_boundary(limit) {
            limit -= 1;
        }
        let cut = text[..limit].rfind(char::is_whitespace).unwrap_or(limit);
        text[..cut].trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, actionable: &str) -> IntelEntry {
        IntelEntry {
            kind: kind.into(),
            summary: String::new(),
            actionable: actionable.into(),
            session: 1,
        }
    }

    #[test]
    fn imperative_build_instruction_passes() {
        assert!(entry("tool_idea", "Build a markdown exporter for thread X").is_actionable());
        assert!(entry("pattern", "Implement retry backoff for the feed poller").is_actionable());
    }

    #[test]
    fn monitoring_language_rejected() {
        assert!(!entry("tool_idea", "Monitor the leaderboard for changes").is_actionable());
    }

    #[test]
    fn observational_language_rejected() {
        assert!(!entry(
            "pattern",
            "Add caching here since this reflects a deeper scheduling issue"
        )
        .is_actionable());
        assert!(!entry("pattern", "Create trust early; reciprocity is a form of memory").is_actionable());
    }

    #[test]
    fn meta_instructions_rejected() {
        assert!(!entry(
            "tool_idea",
            "Build a digest tool; this should be added to the queue"
        )
        .is_actionable());
    }

    #[test]
    fn ineligible_type_rejected() {
        assert!(!entry("philosophy", "Build a markdown exporter for thread X").is_actionable());
    }

    #[test]
    fn short_text_rejected() {
        assert!(!entry("tool_idea", "Fix the bug").is_actionable());
    }

    #[test]
    fn non_imperative_start_rejected() {
        assert!(!entry("tool_idea", "The exporter could use a markdown mode someday").is_actionable());
    }

    #[test]
    fn title_cuts_at_sentence_boundary() {
        let e = entry(
            "tool_idea",
            "Build a markdown exporter. It should handle threads and quotes as well.",
        );
        assert_eq!(e.derive_title(), "Build a markdown exporter");
    }

    #[test]
    fn title_cuts_at_word_boundary_never_mid_word() {
        let e = entry(
            "tool_idea",
            "Implement an incremental backlog compaction pass for the long tail of retired items",
        );
        let title = e.derive_title();
        assert!(title.len() <= TITLE_MAX_LEN);
        // The original text continues with a word boundary right after the cut.
        assert!(e.actionable.starts_with(&title));
        assert!(e.actionable.as_bytes()[title.len()].is_ascii_whitespace());
    }

    #[test]
    fn short_title_kept_whole() {
        let e = entry("tool_idea", "Wire the webhook relay into intake");
        assert_eq!(e.derive_title(), "Wire the webhook relay into intake");
    }
}

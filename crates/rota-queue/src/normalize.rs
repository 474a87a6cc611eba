/// Words considered for the fuzzy-dedup key.
const KEY_WORDS: usize = 6;

/// Normalize a title into its dedup key: lowercase, punctuation stripped,
/// whitespace collapsed, first six words.
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .take(KEY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            normalize_title("Add RSS feed (v2)!"),
            "add rss feed v2"
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_title("a   b\t c"), "a b c");
    }

    #[test]
    fn truncates_to_six_words() {
        assert_eq!(
            normalize_title("one two three four five six seven eight"),
            "one two three four five six"
        );
    }

    #[test]
    fn near_duplicates_collapse() {
        assert_eq!(
            normalize_title("Build a markdown exporter for threads"),
            normalize_title("build A Markdown exporter, for threads (redux)")
        );
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("!!! ???"), "");
    }
}

//! Keyword moderation — a substring test, not a classifier.

/// Lowercase phrases that reject a topic when found anywhere in it.
const BLOCKED_PHRASES: &[&str] = &["hate", "violent harm", "self-harm"];

/// Returns false if `topic` contains any blocked phrase, ignoring case.
pub fn is_allowed(topic: &str) -> bool {
    let lowered = topic.to_lowercase();
    !BLOCKED_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_topics_are_allowed() {
        assert!(is_allowed("fall makeup trends 2025"));
        assert!(is_allowed("morning gym routines"));
        assert!(is_allowed(""));
    }

    #[test]
    fn test_blocked_phrase_rejected_in_any_case() {
        assert!(!is_allowed("HATE speech explained"));
        assert!(!is_allowed("Violent Harm in movies"));
        assert!(!is_allowed("self-harm awareness"));
    }

    #[test]
    fn test_substring_match_is_literal() {
        // "whatever" contains "hate" as a substring, so it is rejected too
        assert!(!is_allowed("whatever works"));
        // "self harm" without the hyphen is not in the list
        assert!(is_allowed("self harm"));
    }

    #[test]
    fn test_every_listed_phrase_blocks() {
        for phrase in BLOCKED_PHRASES {
            assert!(!is_allowed(&format!("topic about {phrase} today")));
            assert!(!is_allowed(&phrase.to_uppercase()));
        }
    }
}

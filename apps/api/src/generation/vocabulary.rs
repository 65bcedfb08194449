//! Fixed vocabularies for offline generation and the static platform tips.
//!
//! These lists are reference data: read-only, never mutated at runtime.

use crate::generation::pack::Platform;

/// Opening verbs for offline hooks.
pub const HOOK_VERBS: &[&str] = &[
    "Unlock", "Try", "Avoid", "Master", "Discover", "Boost", "Fix", "Start", "Stop", "Learn",
];

/// Closing angles for offline hooks.
pub const HOOK_ANGLES: &[&str] = &[
    "in 60 seconds",
    "no one told you",
    "beginners need",
    "pros swear by",
    "on a budget",
    "without fancy gear",
];

/// Generic tags appended after the niche/topic tags.
pub const GENERIC_HASHTAGS: &[&str] = &[
    "#fyp",
    "#viral",
    "#howto",
    "#tutorial",
    "#learnontiktok",
    "#reels",
    "#shorts",
    "#contenttips",
    "#creator",
    "#trending",
];

/// Note attached to every offline plan day.
pub const PLAN_NOTE: &str = "Use b-roll + captions; clear CTA.";

/// Max tags derived from niche and topic words before the generic pool.
pub const MAX_WORD_TAGS: usize = 10;

/// Returns the platform's advisory tips, in display order.
pub fn platform_tips(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Tiktok => &[
            "Hook in the first 1.5s",
            "Use text overlay with a bold promise",
            "Keep jump-cuts 1–2s",
            "Use trending audio under VO",
        ],
        Platform::Instagram => &[
            "Front-load keywords in first caption line",
            "Use 4:5 or square for reach",
            "Pin best comment for saves",
            "Carousels perform well for tutorials",
        ],
        Platform::Youtube => &[
            "Hook + payoff preview within 3s",
            "Add a pattern interrupt at 5–7s",
            "Pair Shorts with related long-form",
            "Strong end-card CTA",
        ],
    }
}

/// Caption tone label: the tone title-cased, or "Helpful" when blank.
pub fn tone_label(tone: &str) -> String {
    if tone.trim().is_empty() {
        "Helpful".to_string()
    } else {
        title_case(tone)
    }
}

/// Uppercases every letter that follows a non-letter and lowercases the rest,
/// so "energetic, helpful" becomes "Energetic, Helpful".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(HOOK_VERBS.len(), 10);
        assert_eq!(HOOK_ANGLES.len(), 6);
        assert_eq!(GENERIC_HASHTAGS.len(), 10);
    }

    #[test]
    fn test_every_platform_has_tips() {
        for platform in Platform::ALL {
            assert_eq!(platform_tips(platform).len(), 4, "{platform} tips");
        }
    }

    #[test]
    fn test_tiktok_tips_lead_with_hook_timing() {
        assert_eq!(platform_tips(Platform::Tiktok)[0], "Hook in the first 1.5s");
    }

    #[test]
    fn test_title_case_words_and_punctuation() {
        assert_eq!(title_case("energetic, helpful"), "Energetic, Helpful");
        assert_eq!(title_case("CALM"), "Calm");
        assert_eq!(title_case("don't stop"), "Don'T Stop");
    }

    #[test]
    fn test_tone_label_defaults_to_helpful() {
        assert_eq!(tone_label(""), "Helpful");
        assert_eq!(tone_label("   "), "Helpful");
        assert_eq!(tone_label("witty"), "Witty");
    }
}

//! Offline generator — the deterministic fallback when no AI output is available.
//!
//! Identical requests always produce identical packs: the RNG seed is the first
//! eight bytes of SHA-256 over `topic + niche + audience + tone + platform`.

use sha2::{Digest, Sha256};

use crate::generation::pack::{
    PackRequest, RawPack, RawPlanItem, CAPTION_COUNT, HASHTAG_COUNT, HOOK_COUNT, PLAN_DAYS,
};
use crate::generation::vocabulary::{
    tone_label, GENERIC_HASHTAGS, HOOK_ANGLES, HOOK_VERBS, MAX_WORD_TAGS, PLAN_NOTE,
};

/// Builds a raw pack from fixed vocabularies. No I/O, never fails.
pub fn offline_generate(request: &PackRequest) -> RawPack {
    let mut rng = fastrand::Rng::with_seed(seed_for(request));
    let topic = &request.topic;

    let hooks: Vec<String> = (0..HOOK_COUNT)
        .map(|_| {
            let verb = HOOK_VERBS[rng.usize(..HOOK_VERBS.len())];
            let angle = HOOK_ANGLES[rng.usize(..HOOK_ANGLES.len())];
            format!("{verb} {topic} {angle}")
        })
        .collect();

    let caption = format!(
        "{} take: {} for {}. Save this! 🔖",
        tone_label(&request.tone),
        topic,
        request.niche
    );
    let captions = vec![caption; CAPTION_COUNT];

    let hashtags: Vec<String> = request
        .niche
        .split_whitespace()
        .chain(topic.split_whitespace())
        .map(|word| format!("#{word}"))
        .take(MAX_WORD_TAGS)
        .chain(GENERIC_HASHTAGS.iter().map(|t| t.to_string()))
        .take(HASHTAG_COUNT)
        .collect();

    let plan = hooks
        .iter()
        .take(PLAN_DAYS)
        .enumerate()
        .map(|(i, hook)| RawPlanItem {
            day: Some(i as u32 + 1),
            post: hook.clone(),
            note: PLAN_NOTE.to_string(),
        })
        .collect();

    RawPack {
        hooks,
        captions,
        hashtags,
        plan,
    }
}

fn seed_for(request: &PackRequest) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(request.topic.as_bytes());
    hasher.update(request.niche.as_bytes());
    hasher.update(request.audience.as_bytes());
    hasher.update(request.tone.as_bytes());
    hasher.update(request.platform.as_str().as_bytes());
    let digest = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::normalize::normalize_pack;
    use crate::generation::pack::Platform;

    fn sample_request() -> PackRequest {
        PackRequest::new(
            "fall makeup trends 2025",
            "beauty creators",
            "women 18–30",
            "energetic, helpful",
            Platform::Tiktok,
        )
    }

    #[test]
    fn test_offline_generate_is_deterministic() {
        let a = offline_generate(&sample_request());
        let b = offline_generate(&sample_request());
        assert_eq!(a, b);
    }

    #[test]
    fn test_each_field_changes_hooks() {
        let base = sample_request();
        let base_hooks = offline_generate(&base).hooks;

        let variants = vec![
            PackRequest { niche: "skincare pros".into(), ..base.clone() },
            PackRequest { audience: "teens".into(), ..base.clone() },
            PackRequest { tone: "calm".into(), ..base.clone() },
            PackRequest { platform: Platform::Youtube, ..base.clone() },
            base.with_topic("spring makeup trends 2025"),
        ];

        for variant in variants {
            assert_ne!(
                offline_generate(&variant).hooks,
                base_hooks,
                "hooks should change for {variant:?}"
            );
        }
    }

    #[test]
    fn test_end_to_end_example_pack() {
        let raw = offline_generate(&sample_request());

        assert_eq!(raw.hooks.len(), 10);
        for hook in &raw.hooks {
            assert!(hook.contains("fall makeup trends 2025"), "hook: {hook}");
        }

        let generic: Vec<String> = GENERIC_HASHTAGS.iter().map(|t| t.to_string()).collect();
        assert!(raw.hashtags.ends_with(&generic));
        assert_eq!(
            &raw.hashtags[..6],
            &["#beauty", "#creators", "#fall", "#makeup", "#trends", "#2025"]
        );

        let pack = normalize_pack(raw);
        assert_eq!(pack.hashtags.len(), 30);
        let non_empty: Vec<String> = pack
            .hashtags
            .iter()
            .filter(|t| !t.is_empty())
            .cloned()
            .collect();
        assert!(non_empty.ends_with(&generic));

        assert_eq!(pack.plan.len(), 7);
        for (i, entry) in pack.plan.iter().enumerate() {
            assert_eq!(entry.post, pack.hooks[i]);
            assert_eq!(entry.day, i as u32 + 1);
            assert_eq!(entry.note, PLAN_NOTE);
        }
    }

    #[test]
    fn test_captions_use_title_cased_tone() {
        let raw = offline_generate(&sample_request());
        assert_eq!(raw.captions.len(), 10);
        assert_eq!(
            raw.captions[0],
            "Energetic, Helpful take: fall makeup trends 2025 for beauty creators. Save this! 🔖"
        );
        assert!(raw.captions.iter().all(|c| c == &raw.captions[0]));
    }

    #[test]
    fn test_blank_tone_caption_uses_helpful() {
        let request = PackRequest::new("topic", "niche", "", "", Platform::Instagram);
        let raw = offline_generate(&request);
        assert!(raw.captions[0].starts_with("Helpful take:"));
    }

    #[test]
    fn test_word_tags_capped_at_ten() {
        let request = PackRequest::new(
            "one two three four five six seven eight",
            "alpha beta gamma delta",
            "",
            "",
            Platform::Tiktok,
        );
        let raw = offline_generate(&request);
        assert_eq!(raw.hashtags.len(), 20);
        assert_eq!(raw.hashtags[9], "#six");
        assert_eq!(raw.hashtags[10], "#fyp");
    }

    #[test]
    fn test_hooks_draw_from_vocabulary() {
        let raw = offline_generate(&sample_request());
        for hook in &raw.hooks {
            assert!(HOOK_VERBS.iter().any(|v| hook.starts_with(v)), "hook: {hook}");
            assert!(HOOK_ANGLES.iter().any(|a| hook.ends_with(a)), "hook: {hook}");
        }
    }
}

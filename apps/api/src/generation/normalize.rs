//! Pack normalization: forces any generator output into the fixed 10/10/30/7 shape.

use crate::generation::pack::{
    ContentPack, PlanEntry, RawPack, CAPTION_COUNT, HASHTAG_COUNT, HOOK_COUNT, PLAN_DAYS,
};

/// Truncates or pads every sequence to its fixed size. Never fails.
///
/// Plan items without a day take their 1-based position; padding entries are
/// numbered `len + i + 1` with empty post and note.
pub fn normalize_pack(raw: RawPack) -> ContentPack {
    let plan: Vec<PlanEntry> = raw
        .plan
        .into_iter()
        .take(PLAN_DAYS)
        .enumerate()
        .map(|(i, item)| PlanEntry {
            day: item.day.unwrap_or(i as u32 + 1),
            post: item.post,
            note: item.note,
        })
        .collect();

    let kept = plan.len();
    let plan = plan
        .into_iter()
        .chain((kept..PLAN_DAYS).map(|i| PlanEntry::empty(i as u32 + 1)))
        .collect();

    ContentPack {
        hooks: fit_strings(raw.hooks, HOOK_COUNT),
        captions: fit_strings(raw.captions, CAPTION_COUNT),
        hashtags: fit_strings(raw.hashtags, HASHTAG_COUNT),
        plan,
    }
}

fn fit_strings(mut items: Vec<String>, len: usize) -> Vec<String> {
    items.truncate(len);
    items.resize(len, String::new());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::pack::RawPlanItem;

    fn strings(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    fn plan_items(n: usize) -> Vec<RawPlanItem> {
        (0..n)
            .map(|i| RawPlanItem {
                day: Some(i as u32 + 1),
                post: format!("post{i}"),
                note: format!("note{i}"),
            })
            .collect()
    }

    fn assert_fixed_shape(pack: &ContentPack) {
        assert_eq!(pack.hooks.len(), HOOK_COUNT);
        assert_eq!(pack.captions.len(), CAPTION_COUNT);
        assert_eq!(pack.hashtags.len(), HASHTAG_COUNT);
        assert_eq!(pack.plan.len(), PLAN_DAYS);
    }

    #[test]
    fn test_all_empty_input_pads_everything() {
        let pack = normalize_pack(RawPack::default());
        assert_fixed_shape(&pack);
        assert!(pack.hooks.iter().all(String::is_empty));
        let days: Vec<u32> = pack.plan.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_shape_holds_for_any_input_lengths() {
        for n in [0usize, 1, 6, 7, 9, 10, 11, 29, 30, 31, 50] {
            let pack = normalize_pack(RawPack {
                hooks: strings(n, "h"),
                captions: strings(n, "c"),
                hashtags: strings(n, "#t"),
                plan: plan_items(n),
            });
            assert_fixed_shape(&pack);
        }
    }

    #[test]
    fn test_truncation_keeps_first_elements() {
        let pack = normalize_pack(RawPack {
            hooks: strings(15, "h"),
            hashtags: strings(40, "#t"),
            plan: plan_items(9),
            ..Default::default()
        });
        assert_eq!(pack.hooks.first().map(String::as_str), Some("h0"));
        assert_eq!(pack.hooks.last().map(String::as_str), Some("h9"));
        assert_eq!(pack.hashtags.last().map(String::as_str), Some("#t29"));
        assert_eq!(pack.plan.last().map(|p| p.post.as_str()), Some("post6"));
    }

    #[test]
    fn test_short_plan_padding_continues_numbering() {
        let pack = normalize_pack(RawPack {
            plan: plan_items(3),
            ..Default::default()
        });
        assert_eq!(pack.plan[2].post, "post2");
        assert_eq!(pack.plan[3], PlanEntry::empty(4));
        assert_eq!(pack.plan[6], PlanEntry::empty(7));
    }

    #[test]
    fn test_missing_days_take_position() {
        let pack = normalize_pack(RawPack {
            plan: vec![
                RawPlanItem {
                    day: None,
                    post: "first".to_string(),
                    note: String::new(),
                },
                RawPlanItem {
                    day: None,
                    post: "second".to_string(),
                    note: String::new(),
                },
            ],
            ..Default::default()
        });
        assert_eq!(pack.plan[0].day, 1);
        assert_eq!(pack.plan[1].day, 2);
        assert_eq!(pack.plan[2].day, 3);
    }

    #[test]
    fn test_short_hooks_padded_with_empty_strings() {
        let pack = normalize_pack(RawPack {
            hooks: strings(4, "h"),
            ..Default::default()
        });
        assert_eq!(pack.hooks[3], "h3");
        assert_eq!(pack.hooks[4], "");
        assert_eq!(pack.hooks[9], "");
    }
}

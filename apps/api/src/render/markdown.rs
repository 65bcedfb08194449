//! Markdown rendering of a normalized pack.

use chrono::{DateTime, TimeZone};

use crate::generation::pack::{ContentPack, PackRequest};
use crate::generation::vocabulary::platform_tips;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders the pack as a Markdown document. Deterministic apart from `generated_at`.
pub fn render_markdown<Tz>(
    request: &PackRequest,
    pack: &ContentPack,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut md = vec![
        format!(
            "# Content Pack — {} ({})",
            request.topic,
            request.platform.title()
        ),
        format!("**Niche:** {}  ", request.niche),
        format!("**Audience:** {}  ", request.audience_or_default()),
        format!("**Tone:** {}  ", request.tone_or_default()),
        format!("_Generated: {}_", generated_at.format(TIMESTAMP_FORMAT)),
        "\n---\n".to_string(),
        "## 🔥 Hooks (10)\n".to_string(),
    ];

    md.extend(numbered(&pack.hooks));

    md.push("\n## ✍️ Captions (10)\n".to_string());
    md.extend(numbered(&pack.captions));

    md.push("\n## #️⃣ Hashtags (30)\n".to_string());
    md.push(pack.hashtags.join(" "));

    md.push("\n## 🗓️ 7-Day Posting Plan\n".to_string());
    for item in &pack.plan {
        md.push(format!(
            "- **Day {}** — {}  \n  _Note:_ {}",
            item.day, item.post, item.note
        ));
    }

    let tips = platform_tips(request.platform);
    if !tips.is_empty() {
        md.push("\n## 🧠 Platform Tips\n".to_string());
        md.extend(tips.iter().map(|tip| format!("- {tip}")));
    }

    md.join("\n")
}

fn numbered(items: &[String]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
}

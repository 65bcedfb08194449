// LLM prompt constants for content-pack generation.
// The system instruction lives in llm_client::prompts.

/// Content-pack prompt template.
/// Replace: {topic}, {niche}, {platform}, {audience}, {tone}
pub const PACK_PROMPT_TEMPLATE: &str = r#"
Create a short-form content pack for "{topic}" in the "{niche}" niche for the "{platform}" platform.
Audience: {audience}. Tone: {tone}.
Return JSON with keys: hooks (10), captions (10), hashtags (30), plan (7 items).
Each hook <= 12 words; captions 1–2 sentences; plan items have fields day, post, note.
"#;

pub const DEFAULT_PROMPT_AUDIENCE: &str = "general creators";
pub const DEFAULT_PROMPT_TONE: &str = "friendly and direct";

/// Substitutes `{name}` placeholders in one left-to-right pass. Inserted
/// values are never rescanned; unknown placeholders are kept verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let replaced = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

//! Core data model for content packs: the request, the raw generator output,
//! and the fixed-shape normalized pack every renderer consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub const HOOK_COUNT: usize = 10;
pub const CAPTION_COUNT: usize = 10;
pub const HASHTAG_COUNT: usize = 30;
pub const PLAN_DAYS: usize = 7;

// ────────────────────────────────────────────────────────────────────────────
// Platform
// ────────────────────────────────────────────────────────────────────────────

/// Target social-media platform. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Platform {
    Tiktok,
    Instagram,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Tiktok, Platform::Instagram, Platform::Youtube];

    /// Lowercase key used in file names and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
        }
    }

    /// Display form: first letter capitalized ("Tiktok", "Instagram", "Youtube").
    pub fn title(&self) -> &'static str {
        match self {
            Platform::Tiktok => "Tiktok",
            Platform::Instagram => "Instagram",
            Platform::Youtube => "Youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| format!("unknown platform '{key}' (expected tiktok, instagram or youtube)"))
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// The five fields that fully determine a pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackRequest {
    pub topic: String,
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub tone: String,
    pub platform: Platform,
}

impl PackRequest {
    pub fn new(
        topic: impl Into<String>,
        niche: impl Into<String>,
        audience: impl Into<String>,
        tone: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            topic: topic.into(),
            niche: niche.into(),
            audience: audience.into(),
            tone: tone.into(),
            platform,
        }
    }

    /// Same niche/audience/tone/platform, different topic. Used by bulk mode.
    pub fn with_topic(&self, topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..self.clone()
        }
    }

    pub fn audience_or_default(&self) -> &str {
        non_empty_or(&self.audience, "General")
    }

    pub fn tone_or_default(&self) -> &str {
        non_empty_or(&self.tone, "Friendly")
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pack shapes
// ────────────────────────────────────────────────────────────────────────────

/// One day of the posting plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub day: u32,
    pub post: String,
    pub note: String,
}

impl PlanEntry {
    pub fn empty(day: u32) -> Self {
        Self {
            day,
            post: String::new(),
            note: String::new(),
        }
    }
}

/// A plan item as a generator produced it. The AI path may leave out `day`
/// or send it as a string such as `"Day 3"`; `post` and `note` accept null
/// and non-string scalars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPlanItem {
    #[serde(default, deserialize_with = "deserialize_loose_day")]
    pub day: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_loose_text")]
    pub post: String,
    #[serde(default, deserialize_with = "deserialize_loose_text")]
    pub note: String,
}

/// Generator output with unconstrained sequence lengths.
/// Must go through `normalize_pack` before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPack {
    #[serde(default, deserialize_with = "deserialize_loose_texts")]
    pub hooks: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_loose_texts")]
    pub captions: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_loose_texts")]
    pub hashtags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_loose_plan")]
    pub plan: Vec<RawPlanItem>,
}

/// The normalized pack: always exactly 10 hooks, 10 captions, 30 hashtags, 7 plan days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPack {
    pub hooks: Vec<String>,
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub plan: Vec<PlanEntry>,
}

fn deserialize_loose_day<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    })
}

/// Null becomes empty, strings pass through, anything else is its JSON text.
fn loose_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn deserialize_loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(loose_text)
}

fn deserialize_loose_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items.into_iter().map(loose_text).collect(),
        serde_json::Value::Null => Vec::new(),
        single => vec![loose_text(single)],
    })
}

/// Items that are not objects are dropped; the normalizer pads the plan back to 7.
fn deserialize_loose_plan<'de, D>(deserializer: D) -> Result<Vec<RawPlanItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

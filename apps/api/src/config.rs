use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_FONT_REGULAR: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
const DEFAULT_FONT_BOLD: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Application configuration loaded from environment variables once at startup.
/// Only malformed numeric values are fatal; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent key means every pack is built by the offline generator.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub daily_limit: u32,
    pub pro_daily_limit: u32,
    pub default_user_id: String,
    pub license_verify_url: Option<String>,
    pub license_product_id: Option<String>,
    pub license_checkout_url: Option<String>,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub font_regular_path: PathBuf,
    pub font_bold_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            daily_limit: parse_env("DAILY_LIMIT", 10)?,
            pro_daily_limit: parse_env("PRO_DAILY_LIMIT", 100)?,
            default_user_id: optional_env("DEFAULT_USER_ID")
                .or_else(|| optional_env("USER"))
                .or_else(|| optional_env("USERNAME"))
                .unwrap_or_else(|| "guest".to_string()),
            license_verify_url: optional_env("LICENSE_VERIFY_URL"),
            license_product_id: optional_env("LICENSE_PRODUCT_ID"),
            license_checkout_url: optional_env("LICENSE_CHECKOUT_URL"),
            output_dir: optional_env("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./content_packs")),
            file_prefix: optional_env("FILE_PREFIX").unwrap_or_else(|| "TrendForge".to_string()),
            font_regular_path: optional_env("PDF_FONT_REGULAR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_REGULAR)),
            font_bold_path: optional_env("PDF_FONT_BOLD")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_BOLD)),
        })
    }

    pub fn ai_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env(key: &str, default: u32) -> Result<u32> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Offline-only config rooted at `output_dir`, used across module tests.
    pub fn for_tests(output_dir: PathBuf) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            daily_limit: 10,
            pro_daily_limit: 100,
            default_user_id: "guest".to_string(),
            license_verify_url: None,
            license_product_id: None,
            license_checkout_url: None,
            output_dir,
            file_prefix: "TrendForge".to_string(),
            font_regular_path: PathBuf::from("/nonexistent/regular.ttf"),
            font_bold_path: PathBuf::from("/nonexistent/bold.ttf"),
        }
    }
}

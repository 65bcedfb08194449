//! License verification against an external service.
//!
//! The key and product id go out as a form POST; a JSON reply with
//! `"success": true` means valid. Every failure reads as "invalid".

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const VERIFY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Clone)]
pub struct LicenseClient {
    client: Client,
    verify_url: Option<String>,
    product_id: String,
}

impl LicenseClient {
    /// `verify_url = None` disables verification: every key is invalid.
    pub fn new(verify_url: Option<String>, product_id: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for license checks: {e}");
                Client::new()
            });
        Self {
            client,
            verify_url,
            product_id: product_id.unwrap_or_default(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.verify_url.is_some()
    }

    /// Returns true only when the service confirms the key.
    pub async fn verify(&self, license_key: &str) -> bool {
        let Some(url) = &self.verify_url else {
            return false;
        };
        if license_key.trim().is_empty() {
            return false;
        }

        let response = self
            .client
            .post(url)
            .form(&[
                ("product_id", self.product_id.as_str()),
                ("license_key", license_key.trim()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("License check failed: {e}");
                return false;
            }
        };

        match response.json::<VerifyResponse>().await {
            Ok(body) => body.success,
            Err(e) => {
                warn!("License check returned an unreadable body: {e}");
                false
            }
        }
    }
}

// Request gate: quota accounting, keyword moderation, optional license upgrade.
// Callers charge quota BEFORE moderating, so rejected topics still count.

pub mod license;
pub mod moderation;
pub mod quota;

use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::gate::license::LicenseClient;
use crate::gate::moderation::is_allowed;
use crate::gate::quota::{QuotaExceeded, QuotaStore};

pub struct RequestGate {
    quota: QuotaStore,
    license: LicenseClient,
    daily_limit: u32,
    pro_daily_limit: u32,
    checkout_url: Option<String>,
}

impl RequestGate {
    pub fn new(quota: QuotaStore, license: LicenseClient, config: &Config) -> Self {
        if license.enabled() {
            info!(
                "License verification enabled; pro daily limit {}",
                config.pro_daily_limit
            );
        }
        Self {
            quota,
            license,
            daily_limit: config.daily_limit,
            pro_daily_limit: config.pro_daily_limit,
            checkout_url: config.license_checkout_url.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            QuotaStore::new(),
            LicenseClient::new(
                config.license_verify_url.clone(),
                config.license_product_id.clone(),
            ),
            config,
        )
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref()
    }

    /// Daily limit for this caller: the pro limit with a verified license key.
    pub async fn limit_for(&self, license_key: Option<&str>) -> u32 {
        match license_key {
            Some(key) if self.license.verify(key).await => {
                info!("License verified; applying pro daily limit {}", self.pro_daily_limit);
                self.pro_daily_limit
            }
            _ => self.daily_limit,
        }
    }

    /// Charges one request to `identity`. Returns the new total for today.
    pub fn charge(&self, identity: &str, limit: u32) -> Result<u32, AppError> {
        self.quota
            .check_and_increment(identity, 1, limit)
            .map_err(|e| self.quota_error(e))
    }

    /// Rejects topics that match the moderation list.
    pub fn screen(&self, topic: &str) -> Result<(), AppError> {
        if is_allowed(topic) {
            Ok(())
        } else {
            Err(AppError::Blocked {
                topic: topic.to_string(),
            })
        }
    }

    fn quota_error(&self, e: QuotaExceeded) -> AppError {
        info!(
            "Quota exceeded for {} ({}/{})",
            e.identity, e.used, e.limit
        );
        let message = match &self.checkout_url {
            Some(url) => format!("{e} {url}"),
            None => e.to_string(),
        };
        AppError::QuotaExceeded { message }
    }
}

//! Runtime settings, read from the environment (and `.env` via dotenvy).

use std::time::Duration;

use url::Url;

use crate::{Result, ShopError};

pub const DEFAULT_API_URL: &str = "https://larek-api.nomoreparties.co/api/weblarek";
pub const DEFAULT_CDN_URL: &str = "https://larek-api.nomoreparties.co/content/weblarek";
pub const DEFAULT_CURRENCY_LABEL: &str = "synapses";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ShopConfig {
    pub api_url: Url,
    pub cdn_url: Url,
    pub currency_label: String,
    pub http_timeout: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            cdn_url: Url::parse(DEFAULT_CDN_URL).expect("default cdn url is valid"),
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ShopConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("SHOP_API_URL") {
            config.api_url = parse_url("SHOP_API_URL", &v)?;
        }
        if let Some(v) = lookup("SHOP_CDN_URL") {
            config.cdn_url = parse_url("SHOP_CDN_URL", &v)?;
        }
        if let Some(v) = lookup("SHOP_CURRENCY_LABEL") {
            if !v.trim().is_empty() {
                config.currency_label = v.trim().to_string();
            }
        }
        if let Some(v) = lookup("SHOP_HTTP_TIMEOUT_SECS") {
            let secs = v
                .trim()
                .parse::<u64>()
                .map_err(|_| ShopError::Config(format!("SHOP_HTTP_TIMEOUT_SECS is not a number: {v}")))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| ShopError::Config(format!("{key} is not a valid url ({e}): {raw}")))
}

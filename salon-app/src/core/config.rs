use std::env;

use salon_client::ClientConfig;

use crate::i18n::Locale;

/// Application configuration
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BACKEND_URL | (unset) | Hosted backend base URL; unset runs against the in-memory backend |
/// | BACKEND_ANON_KEY | "" | Public anon key |
/// | STORAGE_BUCKET | img | Product image bucket |
/// | DEFAULT_LOCALE | en | `en` or `ar` |
/// | PAGE_SIZE | 10 | Rows per admin list page |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout (milliseconds) |
/// | LOG_LEVEL | info | Log filter when `RUST_LOG` is unset |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | Daily rotated log files |
/// | SALON_EMAIL / SALON_PASSWORD | (unset) | Credentials for guarded routes |
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: Option<String>,
    pub anon_key: String,
    pub storage_bucket: String,
    pub default_locale: Locale,
    pub page_size: u32,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    var(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables, using defaults for
    /// anything unset or unparsable
    pub fn from_env() -> Self {
        Self {
            backend_url: var("BACKEND_URL").map(|url| url.trim_end_matches('/').to_string()),
            anon_key: var("BACKEND_ANON_KEY").unwrap_or_default(),
            storage_bucket: var("STORAGE_BUCKET").unwrap_or_else(|| "img".into()),
            default_locale: var("DEFAULT_LOCALE")
                .and_then(|l| Locale::parse(&l))
                .unwrap_or_default(),
            page_size: parsed("PAGE_SIZE", 10),
            request_timeout_ms: parsed("REQUEST_TIMEOUT_MS", 30_000),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parsed("LOG_JSON", false),
            log_dir: var("LOG_DIR"),
            email: var("SALON_EMAIL"),
            password: var("SALON_PASSWORD"),
        }
    }

    /// Client-side subset, if a hosted backend is configured
    pub fn client_config(&self) -> Option<ClientConfig> {
        self.backend_url.as_ref().map(|url| {
            ClientConfig::new(url.as_str(), self.anon_key.as_str())
                .with_bucket(self.storage_bucket.as_str())
                .with_timeout_ms(self.request_timeout_ms)
        })
    }

    /// Storage root used to recognize hosted images
    pub fn storage_root(&self) -> String {
        match &self.backend_url {
            Some(url) => format!("{url}/storage/v1"),
            None => "http://localhost/storage/v1".to_string(),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.email.as_deref()?, self.password.as_deref()?))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: String::new(),
            storage_bucket: "img".into(),
            default_locale: Locale::En,
            page_size: 10,
            request_timeout_ms: 30_000,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            email: None,
            password: None,
        }
    }
}

//! Configuration for reputation lookups.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the VirusTotal API key.
pub const API_KEY_ENV: &str = "VT_API_KEY";

/// Root configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Maximum API requests per minute.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// API request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// How long to wait after an HTTP 429 before retrying.
    #[serde(default = "default_rate_limit_wait")]
    pub rate_limit_wait_seconds: u64,

    /// Give up on an entry after this many rate-limited retries.
    /// Unbounded when absent.
    #[serde(default)]
    pub max_rate_limit_retries: Option<u32>,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (supports ${ENV_VAR} syntax). Falls back to `VT_API_KEY`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: default_rate_limit(),
            request_timeout_seconds: default_timeout(),
            rate_limit_wait_seconds: default_rate_limit_wait(),
            max_rate_limit_retries: None,
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

fn default_rate_limit() -> u32 {
    4
}

fn default_timeout() -> u64 {
    15
}

fn default_rate_limit_wait() -> u64 {
    60
}

fn default_base_url() -> String {
    "https://www.virustotal.com/api/v3".to_string()
}

impl Config {
    /// Load configuration from a JSON file (or YAML for `.yaml`/`.yml`).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let expanded = expand_env_vars(&content);
        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&expanded)?,
            _ => serde_json::from_str(&expanded)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rate_limit_per_minute == 0 {
            anyhow::bail!("rate_limit_per_minute must be greater than 0");
        }

        if self.request_timeout_seconds == 0 {
            anyhow::bail!("request_timeout_seconds must be greater than 0");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must be an http(s) URL: {}", self.base_url);
        }

        Ok(())
    }

    /// Delay between consecutive requests.
    pub fn request_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.rate_limit_per_minute))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn rate_limit_wait(&self) -> Duration {
        Duration::from_secs(self.rate_limit_wait_seconds)
    }

    /// Resolve the API key from the config file or the environment.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(self.api_key.as_deref(), from_env.as_deref()).ok_or_else(|| {
            anyhow::anyhow!("VirusTotal API key not found in environment variables ({API_KEY_ENV})")
        })
    }

    /// Generate example configuration JSON.
    pub fn example() -> String {
        r#"{
  "rate_limit_per_minute": 4,
  "request_timeout_seconds": 15,
  "rate_limit_wait_seconds": 60,
  "base_url": "https://www.virustotal.com/api/v3",
  "api_key": "${VT_API_KEY}"
}
"#
        .to_string()
    }
}

fn pick_api_key(configured: Option<&str>, from_env: Option<&str>) -> Option<String> {
    configured
        .filter(|k| !k.trim().is_empty())
        .or(from_env.filter(|k| !k.trim().is_empty()))
        .map(|k| k.trim().to_string())
}

/// Expand environment variables in the format ${VAR_NAME}.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    for cap in re.captures_iter(content) {
        let var_value = std::env::var(&cap[1]).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}

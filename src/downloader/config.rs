// Client configuration: backend location, network and save settings

use std::path::PathBuf;
use std::time::Duration;

use super::errors::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:9000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STATUS_CLEAR_DELAY: Duration = Duration::from_millis(3000);

/// Settings for the resolver client, the file saver and the status board
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the resolver API (e.g., "http://localhost:9000/api")
    pub api_base_url: String,

    /// HTTP or SOCKS5 proxy URL (e.g., "socks5h://127.0.0.1:1080")
    pub proxy: Option<String>,

    /// Per-request timeout; expiry surfaces as a transport error
    pub timeout: Duration,

    /// Where downloaded files are saved
    pub download_dir: PathBuf,

    /// How long a status message stays visible
    pub status_clear_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            status_clear_delay: DEFAULT_STATUS_CLEAR_DELAY,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `TUBEFETCH_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("TUBEFETCH_API_URL") {
            let url = url.trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: "TUBEFETCH_API_URL",
                    value: url,
                });
            }
            config.api_base_url = url;
        }

        if let Some(proxy) = lookup("TUBEFETCH_PROXY") {
            let proxy = proxy.trim().to_string();
            config.proxy = (!proxy.is_empty()).then_some(proxy);
        }

        if let Some(raw) = lookup("TUBEFETCH_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "TUBEFETCH_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = lookup("TUBEFETCH_DOWNLOAD_DIR") {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "TUBEFETCH_DOWNLOAD_DIR",
                    value: dir,
                });
            }
            config.download_dir = PathBuf::from(dir);
        }

        tracing::debug!(
            "[Config] api={} proxy={:?} timeout={:?}",
            config.api_base_url,
            config.proxy,
            config.timeout
        );
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_status_clear_delay(mut self, delay: Duration) -> Self {
        self.status_clear_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.proxy, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.status_clear_delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TUBEFETCH_API_URL", "https://fetch.example.com/api"),
            ("TUBEFETCH_PROXY", "socks5h://127.0.0.1:7890"),
            ("TUBEFETCH_TIMEOUT_SECS", "12"),
            ("TUBEFETCH_DOWNLOAD_DIR", "/tmp/media"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://fetch.example.com/api");
        assert_eq!(config.proxy.as_deref(), Some("socks5h://127.0.0.1:7890"));
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/media"));
    }

    #[test]
    fn test_blank_proxy_means_direct() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("TUBEFETCH_PROXY", "  ")])).unwrap();
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[("TUBEFETCH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "TUBEFETCH_TIMEOUT_SECS",
                value: "soon".to_string()
            }
        );

        assert!(ClientConfig::from_lookup(lookup_from(&[("TUBEFETCH_TIMEOUT_SECS", "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("TUBEFETCH_API_URL", "ftp://x")])).is_err());
    }
}

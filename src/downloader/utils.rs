// Helper functions shared by the resolver and the models

use crate::downloader::config::ClientConfig;
use crate::downloader::errors::ResolveError;

/// Build the HTTP client for backend calls (proxy + timeout)
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ResolveError> {
    let mut builder = reqwest::Client::builder().timeout(config.timeout);

    if let Some(proxy_url) = config.proxy.as_deref() {
        match reqwest::Proxy::all(proxy_url) {
            Ok(proxy) => {
                tracing::info!("[HTTP] Using proxy {} for backend requests", proxy_url);
                builder = builder.proxy(proxy);
            }
            Err(e) => {
                tracing::warn!("[HTTP] ✗ Invalid proxy URL {}: {}", proxy_url, e);
                return Err(ResolveError::transport(format!(
                    "invalid proxy URL {}: {}",
                    proxy_url, e
                )));
            }
        }
    }

    builder
        .build()
        .map_err(|e| ResolveError::transport(format!("failed to build HTTP client: {}", e)))
}

/// Join the API base URL and an endpoint path with exactly one slash
pub fn join_api_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Human-readable size: whole MB below 1 GB, one decimal GB above
pub fn format_size_label(bytes: Option<u64>) -> Option<String> {
    let bytes = bytes.filter(|b| *b > 0)?;
    let mb = bytes as f64 / 1_048_576.0;
    if mb >= 1024.0 {
        Some(format!("{:.1} GB", mb / 1024.0))
    } else {
        Some(format!("{:.0} MB", mb))
    }
}

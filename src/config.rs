use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API keys, comma separated. Requests rotate through the pool to
    /// spread load across rate-limit quotas.
    pub tmdb_api_keys: Vec<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-call timeout for upstream catalog requests, in seconds. One hung
    /// branch otherwise stalls an entire home-screen build.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_upstream_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config =
            envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_keys.iter().all(|k| k.trim().is_empty()) {
            anyhow::bail!("TMDB_API_KEYS must contain at least one non-empty key");
        }

        Ok(config)
    }
}

//! Runtime configuration, read from the environment (and `.env` via dotenv).
//!
//! Every setting has a default so the server starts with no configuration.

use log::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Env: `HOST`, default `0.0.0.0`
    pub host: String,
    /// Env: `PORT`, default `3000`
    pub port: u16,
    /// Routes are mounted under `/api/{api_version}`.
    /// Env: `API_VERSION`, default `v1`
    pub api_version: String,
    /// Env: `CORS_ALLOWED_ORIGINS` (comma-separated), default `http://localhost:3000`
    pub cors_allowed_origins: Vec<String>,
    /// Env: `BCRYPT_COST`, 4..=31, default `bcrypt::DEFAULT_COST`
    pub bcrypt_cost: u32,
    /// Largest accepted JSON body in bytes.
    /// Env: `JSON_LIMIT_BYTES`, default 10 KiB
    pub json_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_version: "v1".to_string(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            bcrypt_cost: bcrypt::DEFAULT_COST,
            json_limit_bytes: 10 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; invalid values fall back to the
    /// default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Invalid PORT {:?}, using {}", port, config.port),
            }
        }

        if let Some(version) = lookup("API_VERSION") {
            let version = version.trim().trim_matches('/');
            if version.is_empty() {
                warn!("Empty API_VERSION, using {}", config.api_version);
            } else {
                config.api_version = version.to_string();
            }
        }

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
            if !origins.is_empty() {
                config.cors_allowed_origins = origins;
            }
        }

        if let Some(cost) = lookup("BCRYPT_COST") {
            match cost.trim().parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => config.bcrypt_cost = cost,
                _ => warn!("Invalid BCRYPT_COST {:?}, using {}", cost, config.bcrypt_cost),
            }
        }

        if let Some(limit) = lookup("JSON_LIMIT_BYTES") {
            match limit.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.json_limit_bytes = limit,
                _ => warn!("Invalid JSON_LIMIT_BYTES {:?}, using {}", limit, config.json_limit_bytes),
            }
        }

        config
    }

    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }
}

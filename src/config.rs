// src/config.rs
//! Relay configuration, read from the environment at startup.

/// Base URL of the hosted completion provider.
pub const PROVIDER_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// Sampling parameters sent with every completion request.
pub const MODEL: &str = "gpt-4o";
pub const TEMPERATURE: f32 = 1.0;
pub const MAX_TOKENS: u32 = 4096;
pub const TOP_P: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Bearer credential for the provider, from `GITHUB_TOKEN`. Empty when unset.
    pub api_key: String,

    /// `tracing` filter used when `RUST_LOG` is absent.
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("HARMONY_BIND", "0.0.0.0:3000"),
            api_key: env_or("GITHUB_TOKEN", ""),
            log_level: env_or("HARMONY_LOG", "info"),
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

use serde::Deserialize;

use super::parse_var;
use crate::core::Result;

/// Server configuration for HTTP server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Browser origin allowed by CORS; `None` allows any origin
    pub cors_allowed_origin: Option<String>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            workers: num_cpus::get(),
            cors_allowed_origin: None,
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            parse_var(lookup, "SERVER_PORT", 8080)?,
        );
        config.workers = parse_var(lookup, "SERVER_WORKERS", config.workers)?.max(1);
        config.cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty());

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

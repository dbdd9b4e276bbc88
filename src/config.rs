use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server_address: String,
    pub environment: String,
    /// Upper bound for create/update request bodies.
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let env = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = Self::default();

        let s = Config::builder()
            .set_default("server_address", defaults.server_address)?
            .set_default("environment", env.clone())?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Add local configuration (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "USERBASE_"
            .add_source(Environment::with_prefix("USERBASE"))
            .build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

        Ok(s.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8080".to_string(),
            environment: "development".to_string(),
            max_body_bytes: 1000,
            request_timeout_secs: 10,
        }
    }
}

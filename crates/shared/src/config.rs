//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Exchange rate provider configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

/// Exchange rate provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the historical rate API.
    #[serde(default = "default_rates_url")]
    pub base_url: String,
    /// Request timeout in seconds. A timed-out lookup counts as a failed one.
    #[serde(default = "default_rates_timeout")]
    pub timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_url(),
            timeout_secs: default_rates_timeout(),
        }
    }
}

fn default_rates_url() -> String {
    "https://api.exchangeratesapi.io".to_string()
}

fn default_rates_timeout() -> u64 {
    10
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Account names seeded at startup, each with a zero balance.
    #[serde(default = "default_accounts")]
    pub accounts: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
        }
    }
}

fn default_accounts() -> Vec<String> {
    vec!["bob".to_string(), "alice".to_string()]
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KASSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

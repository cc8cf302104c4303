use ranker::{RankConfig, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use store::StoreConfig;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Recommendations returned per request
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// User embedding snapshot (JSONL, optionally `.zst`)
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,

    /// Item embedding snapshot (JSONL, optionally `.zst`)
    #[serde(default = "default_items_path")]
    pub items_path: PathBuf,

    /// Restaurant metadata snapshot (JSONL, optionally `.zst`)
    #[serde(default = "default_restaurants_path")]
    pub restaurants_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            top_k: default_top_k(),
            users_path: default_users_path(),
            items_path: default_items_path(),
            restaurants_path: default_restaurants_path(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.*` file and
    /// `RESTREC_SERVER__*` environment variables, in increasing precedence.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("RESTREC_SERVER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every request fail or come back empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.rank_config().validate()?;
        self.store_config().validate()?;
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(
            self.users_path.clone(),
            self.items_path.clone(),
            self.restaurants_path.clone(),
        )
    }

    pub fn rank_config(&self) -> RankConfig {
        RankConfig::default().with_top_k(self.top_k)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_users_path() -> PathBuf {
    PathBuf::from("data/lightgcn/user_embedding.jsonl")
}

fn default_items_path() -> PathBuf {
    PathBuf::from("data/lightgcn/item_embedding.jsonl")
}

fn default_restaurants_path() -> PathBuf {
    PathBuf::from("data/cleaned/restaurants.jsonl")
}

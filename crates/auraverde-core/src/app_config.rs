use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML override for the built-in shipping policy.
    pub shipping_policy_path: Option<PathBuf>,
    pub geocoder_base_url: String,
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub rate_limit_per_minute: usize,
}

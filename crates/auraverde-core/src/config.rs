use crate::app_config::{AppConfig, Environment};
use crate::policy::{load_shipping_policy, ShippingPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

impl AppConfig {
    /// The shipping policy this deployment prices with: the YAML file at
    /// `shipping_policy_path` when set, the built-in Bahía Blanca table
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the policy file cannot be loaded or is invalid.
    pub fn shipping_policy(&self) -> Result<ShippingPolicy, ConfigError> {
        match &self.shipping_policy_path {
            Some(path) => {
                let policy = load_shipping_policy(path)?;
                tracing::info!(path = %path.display(), "loaded shipping policy file");
                Ok(policy)
            }
            None => Ok(ShippingPolicy::bahia_blanca()),
        }
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("AURAVERDE_ENV", "development"))?;
    let bind_addr = parse_addr("AURAVERDE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("AURAVERDE_LOG_LEVEL", "info");
    let shipping_policy_path = lookup("AURAVERDE_SHIPPING_POLICY_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let geocoder_base_url = or_default(
        "AURAVERDE_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org/",
    );
    let geocoder_user_agent = or_default("AURAVERDE_GEOCODER_USER_AGENT", "AuraVerdeApp/1.0");
    if geocoder_user_agent.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "AURAVERDE_GEOCODER_USER_AGENT".to_string(),
            reason: "must not be empty; the geocoding service requires an identifying agent"
                .to_string(),
        });
    }
    let geocoder_timeout_secs = parse_u64("AURAVERDE_GEOCODER_TIMEOUT_SECS", "10")?;
    if geocoder_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AURAVERDE_GEOCODER_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let rate_limit_per_minute = parse_usize("AURAVERDE_RATE_LIMIT_PER_MINUTE", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shipping_policy_path,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "AURAVERDE_ENV".to_string(),
            reason: format!("unknown environment '{other}'; expected development, test, or production"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

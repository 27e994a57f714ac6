pub mod app_config;
pub mod cart;
pub mod config;
pub mod geo;
pub mod geocode;
pub mod policy;
pub mod shipping;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{item_count, subtotal, CartLine, CheckoutSummary, ShippingAddress};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use geocode::{GeocodeOutcome, Geocoder, NotFoundReason};
pub use policy::{load_shipping_policy, LocalTier, ShippingPolicy};
pub use shipping::{
    QuoteBasis, ShippingEngine, ShippingObserver, ShippingQuote, ShippingRequest, TracingObserver,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read shipping policy file {path}: {source}")]
    PolicyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse shipping policy file: {0}")]
    PolicyFileParse(#[from] serde_yaml::Error),

    #[error("shipping policy validation failed: {0}")]
    Validation(String),
}

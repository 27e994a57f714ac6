//! Shipping price table, local-region allow-list, and free-shipping threshold.
//!
//! A [`ShippingPolicy`] is immutable once built. The storefront default is
//! [`ShippingPolicy::bahia_blanca`]; deployments can override it with a YAML
//! file loaded through [`load_shipping_policy`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::ConfigError;

/// One priced local-delivery band. Distances up to and including
/// `max_distance_km` fall into this tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTier {
    pub max_distance_km: f64,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Store location every local distance is measured from.
    pub origin: Coordinate,
    /// Carts with at least this many items ship free.
    pub free_threshold: u32,
    /// Flat price for any address outside the local region.
    pub national_price: u32,
    /// Local bands in increasing distance order.
    pub local_tiers: Vec<LocalTier>,
    /// Price for local addresses beyond the last band.
    pub far_local_price: u32,
    /// Price for local addresses the geocoder could not resolve.
    pub fallback_local_price: u32,
    /// Lowercase locality fragments that mark an address as local.
    pub local_regions: Vec<String>,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::bahia_blanca()
    }
}

impl ShippingPolicy {
    /// Shop in Hector Plano 58, Bahía Blanca, with delivery to the city and
    /// its surrounding towns.
    #[must_use]
    pub fn bahia_blanca() -> Self {
        Self {
            origin: Coordinate::new(-38.736_164_4, -62.287_437_9),
            free_threshold: 5,
            national_price: 8500,
            local_tiers: vec![
                LocalTier {
                    max_distance_km: 2.0,
                    price: 1500,
                },
                LocalTier {
                    max_distance_km: 4.0,
                    price: 3500,
                },
            ],
            far_local_price: 5000,
            fallback_local_price: 5000,
            local_regions: [
                "bahia blanca",
                "bahía blanca",
                "punta alta",
                "ingeniero white",
                "general cerri",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        }
    }

    /// Returns `true` once `item_count` reaches the free-shipping threshold.
    /// Negative counts never qualify.
    #[must_use]
    pub fn qualifies_for_free_shipping(&self, item_count: i64) -> bool {
        item_count.max(0) >= i64::from(self.free_threshold)
    }

    /// Number of additional items needed before shipping becomes free.
    #[must_use]
    pub fn items_until_free(&self, item_count: i64) -> u32 {
        let missing = i64::from(self.free_threshold) - item_count.max(0);
        u32::try_from(missing.max(0)).unwrap_or(self.free_threshold)
    }

    /// Case-insensitive substring match against the local-region fragments.
    ///
    /// Matching is deliberately not tokenized: a fragment embedded in a longer
    /// word still counts.
    #[must_use]
    pub fn is_local(&self, address: &str) -> bool {
        let normalized = address.to_lowercase();
        self.local_regions
            .iter()
            .any(|fragment| normalized.contains(fragment.as_str()))
    }

    /// Maps a distance from the origin to its local-delivery price.
    ///
    /// Bands are checked in order and upper bounds are inclusive, so exactly
    /// 2.0 km belongs to the 2 km tier, not the next one.
    #[must_use]
    pub fn local_price_for_distance(&self, distance_km: f64) -> (Option<usize>, u32) {
        self.local_tiers
            .iter()
            .enumerate()
            .find(|(_, tier)| distance_km <= tier.max_distance_km)
            .map_or((None, self.far_local_price), |(index, tier)| {
                (Some(index), tier.price)
            })
    }

    /// Checks the invariants a policy loaded from disk must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.origin.is_finite() {
            return Err(ConfigError::Validation(
                "origin latitude and longitude must be finite".to_string(),
            ));
        }

        let mut previous = 0.0_f64;
        for (index, tier) in self.local_tiers.iter().enumerate() {
            if !tier.max_distance_km.is_finite() || tier.max_distance_km <= previous {
                return Err(ConfigError::Validation(format!(
                    "local tier {} has max_distance_km {}; bounds must be positive, finite and strictly increasing",
                    index + 1,
                    tier.max_distance_km
                )));
            }
            previous = tier.max_distance_km;
        }

        if self.local_regions.is_empty() {
            return Err(ConfigError::Validation(
                "at least one local region fragment is required".to_string(),
            ));
        }

        if self.local_regions.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "local region fragments must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    fn normalize_regions(&mut self) {
        for region in &mut self.local_regions {
            *region = region.trim().to_lowercase();
        }
    }
}

/// Load and validate a shipping policy from a YAML file.
///
/// Region fragments are lowercased on load so matching stays
/// case-insensitive regardless of how the file spells them.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_shipping_policy(path: &Path) -> Result<ShippingPolicy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PolicyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_shipping_policy(&content)
}

pub(crate) fn parse_shipping_policy(content: &str) -> Result<ShippingPolicy, ConfigError> {
    let mut policy: ShippingPolicy = serde_yaml::from_str(content)?;
    policy.normalize_regions();
    policy.validate()?;
    Ok(policy)
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;

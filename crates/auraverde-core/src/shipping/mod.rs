//! Shipping cost determination.
//!
//! A quote is resolved by the first rule that applies, in this order:
//!
//! 1. free-shipping threshold on the item count (no I/O)
//! 2. missing or empty address is not billed (no I/O)
//! 3. address outside the local region pays the national price (no I/O)
//! 4. local address is geocoded; a failed lookup pays the fallback price
//! 5. resolved coordinate is priced by haversine distance from the store
//!
//! Every branch is terminal and the engine never returns an error: checkout
//! must always get a price even when the geocoder is down.

mod observer;

use serde::{Deserialize, Serialize};

use crate::geo::haversine_km;
use crate::geocode::{GeocodeOutcome, Geocoder, NotFoundReason};
use crate::policy::ShippingPolicy;

pub use observer::{ShippingObserver, TracingObserver};

/// Input to a pricing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRequest {
    pub address: Option<String>,
    pub total_items: i64,
}

/// Which rule produced a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteBasis {
    FreeThreshold {
        item_count: i64,
    },
    MissingAddress,
    National,
    /// `tier` is 1-based; one past the configured bands means "beyond the
    /// last band".
    LocalDistance {
        tier: usize,
        distance_km: f64,
    },
    LocalFallback {
        reason: NotFoundReason,
    },
}

/// Price in whole ARS units plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingQuote {
    pub amount: u32,
    pub basis: QuoteBasis,
}

impl ShippingQuote {
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.amount == 0
    }
}

/// Prices shipments against a fixed [`ShippingPolicy`].
pub struct ShippingEngine<G, O = TracingObserver> {
    policy: ShippingPolicy,
    geocoder: G,
    observer: O,
}

impl<G: Geocoder> ShippingEngine<G> {
    /// Engine that reports fallbacks through `tracing`.
    pub fn new(policy: ShippingPolicy, geocoder: G) -> Self {
        Self::with_observer(policy, geocoder, TracingObserver)
    }
}

impl<G: Geocoder, O: ShippingObserver> ShippingEngine<G, O> {
    pub fn with_observer(policy: ShippingPolicy, geocoder: G, observer: O) -> Self {
        Self {
            policy,
            geocoder,
            observer,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// Shipping cost for `address` and a cart of `total_items` items.
    pub async fn calculate_shipping_cost(&self, address: Option<&str>, total_items: i64) -> u32 {
        self.quote(address, total_items).await.amount
    }

    pub async fn quote_request(&self, request: &ShippingRequest) -> ShippingQuote {
        self.quote(request.address.as_deref(), request.total_items)
            .await
    }

    /// Resolves a full quote, including which rule decided the price.
    pub async fn quote(&self, address: Option<&str>, total_items: i64) -> ShippingQuote {
        let quote = self.resolve(address, total_items).await;
        self.observer.quoted(&quote);
        quote
    }

    async fn resolve(&self, address: Option<&str>, total_items: i64) -> ShippingQuote {
        let policy = &self.policy;

        if policy.qualifies_for_free_shipping(total_items) {
            return ShippingQuote {
                amount: 0,
                basis: QuoteBasis::FreeThreshold {
                    item_count: total_items,
                },
            };
        }

        let Some(address) = address.filter(|a| !a.is_empty()) else {
            return ShippingQuote {
                amount: 0,
                basis: QuoteBasis::MissingAddress,
            };
        };

        if !policy.is_local(address) {
            return ShippingQuote {
                amount: policy.national_price,
                basis: QuoteBasis::National,
            };
        }

        match self.geocoder.lookup(address).await {
            GeocodeOutcome::Found(coordinate) => {
                let distance_km = haversine_km(policy.origin, coordinate);
                let (band, amount) = policy.local_price_for_distance(distance_km);
                let tier = band.map_or(policy.local_tiers.len() + 1, |index| index + 1);
                ShippingQuote {
                    amount,
                    basis: QuoteBasis::LocalDistance { tier, distance_km },
                }
            }
            GeocodeOutcome::NotFound(reason) => {
                self.observer.geocode_fallback(address, &reason);
                ShippingQuote {
                    amount: policy.fallback_local_price,
                    basis: QuoteBasis::LocalFallback { reason },
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../shipping_test.rs"]
mod tests;

use crate::geocode::NotFoundReason;

use super::{QuoteBasis, ShippingQuote};

/// Receives pricing events so operators can see geocoder degradation
/// without the quote itself ever failing.
pub trait ShippingObserver: Send + Sync {
    /// A local address could not be geocoded and the fallback price was used.
    fn geocode_fallback(&self, address: &str, reason: &NotFoundReason);

    /// Called once per finished quote.
    fn quoted(&self, _quote: &ShippingQuote) {}
}

/// Emits `tracing` events: `warn` on fallback, `debug` per quote.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ShippingObserver for TracingObserver {
    fn geocode_fallback(&self, address: &str, reason: &NotFoundReason) {
        tracing::warn!(
            address,
            reason = %reason,
            "could not geocode local address; using fallback local price"
        );
    }

    fn quoted(&self, quote: &ShippingQuote) {
        match &quote.basis {
            QuoteBasis::LocalDistance { tier, distance_km } => tracing::debug!(
                amount = quote.amount,
                tier,
                distance_km = %format_args!("{distance_km:.2}"),
                "shipping quoted by distance"
            ),
            basis => tracing::debug!(amount = quote.amount, ?basis, "shipping quoted"),
        }
    }
}

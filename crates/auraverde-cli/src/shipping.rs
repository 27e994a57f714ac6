//! Shipping command handlers for the CLI.
//!
//! `quote` goes through the same engine and Nominatim client the server
//! uses. `distance` and `policy` never touch the network.

use auraverde_core::{AppConfig, Coordinate, ShippingAddress, ShippingEngine, ShippingPolicy};
use auraverde_geocoder::NominatimClient;

/// Builds the address string to price from either the free-text form or
/// the structured street/city/zip parts.
pub(crate) fn resolve_address(
    address: Option<String>,
    street: Option<String>,
    city: Option<String>,
    zip: Option<String>,
) -> Option<String> {
    if address.is_some() {
        return address;
    }
    if street.is_none() && city.is_none() && zip.is_none() {
        return None;
    }

    let structured = ShippingAddress {
        address: street.unwrap_or_default(),
        city: city.unwrap_or_default(),
        zip: zip.unwrap_or_default(),
    };
    Some(structured.to_query_string())
}

/// Quote shipping for one address, printing the price and how it was
/// reached.
///
/// # Errors
///
/// Returns an error if the shipping policy cannot be loaded or the geocoder
/// client cannot be built. Geocoding failures are priced, not propagated.
pub(crate) async fn run_quote(
    config: &AppConfig,
    address: Option<&str>,
    items: i64,
) -> anyhow::Result<()> {
    let policy = config.shipping_policy()?;
    let geocoder = NominatimClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build geocoder client: {e}"))?;
    let engine = ShippingEngine::new(policy, geocoder);

    let quote = engine.quote(address, items).await;

    println!("address:  {}", address.unwrap_or("(none)"));
    println!("items:    {items}");
    println!("shipping: ${} ARS", quote.amount);
    println!("basis:    {:?}", quote.basis);

    let remaining = engine.policy().items_until_free(items);
    if remaining > 0 {
        println!("add {remaining} more item(s) for free shipping");
    }

    Ok(())
}

/// Describe where a coordinate falls in the local price table.
pub(crate) fn describe_distance(policy: &ShippingPolicy, point: Coordinate) -> String {
    let distance_km = policy.origin.distance_km(&point);
    let (tier, price) = policy.local_price_for_distance(distance_km);
    let band = match tier {
        Some(index) => format!(
            "tier {} (up to {} km)",
            index + 1,
            policy.local_tiers[index].max_distance_km
        ),
        None => "beyond the last tier".to_string(),
    };
    format!("{distance_km:.3} km from the store, {band}, ${price} ARS")
}

/// Print the distance from the store origin to `lat`/`lon` and its tier.
///
/// # Errors
///
/// Returns an error if either value is not a finite number.
pub(crate) fn run_distance(policy: &ShippingPolicy, lat: f64, lon: f64) -> anyhow::Result<()> {
    let point = Coordinate::finite(lat, lon)
        .ok_or_else(|| anyhow::anyhow!("coordinate ({lat}, {lon}) is not finite"))?;
    println!("{}", describe_distance(policy, point));
    Ok(())
}

/// Print the active shipping policy as YAML.
///
/// # Errors
///
/// Returns an error if the policy cannot be serialized.
pub(crate) fn run_policy(policy: &ShippingPolicy) -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(policy)?);
    Ok(())
}

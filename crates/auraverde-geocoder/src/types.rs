use serde::Deserialize;

/// One entry of a Nominatim `/search?format=json` result list.
///
/// Nominatim returns coordinates as decimal strings, e.g. `"-38.7183"`.
/// Other fields of the entry are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
}

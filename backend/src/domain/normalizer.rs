//! Turn provider records into canonical [`Place`] values.

use tracing::debug;

use super::category::resolve;
use super::ports::RawPlace;
use super::Place;

/// Display name used when a provider omits one.
pub const UNKNOWN_PLACE_NAME: &str = "Unknown";

/// Normalise raw provider records, preserving input order.
///
/// Records without a provider or external id, or with non-finite
/// coordinates, are dropped. Detour is left at `0.0` for the aggregator to
/// fill in.
///
/// # Examples
/// ```
/// use roadify_places::domain::{PlaceCategory, normalizer::normalize, ports::RawPlace};
///
/// let raw = RawPlace::new("Overpass", "7", "Shell", vec!["fuel".into()], 38.5, -120.2);
/// let places = normalize(&[raw]);
/// assert_eq!(places[0].id, "Overpass:7");
/// assert_eq!(places[0].category, PlaceCategory::Fuel);
/// ```
#[must_use]
pub fn normalize(raw_places: &[RawPlace]) -> Vec<Place> {
    raw_places.iter().filter_map(normalize_one).collect()
}

fn normalize_one(raw: &RawPlace) -> Option<Place> {
    let provider = raw.provider.trim();
    let external_id = raw.external_id.trim();
    if provider.is_empty() || external_id.is_empty() {
        debug!(
            provider = %raw.provider,
            external_id = %raw.external_id,
            "dropping raw place without identity"
        );
        return None;
    }
    if !(raw.latitude.is_finite() && raw.longitude.is_finite()) {
        debug!(provider, external_id, "dropping raw place without coordinates");
        return None;
    }

    let name = match raw.name.trim() {
        "" => UNKNOWN_PLACE_NAME,
        name => name,
    };
    Some(Place::new(
        format!("{provider}:{external_id}"),
        name,
        resolve(&raw.tags),
        raw.latitude,
        raw.longitude,
        raw.rating.filter(|rating| rating.is_finite()),
    ))
}

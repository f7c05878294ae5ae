//! DTOs for decoding Overpass JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! provider-scoped `RawPlace` records in one pass.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use super::PROVIDER_NAME;
use crate::domain::normalizer::UNKNOWN_PLACE_NAME;
use crate::domain::ports::RawPlace;

/// Tag keys carried into `RawPlace::tags`, most specific first.
const CATEGORY_TAG_KEYS: [&str; 3] = ["amenity", "tourism", "shop"];

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lon: Option<f64>,
    pub(super) lat: Option<f64>,
    pub(super) center: Option<OverpassElementCenterDto>,
    #[serde(default)]
    pub(super) tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementCenterDto {
    pub(super) lon: f64,
    pub(super) lat: f64,
}

impl OverpassResponseDto {
    /// Map elements to raw places, skipping those without usable coordinates.
    pub(super) fn into_raw_places(self) -> Vec<RawPlace> {
        self.elements
            .into_iter()
            .filter_map(OverpassElementDto::into_raw_place)
            .collect()
    }
}

impl OverpassElementDto {
    fn into_raw_place(self) -> Option<RawPlace> {
        let Some((longitude, latitude)) = self.coordinates() else {
            warn!(
                element_id = self.id,
                element_type = %self.element_type,
                "overpass element missing coordinates; skipping"
            );
            return None;
        };
        if !longitude.is_finite() || !latitude.is_finite() {
            warn!(
                element_id = self.id,
                element_type = %self.element_type,
                "overpass element has non-finite coordinates; skipping"
            );
            return None;
        }

        let tags = CATEGORY_TAG_KEYS
            .iter()
            .filter_map(|key| self.tags.get(*key))
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .collect();
        let name = self
            .tags
            .get("name")
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_PLACE_NAME);

        Some(RawPlace::new(
            PROVIDER_NAME,
            self.id.to_string(),
            name,
            tags,
            latitude,
            longitude,
        ))
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        if let (Some(longitude), Some(latitude)) = (self.lon, self.lat) {
            return Some((longitude, latitude));
        }
        self.center.as_ref().map(|center| (center.lon, center.lat))
    }
}

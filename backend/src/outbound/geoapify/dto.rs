//! DTOs for the Geoapify Places GeoJSON response.

use serde::Deserialize;
use tracing::debug;

use super::PROVIDER_NAME;
use crate::domain::ports::RawPlace;

#[derive(Debug, Deserialize)]
pub(super) struct GeoapifyResponseDto {
    #[serde(default)]
    pub(super) features: Vec<GeoapifyFeatureDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeoapifyFeatureDto {
    pub(super) properties: Option<GeoapifyPropertiesDto>,
    pub(super) geometry: Option<GeoapifyGeometryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeoapifyPropertiesDto {
    pub(super) place_id: Option<String>,
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) categories: Vec<String>,
    pub(super) rating: Option<f64>,
}

/// GeoJSON point; `coordinates` is `[lon, lat]`.
#[derive(Debug, Deserialize)]
pub(super) struct GeoapifyGeometryDto {
    #[serde(default)]
    pub(super) coordinates: Vec<f64>,
}

impl GeoapifyResponseDto {
    pub(super) fn into_raw_places(self) -> Vec<RawPlace> {
        self.features
            .into_iter()
            .filter_map(GeoapifyFeatureDto::into_raw_place)
            .collect()
    }
}

impl GeoapifyFeatureDto {
    fn into_raw_place(self) -> Option<RawPlace> {
        let Some(properties) = self.properties else {
            debug!("geoapify feature without properties; skipping");
            return None;
        };
        let Some(place_id) = properties.place_id.filter(|id| !id.trim().is_empty()) else {
            debug!("geoapify feature without place_id; skipping");
            return None;
        };
        let Some((longitude, latitude)) = self.geometry.as_ref().and_then(lon_lat) else {
            debug!(place_id = %place_id, "geoapify feature without coordinates; skipping");
            return None;
        };

        Some(
            RawPlace::new(
                PROVIDER_NAME,
                place_id,
                properties.name.unwrap_or_default(),
                properties.categories,
                latitude,
                longitude,
            )
            .with_rating(properties.rating),
        )
    }
}

fn lon_lat(geometry: &GeoapifyGeometryDto) -> Option<(f64, f64)> {
    match geometry.coordinates.as_slice() {
        [longitude, latitude, ..] => Some((*longitude, *latitude)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn decode(body: &str) -> Vec<RawPlace> {
        serde_json::from_str::<GeoapifyResponseDto>(body)
            .expect("fixture should decode")
            .into_raw_places()
    }

    #[rstest]
    fn features_map_to_raw_places_with_swapped_coordinates() {
        let places = decode(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {
                            "place_id": "51abc",
                            "name": "Shell Kepez",
                            "categories": ["service", "service.vehicle.fuel"],
                            "rating": 4.2,
                            "formatted": "ignored"
                        },
                        "geometry": { "type": "Point", "coordinates": [30.71, 36.91] }
                    }
                ]
            }"#,
        );

        assert_eq!(places.len(), 1);
        let place = &places[0];
        assert_eq!(place.provider, "Geoapify");
        assert_eq!(place.external_id, "51abc");
        assert_eq!(place.name, "Shell Kepez");
        assert_eq!(place.latitude, 36.91);
        assert_eq!(place.longitude, 30.71);
        assert_eq!(place.rating, Some(4.2));
        assert_eq!(
            place.tags,
            vec!["service".to_owned(), "service.vehicle.fuel".to_owned()]
        );
    }

    #[rstest]
    #[case::no_properties(r#"{ "geometry": { "coordinates": [1.0, 2.0] } }"#)]
    #[case::no_place_id(r#"{ "properties": { "name": "x" }, "geometry": { "coordinates": [1.0, 2.0] } }"#)]
    #[case::blank_place_id(r#"{ "properties": { "place_id": " " }, "geometry": { "coordinates": [1.0, 2.0] } }"#)]
    #[case::no_geometry(r#"{ "properties": { "place_id": "a" } }"#)]
    #[case::short_coordinates(r#"{ "properties": { "place_id": "a" }, "geometry": { "coordinates": [1.0] } }"#)]
    fn incomplete_features_are_skipped(#[case] feature: &str) {
        let body = format!(r#"{{ "features": [{feature}] }}"#);
        assert!(decode(&body).is_empty());
    }

    #[rstest]
    fn unnamed_features_keep_a_blank_name_for_normalisation() {
        let places = decode(
            r#"{ "features": [
                { "properties": { "place_id": "a" }, "geometry": { "coordinates": [1.0, 2.0] } }
            ] }"#,
        );
        assert_eq!(places[0].name, "");
        assert!(places[0].tags.is_empty());
    }
}

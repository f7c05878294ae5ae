//! Route geometry value objects.
//!
//! Routes arrive from the route service as encoded polylines. The decoded
//! form is kept alongside the original text so providers can build their own
//! spatial queries and the detour calculator can walk the segments.

use serde::{Deserialize, Serialize};

pub mod detour;
pub mod polyline;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLon {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLon {
    /// Build a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Axis-aligned bounds around a route, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl BoundingBox {
    /// Smallest box containing every finite point, or `None` when there are
    /// no finite points.
    #[must_use]
    pub fn around(points: &[LatLon]) -> Option<Self> {
        points
            .iter()
            .filter(|point| point.is_finite())
            .fold(None, |bounds: Option<Self>, point| {
                Some(match bounds {
                    None => Self {
                        min_lat: point.latitude,
                        min_lng: point.longitude,
                        max_lat: point.latitude,
                        max_lng: point.longitude,
                    },
                    Some(bounds) => Self {
                        min_lat: bounds.min_lat.min(point.latitude),
                        min_lng: bounds.min_lng.min(point.longitude),
                        max_lat: bounds.max_lat.max(point.latitude),
                        max_lng: bounds.max_lng.max(point.longitude),
                    },
                })
            })
    }

    /// Grow the box by `degrees` on every side, clamped to WGS84 ranges.
    #[must_use]
    pub fn padded(self, degrees: f64) -> Self {
        let pad = if degrees.is_finite() { degrees.abs() } else { 0.0 };
        Self {
            min_lat: (self.min_lat - pad).max(-90.0),
            min_lng: (self.min_lng - pad).max(-180.0),
            max_lat: (self.max_lat + pad).min(90.0),
            max_lng: (self.max_lng + pad).min(180.0),
        }
    }
}

/// An encoded route polyline together with its decoded points.
///
/// ## Invariants
/// - `points` is exactly `polyline::decode(encoded)` and never changes.
///
/// # Examples
/// ```
/// use roadify_places::domain::geometry::RouteGeometry;
///
/// let geometry = RouteGeometry::decode("_p~iF~ps|U_ulLnnqC");
/// assert_eq!(geometry.points().len(), 2);
/// assert!(geometry.supports_detour());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    encoded: String,
    points: Vec<LatLon>,
}

impl RouteGeometry {
    /// Decode `encoded` and keep both representations.
    pub fn decode(encoded: impl Into<String>) -> Self {
        let encoded = encoded.into();
        let points = polyline::decode(&encoded);
        Self { encoded, points }
    }

    /// The original encoded polyline.
    #[must_use]
    pub fn encoded(&self) -> &str {
        self.encoded.as_str()
    }

    /// Decoded points in route order.
    #[must_use]
    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    /// Whether the route has enough points to measure detours against.
    #[must_use]
    pub fn supports_detour(&self) -> bool {
        self.points.len() >= 2
    }

    /// Bounds of the decoded route, padded by `padding_degrees`.
    #[must_use]
    pub fn bounding_box(&self, padding_degrees: f64) -> Option<BoundingBox> {
        BoundingBox::around(&self.points).map(|bounds| bounds.padded(padding_degrees))
    }
}

//! Canonical place model shared by providers, the cache and the HTTP layer.
//!
//! Purpose: give every provider's points of interest one provider-agnostic
//! shape. Places are values: enrichment produces copies and nothing mutates a
//! cached set in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of canonical place categories.
///
/// Serialised in upper case (`"FOOD"`, `"CAFE"`, ...), matching the wire
/// format clients already consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceCategory {
    Food,
    Cafe,
    Fuel,
    Tourist,
    Market,
    Wc,
    Hotel,
    Camping,
    Shop,
    Other,
}

impl PlaceCategory {
    /// Every category in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Food,
        Self::Cafe,
        Self::Fuel,
        Self::Tourist,
        Self::Market,
        Self::Wc,
        Self::Hotel,
        Self::Camping,
        Self::Shop,
        Self::Other,
    ];

    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Cafe => "CAFE",
            Self::Fuel => "FUEL",
            Self::Tourist => "TOURIST",
            Self::Market => "MARKET",
            Self::Wc => "WC",
            Self::Hotel => "HOTEL",
            Self::Camping => "CAMPING",
            Self::Shop => "SHOP",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a [`PlaceCategory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown place category: {0}")]
pub struct UnknownPlaceCategory(pub String);

impl FromStr for PlaceCategory {
    type Err = UnknownPlaceCategory;

    /// Parse a category name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPlaceCategory(s.to_owned()))
    }
}

/// A normalised point of interest along a route.
///
/// ## Invariants
/// - `id` is `"{provider}:{external_id}"` with both parts non-empty.
/// - `detour_km` is finite and non-negative; `0.0` when undeterminable.
///
/// # Examples
/// ```
/// use roadify_places::domain::{Place, PlaceCategory};
///
/// let place = Place::new("Overpass:42", "Fuel stop", PlaceCategory::Fuel, 38.5, -120.2, None);
/// assert_eq!(place.detour_km, 0.0);
/// assert_eq!(place.with_detour(1.25).detour_km, 1.25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: PlaceCategory,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub detour_km: f64,
}

impl Place {
    /// Build a place with no detour computed yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: PlaceCategory,
        latitude: f64,
        longitude: f64,
        rating: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            latitude,
            longitude,
            rating,
            detour_km: 0.0,
        }
    }

    /// Copy of this place carrying `detour_km`.
    ///
    /// Negative or non-finite values are stored as `0.0`.
    #[must_use]
    pub fn with_detour(&self, detour_km: f64) -> Self {
        let detour_km = if detour_km.is_finite() && detour_km > 0.0 {
            detour_km
        } else {
            0.0
        };
        Self {
            detour_km,
            ..self.clone()
        }
    }
}

//! Post-hoc filtering and pagination of a place set.
//!
//! Filters shape what a caller sees; they never influence what is fetched or
//! cached. One cached set per route therefore serves every filter variant.

use super::{Place, PlaceCategory};

/// Optional output constraints for a places query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilterCriteria {
    pub category: Option<PlaceCategory>,
    pub min_rating: Option<f64>,
    pub max_detour_km: Option<f64>,
    /// Items to skip; negative values count as zero.
    pub offset: Option<i64>,
    /// Items to return; unset, zero or negative means all remaining.
    pub limit: Option<i64>,
}

/// Whether `min_rating` takes part in filtering.
///
/// Most providers do not rate places, so enforcing a minimum rating discards
/// nearly everything. It is off unless explicitly enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingFilter {
    #[default]
    Ignored,
    Enforced,
}

/// Apply `criteria` to `places` and return the matching slice as new values.
///
/// Stages run in a fixed order: category, minimum rating (when enforced),
/// maximum detour, offset, limit. Input order is preserved.
///
/// # Examples
/// ```
/// use roadify_places::domain::{Place, PlaceCategory};
/// use roadify_places::domain::filter::{PlaceFilterCriteria, RatingFilter, filter_places};
///
/// let places = vec![
///     Place::new("a:1", "A", PlaceCategory::Cafe, 0.0, 0.0, None),
///     Place::new("a:2", "B", PlaceCategory::Fuel, 0.0, 0.0, None),
/// ];
/// let criteria = PlaceFilterCriteria {
///     category: Some(PlaceCategory::Fuel),
///     ..PlaceFilterCriteria::default()
/// };
/// let filtered = filter_places(&places, &criteria, RatingFilter::Ignored);
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered[0].id, "a:2");
/// ```
#[must_use]
pub fn filter_places(
    places: &[Place],
    criteria: &PlaceFilterCriteria,
    rating_filter: RatingFilter,
) -> Vec<Place> {
    let offset = criteria
        .offset
        .map_or(0, |offset| usize::try_from(offset).unwrap_or(0));
    let limit = criteria
        .limit
        .and_then(|limit| usize::try_from(limit).ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(usize::MAX);

    places
        .iter()
        .filter(|place| matches_category(place, criteria.category))
        .filter(|place| matches_rating(place, criteria.min_rating, rating_filter))
        .filter(|place| matches_detour(place, criteria.max_detour_km))
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

fn matches_category(place: &Place, category: Option<PlaceCategory>) -> bool {
    category.is_none_or(|category| place.category == category)
}

fn matches_rating(place: &Place, min_rating: Option<f64>, rating_filter: RatingFilter) -> bool {
    match (rating_filter, min_rating) {
        (RatingFilter::Enforced, Some(min)) => place.rating.is_some_and(|rating| rating >= min),
        _ => true,
    }
}

fn matches_detour(place: &Place, max_detour_km: Option<f64>) -> bool {
    max_detour_km.is_none_or(|max| place.detour_km <= max)
}

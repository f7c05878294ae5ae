//! Provider tag to [`PlaceCategory`] resolution.
//!
//! Providers describe places with their own vocabularies (`catering.cafe`,
//! `fuel`, `tourism.attraction`, ...). Resolution is table driven: rules are
//! evaluated in priority order and the first category with a matching tag
//! wins, so a place tagged both `restaurant` and `shop` is [`PlaceCategory::Food`].

use super::PlaceCategory;

/// Lower-case substrings recognised for each category, in priority order.
///
/// Order matters twice over: it breaks ties between tags of one place, and it
/// decides single-tag matches such as `camping.caravan_site` that would also
/// hit later rules.
pub const CATEGORY_RULES: [(PlaceCategory, &[&str]); 9] = [
    (
        PlaceCategory::Food,
        &[
            "catering.restaurant",
            "restaurant",
            "fast_food",
            "catering.fast_food",
            "food",
        ],
    ),
    (PlaceCategory::Cafe, &["catering.cafe", "cafe", "coffee"]),
    (
        PlaceCategory::Fuel,
        &["service.vehicle.fuel", "fuel_station", "fuel", "gas", "petrol"],
    ),
    (
        PlaceCategory::Hotel,
        &["accommodation.hotel", "guest_house", "hotel", "motel"],
    ),
    (
        PlaceCategory::Camping,
        &["camping.camp_site", "camping.caravan_site", "camp", "camping"],
    ),
    (
        PlaceCategory::Market,
        &["commercial.supermarket", "supermarket", "marketplace"],
    ),
    (
        PlaceCategory::Shop,
        &[
            "commercial.shopping_mall",
            "shopping_mall",
            "shop",
            "commercial.convenience",
        ],
    ),
    (
        PlaceCategory::Wc,
        &["amenity.toilet", "wc", "toilet", "restroom"],
    ),
    (
        PlaceCategory::Tourist,
        &[
            "tourism.attraction",
            "tourism.sights",
            "attraction",
            "museum",
            "viewpoint",
        ],
    ),
];

/// Map one provider tag to a category.
///
/// Total: anything unrecognised, including the empty string, is
/// [`PlaceCategory::Other`].
///
/// # Examples
/// ```
/// use roadify_places::domain::{PlaceCategory, category::map_category};
///
/// assert_eq!(map_category("Catering.Cafe"), PlaceCategory::Cafe);
/// assert_eq!(map_category("bicycle_parking"), PlaceCategory::Other);
/// ```
#[must_use]
pub fn map_category(tag: &str) -> PlaceCategory {
    resolve([tag])
}

/// Resolve a place's tags to the highest-priority matching category.
///
/// # Examples
/// ```
/// use roadify_places::domain::{PlaceCategory, category::resolve};
///
/// assert_eq!(resolve(["commercial.shop", "restaurant"]), PlaceCategory::Food);
/// assert_eq!(resolve(Vec::<String>::new()), PlaceCategory::Other);
/// ```
#[must_use]
pub fn resolve<I, S>(tags: I) -> PlaceCategory
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lowered: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.as_ref().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| {
            lowered
                .iter()
                .any(|tag| needles.iter().any(|needle| tag.contains(needle)))
        })
        .map_or(PlaceCategory::Other, |(category, _)| *category)
}

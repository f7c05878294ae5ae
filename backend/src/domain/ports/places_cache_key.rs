//! Cache key for the unfiltered place set of one route.
use thiserror::Error;

const KEY_PREFIX: &str = "route:";
const KEY_SUFFIX: &str = ":places:BASE";

/// Key under which a route's enriched, unfiltered places are cached.
///
/// Derived from the route id alone: filter criteria never take part, so a
/// single entry serves every filtered view of the route.
///
/// # Examples
/// ```
/// use roadify_places::domain::ports::PlacesCacheKey;
///
/// let key = PlacesCacheKey::for_route("r-42").expect("valid route id");
/// assert_eq!(key.as_str(), "route:r-42:places:BASE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacesCacheKey(String);

impl PlacesCacheKey {
    /// Build the key for `route_id` after validating it.
    pub fn for_route(route_id: &str) -> Result<Self, PlacesCacheKeyValidationError> {
        if route_id.trim().is_empty() {
            return Err(PlacesCacheKeyValidationError::Empty);
        }
        if route_id.chars().any(char::is_whitespace) {
            return Err(PlacesCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(format!("{KEY_PREFIX}{route_id}{KEY_SUFFIX}")))
    }

    /// Borrow the underlying key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PlacesCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PlacesCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned by [`PlacesCacheKey::for_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacesCacheKeyValidationError {
    /// Route id is empty after trimming whitespace.
    #[error("route id must not be empty")]
    Empty,
    /// Route id contains whitespace.
    #[error("route id must not contain whitespace")]
    ContainsWhitespace,
}

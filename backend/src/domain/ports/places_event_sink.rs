//! Domain port for announcing completed place aggregations.
//!
//! Delivery is best effort. The aggregation service never waits on the sink
//! and never fails a request because of it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;
use crate::domain::{Place, PlaceCategory};

/// Summary emitted after places were fetched for a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacesFetchedEvent {
    pub route_id: String,
    pub total_count: usize,
    pub category_counts: BTreeMap<PlaceCategory, usize>,
}

impl PlacesFetchedEvent {
    /// Count `places` per category for `route_id`.
    ///
    /// # Examples
    /// ```
    /// use roadify_places::domain::{Place, PlaceCategory, ports::PlacesFetchedEvent};
    ///
    /// let places = vec![
    ///     Place::new("a:1", "A", PlaceCategory::Cafe, 0.0, 0.0, None),
    ///     Place::new("a:2", "B", PlaceCategory::Cafe, 0.0, 0.0, None),
    /// ];
    /// let event = PlacesFetchedEvent::summarise("r1", &places);
    /// assert_eq!(event.total_count, 2);
    /// assert_eq!(event.category_counts.get(&PlaceCategory::Cafe), Some(&2));
    /// ```
    #[must_use]
    pub fn summarise(route_id: &str, places: &[Place]) -> Self {
        let mut category_counts = BTreeMap::new();
        for place in places {
            *category_counts.entry(place.category).or_insert(0) += 1;
        }
        Self {
            route_id: route_id.to_owned(),
            total_count: places.len(),
            category_counts,
        }
    }
}

define_port_error! {
    /// Errors exposed when publishing place events.
    pub enum PlacesEventSinkError {
        /// The event transport rejected or dropped the event.
        Publish { message: String } => "places event publish failed: {message}",
        /// The event could not be encoded.
        Encode { message: String } => "places event encoding failed: {message}",
    }
}

/// Sink for [`PlacesFetchedEvent`] notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesEventSink: Send + Sync {
    /// Publish one event.
    async fn publish(&self, event: &PlacesFetchedEvent) -> Result<(), PlacesEventSinkError>;
}

/// Sink used when no event transport is configured; drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpPlacesEventSink;

#[async_trait]
impl PlacesEventSink for NoOpPlacesEventSink {
    async fn publish(&self, _event: &PlacesFetchedEvent) -> Result<(), PlacesEventSinkError> {
        Ok(())
    }
}

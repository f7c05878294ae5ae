//! Places discovery along travel routes.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the place
//! model, the pure algorithms and the aggregation service; [`outbound`]
//! implements the driven ports against providers, the route service and
//! Redis; [`inbound`] exposes the HTTP surface.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use config::PlacesSettings;
pub use domain::TraceId;
pub use middleware::Trace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

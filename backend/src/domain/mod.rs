//! Domain primitives, algorithms and the places aggregation service.
//!
//! Purpose: define provider-agnostic place types, the pure geometry and
//! categorisation logic, and the orchestration that ties the driven ports
//! together. Nothing here knows about HTTP, Redis or provider wire formats.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Place / PlaceCategory: canonical place model.
//! - PlacesAggregationService: the read path behind the HTTP endpoint.
//! - TraceId: request-scoped correlation identifier.

pub mod category;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod normalizer;
pub mod place;
pub mod places_service;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{PlaceFilterCriteria, RatingFilter};
pub use self::place::{Place, PlaceCategory, UnknownPlaceCategory};
pub use self::places_service::{
    PlacesAggregationService, PlacesServiceConfig, PlacesServicePorts,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

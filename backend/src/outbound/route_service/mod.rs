//! Route service outbound adapter.

mod http_client;

pub use http_client::HttpRouteLookup;

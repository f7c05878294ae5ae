//! Concurrent provider fan-out behind a safe-call boundary.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::TraceId;
use crate::domain::geometry::RouteGeometry;
use crate::domain::ports::{PlaceProvider, PlaceProviderError, RawPlace};

/// Result of one provider call after the safe-call boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFetchOutcome {
    pub provider: String,
    pub success: bool,
    pub places: Vec<RawPlace>,
}

impl ProviderFetchOutcome {
    fn succeeded(provider: String, places: Vec<RawPlace>) -> Self {
        Self {
            provider,
            success: true,
            places,
        }
    }

    fn failed(provider: String) -> Self {
        Self {
            provider,
            success: false,
            places: Vec::new(),
        }
    }
}

/// Call every provider concurrently, each bounded by `call_timeout`.
///
/// Each call runs on its own task, so a provider that errors, stalls past
/// its timeout or panics yields a failed outcome without affecting siblings.
/// Outcomes are returned in provider order.
pub async fn fetch_all(
    providers: &[Arc<dyn PlaceProvider>],
    geometry: &Arc<RouteGeometry>,
    call_timeout: Duration,
) -> Vec<ProviderFetchOutcome> {
    let calls = providers.iter().map(|provider| {
        let provider = Arc::clone(provider);
        let geometry = Arc::clone(geometry);
        let name = provider.name().to_owned();
        let handle = TraceId::spawn_scoped(async move {
            timeout(call_timeout, provider.fetch_places(&geometry)).await
        });
        async move { (name, handle.await) }
    });

    join_all(calls)
        .await
        .into_iter()
        .map(|(provider, joined)| match joined {
            Ok(Ok(Ok(places))) => {
                debug!(provider = %provider, count = places.len(), "provider fetch succeeded");
                ProviderFetchOutcome::succeeded(provider, places)
            }
            Ok(Ok(Err(error))) => log_failure(provider, &error),
            Ok(Err(_elapsed)) => log_failure(
                provider,
                &PlaceProviderError::timeout(format!(
                    "no response within {}ms",
                    call_timeout.as_millis()
                )),
            ),
            Err(join_error) => {
                warn!(provider = %provider, error = %join_error, "provider task aborted");
                ProviderFetchOutcome::failed(provider)
            }
        })
        .collect()
}

fn log_failure(provider: String, error: &PlaceProviderError) -> ProviderFetchOutcome {
    warn!(provider = %provider, error = %error, "provider fetch failed");
    ProviderFetchOutcome::failed(provider)
}

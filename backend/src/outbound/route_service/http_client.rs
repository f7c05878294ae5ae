//! Reqwest-backed route service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{RouteLookup, RouteLookupError, RouteSummary};
use crate::outbound::http_support::status_message;

/// Resolves route ids against `GET {base}/v1/routes/{id}`.
pub struct HttpRouteLookup {
    client: Client,
    base_url: Url,
}

impl HttpRouteLookup {
    /// Build a client for the route service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn route_url(&self, route_id: &str) -> Result<Url, RouteLookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RouteLookupError::transport(format!(
                    "route service base url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v1", "routes", route_id]);
        Ok(url)
    }
}

#[async_trait]
impl RouteLookup for HttpRouteLookup {
    async fn route_geometry(&self, route_id: &str) -> Result<RouteSummary, RouteLookupError> {
        let url = self.route_url(route_id)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Err(RouteLookupError::not_found(route_id));
        }
        if !status.is_success() {
            return Err(RouteLookupError::transport(status_message(
                status,
                body.as_ref(),
            )));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            RouteLookupError::decode(format!("invalid route summary payload: {error}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> RouteLookupError {
    RouteLookupError::transport(error.without_url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup(base: &str) -> HttpRouteLookup {
        let base_url = Url::parse(base).expect("valid base url");
        HttpRouteLookup::new(base_url, Duration::from_secs(1)).expect("client builds")
    }

    #[rstest]
    #[case::bare_host("http://routes.local", "http://routes.local/v1/routes/r-42")]
    #[case::trailing_slash("http://routes.local/", "http://routes.local/v1/routes/r-42")]
    #[case::with_prefix("http://gw.local/route-service/", "http://gw.local/route-service/v1/routes/r-42")]
    fn builds_route_urls(#[case] base: &str, #[case] expected: &str) {
        let url = lookup(base).route_url("r-42").expect("url builds");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn route_ids_are_percent_encoded_as_one_segment() {
        let url = lookup("http://routes.local")
            .route_url("a/b?c")
            .expect("url builds");
        assert_eq!(url.as_str(), "http://routes.local/v1/routes/a%2Fb%3Fc");
    }

    #[rstest]
    fn opaque_base_urls_are_rejected() {
        let error = lookup("mailto:routes@example.com")
            .route_url("r1")
            .expect_err("mailto cannot carry a path");
        assert!(matches!(error, RouteLookupError::Transport { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_transport() {
        let error = lookup("http://127.0.0.1:9")
            .route_geometry("r1")
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(error, RouteLookupError::Transport { .. }));
    }
}

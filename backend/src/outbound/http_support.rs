//! Reqwest error and status mapping shared by the place provider adapters.

use reqwest::StatusCode;

use crate::domain::ports::PlaceProviderError;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Query strings can carry credentials, so the request URL is dropped from
/// the message.
pub(crate) fn map_transport_error(error: reqwest::Error) -> PlaceProviderError {
    let error = error.without_url();
    if error.is_timeout() {
        PlaceProviderError::timeout(error.to_string())
    } else {
        PlaceProviderError::transport(error.to_string())
    }
}

pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> PlaceProviderError {
    let message = status_message(status, body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => PlaceProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PlaceProviderError::timeout(message)
        }
        _ if status.is_client_error() => PlaceProviderError::invalid_request(message),
        _ => PlaceProviderError::transport(message),
    }
}

/// `status N` or `status N: <preview>` for error messages.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

/// Whitespace-collapsed prefix of a response body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

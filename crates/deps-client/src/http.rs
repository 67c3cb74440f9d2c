//! Shared HTTP response helpers for the metadata client.
//!
//! Centralizes status-code checks (404 → [`MetadataError::NotFound`], 429 rate
//! limiting with `Retry-After` parsing, other non-success →
//! [`MetadataError::Api`]) and body decoding so the client methods stay focused
//! on request construction and response mapping.

use serde::de::DeserializeOwned;

use crate::error::MetadataError;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. `resource` names what was
/// requested and ends up in the `NotFound` error.
pub async fn check_response(
    resp: reqwest::Response,
    resource: &str,
) -> Result<reqwest::Response, MetadataError> {
    let status = resp.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(MetadataError::NotFound {
            resource: resource.to_string(),
        });
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(MetadataError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !status.is_success() {
        return Err(MetadataError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Read the whole body and decode it as JSON.
///
/// Decoding failures become [`MetadataError::Parse`], never `NotFound`.
pub async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    resource: &str,
) -> Result<T, MetadataError> {
    let body = resp.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| MetadataError::Parse(format!("{resource}: {e}")))
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

use std::time::Duration;

use crate::shared::constants::HTTP_TIMEOUT_SECS;

/// Blocking client shared by all HTTP collaborators.
///
/// The timeout bounds every outbound call so a hung service releases its
/// worker instead of pinning it indefinitely.
pub fn blocking_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
}

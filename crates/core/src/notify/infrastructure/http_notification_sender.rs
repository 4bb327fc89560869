use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use thiserror::Error;

use crate::notify::domain::notification_sender::NotificationSender;
use crate::shared::http::blocking_client;
use crate::shared::records::DetectionRecord;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("notification endpoint at {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload<'a> {
    #[serde(flatten)]
    record: &'a DetectionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipient: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    capture_image: Option<String>,
}

/// Sends detection notifications to the relay service as JSON.
///
/// The relay forwards them to the third-party messaging channel; a
/// configured recipient address travels with every payload.
pub struct HttpNotificationSender {
    endpoint: String,
    recipient: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpNotificationSender {
    pub fn new(endpoint: &str, recipient: Option<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            recipient,
            client: blocking_client()?,
        })
    }
}

impl NotificationSender for HttpNotificationSender {
    fn notify(
        &self,
        record: &DetectionRecord,
        capture_jpeg: Option<&[u8]>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let payload = NotificationPayload {
            record,
            recipient: self.recipient.as_deref(),
            capture_image: capture_jpeg.map(|bytes| BASE64.encode(bytes)),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .map_err(|e| NotifyError::Request {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                url: self.endpoint.clone(),
                status,
            }
            .into());
        }
        Ok(())
    }
}

use serde::Serialize;
use thiserror::Error;

use crate::shared::http::blocking_client;
use crate::shared::records::DetectionRecord;
use crate::storage::domain::detection_store::DetectionStore;

#[derive(Error, Debug)]
pub enum BatchWriteError {
    #[error("detection store request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("detection store at {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Serialize)]
struct BatchPayload<'a> {
    records: &'a [DetectionRecord],
}

/// Detection store backed by the record-management service.
pub struct HttpDetectionStore {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpDetectionStore {
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: blocking_client()?,
        })
    }
}

impl DetectionStore for HttpDetectionStore {
    fn append_batch(&self, records: &[DetectionRecord]) -> Result<(), Box<dyn std::error::Error>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&BatchPayload { records })
            .send()
            .map_err(|e| BatchWriteError::Request {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BatchWriteError::Status {
                url: self.endpoint.clone(),
                status,
            }
            .into());
        }
        Ok(())
    }
}

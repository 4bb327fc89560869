use serde::Serialize;
use thiserror::Error;

use crate::matching::domain::identity_store::IdentityStore;
use crate::shared::http::blocking_client;
use crate::shared::records::IdentityRecord;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("identity lookup at {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("identity store at {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    ids: &'a [String],
}

/// Identity store backed by the record-management service.
///
/// The service returns the subset of requested ids it knows about; ids it
/// does not recognize are simply absent from the response.
pub struct HttpIdentityStore {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpIdentityStore {
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: blocking_client()?,
        })
    }
}

impl IdentityStore for HttpIdentityStore {
    fn lookup_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<IdentityRecord>, Box<dyn std::error::Error>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&LookupRequest { ids })
            .send()
            .map_err(|e| LookupError::Request {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: self.endpoint.clone(),
                status,
            }
            .into());
        }

        let records: Vec<IdentityRecord> =
            response.json().map_err(|e| LookupError::Request {
                url: self.endpoint.clone(),
                source: e,
            })?;
        Ok(records)
    }
}

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::domain::embedding_matcher::{EmbeddingMatcher, MatchOutcome};
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;
use crate::shared::http::blocking_client;
use crate::shared::jpeg::encode_jpeg;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("failed to encode frame for matcher upload: {0}")]
    Encode(String),
    #[error("matcher request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("matcher at {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("matcher returned an unreadable annotated image: {0}")]
    AnnotatedImage(#[source] base64::DecodeError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchResponse {
    identity_ids: Vec<String>,
    annotated_image: Option<String>,
}

/// Matcher backed by an HTTP matching service.
///
/// Uploads the frame as base64 JPEG and receives the matched identity ids
/// plus the annotated image the service rendered over them.
pub struct HttpEmbeddingMatcher {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpEmbeddingMatcher {
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: blocking_client()?,
        })
    }
}

impl EmbeddingMatcher for HttpEmbeddingMatcher {
    fn match_frame(&mut self, frame: &Frame) -> Result<MatchOutcome, Box<dyn std::error::Error>> {
        let jpeg = encode_jpeg(frame, JPEG_QUALITY).map_err(|e| MatcherError::Encode(e.to_string()))?;
        let image = BASE64.encode(&jpeg);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&MatchRequest { image: &image })
            .send()
            .map_err(|e| MatcherError::Request {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MatcherError::Status {
                url: self.endpoint.clone(),
                status,
            }
            .into());
        }

        let body: MatchResponse = response.json().map_err(|e| MatcherError::Request {
            url: self.endpoint.clone(),
            source: e,
        })?;

        Ok(parse_outcome(body)?)
    }
}

fn parse_outcome(body: MatchResponse) -> Result<MatchOutcome, MatcherError> {
    let annotated_jpeg = body
        .annotated_image
        .map(|b64| BASE64.decode(b64))
        .transpose()
        .map_err(MatcherError::AnnotatedImage)?;

    Ok(MatchOutcome {
        identity_ids: body.identity_ids,
        annotated_jpeg,
    })
}

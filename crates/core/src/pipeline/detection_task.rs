use chrono::{FixedOffset, Utc};
use thiserror::Error;

use crate::matching::domain::embedding_matcher::EmbeddingMatcher;
use crate::matching::domain::identity_store::IdentityStore;
use crate::notify::domain::notification_sender::NotificationSender;
use crate::shared::constants::TIMESTAMP_FORMAT;
use crate::shared::frame::Frame;
use crate::shared::records::DetectionRecord;
use crate::storage::domain::detection_store::DetectionStore;

/// Why a detection task gave up on a frame.
///
/// Collaborator errors are stringified at this boundary so the error can
/// cross worker threads; per-identity notification failures are not errors
/// here, they are counted in the [`FrameReport`].
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("embedding matcher failed: {0}")]
    Matcher(String),
    #[error("identity lookup failed: {0}")]
    IdentityLookup(String),
    #[error("detection store write failed: {0}")]
    Store(String),
}

/// Outcome of processing one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Identity ids the matcher returned.
    pub matched: usize,
    /// Detection records built (one per identity the lookup knew).
    pub records: usize,
    /// Notifications that went through.
    pub notified: usize,
    /// Notifications that failed and were skipped past.
    pub notify_failures: usize,
}

/// Runs the full match → lookup → notify → persist pipeline for one frame.
///
/// Owns its collaborators; each worker thread holds its own task so nothing
/// here is shared. Within one frame, notifications are sent in lookup order
/// and strictly before the batch write.
pub struct DetectionTask {
    matcher: Box<dyn EmbeddingMatcher>,
    identities: Box<dyn IdentityStore>,
    notifier: Box<dyn NotificationSender>,
    detections: Box<dyn DetectionStore>,
    offset: FixedOffset,
}

impl DetectionTask {
    pub fn new(
        matcher: Box<dyn EmbeddingMatcher>,
        identities: Box<dyn IdentityStore>,
        notifier: Box<dyn NotificationSender>,
        detections: Box<dyn DetectionStore>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            matcher,
            identities,
            notifier,
            detections,
            offset,
        }
    }

    pub fn process(&mut self, frame: Frame) -> Result<FrameReport, DetectionError> {
        // One timestamp per frame; every record built below shares it.
        let timestamp = Utc::now()
            .with_timezone(&self.offset)
            .format(TIMESTAMP_FORMAT)
            .to_string();

        let outcome = self
            .matcher
            .match_frame(&frame)
            .map_err(|e| DetectionError::Matcher(e.to_string()))?;

        if outcome.is_empty() {
            log::debug!("frame {}: no match found", frame.index());
            return Ok(FrameReport::default());
        }

        log::info!(
            "frame {}: {} match(es) found at {timestamp}",
            frame.index(),
            outcome.identity_ids.len()
        );

        let identities = self
            .identities
            .lookup_by_ids(&outcome.identity_ids)
            .map_err(|e| DetectionError::IdentityLookup(e.to_string()))?;

        let mut records = Vec::with_capacity(identities.len());
        let mut notify_failures = 0usize;

        for identity in &identities {
            let record = DetectionRecord::from_identity(identity, timestamp.clone());
            if let Err(e) = self
                .notifier
                .notify(&record, outcome.annotated_jpeg.as_deref())
            {
                log::warn!(
                    "frame {}: notification for {} failed: {e}",
                    frame.index(),
                    record.external_id
                );
                notify_failures += 1;
            }
            records.push(record);
        }

        if !records.is_empty() {
            self.detections
                .append_batch(&records)
                .map_err(|e| DetectionError::Store(e.to_string()))?;
        }

        Ok(FrameReport {
            matched: outcome.identity_ids.len(),
            records: records.len(),
            notified: records.len() - notify_failures,
            notify_failures,
        })
    }
}

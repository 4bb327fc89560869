use crate::shared::records::DetectionRecord;

/// Durable append-only persistence for detection records.
///
/// Callers pass the full batch for one frame in a single call and never
/// pass an empty batch.
pub trait DetectionStore: Send {
    fn append_batch(&self, records: &[DetectionRecord]) -> Result<(), Box<dyn std::error::Error>>;
}

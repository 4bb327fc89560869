use crate::shared::records::DetectionRecord;

/// Relays one detection to the external messaging service.
///
/// `capture_jpeg` is the annotated frame the matcher produced, when one is
/// available. A send failure affects only the record it was for.
pub trait NotificationSender: Send {
    fn notify(
        &self,
        record: &DetectionRecord,
        capture_jpeg: Option<&[u8]>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

use crate::shared::records::IdentityRecord;

/// Fetches full identity records for matched ids.
///
/// Unknown ids are omitted from the result, never an error; the returned
/// order is the order callers process detections in.
pub trait IdentityStore: Send {
    fn lookup_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<IdentityRecord>, Box<dyn std::error::Error>>;
}

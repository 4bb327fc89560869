use serde::{Deserialize, Serialize};

/// A watchlist identity as returned by the identity store.
///
/// `id` is the opaque matcher-side identifier; `external_id` is the
/// human-facing identifier carried into detection records and
/// notifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub external_id: String,
    pub group: String,
    pub photo_url: String,
}

/// One sighting of one identity in one processed frame.
///
/// Never deduplicated: every processed frame that matches an identity
/// produces a fresh record. All records built from the same frame carry an
/// identical timestamp string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    pub external_id: String,
    pub name: String,
    pub group: String,
    pub timestamp: String,
    pub photo_url: String,
}

impl DetectionRecord {
    pub fn from_identity(identity: &IdentityRecord, timestamp: String) -> Self {
        Self {
            external_id: identity.external_id.clone(),
            name: identity.name.clone(),
            group: identity.group.clone(),
            timestamp,
            photo_url: identity.photo_url.clone(),
        }
    }
}

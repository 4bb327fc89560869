use crate::shared::frame::Frame;

/// What the matcher found in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchOutcome {
    /// Opaque identity ids, zero or more per frame.
    pub identity_ids: Vec<String>,
    /// One JPEG summarizing all matches in the frame, when the matcher
    /// produced one.
    pub annotated_jpeg: Option<Vec<u8>>,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.identity_ids.is_empty()
    }
}

/// Domain interface for identity matching on a frame.
///
/// The matching algorithm itself is an external capability; implementations
/// may be stateful (e.g. connection reuse), hence `&mut self`.
pub trait EmbeddingMatcher: Send {
    fn match_frame(&mut self, frame: &Frame) -> Result<MatchOutcome, Box<dyn std::error::Error>>;
}

use crate::shared::frame::Frame;

/// What a capture source can report about itself once opened.
///
/// Live sources have no total frame count; `fps` is the rate the source
/// claims to deliver, not a measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub source: String,
}

/// Reads frames from a capture device, stream URL, or file.
///
/// Implementations handle protocol and codec details; the sampler works
/// with the abstract `Frame` and `StreamInfo` types. Each yielded frame
/// owns its buffer independently of the source's internal state.
pub trait FrameSource: Send {
    /// Opens the source. Failure here is fatal to the run.
    fn open(&mut self, source: &str) -> Result<StreamInfo, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in delivery order. A yielded error
    /// means the source stopped delivering; `None` is a normal end of
    /// stream.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}

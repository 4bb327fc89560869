use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, PartialEq)]
pub enum DispatchError {
    #[error("detection queue is full ({in_flight} jobs in flight)")]
    QueueFull { in_flight: usize },
    #[error("detection workers have shut down")]
    Closed,
}

/// Hands a sampled frame to whatever runs detection tasks.
///
/// `dispatch` must never block: the capture loop calls it between reads,
/// and a rejection is the caller's signal to drop the sample and move on.
pub trait TaskDispatcher: Send + Sync {
    fn dispatch(&self, frame: Frame) -> Result<(), DispatchError>;
}

use std::time::{Duration, Instant};

/// Decides when a frame is due for sampling.
///
/// `Elapsed` measures real time on a monotonic clock and is the default:
/// it holds the configured sampling period even when the device delivers
/// frames faster or slower than advertised. `FrameCount` reproduces the
/// classic `counter % (wait * rate)` behavior for sources with a trusted,
/// fixed delivery rate.
#[derive(Debug)]
pub enum SamplePacer {
    FrameCount {
        every: u64,
    },
    Elapsed {
        interval: Duration,
        last: Option<Instant>,
    },
}

impl SamplePacer {
    /// Due on every `every`-th frame, starting with frame 0.
    pub fn every_n_frames(every: u64) -> Result<Self, &'static str> {
        if every == 0 {
            return Err("frame interval must be >= 1");
        }
        Ok(Self::FrameCount { every })
    }

    /// Frame-count pacing from a wait duration and an assumed device rate:
    /// due when `counter % (wait_secs * assumed_fps) == 0`.
    pub fn from_frame_rate(wait_secs: u64, assumed_fps: u64) -> Result<Self, &'static str> {
        Self::every_n_frames(wait_secs * assumed_fps)
    }

    /// Due whenever `interval` has elapsed since the last due sample.
    /// The first frame observed is always due.
    pub fn by_elapsed(interval: Duration) -> Self {
        Self::Elapsed {
            interval,
            last: None,
        }
    }

    /// `now` is passed in rather than read here, so pacing is deterministic
    /// under test.
    pub fn due(&mut self, frame_counter: u64, now: Instant) -> bool {
        match self {
            Self::FrameCount { every } => frame_counter % *every == 0,
            Self::Elapsed { interval, last } => match last {
                Some(prev) if now.duration_since(*prev) < *interval => false,
                _ => {
                    *last = Some(now);
                    true
                }
            },
        }
    }
}

use chrono::{FixedOffset, NaiveTime, Utc};

use crate::schedule::time_window::TimeWindow;

/// Decides whether detection may run at a given wall-clock time.
///
/// The window list and UTC offset are fixed at construction; the gate holds
/// no other state and performs no I/O, so it is cheap to consult on every
/// sampled frame. An empty window list never allows detection.
#[derive(Clone, Debug)]
pub struct WindowGate {
    windows: Vec<TimeWindow>,
    offset: FixedOffset,
}

impl WindowGate {
    pub fn new(windows: Vec<TimeWindow>, offset: FixedOffset) -> Self {
        Self { windows, offset }
    }

    /// True iff `t` falls inside any configured window.
    pub fn allows_at(&self, t: NaiveTime) -> bool {
        self.windows.iter().any(|w| w.contains(t))
    }

    /// Evaluates the current time of day in the configured offset.
    pub fn is_allowed_now(&self) -> bool {
        self.allows_at(Utc::now().with_timezone(&self.offset).time())
    }
}

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum WindowParseError {
    #[error("window '{0}' is not of the form HH:MM-HH:MM")]
    Shape(String),
    #[error("invalid time '{0}'")]
    Time(String),
}

/// A wall-clock time-of-day interval, inclusive at both ends.
///
/// A window whose end precedes its start spans midnight: `22:00-02:00`
/// contains 23:30 and 01:00 but not 12:00.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parses `"HH:MM-HH:MM"` or `"HH:MM:SS-HH:MM:SS"`.
    pub fn parse(s: &str) -> Result<Self, WindowParseError> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| WindowParseError::Shape(s.to_string()))?;
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= t && t <= self.end
        } else {
            t >= self.start || t <= self.end
        }
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, WindowParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| WindowParseError::Time(s.to_string()))
}

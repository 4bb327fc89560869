use chrono::FixedOffset;

use facewatch_core::schedule::time_window::TimeWindow;

/// Collaborating service endpoints, loaded from environment variables.
///
/// All fields have defaults suitable for a local stack; override via the
/// environment in production.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Matching service endpoint.
    pub matcher_url: String,
    /// Identity lookup endpoint.
    pub identity_url: String,
    /// Notification relay endpoint.
    pub notify_url: String,
    /// Recipient address forwarded with every notification, if set.
    pub recipient: Option<String>,
    /// Detection batch endpoint; when unset, batches append to
    /// `detections_path` instead.
    pub detections_url: Option<String>,
    /// Local detection log used without a `DETECTIONS_URL`.
    pub detections_path: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                                   |
    /// |-------------------|-------------------------------------------|
    /// | `MATCHER_URL`     | `http://localhost:5001/match`             |
    /// | `IDENTITY_URL`    | `http://localhost:5000/identities/lookup` |
    /// | `NOTIFY_URL`      | `http://localhost:5000/send-email`        |
    /// | `RECIPIENT_EMAIL` | unset                                     |
    /// | `DETECTIONS_URL`  | unset (use `DETECTIONS_PATH`)             |
    /// | `DETECTIONS_PATH` | `detections.jsonl`                        |
    pub fn from_env() -> Self {
        Self {
            matcher_url: std::env::var("MATCHER_URL")
                .unwrap_or_else(|_| "http://localhost:5001/match".into()),
            identity_url: std::env::var("IDENTITY_URL")
                .unwrap_or_else(|_| "http://localhost:5000/identities/lookup".into()),
            notify_url: std::env::var("NOTIFY_URL")
                .unwrap_or_else(|_| "http://localhost:5000/send-email".into()),
            recipient: std::env::var("RECIPIENT_EMAIL").ok(),
            detections_url: std::env::var("DETECTIONS_URL").ok(),
            detections_path: std::env::var("DETECTIONS_PATH")
                .unwrap_or_else(|_| "detections.jsonl".into()),
        }
    }
}

/// Parses a `+HH:MM` / `-HH:MM` offset string.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, String> {
    let invalid = || format!("UTC offset must look like +05:30, got '{s}'");

    let (east, rest) = if let Some(rest) = s.strip_prefix('+') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (false, rest)
    } else {
        return Err(invalid());
    };

    let (h, m) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = h.parse().map_err(|_| invalid())?;
    let minutes: i32 = m.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    let secs = hours * 3600 + minutes * 60;
    let offset = if east {
        FixedOffset::east_opt(secs)
    } else {
        FixedOffset::west_opt(secs)
    };
    offset.ok_or_else(invalid)
}

/// Parses the `--window` values; an empty list becomes a full-day window so
/// a bare invocation still samples.
pub fn parse_windows(specs: &[String]) -> Result<Vec<TimeWindow>, String> {
    if specs.is_empty() {
        log::warn!("no detection windows configured; sampling all day");
        return Ok(vec![TimeWindow::parse("00:00-23:59:59").expect("full-day window parses")]);
    }
    specs
        .iter()
        .map(|spec| TimeWindow::parse(spec).map_err(|e| e.to_string()))
        .collect()
}

/// Seconds between sampled frames when nothing else is configured.
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 4;

/// Assumed source frame rate for frame-count pacing.
pub const DEFAULT_ASSUMED_FRAME_RATE: u64 = 30;

/// Detection worker threads.
pub const DEFAULT_WORKERS: usize = 2;

/// Pending detection jobs the dispatch queue will hold before rejecting.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Timeout applied to every outbound HTTP call, so a hung collaborator
/// cannot pin a worker forever.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Detection record timestamp layout, second precision.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Quality for JPEG frames sent to the matcher and attached to notifications.
pub const JPEG_QUALITY: u8 = 90;

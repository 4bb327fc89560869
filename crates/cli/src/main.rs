use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use clap::Parser;

use facewatch_core::capture::infrastructure::ffmpeg_source::FfmpegFrameSource;
use facewatch_core::matching::infrastructure::http_identity_store::HttpIdentityStore;
use facewatch_core::matching::infrastructure::http_matcher::HttpEmbeddingMatcher;
use facewatch_core::notify::infrastructure::http_notification_sender::HttpNotificationSender;
use facewatch_core::pipeline::detection_task::DetectionTask;
use facewatch_core::pipeline::infrastructure::worker_pool::DetectionWorkerPool;
use facewatch_core::pipeline::sample_pacer::SamplePacer;
use facewatch_core::pipeline::sampler::FrameSampler;
use facewatch_core::schedule::window_gate::WindowGate;
use facewatch_core::shared::constants::{
    DEFAULT_ASSUMED_FRAME_RATE, DEFAULT_QUEUE_CAPACITY, DEFAULT_SAMPLE_INTERVAL_SECS,
    DEFAULT_WORKERS,
};
use facewatch_core::storage::domain::detection_store::DetectionStore;
use facewatch_core::storage::infrastructure::http_detection_store::HttpDetectionStore;
use facewatch_core::storage::infrastructure::jsonl_detection_store::JsonlDetectionStore;

mod config;

use config::{parse_utc_offset, parse_windows, ServiceConfig};

/// Scheduled watchlist detection on a live video source.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Capture source: device node, stream URL, or video file.
    source: String,

    /// Detection window as HH:MM-HH:MM (repeatable, comma-separated).
    #[arg(long, value_delimiter = ',')]
    window: Vec<String>,

    /// UTC offset for wall-clock gating and timestamps, e.g. +05:30.
    #[arg(long, default_value = "+00:00")]
    utc_offset: String,

    /// Seconds between sampled frames.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL_SECS)]
    sample_interval: u64,

    /// Pace sampling by frame count instead of elapsed time.
    #[arg(long)]
    frame_paced: bool,

    /// Assumed source frame rate; only used with --frame-paced.
    #[arg(long, default_value_t = DEFAULT_ASSUMED_FRAME_RATE)]
    frame_rate: u64,

    /// Detection worker threads.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Sampled frames that may wait for a free worker.
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let services = ServiceConfig::from_env();
    let offset = parse_utc_offset(&cli.utc_offset)?;
    let windows = parse_windows(&cli.window)?;
    let gate = WindowGate::new(windows, offset);

    let pacer = if cli.frame_paced {
        SamplePacer::from_frame_rate(cli.sample_interval, cli.frame_rate)?
    } else {
        SamplePacer::by_elapsed(Duration::from_secs(cli.sample_interval))
    };

    let stop = Arc::new(AtomicBool::new(false));
    spawn_quit_watcher(stop.clone());

    let tasks = build_tasks(&services, offset, cli.workers)?;
    let pool = DetectionWorkerPool::new(tasks, cli.queue_capacity)?;

    let mut sampler = FrameSampler::new(gate, pacer, stop);
    let mut source = FfmpegFrameSource::new();
    let run_result = sampler.run(&mut source, &cli.source, &pool);

    // Drain queued detections even when the capture loop failed.
    let stats = pool.shutdown();
    let report = run_result?;

    log::info!(
        "run complete: {} frames read, {} dispatched, {} outside windows, {} dispatch failures, {} task failures",
        report.frames_read,
        report.dispatched,
        report.gate_skips,
        report.dispatch_failures,
        stats.failed
    );
    Ok(())
}

fn build_tasks(
    services: &ServiceConfig,
    offset: FixedOffset,
    workers: usize,
) -> Result<Vec<DetectionTask>, Box<dyn std::error::Error>> {
    let mut tasks = Vec::with_capacity(workers);
    for _ in 0..workers {
        let detections: Box<dyn DetectionStore> = match &services.detections_url {
            Some(url) => Box::new(HttpDetectionStore::new(url)?),
            None => Box::new(JsonlDetectionStore::new(&services.detections_path)),
        };
        tasks.push(DetectionTask::new(
            Box::new(HttpEmbeddingMatcher::new(&services.matcher_url)?),
            Box::new(HttpIdentityStore::new(&services.identity_url)?),
            Box::new(HttpNotificationSender::new(
                &services.notify_url,
                services.recipient.clone(),
            )?),
            detections,
            offset,
        ));
    }
    Ok(tasks)
}

/// Sets the stop flag when the operator types `q`. A closed stdin leaves
/// the run to end with its capture source.
fn spawn_quit_watcher(stop: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if line.trim().eq_ignore_ascii_case("q") {
                        log::info!("quit requested");
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                }
            }
        }
    });
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.sample_interval == 0 {
        return Err("Sample interval must be at least 1 second".into());
    }
    if cli.frame_paced && cli.frame_rate == 0 {
        return Err("Frame rate must be at least 1 with --frame-paced".into());
    }
    if cli.workers == 0 {
        return Err("At least one worker is required".into());
    }
    if cli.queue_capacity == 0 {
        return Err(format!(
            "Queue capacity must be at least 1, got {}",
            cli.queue_capacity
        )
        .into());
    }
    Ok(())
}

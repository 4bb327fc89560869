use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::capture::domain::frame_source::FrameSource;
use crate::pipeline::sample_pacer::SamplePacer;
use crate::pipeline::task_dispatcher::TaskDispatcher;
use crate::schedule::window_gate::WindowGate;

/// What one capture run did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SamplerReport {
    pub frames_read: u64,
    pub dispatched: u64,
    pub gate_skips: u64,
    pub dispatch_failures: u64,
}

/// Drives the capture source and decides, frame by frame, whether to hand
/// the frame to the detection workers.
///
/// The loop owns the source exclusively and never waits on detection work:
/// dispatch is non-blocking and a rejected dispatch only costs that one
/// sample. Failing to open the source is fatal; a read error ends the run
/// with that error; end of stream or the stop flag ends it normally.
pub struct FrameSampler {
    gate: WindowGate,
    pacer: SamplePacer,
    stop: Arc<AtomicBool>,
}

impl FrameSampler {
    pub fn new(gate: WindowGate, pacer: SamplePacer, stop: Arc<AtomicBool>) -> Self {
        Self { gate, pacer, stop }
    }

    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        origin: &str,
        dispatcher: &dyn TaskDispatcher,
    ) -> Result<SamplerReport, Box<dyn std::error::Error>> {
        let info = source.open(origin)?;
        log::info!(
            "capture open: {} ({}x{} @ {:.1} fps)",
            info.source,
            info.width,
            info.height,
            info.fps
        );

        let mut report = SamplerReport::default();
        let mut read_error: Option<Box<dyn std::error::Error>> = None;

        for frame_result in source.frames() {
            if self.stop.load(Ordering::Relaxed) {
                log::info!("stop requested, ending capture");
                break;
            }

            let frame = match frame_result {
                Ok(frame) => frame,
                Err(e) => {
                    log::error!("frame read failed, ending capture: {e}");
                    read_error = Some(e);
                    break;
                }
            };

            // Counter advances on every successful read, gated or not.
            let counter = report.frames_read;
            report.frames_read += 1;

            if !self.pacer.due(counter, Instant::now()) {
                continue;
            }

            if !self.gate.is_allowed_now() {
                report.gate_skips += 1;
                log::debug!("frame {counter}: sampling due but outside detection windows");
                continue;
            }

            match dispatcher.dispatch(frame) {
                Ok(()) => report.dispatched += 1,
                Err(e) => {
                    report.dispatch_failures += 1;
                    log::warn!("frame {counter}: detection dispatch failed: {e}");
                }
            }
        }

        source.close();

        match read_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::frame_source::StreamInfo;
    use crate::pipeline::task_dispatcher::DispatchError;
    use crate::schedule::time_window::TimeWindow;
    use crate::shared::frame::Frame;
    use chrono::{FixedOffset, NaiveTime};
    use std::sync::Mutex;

    // --- Stubs ---

    struct StubSource {
        frames: Vec<Result<Frame, String>>,
        fail_open: bool,
        closed: Arc<Mutex<bool>>,
    }

    impl StubSource {
        fn with_frames(count: u64) -> Self {
            Self {
                frames: (0..count).map(|i| Ok(make_frame(i))).collect(),
                fail_open: false,
                closed: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl FrameSource for StubSource {
        fn open(&mut self, source: &str) -> Result<StreamInfo, Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("camera missing".into());
            }
            Ok(StreamInfo {
                width: 4,
                height: 4,
                fps: 30.0,
                source: source.to_string(),
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(
                self.frames
                    .drain(..)
                    .map(|r| r.map_err(|e| -> Box<dyn std::error::Error> { e.into() })),
            )
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct CollectingDispatcher {
        indices: Mutex<Vec<u64>>,
    }

    impl CollectingDispatcher {
        fn new() -> Self {
            Self {
                indices: Mutex::new(Vec::new()),
            }
        }
    }

    impl TaskDispatcher for CollectingDispatcher {
        fn dispatch(&self, frame: Frame) -> Result<(), DispatchError> {
            self.indices.lock().unwrap().push(frame.index());
            Ok(())
        }
    }

    struct RejectingDispatcher;

    impl TaskDispatcher for RejectingDispatcher {
        fn dispatch(&self, _frame: Frame) -> Result<(), DispatchError> {
            Err(DispatchError::QueueFull { in_flight: 8 })
        }
    }

    // --- Helpers ---

    fn make_frame(index: u64) -> Frame {
        Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 3, index)
    }

    fn open_gate() -> WindowGate {
        WindowGate::new(
            vec![TimeWindow::new(
                NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
            )],
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn closed_gate() -> WindowGate {
        WindowGate::new(vec![], FixedOffset::east_opt(0).unwrap())
    }

    fn sampler(gate: WindowGate, every: u64) -> FrameSampler {
        FrameSampler::new(
            gate,
            SamplePacer::every_n_frames(every).unwrap(),
            Arc::new(AtomicBool::new(false)),
        )
    }

    // --- Tests ---

    #[test]
    fn test_dispatches_every_nth_frame_when_gate_open() {
        let mut source = StubSource::with_frames(6);
        let dispatcher = CollectingDispatcher::new();

        let report = sampler(open_gate(), 2)
            .run(&mut source, "stub://cam", &dispatcher)
            .unwrap();

        assert_eq!(report.frames_read, 6);
        assert_eq!(report.dispatched, 3);
        assert_eq!(*dispatcher.indices.lock().unwrap(), vec![0, 2, 4]);
    }

    #[test]
    fn test_counter_advances_when_gate_closed() {
        let mut source = StubSource::with_frames(5);
        let dispatcher = CollectingDispatcher::new();

        let report = sampler(closed_gate(), 1)
            .run(&mut source, "stub://cam", &dispatcher)
            .unwrap();

        assert_eq!(report.frames_read, 5);
        assert_eq!(report.dispatched, 0);
        assert_eq!(report.gate_skips, 5);
        assert!(dispatcher.indices.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_failure_does_not_stop_the_loop() {
        let mut source = StubSource::with_frames(4);

        let report = sampler(open_gate(), 1)
            .run(&mut source, "stub://cam", &RejectingDispatcher)
            .unwrap();

        assert_eq!(report.frames_read, 4);
        assert_eq!(report.dispatched, 0);
        assert_eq!(report.dispatch_failures, 4);
    }

    #[test]
    fn test_open_failure_is_fatal() {
        let mut source = StubSource::with_frames(0);
        source.fail_open = true;

        let result = sampler(open_gate(), 1).run(&mut source, "stub://cam", &RejectingDispatcher);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_error_ends_run_with_error_and_closes_source() {
        let mut source = StubSource::with_frames(2);
        source.frames.push(Err("device unplugged".into()));
        source.frames.push(Ok(make_frame(3)));
        let closed = source.closed.clone();
        let dispatcher = CollectingDispatcher::new();

        let result = sampler(open_gate(), 1).run(&mut source, "stub://cam", &dispatcher);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("device unplugged"));
        // The two frames before the failure were still processed.
        assert_eq!(*dispatcher.indices.lock().unwrap(), vec![0, 1]);
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_stop_flag_ends_run() {
        let mut source = StubSource::with_frames(10);
        let stop = Arc::new(AtomicBool::new(true));
        let mut sampler = FrameSampler::new(
            open_gate(),
            SamplePacer::every_n_frames(1).unwrap(),
            stop,
        );

        let report = sampler
            .run(&mut source, "stub://cam", &CollectingDispatcher::new())
            .unwrap();
        assert_eq!(report.frames_read, 0);
    }

    #[test]
    fn test_end_of_stream_closes_source() {
        let mut source = StubSource::with_frames(1);
        let closed = source.closed.clone();

        sampler(open_gate(), 1)
            .run(&mut source, "stub://cam", &CollectingDispatcher::new())
            .unwrap();
        assert!(*closed.lock().unwrap());
    }
}

// THEORY:
// The `pipeline` module is the top-level API of the library. It owns the whole
// per-frame cycle: acquire a frame, classify it, fold the result into the
// session state, decorate the frame and hand it to the display.
//
// Camera, model and window are collaborators behind traits (`FrameSource`,
// `EmotionClassifier`, `FrameSink`, `Clock`), so the cycle runs unchanged
// against OpenCV in the front end and against scripted fakes in tests.
//
// All mutable state lives in one `EmotionSession` value: the bounded history,
// the frequency table and the rate-limited logger. A frame whose
// classification fails leaves all three untouched.

use crate::config::SessionConfig;
use crate::core_modules::emotion_log::RateLimitedLogger;
use crate::core_modules::frequency::FrequencyCounter;
use crate::core_modules::history::HistoryTracker;
use crate::core_modules::overlay::{self, Canvas};
use crate::error::{ClassifierError, LogError, SessionError};
use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::emotion::{Analysis, Emotion, EmotionScores};
pub use crate::core_modules::emotion_log::LogOutcome;

/// Yields frames from a capture device. `Ok(None)` means the source is exhausted.
pub trait FrameSource {
    type Frame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>, SessionError>;
}

/// Finds the dominant emotion in a frame.
pub trait EmotionClassifier<F> {
    fn analyze(&mut self, frame: &F) -> Result<Analysis, ClassifierError>;
}

/// Shows a frame to the operator and reports whether they asked to stop.
pub trait FrameSink<F> {
    fn present(&mut self, frame: &F) -> Result<Control, SessionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// What happened to the emotion log for one detection.
#[derive(Debug)]
pub enum LogStatus {
    Written,
    Throttled,
    Failed(LogError),
}

/// A detection folded into the session.
#[derive(Debug)]
pub struct Detection {
    pub emotion: Emotion,
    pub log: LogStatus,
    /// False when a drawing call on the frame failed.
    pub overlay_drawn: bool,
}

/// The primary output of the session for a single frame.
#[derive(Debug)]
pub enum FrameReport {
    Detected(Detection),
    /// Classification failed; the frame is shown undecorated and no state changed.
    Skipped(ClassifierError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuitRequested,
    SourceExhausted,
    CaptureFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub analysed: u64,
    pub skipped: u64,
    pub records_written: u64,
    pub log_failures: u64,
    pub stop_reason: StopReason,
}

/// Session state: everything that survives from one frame to the next.
#[derive(Debug, Clone)]
pub struct EmotionSession {
    history: HistoryTracker,
    frequencies: FrequencyCounter,
    logger: RateLimitedLogger,
}

impl EmotionSession {
    /// `started_at` is the session start; the first log record is due one
    /// interval after it.
    pub fn new(config: &SessionConfig, started_at: DateTime<Local>) -> Self {
        Self {
            history: HistoryTracker::new(config.history_capacity),
            frequencies: FrequencyCounter::new(),
            logger: RateLimitedLogger::new(config.log_path.clone(), config.log_interval, started_at),
        }
    }

    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    pub fn frequencies(&self) -> &FrequencyCounter {
        &self.frequencies
    }

    pub fn logger(&self) -> &RateLimitedLogger {
        &self.logger
    }

    /// Folds a successful analysis into history, frequency table and log.
    /// A failed log write is reported in the result, never propagated.
    pub fn record(&mut self, analysis: &Analysis, now: DateTime<Local>) -> Detection {
        let emotion = analysis.dominant;
        debug!(
            %emotion,
            confidence = analysis.scores.get(emotion),
            face_found = analysis.face_found,
            "detected"
        );

        self.history.append(emotion);
        self.frequencies.increment(emotion);

        let log = match self.logger.maybe_log(emotion, now) {
            Ok(LogOutcome::Written) => {
                info!(%emotion, path = %self.logger.path().display(), "logged emotion");
                LogStatus::Written
            }
            Ok(LogOutcome::Throttled) => LogStatus::Throttled,
            Err(e) => {
                error!("Failed to log emotion: {}", e);
                LogStatus::Failed(e)
            }
        };

        Detection {
            emotion,
            log,
            overlay_drawn: false,
        }
    }

    /// Classifies one frame and, on success, records it and draws the overlay.
    pub fn process_frame<F, C, L>(&mut self, frame: &mut F, classifier: &mut C, clock: &L) -> FrameReport
    where
        F: Canvas,
        C: EmotionClassifier<F> + ?Sized,
        L: Clock + ?Sized,
    {
        let analysis = match classifier.analyze(frame) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Error analyzing frame: {}", e);
                return FrameReport::Skipped(e);
            }
        };

        let mut detection = self.record(&analysis, clock.now());
        match overlay::render(frame, detection.emotion, &self.frequencies) {
            Ok(()) => detection.overlay_drawn = true,
            Err(e) => warn!("{}", e),
        }
        FrameReport::Detected(detection)
    }

    /// Runs the frame cycle until the operator quits or the source runs dry.
    ///
    /// Capture errors end the loop like an exhausted source; display errors are returned.
    pub fn run<S, C, K, L>(
        &mut self,
        source: &mut S,
        classifier: &mut C,
        sink: &mut K,
        clock: &L,
    ) -> Result<RunSummary, SessionError>
    where
        S: FrameSource + ?Sized,
        S::Frame: Canvas,
        C: EmotionClassifier<S::Frame> + ?Sized,
        K: FrameSink<S::Frame> + ?Sized,
        L: Clock + ?Sized,
    {
        let mut summary = RunSummary {
            frames: 0,
            analysed: 0,
            skipped: 0,
            records_written: 0,
            log_failures: 0,
            stop_reason: StopReason::SourceExhausted,
        };

        loop {
            let mut frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    summary.stop_reason = StopReason::SourceExhausted;
                    break;
                }
                Err(e) => {
                    error!("Error reading frame: {}", e);
                    summary.stop_reason = StopReason::CaptureFailed;
                    break;
                }
            };
            summary.frames += 1;

            match self.process_frame(&mut frame, classifier, clock) {
                FrameReport::Detected(detection) => {
                    summary.analysed += 1;
                    match detection.log {
                        LogStatus::Written => summary.records_written += 1,
                        LogStatus::Failed(_) => summary.log_failures += 1,
                        LogStatus::Throttled => {}
                    }
                }
                FrameReport::Skipped(_) => summary.skipped += 1,
            }

            if sink.present(&frame)? == Control::Quit {
                summary.stop_reason = StopReason::QuitRequested;
                break;
            }
        }

        info!(
            frames = summary.frames,
            analysed = summary.analysed,
            skipped = summary.skipped,
            records = summary.records_written,
            reason = ?summary.stop_reason,
            "session ended"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::overlay::{Color, Rect, TextItem};
    use crate::error::RenderError;
    use chrono::{TimeDelta, TimeZone};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::Path;
    use Emotion::*;

    fn at(seconds: i64) -> DateTime<Local> {
        let base = Local.with_ymd_and_hms(2026, 10, 15, 14, 0, 0).single().expect("valid local time");
        base + TimeDelta::seconds(seconds)
    }

    #[derive(Debug, Default)]
    struct FakeFrame {
        id: usize,
        texts: Vec<String>,
        fills: usize,
    }

    impl Canvas for FakeFrame {
        fn fill_rect(&mut self, _rect: Rect, _color: Color) -> Result<(), RenderError> {
            self.fills += 1;
            Ok(())
        }

        fn draw_text(&mut self, item: &TextItem) -> Result<(), RenderError> {
            self.texts.push(item.text.clone());
            Ok(())
        }
    }

    /// Hands out `frames` frames, then optionally fails instead of running dry.
    struct ScriptedSource {
        next: usize,
        frames: usize,
        fail_at_end: bool,
    }

    impl ScriptedSource {
        fn new(frames: usize) -> Self {
            Self {
                next: 0,
                frames,
                fail_at_end: false,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        type Frame = FakeFrame;

        fn next_frame(&mut self) -> Result<Option<FakeFrame>, SessionError> {
            if self.next == self.frames {
                if self.fail_at_end {
                    return Err(SessionError::Capture("device unplugged".to_string()));
                }
                return Ok(None);
            }
            self.next += 1;
            Ok(Some(FakeFrame {
                id: self.next,
                ..FakeFrame::default()
            }))
        }
    }

    /// `None` entries make the classifier fail for that frame.
    struct ScriptedClassifier(VecDeque<Option<Emotion>>);

    impl ScriptedClassifier {
        fn new(script: &[Option<Emotion>]) -> Self {
            Self(script.iter().copied().collect())
        }
    }

    impl EmotionClassifier<FakeFrame> for ScriptedClassifier {
        fn analyze(&mut self, _frame: &FakeFrame) -> Result<Analysis, ClassifierError> {
            match self.0.pop_front().flatten() {
                Some(emotion) => Ok(Analysis::certain(emotion)),
                None => Err(ClassifierError::Inference("no usable face".to_string())),
            }
        }
    }

    /// Returns the scripted instants in order, one per call.
    struct ScriptedClock(RefCell<VecDeque<DateTime<Local>>>);

    impl ScriptedClock {
        fn new(seconds: &[i64]) -> Self {
            Self(RefCell::new(seconds.iter().map(|s| at(*s)).collect()))
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> DateTime<Local> {
            self.0.borrow_mut().pop_front().expect("clock script exhausted")
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        shown: Vec<(usize, bool)>,
        quit_after: Option<usize>,
        fail: bool,
    }

    impl FrameSink<FakeFrame> for RecordingSink {
        fn present(&mut self, frame: &FakeFrame) -> Result<Control, SessionError> {
            if self.fail {
                return Err(SessionError::Display("window closed".to_string()));
            }
            self.shown.push((frame.id, !frame.texts.is_empty()));
            if Some(self.shown.len()) == self.quit_after {
                return Ok(Control::Quit);
            }
            Ok(Control::Continue)
        }
    }

    fn session_logging_to(path: &Path, started_at: DateTime<Local>) -> EmotionSession {
        let config = SessionConfig {
            log_path: path.to_path_buf(),
            ..SessionConfig::default()
        };
        EmotionSession::new(&config, started_at)
    }

    fn log_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn throttled_detection_still_updates_history_and_counts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("emotion_history.txt");
        let mut session = session_logging_to(&path, at(-15));
        let mut source = ScriptedSource::new(3);
        let mut classifier = ScriptedClassifier::new(&[Some(Happy), Some(Happy), Some(Sad)]);
        let mut sink = RecordingSink::default();
        let clock = ScriptedClock::new(&[0, 5, 20]);

        let summary = session.run(&mut source, &mut classifier, &mut sink, &clock).expect("run");

        assert_eq!(
            log_lines(&path),
            vec!["2026-10-15 14:00:00: happy", "2026-10-15 14:00:20: sad"]
        );
        assert_eq!(session.frequencies().count(Happy), 2);
        assert_eq!(session.frequencies().count(Sad), 1);
        assert_eq!(session.frequencies().len(), 2);
        assert_eq!(session.history().to_vec(), vec![Happy, Happy, Sad]);
        assert_eq!(summary.records_written, 2);
        assert_eq!(summary.analysed, 3);
        assert_eq!(summary.stop_reason, StopReason::SourceExhausted);
    }

    #[test]
    fn classifier_failure_leaves_state_untouched() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("emotion_history.txt");
        let mut session = session_logging_to(&path, at(-15));
        let mut source = ScriptedSource::new(3);
        let mut classifier = ScriptedClassifier::new(&[Some(Fear), None, Some(Angry)]);
        let mut sink = RecordingSink::default();
        let clock = ScriptedClock::new(&[0, 1]);

        let summary = session.run(&mut source, &mut classifier, &mut sink, &clock).expect("run");

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.analysed, 2);
        assert_eq!(session.history().to_vec(), vec![Fear, Angry]);
        assert_eq!(session.frequencies().total(), 2);
        assert_eq!(log_lines(&path), vec!["2026-10-15 14:00:00: fear"]);
        // The failed frame is still displayed, just without decoration.
        assert_eq!(sink.shown, vec![(1, true), (2, false), (3, true)]);
    }

    #[test]
    fn history_keeps_only_the_five_latest_of_six() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("emotion_history.txt");
        let mut session = session_logging_to(&path, at(0));
        let script = [Angry, Disgust, Fear, Happy, Sad, Surprise];
        let mut classifier = ScriptedClassifier::new(&script.map(Some));
        let mut source = ScriptedSource::new(6);
        let mut sink = RecordingSink::default();
        let clock = ScriptedClock::new(&[1, 2, 3, 4, 5, 6]);

        session.run(&mut source, &mut classifier, &mut sink, &clock).expect("run");

        assert_eq!(session.history().to_vec(), script[1..].to_vec());
        assert_eq!(session.frequencies().len(), 6);
        assert!(log_lines(&path).is_empty());
    }

    #[test]
    fn log_failure_does_not_stop_detection() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("no_such_dir").join("emotion_history.txt");
        let mut session = session_logging_to(&path, at(-15));
        let mut source = ScriptedSource::new(3);
        let mut classifier = ScriptedClassifier::new(&[Some(Sad), Some(Sad), Some(Neutral)]);
        let mut sink = RecordingSink::default();
        let clock = ScriptedClock::new(&[0, 1, 2]);

        let summary = session.run(&mut source, &mut classifier, &mut sink, &clock).expect("run");

        // Every detection retries the write because the gate never advanced.
        assert_eq!(summary.log_failures, 3);
        assert_eq!(summary.analysed, 3);
        assert_eq!(session.frequencies().count(Sad), 2);
        assert_eq!(session.logger().last_write(), at(-15));
        assert_eq!(sink.shown.len(), 3);
    }

    #[test]
    fn quit_key_ends_the_session() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_logging_to(&dir.path().join("log.txt"), at(0));
        let mut source = ScriptedSource::new(10);
        let mut classifier = ScriptedClassifier::new(&[Some(Happy); 10]);
        let mut sink = RecordingSink {
            quit_after: Some(2),
            ..RecordingSink::default()
        };
        let clock = ScriptedClock::new(&[1, 2]);

        let summary = session.run(&mut source, &mut classifier, &mut sink, &clock).expect("run");

        assert_eq!(summary.stop_reason, StopReason::QuitRequested);
        assert_eq!(summary.frames, 2);
        assert_eq!(source.next, 2);
    }

    #[test]
    fn capture_error_ends_the_loop_cleanly() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_logging_to(&dir.path().join("log.txt"), at(0));
        let mut source = ScriptedSource {
            fail_at_end: true,
            ..ScriptedSource::new(1)
        };
        let mut classifier = ScriptedClassifier::new(&[Some(Neutral)]);
        let mut sink = RecordingSink::default();
        let clock = ScriptedClock::new(&[1]);

        let summary = session.run(&mut source, &mut classifier, &mut sink, &clock).expect("run");

        assert_eq!(summary.stop_reason, StopReason::CaptureFailed);
        assert_eq!(summary.frames, 1);
    }

    #[test]
    fn display_error_is_returned() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_logging_to(&dir.path().join("log.txt"), at(0));
        let mut source = ScriptedSource::new(1);
        let mut classifier = ScriptedClassifier::new(&[Some(Neutral)]);
        let mut sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let clock = ScriptedClock::new(&[1]);

        let result = session.run(&mut source, &mut classifier, &mut sink, &clock);
        assert!(matches!(result, Err(SessionError::Display(_))));
    }

    #[test]
    fn decorated_frame_shows_label_and_bar_captions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_logging_to(&dir.path().join("log.txt"), at(0));
        let mut classifier = ScriptedClassifier::new(&[Some(Surprise)]);
        let mut frame = FakeFrame::default();

        let report = session.process_frame(&mut frame, &mut classifier, &ScriptedClock::new(&[3]));

        match report {
            FrameReport::Detected(detection) => {
                assert_eq!(detection.emotion, Surprise);
                assert!(detection.overlay_drawn);
                assert!(matches!(detection.log, LogStatus::Throttled));
            }
            FrameReport::Skipped(e) => panic!("unexpected skip: {e}"),
        }
        assert_eq!(frame.texts, vec!["Emotion: surprise", "surprise"]);
        assert_eq!(frame.fills, 3);
    }
}

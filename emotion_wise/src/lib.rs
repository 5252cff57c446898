// THEORY:
// This file is the main entry point for the `emotion_wise` library crate.
// It exposes the `EmotionSession` and the collaborator traits of the frame
// cycle as the public API. Everything in here runs without a camera: the
// front end supplies frames, a classifier and a window by implementing
// `FrameSource`, `EmotionClassifier`, `FrameSink` and `overlay::Canvas`.

pub mod config;
pub mod console;
pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use config::SessionConfig;
pub use core_modules::overlay;
pub use error::{ClassifierError, LogError, RenderError, SessionError};
pub use pipeline::{
    Analysis, Clock, Control, Emotion, EmotionClassifier, EmotionScores, EmotionSession, FrameReport, FrameSink,
    FrameSource, RunSummary, StopReason, SystemClock,
};

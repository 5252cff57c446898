// THEORY:
// Every failure the session can observe is named here. The split mirrors how
// the driver reacts to each one: classifier, log and render failures are
// recovered inside the frame loop, while session errors end it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why the classifier could not produce an analysis for a frame.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("frame preprocessing failed: {0}")]
    Preprocess(String),
    #[error("face search failed: {0}")]
    FaceSearch(String),
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("model produced {got} scores, expected {expected}")]
    OutputShape { expected: usize, got: usize },
}

/// A record could not be appended to the emotion log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot open emotion log {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot write emotion log {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// A drawing call on the frame failed.
#[derive(Debug, Error)]
#[error("overlay drawing failed: {0}")]
pub struct RenderError(pub String);

/// Failures of the capture device or the display window.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("capture device error: {0}")]
    Capture(String),
    #[error("display error: {0}")]
    Display(String),
}

// THEORY:
// The `camera` module owns the capture device. `Camera` is a guard: opening it
// acquires the device and dropping it releases the device, so every exit path
// out of the frame loop, including errors, hands the webcam back.

use crate::frame::CameraFrame;
use emotion_wise::{FrameSource, SessionError};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{info, warn};

pub struct Camera {
    capture: VideoCapture,
    index: i32,
}

impl Camera {
    pub fn open(index: i32) -> opencv::Result<Self> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(opencv::Error::new(
                opencv::core::StsError,
                format!("camera {} could not be opened", index),
            ));
        }
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        info!(index, width, height, "camera opened");
        Ok(Self { capture, index })
    }
}

impl FrameSource for Camera {
    type Frame = CameraFrame;

    fn next_frame(&mut self) -> Result<Option<CameraFrame>, SessionError> {
        let mut mat = Mat::default();
        let grabbed = self
            .capture
            .read(&mut mat)
            .map_err(|e| SessionError::Capture(e.to_string()))?;
        if !grabbed || mat.empty() {
            return Ok(None);
        }
        Ok(Some(CameraFrame::new(mat)))
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        match self.capture.release() {
            Ok(()) => info!(index = self.index, "camera released"),
            Err(e) => warn!(index = self.index, "failed to release camera: {}", e),
        }
    }
}

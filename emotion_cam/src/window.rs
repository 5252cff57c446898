// THEORY:
// The `window` module is the display end of the frame cycle. Every frame,
// decorated or not, is scaled to the fixed output resolution, shown, and the
// keyboard is polled once for the quit key. The window is a guard too:
// dropping it tears down every HighGUI window.

use crate::frame::CameraFrame;
use emotion_wise::{Control, FrameSink, SessionConfig, SessionError};
use opencv::{
    core::{Mat, Size},
    highgui, imgproc,
};

const KEY_POLL_MS: i32 = 1;

pub struct PreviewWindow {
    title: String,
    size: Size,
    quit_key: char,
}

impl PreviewWindow {
    pub fn open(config: &SessionConfig) -> opencv::Result<Self> {
        highgui::named_window(&config.window_title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: config.window_title.clone(),
            size: Size::new(config.display_width as i32, config.display_height as i32),
            quit_key: config.quit_key,
        })
    }
}

/// `wait_key` returns -1 when nothing was pressed; only the low byte names the key.
fn is_quit_key(key: i32, quit_key: char) -> bool {
    key >= 0 && u32::from((key & 0xFF) as u8) == u32::from(quit_key)
}

fn display_error(e: opencv::Error) -> SessionError {
    SessionError::Display(e.to_string())
}

impl FrameSink<CameraFrame> for PreviewWindow {
    fn present(&mut self, frame: &CameraFrame) -> Result<Control, SessionError> {
        let mut resized = Mat::default();
        imgproc::resize(&frame.mat, &mut resized, self.size, 0.0, 0.0, imgproc::INTER_LINEAR)
            .map_err(display_error)?;
        highgui::imshow(&self.title, &resized).map_err(display_error)?;

        let key = highgui::wait_key(KEY_POLL_MS).map_err(display_error)?;
        if is_quit_key(key, self.quit_key) {
            Ok(Control::Quit)
        } else {
            Ok(Control::Continue)
        }
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        let _ = highgui::destroy_all_windows();
    }
}

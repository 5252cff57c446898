use std::path::PathBuf;
use std::time::Duration;

use crate::core_modules::emotion_log::DEFAULT_LOG_INTERVAL;
use crate::core_modules::history::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_LOG_PATH: &str = "emotion_history.txt";
pub const DEFAULT_WINDOW_TITLE: &str = "EmotionWise: the emotion detector app";

/// Configuration for an `EmotionSession` and the window it renders into.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How many of the most recent labels the history keeps.
    pub history_capacity: usize,
    /// Minimum wall-clock gap between two records in the emotion log.
    pub log_interval: Duration,
    /// Append-only text file receiving `<timestamp>: <label>` lines.
    pub log_path: PathBuf,
    pub display_width: u32,
    pub display_height: u32,
    /// Index of the capture device handed to the camera backend.
    pub camera_index: i32,
    pub window_title: String,
    /// Key that ends the session from inside the video window.
    pub quit_key: char,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            log_interval: DEFAULT_LOG_INTERVAL,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            display_width: 1280,
            display_height: 720,
            camera_index: 1,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            quit_key: 'q',
        }
    }
}

pub mod emotion;
pub mod emotion_log;
pub mod frequency;
pub mod history;
pub mod overlay;

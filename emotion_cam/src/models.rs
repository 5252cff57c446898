use std::path::PathBuf;

pub const MODEL_ENV: &str = "EMOTIONWISE_MODEL";
pub const CASCADE_ENV: &str = "EMOTIONWISE_CASCADE";
pub const DEFAULT_MODEL_PATH: &str = "models/emotion-ferplus-8.onnx";
pub const DEFAULT_CASCADE_PATH: &str = "models/haarcascade_frontalface_default.xml";

/// Locations of the pretrained files the classifier loads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    /// FER+ ONNX network: 64x64 grayscale in, eight expression logits out.
    pub emotion_model: PathBuf,
    /// OpenCV Haar cascade for frontal faces.
    pub face_cascade: PathBuf,
}

impl ModelPaths {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            emotion_model: path(MODEL_ENV, DEFAULT_MODEL_PATH),
            face_cascade: path(CASCADE_ENV, DEFAULT_CASCADE_PATH),
        }
    }
}

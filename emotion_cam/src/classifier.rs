// THEORY:
// The `classifier` module is the bridge to the pretrained model. It works in
// two stages on a grayscale copy of the frame:
// 1.  **Face finding**: a Haar cascade looks for frontal faces and the largest
//     one is kept. When none is found the whole frame is used instead, so a
//     frame without a visible face still yields a (weak) dominant emotion.
// 2.  **Expression scoring**: the region is scaled to 64x64 and run through a
//     FER+ ONNX network with OpenCV's DNN module. Its eight logits are turned
//     into probabilities and folded onto the seven session labels.

use crate::frame::CameraFrame;
use crate::models::ModelPaths;
use anyhow::{Context, bail};
use emotion_wise::core_modules::emotion::softmax;
use emotion_wise::{Analysis, ClassifierError, Emotion, EmotionClassifier, EmotionScores};
use opencv::{
    core::{self, Mat, Rect, Scalar, Size, Vector},
    dnn, imgproc, objdetect,
    prelude::*,
};

const FERPLUS_INPUT: i32 = 64;
/// FER+ output order. Contempt has no session label and counts toward disgust.
const FERPLUS_LABELS: [Emotion; 8] = [
    Emotion::Neutral,
    Emotion::Happy,
    Emotion::Surprise,
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Disgust,
    Emotion::Fear,
    Emotion::Disgust,
];

const FACE_SCALE_FACTOR: f64 = 1.1;
const FACE_MIN_NEIGHBORS: i32 = 5;
const FACE_MIN_SIZE: i32 = 40;

/// Folds raw FER+ logits into per-label probabilities.
pub fn scores_from_ferplus(logits: &[f32]) -> Result<EmotionScores, ClassifierError> {
    if logits.len() != FERPLUS_LABELS.len() {
        return Err(ClassifierError::OutputShape {
            expected: FERPLUS_LABELS.len(),
            got: logits.len(),
        });
    }
    let mut scores = EmotionScores::default();
    for (emotion, probability) in FERPLUS_LABELS.iter().zip(softmax(logits)) {
        scores.accumulate(*emotion, probability);
    }
    Ok(scores)
}

pub struct OpenCvEmotionClassifier {
    faces: objdetect::CascadeClassifier,
    net: dnn::Net,
}

impl OpenCvEmotionClassifier {
    pub fn load(paths: &ModelPaths) -> anyhow::Result<Self> {
        let cascade_path = paths.face_cascade.to_string_lossy();
        let faces = objdetect::CascadeClassifier::new(&cascade_path)
            .with_context(|| format!("loading face cascade {}", cascade_path))?;
        if faces.empty()? {
            bail!("face cascade {} is empty", cascade_path);
        }

        let model_path = paths.emotion_model.to_string_lossy();
        let net = dnn::read_net_from_onnx(&model_path)
            .with_context(|| format!("loading emotion model {}", model_path))?;

        tracing::info!(model = %model_path, cascade = %cascade_path, "emotion classifier loaded");
        Ok(Self { faces, net })
    }

    fn largest_face(&mut self, gray: &Mat) -> Result<Option<Rect>, ClassifierError> {
        let mut found = Vector::<Rect>::new();
        self.faces
            .detect_multi_scale(
                gray,
                &mut found,
                FACE_SCALE_FACTOR,
                FACE_MIN_NEIGHBORS,
                0,
                Size::new(FACE_MIN_SIZE, FACE_MIN_SIZE),
                Size::new(0, 0),
            )
            .map_err(|e| ClassifierError::FaceSearch(e.to_string()))?;
        Ok(found.iter().max_by_key(|r| r.width * r.height))
    }

    fn score(&mut self, region: &impl core::ToInputArray) -> Result<EmotionScores, ClassifierError> {
        let blob = dnn::blob_from_image(
            region,
            1.0,
            Size::new(FERPLUS_INPUT, FERPLUS_INPUT),
            Scalar::default(),
            false,
            false,
            core::CV_32F,
        )
        .map_err(|e| ClassifierError::Preprocess(e.to_string()))?;

        let inference = |e: opencv::Error| ClassifierError::Inference(e.to_string());
        self.net.set_input(&blob, "", 1.0, Scalar::default()).map_err(inference)?;
        let output = self.net.forward_single("").map_err(inference)?;
        let logits = output.data_typed::<f32>().map_err(inference)?;
        scores_from_ferplus(logits)
    }
}

impl EmotionClassifier<CameraFrame> for OpenCvEmotionClassifier {
    fn analyze(&mut self, frame: &CameraFrame) -> Result<Analysis, ClassifierError> {
        let mut gray = Mat::default();
        imgproc::cvt_color(&frame.mat, &mut gray, imgproc::COLOR_BGR2GRAY, 0)
            .map_err(|e| ClassifierError::Preprocess(e.to_string()))?;

        let face = self.largest_face(&gray)?;
        let scores = match face {
            Some(rect) => {
                let region = Mat::roi(&gray, rect).map_err(|e| ClassifierError::Preprocess(e.to_string()))?;
                self.score(&region)?
            }
            None => self.score(&gray)?,
        };
        Ok(Analysis::from_scores(scores, face.is_some()))
    }
}

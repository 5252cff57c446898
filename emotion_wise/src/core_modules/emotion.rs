// THEORY:
// The `emotion` module fixes the vocabulary of the whole system. The classifier
// can only ever answer with one of seven labels, so the label is a closed enum
// rather than a free string, and everything downstream (history, frequency
// table, log, overlay) is keyed by it.
//
// An `Analysis` is what a successful classifier run yields for one frame: the
// dominant label, the per-label confidences it was chosen from, and whether a
// face was actually located or the whole frame had to be used instead.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the seven facial expressions the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    pub const COUNT: usize = 7;

    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// The lowercase label used in the log file and on screen.
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion label `{0}`")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownEmotion(label.to_string()))
    }
}

/// Confidence for every label, as produced by a single classifier run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmotionScores([f32; Emotion::COUNT]);

impl EmotionScores {
    pub fn new(scores: [f32; Emotion::COUNT]) -> Self {
        Self(scores)
    }

    pub fn get(&self, emotion: Emotion) -> f32 {
        self.0[emotion.index()]
    }

    /// Adds `value` to the confidence already held for `emotion`.
    pub fn accumulate(&mut self, emotion: Emotion, value: f32) {
        self.0[emotion.index()] += value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// The highest-scoring label. Ties go to the label listed first in `Emotion::ALL`;
    /// NaN scores never win.
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::Neutral;
        let mut best_score = f32::NEG_INFINITY;
        for (emotion, score) in self.iter() {
            if score > best_score {
                best = emotion;
                best_score = score;
            }
        }
        best
    }
}

/// The outcome of a successful classifier run on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub dominant: Emotion,
    pub scores: EmotionScores,
    /// False when no face was located and the whole frame was classified.
    pub face_found: bool,
}

impl Analysis {
    pub fn from_scores(scores: EmotionScores, face_found: bool) -> Self {
        Self {
            dominant: scores.dominant(),
            scores,
            face_found,
        }
    }

    /// An analysis that is certain about `emotion`.
    pub fn certain(emotion: Emotion) -> Self {
        let mut scores = EmotionScores::default();
        scores.accumulate(emotion, 1.0);
        Self::from_scores(scores, true)
    }
}

/// Numerically stable softmax over raw model outputs.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}
